//! Terminal set-point chooser.
//!
//! Presents the thermostat range as a list of half-degree steps with the
//! current value preselected. Escape keeps the current value.

use dialoguer::Select;
use tracing::warn;

use fritzact_core::SetpointChooser;
use fritzact_core::model::setpoint::{celsius_to_percent, percent_to_celsius};

const MIN_CELSIUS: f64 = 8.0;
const MAX_CELSIUS: f64 = 28.0;
/// Half-degree steps from 8 to 28 °C.
const STEPS: usize = 41;

pub struct TerminalSlider;

impl SetpointChooser for TerminalSlider {
    fn choose(&self, label: &str, current_percent: f64) -> Option<f64> {
        let items: Vec<String> = (0..STEPS).map(|i| format!("{:.1} °C", step_celsius(i))).collect();

        let picked = Select::new()
            .with_prompt(format!("{label}: set-point"))
            .items(&items)
            .default(step_index(percent_to_celsius(current_percent)))
            .max_length(12)
            .interact_opt();

        match picked {
            Ok(choice) => choice.map(|i| celsius_to_percent(step_celsius(i))),
            Err(e) => {
                warn!(error = %e, "set-point prompt failed");
                None
            }
        }
    }
}

#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
fn step_celsius(index: usize) -> f64 {
    MIN_CELSIUS + index as f64 * 0.5
}

#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn step_index(celsius: f64) -> usize {
    let clamped = celsius.clamp(MIN_CELSIUS, MAX_CELSIUS);
    ((clamped - MIN_CELSIUS) * 2.0).round() as usize
}

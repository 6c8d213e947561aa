//! What one process run should do.
//!
//! Subcommands and `invoke` query strings both end up as an
//! [`Invocation`]; the command layer only ever matches on this enum.

use fritzact_core::{Action, DeviceType};
use url::form_urlencoded;

use crate::cli::TypeFilter;
use crate::error::CliError;

#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// Print the device list.
    List { device_type: Option<DeviceType> },
    /// Send one actuator command.
    Command {
        action: Action,
        ain: String,
        /// Fixed target for `temp`; the chooser asks when absent.
        celsius: Option<f64>,
        /// Name shown by the set-point chooser.
        label: Option<String>,
    },
    /// Pick the preferred device.
    SetPreferred,
    /// Pick the read-only devices.
    SetReadOnly,
    /// Act on the preferred device, or ask which one.
    Interactive { device_type: Option<DeviceType> },
}

impl Invocation {
    pub fn command(action: Action, ain: impl Into<String>) -> Self {
        Self::Command {
            action,
            ain: ain.into(),
            celsius: None,
            label: None,
        }
    }
}

impl From<TypeFilter> for DeviceType {
    fn from(filter: TypeFilter) -> Self {
        match filter {
            TypeFilter::Switch => DeviceType::Switch,
            TypeFilter::Thermostat => DeviceType::Thermostat,
            TypeFilter::Group => DeviceType::Group,
        }
    }
}

/// Type filter from a query value. Repeaters list as switches; anything
/// else unrecognised means "no filter".
fn parse_type(value: &str) -> Option<DeviceType> {
    match value.trim() {
        "switch" | "repeater" => Some(DeviceType::Switch),
        "thermostat" => Some(DeviceType::Thermostat),
        "group" => Some(DeviceType::Group),
        _ => None,
    }
}

/// Decode `action=<name>&ain=<id>&type=<t>&param=<v>&label=<text>`.
///
/// Values are percent-decoded. A missing or unknown action is the
/// interactive default.
pub fn parse(query: &str) -> Result<Invocation, CliError> {
    let query = query.trim().trim_start_matches('?');

    let mut action = String::new();
    let mut ain = String::new();
    let mut device_type = None;
    let mut param = None;
    let mut label = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "action" => action = value.trim().to_owned(),
            "ain" => ain = value.trim().to_owned(),
            "type" => device_type = parse_type(&value),
            "param" => param = Some(value.trim().to_owned()).filter(|v| !v.is_empty()),
            "label" => label = Some(value.into_owned()).filter(|v| !v.is_empty()),
            _ => tracing::debug!(%key, "ignoring unknown invocation parameter"),
        }
    }

    let action = match action.as_str() {
        "list" => return Ok(Invocation::List { device_type }),
        "setpreferredain" => return Ok(Invocation::SetPreferred),
        "setreadonlyain" => return Ok(Invocation::SetReadOnly),
        "on" => Action::On,
        "off" => Action::Off,
        "toggle" => Action::Toggle,
        "temp" => Action::Temp,
        _ => return Ok(Invocation::Interactive { device_type }),
    };

    if ain.is_empty() {
        return Err(CliError::Validation {
            field: "ain".into(),
            reason: format!("action '{action}' needs an ain"),
        });
    }

    let celsius = match (action, param) {
        (Action::Temp, Some(p)) => Some(
            p.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| CliError::Validation {
                    field: "param".into(),
                    reason: format!("expected a temperature in °C, got '{p}'"),
                })?,
        ),
        _ => None,
    };

    Ok(Invocation::Command {
        action,
        ain,
        celsius,
        label,
    })
}

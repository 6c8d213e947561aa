//! Actuator commands: on, off, toggle, temp.

use tracing::debug;

use fritzact_core::{
    Action, Actuator, CommandOutcome, CommandRequest, FixedSetpoint, SetpointChooser,
};

use crate::error::CliError;
use crate::slider::TerminalSlider;

use super::Ctx;

/// Send one command; a read-only device is reported as an error.
pub async fn run(
    ctx: &Ctx<'_>,
    action: Action,
    ain: &str,
    celsius: Option<f64>,
    label: Option<String>,
) -> Result<(), CliError> {
    let request = build_request(ctx, action, ain, label).await?;

    let fixed = celsius.map(FixedSetpoint::celsius);
    let chooser: &dyn SetpointChooser = match fixed {
        Some(ref fixed) => fixed,
        None => &TerminalSlider,
    };

    match ctx.controller.execute(&request, chooser).await? {
        CommandOutcome::Sent { response } => {
            ctx.notify
                .success(&sent_message(action, request.label.as_deref().unwrap_or(ain), &response));
            Ok(())
        }
        CommandOutcome::ReadOnly => Err(CliError::ReadOnly { ain: ain.to_owned() }),
        CommandOutcome::Unchanged => {
            debug!(ain, "set-point unchanged");
            Ok(())
        }
    }
}

/// A `temp` request needs the device's current set-point. Read-only
/// devices skip the lookup; `execute` rejects them without a request.
async fn build_request(
    ctx: &Ctx<'_>,
    action: Action,
    ain: &str,
    label: Option<String>,
) -> Result<CommandRequest, CliError> {
    let plain = CommandRequest::new(action, ain);
    if action != Action::Temp || ctx.controller.config().policy.is_read_only(ain) {
        return Ok(CommandRequest { label, ..plain });
    }

    let device = ctx.controller.find_device(ain).await?;
    if device.actuator != Actuator::Thermostat {
        return Err(CliError::Validation {
            field: "ain".into(),
            reason: format!("{} is not a thermostat", device.display_name()),
        });
    }

    let label = label.unwrap_or_else(|| device.display_name().to_owned());
    Ok(plain.with_setpoint(device.slider_raw, label))
}

fn sent_message(action: Action, target: &str, response: &str) -> String {
    match action {
        Action::Temp => format!("{target}: set-point sent ({response})"),
        Action::On | Action::Off | Action::Toggle => match response {
            "1" => format!("{target} is on"),
            "0" => format!("{target} is off"),
            other => format!("{target}: {action} sent ({other})"),
        },
    }
}

// ── Command dispatch ──
//
// Turns a user action into one authenticated `switchcmd`. Read-only
// devices are rejected before anything touches the network; set-point
// changes go through an injected chooser and are skipped when the value
// did not change.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, error, info, warn};

use fritzact_api::SwitchCommand;

use crate::controller::Controller;
use crate::error::CoreError;
use crate::model::setpoint::{celsius_to_percent, percent_to_raw, raw_to_percent};

/// Actuator action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    On,
    Off,
    Toggle,
    Temp,
}

impl Action {
    pub fn command(self) -> SwitchCommand {
        match self {
            Self::On => SwitchCommand::SetSwitchOn,
            Self::Off => SwitchCommand::SetSwitchOff,
            Self::Toggle => SwitchCommand::SetSwitchToggle,
            Self::Temp => SwitchCommand::SetHkrTsoll,
        }
    }
}

/// Picks a new thermostat set-point.
///
/// Works on the 0–100 % slider scale (0 % = 8 °C, 100 % = 28 °C). May
/// block, e.g. on user input.
pub trait SetpointChooser {
    /// `None` keeps the current value.
    fn choose(&self, label: &str, current_percent: f64) -> Option<f64>;
}

/// A chooser that always answers with the same percent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSetpoint(pub Option<f64>);

impl FixedSetpoint {
    /// Target a temperature instead of a slider position.
    pub fn celsius(celsius: f64) -> Self {
        Self(Some(celsius_to_percent(celsius)))
    }
}

impl SetpointChooser for FixedSetpoint {
    fn choose(&self, _label: &str, _current_percent: f64) -> Option<f64> {
        self.0
    }
}

/// One command to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRequest {
    pub action: Action,
    pub ain: String,
    /// Current raw set-point; required for [`Action::Temp`].
    pub current_raw: Option<i64>,
    /// Device name shown by the chooser.
    pub label: Option<String>,
}

impl CommandRequest {
    pub fn new(action: Action, ain: impl Into<String>) -> Self {
        Self {
            action,
            ain: ain.into(),
            current_raw: None,
            label: None,
        }
    }

    pub fn with_setpoint(mut self, current_raw: i64, label: impl Into<String>) -> Self {
        self.current_raw = Some(current_raw);
        self.label = Some(label.into());
        self
    }
}

/// What became of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The gateway accepted the command; trimmed response body.
    Sent { response: String },
    /// The device is read-only; nothing was sent.
    ReadOnly,
    /// The chosen set-point equals the current one; nothing was sent.
    Unchanged,
}

impl Controller {
    /// Execute one actuator command.
    ///
    /// Transport and protocol failures come back as
    /// [`CoreError::CommandFailed`]; policy rejections and no-ops are
    /// `Ok` outcomes.
    pub async fn execute(
        &self,
        request: &CommandRequest,
        chooser: &dyn SetpointChooser,
    ) -> Result<CommandOutcome, CoreError> {
        let ain = request.ain.trim();
        let command = request.action.command();

        debug!(%command, ain, label = ?request.label, "command requested");

        if self.config().policy.is_read_only(ain) {
            warn!(ain, "device is read-only, command blocked");
            return Ok(CommandOutcome::ReadOnly);
        }

        let param = match request.action {
            Action::Temp => match choose_setpoint(request, chooser)? {
                Some(raw) => Some(raw.to_string()),
                None => return Ok(CommandOutcome::Unchanged),
            },
            Action::On | Action::Off | Action::Toggle => None,
        };

        let Some(session) = self.session().await else {
            error!("not logged in or no connection to gateway");
            return Err(CoreError::NotAuthenticated);
        };

        let response = self
            .client()
            .switch_command(&session.sid, command, Some(ain), param.as_deref())
            .await
            .map_err(|e| {
                error!(error = %e, %command, ain, "command failed");
                CoreError::CommandFailed {
                    command: command.to_string(),
                    reason: e.to_string(),
                }
            })?;

        info!(%command, ain, response = %response, "command sent");

        if let Some(marker) = self.marker() {
            if let Err(e) = marker.touch(Utc::now()) {
                warn!(error = %e, path = %marker.path().display(), "cannot update activity marker");
            }
        }

        Ok(CommandOutcome::Sent { response })
    }
}

/// Ask the chooser for a new raw set-point; `None` when nothing changes.
fn choose_setpoint(
    request: &CommandRequest,
    chooser: &dyn SetpointChooser,
) -> Result<Option<i64>, CoreError> {
    let current = request
        .current_raw
        .ok_or_else(|| CoreError::ValidationFailed {
            message: format!("no current set-point known for {}", request.ain),
        })?;

    let label = request.label.as_deref().unwrap_or(&request.ain);
    let Some(percent) = chooser.choose(label, raw_to_percent(current)) else {
        debug!("set-point chooser cancelled");
        return Ok(None);
    };

    if !percent.is_finite() {
        return Err(CoreError::ValidationFailed {
            message: format!("set-point for {} is not a number", request.ain),
        });
    }
    if !(0.0..=100.0).contains(&percent) {
        warn!(percent, "set-point outside 8-28 °C, clamped");
    }

    let raw = percent_to_raw(percent);
    debug!(before = current, now = raw, "thermostat raw set-point");

    if raw == current {
        debug!("set-point unchanged, nothing to send");
        return Ok(None);
    }
    Ok(Some(raw))
}

//! Command dispatch: bridges an `Invocation` -> core calls -> output.

pub mod config_cmd;
pub mod devices;
pub mod select;
pub mod session;
pub mod switch;

use std::time::Duration;

use tracing::debug;

use fritzact_config::state;
use fritzact_core::{ActivityMarker, Controller};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::invocation::Invocation;
use crate::notify::Notifier;

/// Shared state for one gateway-bound run.
pub struct Ctx<'a> {
    pub controller: Controller,
    pub global: &'a GlobalOpts,
    pub notify: Notifier,
}

/// Dispatch a gateway-bound invocation to the appropriate handler.
pub async fn dispatch(invocation: Invocation, global: &GlobalOpts) -> Result<(), CliError> {
    debug!(?invocation, "dispatching");

    let cfg = config::effective_config(global)?;
    let ctx = Ctx {
        controller: session::connect(&cfg).await?,
        global,
        notify: Notifier::new(global),
    };

    match invocation {
        Invocation::List { device_type } => devices::list(&ctx, device_type).await,
        Invocation::Command {
            action,
            ain,
            celsius,
            label,
        } => switch::run(&ctx, action, &ain, celsius, label).await,
        Invocation::SetPreferred => select::prefer(&ctx).await,
        Invocation::SetReadOnly => select::read_only(&ctx).await,
        Invocation::Interactive { device_type } => {
            select::interactive(&ctx, cfg.default_action, device_type).await
        }
    }
}

/// Activity marker under the state dir.
pub(crate) fn marker(debounce: Duration) -> ActivityMarker {
    ActivityMarker::new(state::marker_path(), debounce)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub(crate) fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

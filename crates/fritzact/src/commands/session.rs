//! Session lifecycle around the on-disk cache.

use secrecy::SecretString;
use tracing::{debug, warn};

use fritzact_config::{Config, state};
use fritzact_core::Controller;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::notify::Notifier;

/// Build a controller and establish a session, persisting a fresh login.
///
/// A cache that cannot be read counts as empty; one that cannot be
/// written only costs a login next time.
pub async fn connect(cfg: &Config) -> Result<Controller, CliError> {
    let gateway = config::gateway_config(cfg)?;
    let debounce = gateway.marker_debounce;
    let controller = Controller::new(gateway, Some(super::marker(debounce)))?;

    let cache = state::load_session().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable session cache");
        state::SessionCache::default()
    });

    let session = controller.ensure_session(&cache.to_stored()).await?;
    if session.refreshed {
        if let Err(e) = state::save_session(&state::SessionCache::from_session(&session)) {
            warn!(error = %e, path = %state::state_path().display(), "cannot write session cache");
        }
    }

    Ok(controller)
}

/// End the cached session at the gateway and forget it.
pub async fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let notify = Notifier::new(global);
    let cache = state::load_session()?;

    if !cache.sid.as_ref().is_some_and(|sid| sid.is_valid()) {
        debug!("no cached session");
        state::clear_session()?;
        notify.info("No active session");
        return Ok(());
    }

    let cfg = config::effective_config(global)?;
    // Ending a session needs no password.
    let password = fritzact_config::resolve_password(&cfg)
        .unwrap_or_else(|_| SecretString::from(String::new()));
    let gateway = fritzact_config::to_gateway_config(&cfg, password)?;
    let controller = Controller::new(gateway, None)?;

    controller.logout_stored(&cache.to_stored()).await?;
    state::clear_session()?;

    notify.success("Logged out");
    Ok(())
}

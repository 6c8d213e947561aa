// ── Controller abstraction ──
//
// Facade over one gateway for a single short-lived invocation: holds the
// immutable configuration, the HTTP client and the session established
// for this run. Session handling, inventory and command dispatch are
// implemented on it in their own modules.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use fritzact_api::GatewayClient;
use fritzact_api::transport::{TlsMode, TransportConfig};

use crate::config::{GatewayConfig, TlsVerification};
use crate::error::CoreError;
use crate::marker::ActivityMarker;
use crate::session::{Session, StoredSession};

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: GatewayConfig,
    client: GatewayClient,
    /// Set by `ensure_session`, cleared by `logout`.
    session: Mutex<Option<Session>>,
    marker: Option<ActivityMarker>,
}

impl Controller {
    /// Create a controller. Does NOT log in -- call
    /// [`ensure_session()`](Self::ensure_session) first.
    pub fn new(config: GatewayConfig, marker: Option<ActivityMarker>) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = GatewayClient::new(config.url.clone(), &transport)?;

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                session: Mutex::new(None),
                marker,
            }),
        })
    }

    /// Access the gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    pub(crate) fn client(&self) -> &GatewayClient {
        &self.inner.client
    }

    pub(crate) fn marker(&self) -> Option<&ActivityMarker> {
        self.inner.marker.as_ref()
    }

    /// The session established for this run, if any.
    pub async fn session(&self) -> Option<Session> {
        self.inner.session.lock().await.clone()
    }

    pub(crate) async fn set_session(&self, session: Option<Session>) {
        *self.inner.session.lock().await = session;
    }

    /// End the current session at the gateway.
    ///
    /// Without a session this is a no-op.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let Some(session) = self.session().await else {
            debug!("no session to end");
            return Ok(());
        };

        if let Err(e) = self.client().logout(&session.sid).await {
            warn!(error = %e, "gateway logout failed");
            return Err(e.into());
        }

        self.set_session(None).await;
        Ok(())
    }

    /// End a cached session without establishing one first.
    ///
    /// Returns `false` when the cache holds no usable id.
    pub async fn logout_stored(&self, stored: &StoredSession) -> Result<bool, CoreError> {
        let Some(sid) = stored.sid.as_ref().filter(|s| s.is_valid()) else {
            debug!("no cached session to end");
            return Ok(false);
        };

        self.client().logout(sid).await.inspect_err(|e| {
            warn!(error = %e, "gateway logout failed");
        })?;

        self.set_session(None).await;
        Ok(true)
    }
}

fn build_transport(config: &GatewayConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

// ── Core error types ──
//
// User-facing errors from fritzact-core. Consumers never see raw HTTP or
// XML failures: the `From<fritzact_api::Error>` impl folds them into the
// connectivity / protocol / authentication taxonomy.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connectivity ─────────────────────────────────────────────────
    #[error("Gateway unreachable at {url}: {reason}")]
    GatewayUnreachable { url: String, reason: String },

    #[error("Gateway did not answer within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Protocol ─────────────────────────────────────────────────────
    #[error("Unexpected gateway response: {message}")]
    Protocol {
        message: String,
        /// HTTP status code (if the gateway produced one).
        status: Option<u16>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login blocked by gateway, retry in {seconds}s")]
    LoginBlocked { seconds: u64 },

    #[error("Password contains characters the login challenge cannot encode")]
    CredentialEncoding,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not logged in to the gateway")]
    NotAuthenticated,

    // ── Data ─────────────────────────────────────────────────────────
    #[error("No device list available")]
    NoDeviceList,

    #[error("Device not found: {ain}")]
    DeviceNotFound { ain: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Command {command} failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The gateway could not be reached (refused, unresolvable, timed out).
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::GatewayUnreachable { .. } | Self::Timeout { .. })
    }

    /// Failure of the login exchange or a missing session.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::LoginBlocked { .. }
                | Self::CredentialEncoding
                | Self::AuthenticationFailed { .. }
                | Self::NotAuthenticated
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fritzact_api::Error> for CoreError {
    fn from(err: fritzact_api::Error) -> Self {
        match err {
            fritzact_api::Error::LoginBlocked { block_time_secs } => CoreError::LoginBlocked {
                seconds: block_time_secs,
            },
            fritzact_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            fritzact_api::Error::CredentialEncoding => CoreError::CredentialEncoding,
            fritzact_api::Error::NotAuthenticated => CoreError::NotAuthenticated,
            fritzact_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if let Some(status) = e.status() {
                    CoreError::Protocol {
                        message: e.to_string(),
                        status: Some(status.as_u16()),
                    }
                } else {
                    CoreError::GatewayUnreachable {
                        url: e
                            .url()
                            .map(|u| u.origin().ascii_serialization())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                }
            }
            fritzact_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid gateway URL: {e}"),
            },
            fritzact_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            fritzact_api::Error::Tls(msg) => CoreError::GatewayUnreachable {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            fritzact_api::Error::HttpStatus { status, .. } => CoreError::Protocol {
                message: format!("HTTP {status}"),
                status: Some(status),
            },
            fritzact_api::Error::Xml { message, body: _ } => CoreError::Protocol {
                message,
                status: None,
            },
            fritzact_api::Error::MissingElement { element } => CoreError::Protocol {
                message: format!("missing <{element}>"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_their_category() {
        let blocked: CoreError = fritzact_api::Error::LoginBlocked {
            block_time_secs: 60,
        }
        .into();
        assert!(matches!(blocked, CoreError::LoginBlocked { seconds: 60 }));
        assert!(blocked.is_auth());

        let status: CoreError = fritzact_api::Error::HttpStatus {
            status: 500,
            body: String::new(),
        }
        .into();
        assert!(matches!(
            status,
            CoreError::Protocol {
                status: Some(500),
                ..
            }
        ));
        assert!(!status.is_connectivity());

        let timeout: CoreError = fritzact_api::Error::Timeout { timeout_secs: 5 }.into();
        assert!(timeout.is_connectivity());
    }
}

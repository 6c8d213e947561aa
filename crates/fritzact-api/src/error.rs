use thiserror::Error;

/// Top-level error type for the `fritzact-api` crate.
///
/// Covers every failure mode of the gateway's HTTP surface: session
/// login, transport, HTTP status and XML payloads.
/// `fritzact-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The gateway refused the credentials and imposed a login block.
    #[error("Login blocked by gateway -- retry in {block_time_secs}s")]
    LoginBlocked { block_time_secs: u64 },

    /// The gateway refused the credentials without a block.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The password contains characters the UTF-16LE challenge cannot carry.
    #[error("Password contains characters outside the login challenge encoding")]
    CredentialEncoding,

    /// A command was attempted without a valid session id.
    #[error("No valid session -- login required")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// The gateway answered with a non-success HTTP status.
    #[error("Gateway returned HTTP {status}")]
    HttpStatus { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// XML parsing failed, with the raw body for debugging.
    #[error("Malformed XML from gateway: {message}")]
    Xml { message: String, body: String },

    /// A mandatory element was absent from an otherwise valid document.
    #[error("Gateway response is missing <{element}>")]
    MissingElement { element: &'static str },
}

impl Error {
    /// Returns `true` if the gateway could not be reached at all
    /// (refused, unresolvable, or timed out).
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the gateway answered but the exchange was unusable
    /// (bad status or unparsable payload).
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::HttpStatus { .. } | Self::Xml { .. } | Self::MissingElement { .. }
        )
    }

    /// Returns `true` if this error comes from the login exchange itself.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::LoginBlocked { .. }
                | Self::Authentication { .. }
                | Self::CredentialEncoding
                | Self::NotAuthenticated
        )
    }
}

// ── Runtime gateway configuration ──
//
// These types describe *how* to talk to one gateway and which policy
// applies to its devices. They carry credential data but never touch
// disk: the CLI builds a `GatewayConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Gateway root URL from a host name (or a full URL) and the TLS switch.
pub fn gateway_url(host: &str, tls: bool) -> Result<Url, CoreError> {
    Ok(fritzact_api::GatewayClient::base_url_for(host, tls)?)
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. The gateway's factory certificate is self-signed.
    #[default]
    DangerAcceptInvalid,
}

/// When a cached session id is worth probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPolicy {
    /// Probe the cached id only while the last login is younger than this.
    MaxAge(Duration),
    /// Always probe the cached id, however old.
    AlwaysValidate,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::MaxAge(Duration::from_secs(3600))
    }
}

impl SessionPolicy {
    /// `0` seconds means "always validate".
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            Self::AlwaysValidate
        } else {
            Self::MaxAge(Duration::from_secs(secs))
        }
    }
}

/// Device access policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// AINs that must never receive a command.
    pub read_only: Vec<String>,
    /// Keep devices without a recognised capability in listings.
    pub show_unknown: bool,
}

impl AccessPolicy {
    /// Exact match against the read-only list, ignoring surrounding whitespace.
    pub fn is_read_only(&self, ain: &str) -> bool {
        let ain = ain.trim();
        self.read_only.iter().any(|entry| entry.trim() == ain)
    }
}

/// Configuration for one gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway root URL (e.g. `http://fritz.box`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Bound for every request.
    pub timeout: Duration,
    pub session_policy: SessionPolicy,
    pub policy: AccessPolicy,
    /// Device the interactive default acts on without asking.
    pub preferred_ain: Option<String>,
    /// Minimum gap between two activity-marker writes.
    pub marker_debounce: Duration,
}

impl GatewayConfig {
    /// A config with library defaults for everything but the endpoint and credentials.
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: fritzact_api::transport::DEFAULT_TIMEOUT,
            session_policy: SessionPolicy::default(),
            policy: AccessPolicy::default(),
            preferred_ain: None,
            marker_debounce: Duration::from_secs(5),
        }
    }
}

// Gateway HTTP client
//
// Wraps `reqwest::Client` with the gateway's two endpoint paths, status
// checking and timeout classification. The login exchange and the
// switch commands are implemented as inherent methods in separate files
// to keep this module focused on transport mechanics.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{DEFAULT_TIMEOUT, TransportConfig};

pub(crate) const LOGIN_PATH: &str = "/login_sid.lua";
pub(crate) const SWITCH_PATH: &str = "/webservices/homeautoswitch.lua";

/// Raw HTTP client for one gateway endpoint.
///
/// Every request is a `GET` with query parameters; responses are XML
/// (login, device list) or plain text (actuator commands).
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl GatewayClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the gateway root, e.g. `http://fritz.box` or
    /// `https://192.168.178.1`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build the gateway base URL from a host name and the TLS switch.
    pub fn base_url_for(host: &str, tls: bool) -> Result<Url, Error> {
        let host = host.trim().trim_end_matches('/');
        if host.contains("://") {
            return Ok(Url::parse(host)?);
        }
        let scheme = if tls { "https" } else { "http" };
        Ok(Url::parse(&format!("{scheme}://{host}"))?)
    }

    // ── URL builders ─────────────────────────────────────────────────

    pub(crate) fn login_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join(LOGIN_PATH)?)
    }

    pub(crate) fn switch_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join(SWITCH_PATH)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and return the body of a 2xx response.
    pub(crate) async fn get_text(&self, url: Url, query: &[(&str, &str)]) -> Result<String, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        resp.text().await.map_err(|e| self.classify(e))
    }

    /// Timeouts get their own variant so callers can report the bound.
    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

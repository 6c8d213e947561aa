// Session login protocol
//
// `login_sid.lua` answers every request with a `<SessionInfo>` document.
// A probe with a candidate SID either echoes a live SID or returns the
// zero sentinel plus a fresh challenge; the challenge is then answered
// with `username` + `response` to obtain a new SID.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::auth::{SessionId, login_response};
use crate::client::GatewayClient;
use crate::error::Error;
use crate::models::SessionInfo;
use crate::xml;

impl GatewayClient {
    /// Validate a candidate session id.
    ///
    /// The sentinel (or no id at all) is never sent; the gateway then
    /// answers with the sentinel and a challenge for a fresh login.
    pub async fn probe_session(&self, sid: Option<&SessionId>) -> Result<SessionInfo, Error> {
        let url = self.login_url()?;
        let candidate = sid.filter(|s| s.is_valid());

        let body = match candidate {
            Some(sid) => self.get_text(url, &[("sid", sid.as_str())]).await?,
            None => self.get_text(url, &[]).await?,
        };

        let info = xml::parse_session_info(&body)?;
        debug!(
            valid = info.sid.is_valid(),
            block_time = info.block_time,
            "session probe answered"
        );
        Ok(info)
    }

    /// Answer `challenge` with the hashed credentials.
    ///
    /// A sentinel SID in the answer is a refusal: with a positive
    /// `BlockTime` it is reported as [`Error::LoginBlocked`], otherwise as
    /// [`Error::Authentication`]. No retry is attempted.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
        challenge: &str,
    ) -> Result<SessionInfo, Error> {
        let response = login_response(challenge, password.expose_secret())?;
        let url = self.login_url()?;

        debug!("answering login challenge for user {username:?}");

        let body = self
            .get_text(url, &[("username", username), ("response", &response)])
            .await?;
        let info = xml::parse_session_info(&body)?;

        if info.sid.is_valid() {
            debug!(rights = info.rights.len(), "login accepted");
            return Ok(info);
        }

        if info.block_time > 0 {
            warn!(block_time = info.block_time, "gateway is blocking logins");
            return Err(Error::LoginBlocked {
                block_time_secs: info.block_time,
            });
        }

        Err(Error::Authentication {
            message: "gateway rejected username or password".into(),
        })
    }

    /// End a session at the gateway.
    pub async fn logout(&self, sid: &SessionId) -> Result<(), Error> {
        if !sid.is_valid() {
            return Err(Error::NotAuthenticated);
        }

        let url = self.login_url()?;
        let body = self
            .get_text(url, &[("logout", "1"), ("sid", sid.as_str())])
            .await?;

        // The answer is a SessionInfo carrying the sentinel again.
        let info = xml::parse_session_info(&body)?;
        if info.sid.is_valid() {
            warn!("gateway still reports a live session after logout");
        }
        debug!("logout complete");
        Ok(())
    }
}

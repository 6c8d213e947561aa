// ── Session authenticator ──
//
// One login at most per run: a cached SID that is still fresh is probed
// and reused; anything else gets a single challenge/response exchange.
// A refused or blocked login is terminal, there is no retry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use fritzact_api::{SessionId, UserRight};

use crate::config::SessionPolicy;
use crate::controller::Controller;
use crate::error::CoreError;

/// Session data persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub sid: Option<SessionId>,
    pub last_login: Option<DateTime<Utc>>,
}

/// A session established for the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub sid: SessionId,
    /// Time of the login that produced `sid`.
    pub last_login: Option<DateTime<Utc>>,
    /// `true` when this run logged in; the new id should be persisted.
    pub refreshed: bool,
    /// Rights reported by the gateway; empty when a cached id was reused.
    pub rights: Vec<UserRight>,
}

impl Session {
    pub fn to_stored(&self) -> StoredSession {
        StoredSession {
            sid: Some(self.sid.clone()),
            last_login: self.last_login,
        }
    }
}

/// The cached id worth probing under `policy`, if any.
///
/// The sentinel never qualifies. Under [`SessionPolicy::MaxAge`] an id
/// without a login time, or with one in the future, is stale.
pub fn session_candidate(
    policy: SessionPolicy,
    stored: &StoredSession,
    now: DateTime<Utc>,
) -> Option<&SessionId> {
    let sid = stored.sid.as_ref().filter(|s| s.is_valid())?;
    match policy {
        SessionPolicy::AlwaysValidate => Some(sid),
        SessionPolicy::MaxAge(max_age) => {
            let last = stored.last_login?;
            let age = now.signed_duration_since(last).to_std().ok()?;
            (age <= max_age).then_some(sid)
        }
    }
}

impl Controller {
    /// Establish a session from cached data, logging in when needed.
    pub async fn ensure_session(&self, stored: &StoredSession) -> Result<Session, CoreError> {
        self.ensure_session_at(stored, Utc::now()).await
    }

    /// [`ensure_session`](Self::ensure_session) with an explicit clock.
    pub async fn ensure_session_at(
        &self,
        stored: &StoredSession,
        now: DateTime<Utc>,
    ) -> Result<Session, CoreError> {
        let candidate = session_candidate(self.config().session_policy, stored, now);
        if candidate.is_none() && stored.sid.is_some() {
            debug!("cached session is stale or invalid");
        }

        let probe = self
            .client()
            .probe_session(candidate)
            .await
            .inspect_err(|e| warn!(error = %e, "session probe failed"))?;

        let session = if probe.sid.is_valid() {
            if candidate == Some(&probe.sid) {
                debug!("cached session is still valid");
                Session {
                    sid: probe.sid,
                    last_login: stored.last_login,
                    refreshed: false,
                    rights: probe.rights,
                }
            } else {
                // Gateways without a password hand out a session on the probe.
                info!("gateway granted a session without login");
                Session {
                    sid: probe.sid,
                    last_login: Some(now),
                    refreshed: true,
                    rights: probe.rights,
                }
            }
        } else {
            let challenge = probe.challenge.ok_or_else(|| CoreError::Protocol {
                message: "missing <Challenge> in session probe".into(),
                status: None,
            })?;

            debug!("session invalid or expired, answering challenge");
            let config = self.config();
            let info = self
                .client()
                .login(&config.username, &config.password, &challenge)
                .await
                .inspect_err(|e| warn!(error = %e, "login failed"))?;

            info!(user = %config.username, "logged in to gateway");
            Session {
                sid: info.sid,
                last_login: Some(now),
                refreshed: true,
                rights: info.rights,
            }
        };

        for right in &session.rights {
            debug!(name = %right.name, access = right.access, "user right");
        }

        self.set_session(Some(session.clone())).await;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }

    fn stored(sid: &str, last_login: Option<i64>) -> StoredSession {
        StoredSession {
            sid: Some(SessionId::new(sid)),
            last_login: last_login.map(at),
        }
    }

    const HOUR: SessionPolicy = SessionPolicy::MaxAge(Duration::from_secs(3600));

    #[test]
    fn fresh_session_is_a_candidate() {
        let s = stored("a1b2c3d4e5f60718", Some(1_000));
        assert!(session_candidate(HOUR, &s, at(1_000 + 3600)).is_some());
    }

    #[test]
    fn stale_session_is_not_a_candidate() {
        let s = stored("a1b2c3d4e5f60718", Some(1_000));
        assert!(session_candidate(HOUR, &s, at(1_000 + 3601)).is_none());
        assert!(session_candidate(SessionPolicy::AlwaysValidate, &s, at(1_000 + 3601)).is_some());
    }

    #[test]
    fn sentinel_and_missing_login_time() {
        let sentinel = stored(SessionId::INVALID, Some(1_000));
        assert!(session_candidate(SessionPolicy::AlwaysValidate, &sentinel, at(1_000)).is_none());

        let no_time = stored("a1b2c3d4e5f60718", None);
        assert!(session_candidate(HOUR, &no_time, at(1_000)).is_none());
        assert!(session_candidate(SessionPolicy::AlwaysValidate, &no_time, at(1_000)).is_some());

        assert!(session_candidate(HOUR, &StoredSession::default(), at(1_000)).is_none());
    }

    #[test]
    fn login_time_in_the_future_is_stale() {
        let s = stored("a1b2c3d4e5f60718", Some(5_000));
        assert!(session_candidate(HOUR, &s, at(1_000)).is_none());
    }
}

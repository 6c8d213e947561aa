// ── Session cache ──
//
// The last SID and its login time survive between runs in `state.toml`
// under the platform data dir, next to the activity-marker file.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use fritzact_core::{Session, SessionId, StoredSession};

use crate::{ConfigError, dirs_fallback};

/// On-disk session cache. `last_login` is in epoch seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCache {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<i64>,
}

impl SessionCache {
    pub fn to_stored(&self) -> StoredSession {
        StoredSession {
            sid: self.sid.clone(),
            last_login: self
                .last_login
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }

    pub fn from_session(session: &Session) -> Self {
        Self {
            sid: Some(session.sid.clone()),
            last_login: session.last_login.map(|t| t.timestamp()),
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Directory for runtime state (session cache, activity marker).
pub fn state_dir() -> PathBuf {
    ProjectDirs::from("de", "fritzact", "fritzact")
        .map_or_else(|| dirs_fallback(".local/share"), |dirs| dirs.data_dir().to_path_buf())
}

pub fn state_path() -> PathBuf {
    state_dir().join("state.toml")
}

/// File holding the epoch second of the last successful command.
pub fn marker_path() -> PathBuf {
    state_dir().join("last_command")
}

// ── Load / save ─────────────────────────────────────────────────────

pub fn load_session() -> Result<SessionCache, ConfigError> {
    load_session_from(&state_path())
}

/// Read the cache at `path`; a missing file is an empty cache.
pub fn load_session_from(path: &Path) -> Result<SessionCache, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(toml::from_str(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionCache::default()),
        Err(e) => Err(e.into()),
    }
}

pub fn save_session(cache: &SessionCache) -> Result<(), ConfigError> {
    save_session_to(&state_path(), cache)
}

pub fn save_session_to(path: &Path, cache: &SessionCache) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cache)?)?;
    Ok(())
}

pub fn clear_session() -> Result<(), ConfigError> {
    clear_session_at(&state_path())
}

/// Forget the cached session. Removing a missing file is not an error.
pub fn clear_session_at(path: &Path) -> Result<(), ConfigError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

//! Configuration for the fritzact CLI.
//!
//! A flat TOML file, `FRITZACT_*` environment overrides, the password
//! credential chain (env → keyring → plaintext), and translation to
//! `fritzact_core::GatewayConfig`. Session state lives in [`state`].

pub mod state;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use fritzact_core::{AccessPolicy, Action, GatewayConfig, SessionPolicy, TlsVerification};

/// Service name under which passwords are kept in the system keyring.
pub const KEYRING_SERVICE: &str = "fritzact";

/// Environment variable consulted for the password after `password_env`.
pub const PASSWORD_ENV: &str = "FRITZACT_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for user '{username}'")]
    NoCredentials { username: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse TOML: {0}")]
    Deserialization(#[from] toml::de::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// The whole configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Gateway host name or address (a full URL is accepted too).
    #[serde(default = "default_gateway")]
    pub gateway: String,

    /// Talk HTTPS instead of HTTP.
    #[serde(default)]
    pub tls: bool,

    /// Accept the gateway's self-signed certificate.
    #[serde(default = "default_true")]
    pub insecure: bool,

    /// Custom CA certificate; used when `insecure` is off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    #[serde(default)]
    pub username: String,

    /// Plaintext password. Prefer the keyring or an env var.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_ain: Option<String>,

    /// AINs that never receive commands. A comma-separated string is accepted.
    #[serde(default, deserialize_with = "string_or_list")]
    pub read_only_ains: Vec<String>,

    #[serde(default)]
    pub show_unknown: bool,

    /// Seconds a cached session is trusted before re-login; `0` probes always.
    #[serde(default = "default_session_max_age")]
    pub session_max_age: u64,

    /// What the interactive default does with the preferred device.
    #[serde(default = "default_action")]
    pub default_action: Action,

    /// Minimum seconds between two activity-marker writes.
    #[serde(default = "default_marker_debounce")]
    pub marker_debounce: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: default_gateway(),
            tls: false,
            insecure: true,
            ca_cert: None,
            username: String::new(),
            password: None,
            password_env: None,
            timeout: default_timeout(),
            preferred_ain: None,
            read_only_ains: Vec::new(),
            show_unknown: false,
            session_max_age: default_session_max_age(),
            default_action: default_action(),
            marker_debounce: default_marker_debounce(),
        }
    }
}

fn default_gateway() -> String {
    "fritz.box".into()
}
fn default_true() -> bool {
    true
}
fn default_timeout() -> u64 {
    5
}
fn default_session_max_age() -> u64 {
    3600
}
fn default_action() -> Action {
    Action::Toggle
}
fn default_marker_debounce() -> u64 {
    5
}

/// Accept `["a", "b"]` as well as `"a, b"`. Blank entries are dropped.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    let items = match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) => s.split(',').map(str::to_owned).collect(),
        StringOrList::Many(v) => v,
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect())
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("de", "fritzact", "fritzact").map_or_else(
        || {
            let mut p = dirs_fallback(".config");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

pub(crate) fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    for part in base.split('/') {
        p.push(part);
    }
    p.push("fritzact");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` plus environment. A missing file yields defaults.
///
/// `FRITZACT_PASSWORD` is not merged here; [`resolve_password`] reads it.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FRITZACT_").ignore(&["password"]));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Store the preferred device (`None` clears it), leaving the rest of the file alone.
pub fn save_preferred_ain_to(path: &Path, ain: Option<&str>) -> Result<(), ConfigError> {
    edit_config_file(path, |doc| match ain {
        Some(ain) => {
            doc.insert("preferred_ain".into(), toml::Value::String(ain.to_owned()));
        }
        None => {
            doc.remove("preferred_ain");
        }
    })
}

/// Replace the read-only list, leaving the rest of the file alone.
pub fn save_read_only_ains_to(path: &Path, ains: &[String]) -> Result<(), ConfigError> {
    let list = ains.iter().cloned().map(toml::Value::String).collect();
    edit_config_file(path, |doc| {
        doc.insert("read_only_ains".into(), toml::Value::Array(list));
    })
}

fn edit_config_file(path: &Path, edit: impl FnOnce(&mut toml::Table)) -> Result<(), ConfigError> {
    let mut doc = match std::fs::read_to_string(path) {
        Ok(text) => text.parse::<toml::Table>()?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
        Err(e) => return Err(e.into()),
    };
    edit(&mut doc);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(&doc)?)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the gateway password.
///
/// Order: `password_env` → `FRITZACT_PASSWORD` → system keyring →
/// plaintext `password`.
pub fn resolve_password(cfg: &Config) -> Result<SecretString, ConfigError> {
    // 1. Configured env var
    if let Some(ref env_name) = cfg.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &cfg.username) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = cfg.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        username: cfg.username.clone(),
    })
}

/// Put a password into the system keyring for `username`.
pub fn store_password(username: &str, password: &SecretString) -> Result<(), ConfigError> {
    use secrecy::ExposeSecret;

    let entry = keyring::Entry::new(KEYRING_SERVICE, username)
        .map_err(|e| ConfigError::Keyring(e.to_string()))?;
    entry
        .set_password(password.expose_secret())
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    pub fn tls_verification(&self) -> TlsVerification {
        if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        }
    }

    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy {
            read_only: self.read_only_ains.clone(),
            show_unknown: self.show_unknown,
        }
    }
}

/// Build a `GatewayConfig` with an already-resolved password.
pub fn to_gateway_config(
    cfg: &Config,
    password: SecretString,
) -> Result<GatewayConfig, ConfigError> {
    if cfg.username.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "username".into(),
            reason: "must not be empty".into(),
        });
    }

    let url = fritzact_core::gateway_url(&cfg.gateway, cfg.tls).map_err(|e| {
        ConfigError::Validation {
            field: "gateway".into(),
            reason: e.to_string(),
        }
    })?;

    let mut gateway = GatewayConfig::new(url, cfg.username.trim(), password);
    gateway.tls = cfg.tls_verification();
    gateway.timeout = Duration::from_secs(cfg.timeout);
    gateway.session_policy = SessionPolicy::from_secs(cfg.session_max_age);
    gateway.policy = cfg.access_policy();
    gateway.preferred_ain = cfg
        .preferred_ain
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_owned);
    gateway.marker_debounce = Duration::from_secs(cfg.marker_debounce);
    Ok(gateway)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("missing.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg, Config::default());
            assert_eq!(cfg.gateway, "fritz.box");
            assert_eq!(cfg.default_action, Action::Toggle);
            Ok(())
        });
    }

    #[test]
    fn file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                gateway = "192.168.178.1"
                username = "home"
                read_only_ains = "08761 0000434, 11657 0240192"
                default_action = "on"
                session_max_age = 0
                "#,
            )?;
            jail.set_env("FRITZACT_GATEWAY", "fritz.home");
            jail.set_env("FRITZACT_TIMEOUT", "9");

            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.gateway, "fritz.home");
            assert_eq!(cfg.username, "home");
            assert_eq!(cfg.timeout, 9);
            assert_eq!(cfg.read_only_ains, vec!["08761 0000434", "11657 0240192"]);
            assert_eq!(cfg.default_action, Action::On);
            assert_eq!(cfg.session_max_age, 0);
            Ok(())
        });
    }

    #[test]
    fn read_only_list_form() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", r#"read_only_ains = ["a", " ", "b "]"#)?;
            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.read_only_ains, vec!["a", "b"]);
            Ok(())
        });
    }

    #[test]
    fn password_env_is_not_merged_into_config() {
        Jail::expect_with(|jail| {
            jail.set_env(PASSWORD_ENV, "from-env");
            let cfg = load_config_from(Path::new("missing.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.password, None);
            Ok(())
        });
    }

    #[test]
    fn named_env_var_wins() {
        Jail::expect_with(|jail| {
            jail.set_env("MY_BOX_PW", "named");
            jail.set_env(PASSWORD_ENV, "generic");
            let cfg = Config {
                username: "fritzact-test-user-7f3a".into(),
                password_env: Some("MY_BOX_PW".into()),
                password: Some("plain".into()),
                ..Config::default()
            };
            let pw = resolve_password(&cfg).map_err(|e| e.to_string())?;
            assert_eq!(pw.expose_secret(), "named");
            Ok(())
        });
    }

    #[test]
    fn generic_env_var_before_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env(PASSWORD_ENV, "generic");
            let cfg = Config {
                username: "fritzact-test-user-7f3a".into(),
                password_env: Some("FRITZACT_TEST_UNSET_PW".into()),
                password: Some("plain".into()),
                ..Config::default()
            };
            let pw = resolve_password(&cfg).map_err(|e| e.to_string())?;
            assert_eq!(pw.expose_secret(), "generic");
            Ok(())
        });
    }

    #[test]
    fn gateway_config_translation() {
        let cfg = Config {
            gateway: "fritz.box".into(),
            tls: true,
            username: " home ".into(),
            read_only_ains: vec!["08761 0000434".into()],
            preferred_ain: Some("  ".into()),
            session_max_age: 0,
            ..Config::default()
        };
        let gw = to_gateway_config(&cfg, SecretString::from("pw".to_owned())).unwrap();

        assert_eq!(gw.url.as_str(), "https://fritz.box/");
        assert_eq!(gw.username, "home");
        assert_eq!(gw.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(gw.timeout, Duration::from_secs(5));
        assert_eq!(gw.session_policy, SessionPolicy::AlwaysValidate);
        assert!(gw.policy.is_read_only("08761 0000434"));
        assert_eq!(gw.preferred_ain, None);
    }

    #[test]
    fn strict_tls_uses_ca_or_system_roots() {
        let mut cfg = Config {
            insecure: false,
            ..Config::default()
        };
        assert_eq!(cfg.tls_verification(), TlsVerification::SystemDefaults);

        cfg.ca_cert = Some(PathBuf::from("/etc/fritz.pem"));
        assert_eq!(
            cfg.tls_verification(),
            TlsVerification::CustomCa(PathBuf::from("/etc/fritz.pem"))
        );
    }

    #[test]
    fn empty_username_is_rejected() {
        let err = to_gateway_config(&Config::default(), SecretString::from(String::new()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "username"));
    }

    #[test]
    fn selection_edits_keep_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "username = \"home\"\npassword_env = \"PW\"\n").unwrap();

        save_preferred_ain_to(&path, Some("08761 0000434")).unwrap();
        save_read_only_ains_to(&path, &["11657 0240192".to_owned()]).unwrap();

        let doc: toml::Table = std::fs::read_to_string(&path).unwrap().parse().unwrap();
        assert_eq!(doc["username"].as_str(), Some("home"));
        assert_eq!(doc["password_env"].as_str(), Some("PW"));
        assert_eq!(doc["preferred_ain"].as_str(), Some("08761 0000434"));
        assert_eq!(doc["read_only_ains"].as_array().map(Vec::len), Some(1));

        save_preferred_ain_to(&path, None).unwrap();
        let doc: toml::Table = std::fs::read_to_string(&path).unwrap().parse().unwrap();
        assert!(!doc.contains_key("preferred_ain"));
    }

    #[test]
    fn selection_edit_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh").join("config.toml");
        save_read_only_ains_to(&path, &[]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_then_load() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("out").join("config.toml");
            let cfg = Config {
                username: "home".into(),
                preferred_ain: Some("08761 0000434".into()),
                ..Config::default()
            };
            save_config_to(&path, &cfg).map_err(|e| e.to_string())?;
            let back = load_config_from(&path).map_err(|e| e.to_string())?;
            assert_eq!(back, cfg);
            Ok(())
        });
    }
}

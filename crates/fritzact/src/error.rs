//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use fritzact_config::ConfigError;
use fritzact_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const POLICY: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to gateway at {url}")]
    #[diagnostic(
        code(fritzact::connection_failed),
        help(
            "Check that the FRITZ!Box is reachable from this machine.\n\
             Reason: {reason}\n\
             Try: fritzact --gateway 192.168.178.1 list"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Gateway did not answer within {seconds}s")]
    #[diagnostic(
        code(fritzact::timeout),
        help("Increase the timeout with --timeout or check the gateway's load.")
    )]
    Timeout { seconds: u64 },

    #[error("Unexpected gateway response: {message}")]
    #[diagnostic(code(fritzact::protocol))]
    Protocol { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login blocked by the gateway for {seconds}s")]
    #[diagnostic(
        code(fritzact::login_blocked),
        help("Too many failed logins. Wait {seconds}s, then check the password.")
    )]
    LoginBlocked { seconds: u64 },

    #[error("The password cannot be used for the gateway login")]
    #[diagnostic(
        code(fritzact::credential_encoding),
        help("The login challenge only supports characters up to U+00FF. Change the password on the FRITZ!Box.")
    )]
    CredentialEncoding,

    #[error("Authentication failed")]
    #[diagnostic(
        code(fritzact::auth_failed),
        help(
            "{message}\n\
             Verify user and password. Store a new password with: fritzact config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for user '{username}'")]
    #[diagnostic(
        code(fritzact::no_credentials),
        help(
            "Store one with: fritzact config set-password\n\
             Or set the FRITZACT_PASSWORD environment variable."
        )
    )]
    NoCredentials { username: String },

    // ── Devices ──────────────────────────────────────────────────────
    #[error("No device list available")]
    #[diagnostic(
        code(fritzact::no_devices),
        help("The gateway reported no smart-home devices for this user.")
    )]
    NoDevices,

    #[error("Device '{ain}' not found")]
    #[diagnostic(
        code(fritzact::not_found),
        help("Run: fritzact list to see available devices")
    )]
    NotFound { ain: String },

    #[error("Device '{ain}' is read-only")]
    #[diagnostic(
        code(fritzact::read_only),
        help("Remove it from read_only_ains (fritzact read-only) to allow commands.")
    )]
    ReadOnly { ain: String },

    #[error("Command {command} failed")]
    #[diagnostic(code(fritzact::command_failed), help("{reason}"))]
    CommandFailed { command: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fritzact::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No gateway user configured")]
    #[diagnostic(
        code(fritzact::no_config),
        help(
            "Create a config with: fritzact config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(fritzact::config))]
    Config { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::LoginBlocked { .. }
            | Self::CredentialEncoding
            | Self::AuthFailed { .. }
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NoDevices | Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ReadOnly { .. } => exit_code::POLICY,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Protocol { .. }
            | Self::CommandFailed { .. }
            | Self::NoConfig { .. }
            | Self::Config { .. }
            | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::GatewayUnreachable { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Protocol { message, status } => CliError::Protocol {
                message: match status {
                    Some(code) => format!("HTTP {code}: {message}"),
                    None => message,
                },
            },

            CoreError::LoginBlocked { seconds } => CliError::LoginBlocked { seconds },

            CoreError::CredentialEncoding => CliError::CredentialEncoding,

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::NotAuthenticated => CliError::AuthFailed {
                message: "no valid session with the gateway".into(),
            },

            CoreError::NoDeviceList => CliError::NoDevices,

            CoreError::DeviceNotFound { ain } => CliError::NotFound { ain },

            CoreError::CommandFailed { command, reason } => {
                CliError::CommandFailed { command, reason }
            }

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { username } => CliError::NoCredentials { username },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_taxonomy() {
        let cases = [
            (CoreError::Timeout { timeout_secs: 5 }, exit_code::TIMEOUT),
            (
                CoreError::GatewayUnreachable {
                    url: "http://fritz.box/".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::LoginBlocked { seconds: 60 }, exit_code::AUTH),
            (CoreError::CredentialEncoding, exit_code::AUTH),
            (CoreError::NoDeviceList, exit_code::NOT_FOUND),
            (
                CoreError::Protocol {
                    message: "bad".into(),
                    status: Some(500),
                },
                exit_code::GENERAL,
            ),
        ];
        for (core, code) in cases {
            let cli = CliError::from(core);
            assert_eq!(cli.exit_code(), code, "{cli:?}");
        }
    }

    #[test]
    fn blocked_login_keeps_seconds() {
        let cli = CliError::from(CoreError::LoginBlocked { seconds: 60 });
        assert_eq!(cli.to_string(), "Login blocked by the gateway for 60s");
    }

    #[test]
    fn config_errors_map_to_usage_or_auth() {
        let cli = CliError::from(ConfigError::NoCredentials {
            username: "home".into(),
        });
        assert_eq!(cli.exit_code(), exit_code::AUTH);

        let cli = CliError::from(ConfigError::Validation {
            field: "gateway".into(),
            reason: "empty".into(),
        });
        assert_eq!(cli.exit_code(), exit_code::USAGE);
    }
}

//! CLI configuration: a thin layer over `fritzact_config` that applies
//! `GlobalOpts` flag overrides (--gateway, --username, ...) and builds the
//! `GatewayConfig` handed to core.

use fritzact_core::GatewayConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use fritzact_config::{Config, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Flags win over file and environment.
pub fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref gateway) = global.gateway {
        cfg.gateway.clone_from(gateway);
    }
    if let Some(ref username) = global.username {
        cfg.username.clone_from(username);
    }
    if global.tls {
        cfg.tls = true;
    }
    if global.insecure {
        cfg.insecure = true;
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
}

/// Load the config file and apply flag overrides.
pub fn effective_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config()?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

/// Resolve the password and translate to core's `GatewayConfig`.
pub fn gateway_config(cfg: &Config) -> Result<GatewayConfig, CliError> {
    if cfg.username.trim().is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }

    let password = fritzact_config::resolve_password(cfg)?;
    Ok(fritzact_config::to_gateway_config(cfg, password)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["fritzact"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_file_values() {
        let mut cfg = Config {
            gateway: "fritz.box".into(),
            username: "home".into(),
            timeout: 5,
            ..Config::default()
        };
        apply_overrides(
            &mut cfg,
            &global(&["--gateway", "192.168.178.1", "--tls", "--timeout", "9", "list"]),
        );

        assert_eq!(cfg.gateway, "192.168.178.1");
        assert_eq!(cfg.username, "home");
        assert!(cfg.tls);
        assert_eq!(cfg.timeout, 9);
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut cfg = Config {
            tls: true,
            insecure: false,
            ..Config::default()
        };
        apply_overrides(&mut cfg, &global(&[]));
        assert!(cfg.tls);
        assert!(!cfg.insecure);
    }

    #[test]
    fn missing_user_points_to_init() {
        let err = gateway_config(&Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }
}

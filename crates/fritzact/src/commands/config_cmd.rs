//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};
use secrecy::SecretString;
use serde::Serialize;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::notify::Notifier;
use crate::output;

use super::prompt_err;

/// Config as shown by `config show`: the password itself never appears.
#[derive(Serialize)]
struct ShownConfig<'a> {
    #[serde(flatten)]
    config: &'a Config,
    password_source: &'static str,
}

fn password_source(cfg: &Config) -> &'static str {
    if cfg
        .password_env
        .as_deref()
        .is_some_and(|name| std::env::var(name).is_ok())
    {
        "env (password_env)"
    } else if std::env::var(fritzact_config::PASSWORD_ENV).is_ok() {
        "env (FRITZACT_PASSWORD)"
    } else if cfg.password.is_some() {
        "config file (plaintext)"
    } else {
        "keyring"
    }
}

fn detail(shown: &ShownConfig<'_>) -> String {
    let c = shown.config;
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_owned();
    [
        format!("Gateway:        {}", c.gateway),
        format!("TLS:            {}", c.tls),
        format!("Insecure:       {}", c.insecure),
        format!(
            "CA cert:        {}",
            or_dash(c.ca_cert.as_deref().and_then(|p| p.to_str()))
        ),
        format!(
            "Username:       {}",
            if c.username.is_empty() {
                "-"
            } else {
                c.username.as_str()
            }
        ),
        format!("Password from:  {}", shown.password_source),
        format!("Timeout:        {}s", c.timeout),
        format!("Preferred AIN:  {}", or_dash(c.preferred_ain.as_deref())),
        format!("Read-only AINs: {}", c.read_only_ains.join(", ")),
        format!("Show unknown:   {}", c.show_unknown),
        format!("Session age:    {}s", c.session_max_age),
        format!("Default action: {}", c.default_action),
        format!("Marker debounce:{}s", c.marker_debounce),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let notify = Notifier::new(global);

    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("fritzact configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let gateway: String = Input::new()
                .with_prompt("Gateway host")
                .default("fritz.box".into())
                .interact_text()
                .map_err(prompt_err)?;

            let tls = Confirm::new()
                .with_prompt("Use HTTPS?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(prompt_err)?;

            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if username.trim().is_empty() || password.is_empty() {
                return Err(CliError::Validation {
                    field: "credentials".into(),
                    reason: "username and password cannot be empty".into(),
                });
            }

            let store_choices = &[
                "Store password in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let password_field = if store_selection == 0 {
                fritzact_config::store_password(username.trim(), &SecretString::from(password))?;
                eprintln!("   ✓ Password stored in system keyring");
                None
            } else {
                Some(password)
            };

            let cfg = Config {
                gateway,
                tls,
                username: username.trim().to_owned(),
                password: password_field,
                ..Config::default()
            };
            config::save_config(&cfg)?;

            notify.success(&format!("Configuration written to {}", config_path.display()));
            eprintln!("\n  Test it: fritzact list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load_config()?;
            config::apply_overrides(&mut cfg, global);
            let source = password_source(&cfg);
            cfg.password = None;

            let shown = ShownConfig {
                config: &cfg,
                password_source: source,
            };
            let out = output::render_single(&global.output, &shown, detail, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let mut cfg = config::load_config()?;
            config::apply_overrides(&mut cfg, global);
            if cfg.username.trim().is_empty() {
                return Err(CliError::NoConfig {
                    path: config::config_path().display().to_string(),
                });
            }

            let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            fritzact_config::store_password(cfg.username.trim(), &SecretString::from(secret))?;
            notify.success(&format!(
                "Password stored in system keyring for '{}'",
                cfg.username.trim()
            ));
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_never_prints_the_password() {
        let cfg = Config {
            username: "home".into(),
            password_env: Some("FRITZACT_TEST_NEVER_SET".into()),
            ..Config::default()
        };
        let shown = ShownConfig {
            config: &cfg,
            password_source: "keyring",
        };
        let text = detail(&shown);
        assert!(text.contains("Username:       home"));
        assert!(text.contains("Password from:  keyring"));
        assert!(text.contains("Default action: toggle"));
    }
}

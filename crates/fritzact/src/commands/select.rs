//! Interactive device selection: the bare `fritzact` call, `prefer` and
//! `read-only`.

use dialoguer::{MultiSelect, Select};
use tracing::debug;

use fritzact_core::{Action, Actuator, Device, DeviceType};

use crate::config;
use crate::error::CliError;

use super::{Ctx, devices, prompt_err, switch};

// ── Interactive default ─────────────────────────────────────────────

/// What the bare call does once the device list is known.
#[derive(Debug, Clone, PartialEq)]
enum Target {
    /// Act on this device with the given action.
    Act { action: Action, ain: String },
    /// Ask the user.
    Ask(Vec<Device>),
    /// Nothing to act on.
    Nothing,
}

fn pick_target(devices: Vec<Device>) -> Target {
    if let [only] = devices.as_slice() {
        if only.actuator == Actuator::Switch {
            return Target::Act {
                action: Action::Toggle,
                ain: only.ain.clone(),
            };
        }
    }

    let choices: Vec<Device> = devices
        .into_iter()
        .filter(|d| {
            let keep = d.actuator != Actuator::None;
            if !keep {
                debug!(ain = %d.ain, bits = %d.function_bitmask, "skipping device without actuator");
            }
            keep
        })
        .collect();

    if choices.is_empty() {
        Target::Nothing
    } else {
        Target::Ask(choices)
    }
}

fn choice_label(d: &Device) -> String {
    let detail = match d.actuator {
        Actuator::Thermostat => d.temperature_display().unwrap_or_default(),
        Actuator::Switch | Actuator::None => devices::state_label(d),
    };
    format!("{:<24} {detail}", d.display_name())
}

/// Preferred device → default action; one switch → toggle; otherwise ask.
/// A picked thermostat goes to the set-point chooser.
pub async fn interactive(
    ctx: &Ctx<'_>,
    default_action: Action,
    device_type: Option<DeviceType>,
) -> Result<(), CliError> {
    if let Some(ain) = ctx.controller.config().preferred_ain.clone() {
        debug!(%ain, %default_action, "acting on preferred device");
        return switch::run(ctx, default_action, &ain, None, None).await;
    }

    let devices = ctx.controller.list_devices(device_type).await?;
    match pick_target(devices) {
        Target::Act { action, ain } => switch::run(ctx, action, &ain, None, None).await,
        Target::Nothing => {
            ctx.notify.info("No switchable devices");
            Ok(())
        }
        Target::Ask(choices) => {
            let items: Vec<String> = choices.iter().map(choice_label).collect();
            let picked = Select::new()
                .with_prompt("Device")
                .items(&items)
                .default(0)
                .interact_opt()
                .map_err(prompt_err)?;

            let Some(device) = picked.and_then(|i| choices.get(i)) else {
                return Ok(());
            };
            let action = match device.actuator {
                Actuator::Thermostat => Action::Temp,
                Actuator::Switch | Actuator::None => Action::Toggle,
            };
            switch::run(ctx, action, &device.ain, None, Some(device.display_name().to_owned()))
                .await
        }
    }
}

// ── Preferred device ────────────────────────────────────────────────

pub async fn prefer(ctx: &Ctx<'_>) -> Result<(), CliError> {
    let switches: Vec<Device> = ctx
        .controller
        .list_devices(Some(DeviceType::Switch))
        .await?;

    let mut items = vec!["(none)".to_owned()];
    items.extend(switches.iter().map(|d| format!("{:<24} {}", d.display_name(), d.ain)));

    let current = ctx.controller.config().preferred_ain.as_deref();
    let default = current
        .and_then(|ain| switches.iter().position(|d| d.ain == ain))
        .map_or(0, |i| i + 1);

    let picked = Select::new()
        .with_prompt("Preferred device")
        .items(&items)
        .default(default)
        .interact_opt()
        .map_err(prompt_err)?;

    let Some(index) = picked else {
        return Ok(());
    };
    let ain = index.checked_sub(1).and_then(|i| switches.get(i)).map(|d| d.ain.as_str());

    fritzact_config::save_preferred_ain_to(&config::config_path(), ain)?;
    match ain {
        Some(ain) => ctx.notify.success(&format!("Preferred device set to {ain}")),
        None => ctx.notify.success("Preferred device cleared"),
    }
    Ok(())
}

// ── Read-only devices ───────────────────────────────────────────────

pub async fn read_only(ctx: &Ctx<'_>) -> Result<(), CliError> {
    let devices = ctx.controller.list_devices(None).await?;
    let policy = &ctx.controller.config().policy;

    let items: Vec<String> = devices
        .iter()
        .map(|d| format!("{:<24} {}", d.display_name(), d.ain))
        .collect();
    let checked: Vec<bool> = devices.iter().map(|d| policy.is_read_only(&d.ain)).collect();

    let picked = MultiSelect::new()
        .with_prompt("Read-only devices (space to toggle)")
        .items(&items)
        .defaults(&checked)
        .interact_opt()
        .map_err(prompt_err)?;

    let Some(indices) = picked else {
        return Ok(());
    };
    let ains: Vec<String> = indices
        .into_iter()
        .filter_map(|i| devices.get(i))
        .map(|d| d.ain.clone())
        .collect();

    fritzact_config::save_read_only_ains_to(&config::config_path(), &ains)?;
    ctx.notify
        .success(&format!("{} read-only device(s) saved", ains.len()));
    Ok(())
}

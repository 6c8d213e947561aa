//! Device listing.

use tabled::Tabled;

use fritzact_core::{Actuator, Device, DeviceType};

use crate::error::CliError;
use crate::output;

use super::Ctx;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "AIN")]
    ain: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Set-point")]
    set_temp: String,
    #[tabled(rename = "Temp")]
    temperature: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Model")]
    model: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            ain: d.ain.clone(),
            name: d.display_name().to_owned(),
            dtype: d.device_type.to_string(),
            state: state_label(d),
            set_temp: d.set_temp.map(|t| t.to_string()).unwrap_or_default(),
            temperature: d.temperature_display().unwrap_or_default(),
            power: d.power_display().unwrap_or_default(),
            battery: battery_label(d),
            model: d.product_name.clone().unwrap_or_default(),
        }
    }
}

/// `on`, `off` or `absent` for switches; `absent` or empty for the rest.
pub(crate) fn state_label(d: &Device) -> String {
    if !d.present {
        return "absent".into();
    }
    match d.actuator {
        Actuator::Switch => d.state.to_string(),
        Actuator::Thermostat | Actuator::None => String::new(),
    }
}

fn battery_label(d: &Device) -> String {
    match (d.battery, d.battery_low) {
        (Some(pct), true) => format!("{pct}% (low)"),
        (Some(pct), false) => format!("{pct}%"),
        (None, true) => "low".into(),
        (None, false) => String::new(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn list(ctx: &Ctx<'_>, device_type: Option<DeviceType>) -> Result<(), CliError> {
    let devices = ctx.controller.list_devices(device_type).await?;

    let out = output::render_list(
        &ctx.global.output,
        &devices,
        |d| DeviceRow::from(d),
        |d| d.ain.clone(),
    );
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use fritzact_core::{FunctionBitmask, Icon, SetPoint, SwitchState};

    use super::*;

    fn thermostat() -> Device {
        Device {
            ain: "09995 0123456".into(),
            device_id: Some("17".into()),
            firmware_version: Some("05.08".into()),
            product_name: Some("FRITZ!DECT 301".into()),
            manufacturer: Some("AVM".into()),
            function_bitmask: FunctionBitmask(320),
            name: Some("Office".into()),
            present: true,
            device_type: DeviceType::Thermostat,
            actuator: Actuator::Thermostat,
            state: SwitchState::Unknown,
            mode: None,
            lock: None,
            power: None,
            energy: None,
            temperature: Some(215),
            set_temp: Some(SetPoint::from_raw(40)),
            comfort_temp: Some(SetPoint::from_raw(44)),
            lowering_temp: Some(SetPoint::from_raw(32)),
            slider_raw: 40,
            battery: Some(80),
            battery_low: false,
            icon: Icon::CometOn,
            unknown: false,
        }
    }

    #[test]
    fn thermostat_row() {
        let row = DeviceRow::from(&thermostat());
        assert_eq!(row.name, "Office");
        assert_eq!(row.dtype, "thermostat");
        assert_eq!(row.state, "");
        assert_eq!(row.set_temp, "20.0 °C");
        assert_eq!(row.temperature, "21.5 °C");
        assert_eq!(row.battery, "80%");
    }

    #[test]
    fn absent_device_state() {
        let mut d = thermostat();
        d.present = false;
        d.battery_low = true;
        assert_eq!(state_label(&d), "absent");
        assert_eq!(battery_label(&d), "80% (low)");
    }
}

// ── API-to-domain type conversions ──
//
// Bridges the raw `fritzact_api` device elements into `Device`. Absent
// or unparsable numbers fall back to zero so a device is always built,
// whatever its firmware leaves out.

use fritzact_api::DeviceElement;

use crate::model::setpoint::SetPoint;
use crate::model::{Actuator, Device, DeviceType, FunctionBitmask, Icon, SwitchState};

// ── Helpers ────────────────────────────────────────────────────────

fn parse_int(raw: Option<&String>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Integer field of a block the capability bits promise; zero when missing.
fn int_or_zero(raw: Option<&String>) -> i64 {
    parse_int(raw).unwrap_or(0)
}

fn flag(raw: Option<&String>) -> bool {
    parse_int(raw) == Some(1)
}

// ── Device ─────────────────────────────────────────────────────────

impl From<&DeviceElement> for Device {
    fn from(el: &DeviceElement) -> Self {
        let ain = el.identifier.clone().unwrap_or_default();
        let bits = FunctionBitmask(
            el.function_bitmask
                .as_deref()
                .and_then(|b| b.trim().parse().ok())
                .unwrap_or(0),
        );

        let device_type = DeviceType::derive(&ain, bits);
        let actuator = Actuator::derive(device_type, bits);
        let present = flag(el.present.as_ref());

        let switch = el.switch.as_ref();
        let (state, mode, lock) = if bits.is_switch() {
            let state = if int_or_zero(switch.and_then(|s| s.state.as_ref())) == 0 {
                SwitchState::Off
            } else {
                SwitchState::On
            };
            (
                state,
                switch.and_then(|s| s.mode.clone()),
                Some(flag(switch.and_then(|s| s.lock.as_ref()))),
            )
        } else {
            (SwitchState::Unknown, None, None)
        };

        let meter = el.powermeter.as_ref();
        let (power, energy) = if bits.has_power_meter() {
            (
                Some(int_or_zero(meter.and_then(|m| m.power.as_ref()))),
                Some(int_or_zero(meter.and_then(|m| m.energy.as_ref()))),
            )
        } else {
            (None, None)
        };

        let temperature = bits.has_temperature_sensor().then(|| {
            int_or_zero(el.temperature.as_ref().and_then(|t| t.celsius.as_ref()))
        });

        let hkr = el.hkr.as_ref();
        let tsoll = int_or_zero(hkr.and_then(|h| h.tsoll.as_ref()));
        let (set_temp, comfort_temp, lowering_temp, slider_raw) = if bits.is_thermostat() {
            (
                Some(SetPoint::from_raw(tsoll)),
                Some(SetPoint::from_raw(int_or_zero(
                    hkr.and_then(|h| h.komfort.as_ref()),
                ))),
                Some(SetPoint::from_raw(int_or_zero(
                    hkr.and_then(|h| h.absenk.as_ref()),
                ))),
                tsoll,
            )
        } else {
            (None, None, None, 0)
        };

        let battery = el
            .battery
            .as_deref()
            .and_then(|b| b.trim().parse::<u8>().ok());
        let battery_low = flag(el.battery_low.as_ref());

        let icon = Icon::select(actuator, device_type, present, state, battery_low);

        Device {
            ain,
            device_id: el.id.clone(),
            firmware_version: el.fw_version.clone(),
            product_name: el.product_name.clone(),
            manufacturer: el.manufacturer.clone(),
            function_bitmask: bits,
            name: el.name.clone(),
            present,
            device_type,
            actuator,
            state,
            mode,
            lock,
            power,
            energy,
            temperature,
            set_temp,
            comfort_temp,
            lowering_temp,
            slider_raw,
            battery,
            battery_low,
            icon,
            unknown: device_type == DeviceType::Unknown,
        }
    }
}

impl From<DeviceElement> for Device {
    fn from(el: DeviceElement) -> Self {
        Device::from(&el)
    }
}

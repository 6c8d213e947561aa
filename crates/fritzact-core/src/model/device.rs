// ── Device domain types ──

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::setpoint::SetPoint;

/// Group AINs look like `65:3A:18-900`.
static GROUP_AIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-F0-9]{2}:[A-F0-9]{2}:[A-F0-9]{2}-[A-F0-9]{3}").expect("valid regex")
});

/// Whether `ain` names a device group rather than a single actuator.
pub fn is_group_ain(ain: &str) -> bool {
    GROUP_AIN.is_match(ain)
}

// ── Capability bits ──────────────────────────────────────────────

/// The `functionbitmask` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionBitmask(pub u32);

impl FunctionBitmask {
    pub const HAN_FUN: u32 = 1 << 0;
    pub const ALARM_SENSOR: u32 = 1 << 4;
    pub const THERMOSTAT: u32 = 1 << 6;
    pub const POWER_METER: u32 = 1 << 7;
    pub const TEMPERATURE_SENSOR: u32 = 1 << 8;
    pub const SWITCH: u32 = 1 << 9;
    pub const REPEATER: u32 = 1 << 10;
    pub const MICROPHONE: u32 = 1 << 11;
    pub const HAN_FUN_UNIT: u32 = 1 << 13;

    fn has(self, bit: u32) -> bool {
        self.0 & bit != 0
    }

    pub fn is_thermostat(self) -> bool {
        self.has(Self::THERMOSTAT)
    }

    pub fn has_power_meter(self) -> bool {
        self.has(Self::POWER_METER)
    }

    pub fn has_temperature_sensor(self) -> bool {
        self.has(Self::TEMPERATURE_SENSOR)
    }

    pub fn is_switch(self) -> bool {
        self.has(Self::SWITCH)
    }

    pub fn is_repeater(self) -> bool {
        self.has(Self::REPEATER)
    }
}

impl fmt::Display for FunctionBitmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#015b}", self.0)
    }
}

// ── Classification ───────────────────────────────────────────────

/// Derived device type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceType {
    Switch,
    Thermostat,
    Group,
    Unknown,
}

impl DeviceType {
    /// Group pattern first, then repeater (coerced to switch), thermostat, switch.
    pub fn derive(ain: &str, bits: FunctionBitmask) -> Self {
        if is_group_ain(ain) {
            Self::Group
        } else if bits.is_repeater() {
            Self::Switch
        } else if bits.is_thermostat() {
            Self::Thermostat
        } else if bits.is_switch() {
            Self::Switch
        } else {
            Self::Unknown
        }
    }
}

/// What a command against the device actually drives.
///
/// Equal to the type for single devices; a group drives whatever its
/// members are, which only the capability bits reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actuator {
    Switch,
    Thermostat,
    None,
}

impl Actuator {
    pub fn derive(device_type: DeviceType, bits: FunctionBitmask) -> Self {
        match device_type {
            DeviceType::Switch => Self::Switch,
            DeviceType::Thermostat => Self::Thermostat,
            DeviceType::Unknown => Self::None,
            DeviceType::Group => {
                if bits.is_thermostat() {
                    Self::Thermostat
                } else if bits.is_switch() {
                    Self::Switch
                } else {
                    Self::None
                }
            }
        }
    }
}

/// Switch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SwitchState {
    On,
    Off,
    Unknown,
}

/// Display-state key; one image per variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Icon {
    DectOn,
    DectOff,
    DectAbsent,
    DectGroupOn,
    DectGroupOff,
    CometOn,
    CometAbsent,
    CometLowbatt,
    CometGroupOn,
    CometGroupAbsent,
    Unknown,
}

impl Icon {
    pub fn select(
        actuator: Actuator,
        device_type: DeviceType,
        present: bool,
        state: SwitchState,
        battery_low: bool,
    ) -> Self {
        let group = device_type == DeviceType::Group;
        match actuator {
            Actuator::Switch if !present => Self::DectAbsent,
            Actuator::Switch => match (group, state) {
                (true, SwitchState::Off) => Self::DectGroupOff,
                (true, _) => Self::DectGroupOn,
                (false, SwitchState::Off) => Self::DectOff,
                (false, _) => Self::DectOn,
            },
            Actuator::Thermostat if !present => {
                if group {
                    Self::CometGroupAbsent
                } else {
                    Self::CometAbsent
                }
            }
            Actuator::Thermostat if group => Self::CometGroupOn,
            Actuator::Thermostat if battery_low => Self::CometLowbatt,
            Actuator::Thermostat => Self::CometOn,
            Actuator::None => Self::Unknown,
        }
    }
}

// ── Device ───────────────────────────────────────────────────────

/// One entry of the gateway's device list: a single actuator or a group.
///
/// Snapshots are rebuilt on every fetch; nothing here is mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub ain: String,
    pub device_id: Option<String>,
    pub firmware_version: Option<String>,
    pub product_name: Option<String>,
    pub manufacturer: Option<String>,
    pub function_bitmask: FunctionBitmask,
    pub name: Option<String>,
    pub present: bool,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub actuator: Actuator,

    // Switch
    pub state: SwitchState,
    pub mode: Option<String>,
    pub lock: Option<bool>,

    // Measurements (raw gateway units)
    /// Milliwatts.
    pub power: Option<i64>,
    /// Watt-hours.
    pub energy: Option<i64>,
    /// Tenths of a degree Celsius.
    pub temperature: Option<i64>,

    // Thermostat
    pub set_temp: Option<SetPoint>,
    pub comfort_temp: Option<SetPoint>,
    pub lowering_temp: Option<SetPoint>,
    /// Raw `tsoll`; only meaningful for thermostats.
    pub slider_raw: i64,

    /// Battery level in percent.
    pub battery: Option<u8>,
    pub battery_low: bool,

    pub icon: Icon,
    pub unknown: bool,
}

impl Device {
    /// Name for lists; falls back to the AIN.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ain)
    }

    pub fn has_identifier(&self) -> bool {
        !self.ain.trim().is_empty()
    }

    /// `"12.34 W"`.
    #[allow(clippy::as_conversions, clippy::cast_precision_loss)]
    pub fn power_display(&self) -> Option<String> {
        self.power.map(|mw| format!("{:.2} W", mw as f64 / 1000.0))
    }

    /// `"1.23 kWh"`.
    #[allow(clippy::as_conversions, clippy::cast_precision_loss)]
    pub fn energy_display(&self) -> Option<String> {
        self.energy.map(|wh| format!("{:.2} kWh", wh as f64 / 1000.0))
    }

    /// `"21.5 °C"`.
    #[allow(clippy::as_conversions, clippy::cast_precision_loss)]
    pub fn temperature_display(&self) -> Option<String> {
        self.temperature
            .map(|deci| format!("{:.1} °C", deci as f64 / 10.0))
    }
}

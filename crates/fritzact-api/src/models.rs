// ── Raw gateway payloads ──
//
// Thin, stringly-typed mirrors of the XML documents the gateway returns.
// No interpretation happens here: `fritzact-core` derives types, flags and
// display values from these.

use serde::{Deserialize, Serialize};

use crate::auth::{SessionId, UserRight};

/// `<SessionInfo>` from `login_sid.lua`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub sid: SessionId,
    /// Absent in some firmware responses to the final login step.
    pub challenge: Option<String>,
    /// Seconds before another login attempt is accepted. `0` when unblocked.
    pub block_time: u64,
    #[serde(default)]
    pub rights: Vec<UserRight>,
}

/// One child of `<devicelist>` (a `<device>` or a `<group>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceElement {
    /// Element name, `device` or `group`.
    pub tag: String,
    /// The AIN (`identifier` attribute).
    pub identifier: Option<String>,
    pub id: Option<String>,
    pub fw_version: Option<String>,
    pub product_name: Option<String>,
    pub manufacturer: Option<String>,
    pub function_bitmask: Option<String>,
    pub name: Option<String>,
    pub present: Option<String>,
    pub switch: Option<SwitchElement>,
    pub hkr: Option<HkrElement>,
    pub powermeter: Option<PowerMeterElement>,
    pub temperature: Option<TemperatureElement>,
    pub battery: Option<String>,
    pub battery_low: Option<String>,
}

/// `<switch>` block of a switchable outlet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchElement {
    pub state: Option<String>,
    pub mode: Option<String>,
    pub lock: Option<String>,
}

/// `<hkr>` block of a radiator thermostat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HkrElement {
    pub tsoll: Option<String>,
    pub komfort: Option<String>,
    pub absenk: Option<String>,
}

/// `<powermeter>` block; power in mW, energy in Wh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerMeterElement {
    pub power: Option<String>,
    pub energy: Option<String>,
}

/// `<temperature>` block; tenths of a degree Celsius.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureElement {
    pub celsius: Option<String>,
}

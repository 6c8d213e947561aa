// ── Device inventory ──
//
// Fetches `getdevicelistinfos` with the current session and applies the
// visibility policy. Never logs in by itself.

use tracing::{debug, warn};

use crate::controller::Controller;
use crate::error::CoreError;
use crate::model::{Device, DeviceType};

impl Controller {
    /// All visible devices in gateway order, optionally restricted to one type.
    ///
    /// Drops, in order: devices of another type, `unknown` devices unless
    /// the policy shows them, and records without an AIN.
    pub async fn list_devices(&self, filter: Option<DeviceType>) -> Result<Vec<Device>, CoreError> {
        let Some(session) = self.session().await else {
            warn!("not logged in or no connection to gateway");
            return Err(CoreError::NotAuthenticated);
        };

        let elements = self.client().device_list_infos(&session.sid).await?;
        if elements.is_empty() {
            debug!("no device list available");
            return Err(CoreError::NoDeviceList);
        }

        let show_unknown = self.config().policy.show_unknown;
        let devices: Vec<Device> = elements
            .iter()
            .map(Device::from)
            .inspect(log_device)
            .filter(|d| filter.is_none_or(|t| d.device_type == t))
            .filter(|d| show_unknown || !d.unknown)
            .filter(Device::has_identifier)
            .collect();

        debug!(
            total = elements.len(),
            visible = devices.len(),
            "device list filtered"
        );
        Ok(devices)
    }

    /// Look up one visible device by AIN.
    pub async fn find_device(&self, ain: &str) -> Result<Device, CoreError> {
        let ain = ain.trim();
        self.list_devices(None)
            .await?
            .into_iter()
            .find(|d| d.ain == ain)
            .ok_or_else(|| CoreError::DeviceNotFound { ain: ain.to_owned() })
    }
}

fn log_device(d: &Device) {
    let na = || "n/a".to_owned();
    let temperature = d.temperature_display().unwrap_or_else(na);
    let power = d.power_display().unwrap_or_else(na);
    let energy = d.energy_display().unwrap_or_else(na);
    let set_temp = d.set_temp.map_or_else(na, |t| t.to_string());

    debug!(
        ain = %d.ain,
        name = d.display_name(),
        device_type = %d.device_type,
        present = d.present,
        device_id = d.device_id.as_deref().unwrap_or("-"),
        bitmask = %d.function_bitmask,
        state = %d.state,
        icon = %d.icon,
        %temperature,
        %power,
        %energy,
        %set_temp,
        "device state"
    );
}

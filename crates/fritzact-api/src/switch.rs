// Home automation commands
//
// Everything below `homeautoswitch.lua` is addressed by `switchcmd` and
// authenticated by `sid`. Actuator commands answer with a short plain-text
// body (the new state or set-point); the device list is XML.

use tracing::{debug, trace};

use crate::auth::SessionId;
use crate::client::GatewayClient;
use crate::command::SwitchCommand;
use crate::error::Error;
use crate::models::DeviceElement;
use crate::xml;

impl GatewayClient {
    /// Send one `switchcmd` and return the trimmed response body.
    pub async fn switch_command(
        &self,
        sid: &SessionId,
        command: SwitchCommand,
        ain: Option<&str>,
        param: Option<&str>,
    ) -> Result<String, Error> {
        if !sid.is_valid() {
            return Err(Error::NotAuthenticated);
        }

        let mut query: Vec<(&str, &str)> =
            vec![("switchcmd", command.as_ref()), ("sid", sid.as_str())];
        if let Some(ain) = ain {
            query.push(("ain", ain));
        }
        if let Some(param) = param {
            query.push(("param", param));
        }

        debug!(%command, ain = ?ain, param = ?param, "sending switch command");

        let url = self.switch_url()?;
        let body = self.get_text(url, &query).await?;
        let body = body.trim().to_owned();

        trace!(response = %body, "switch command answered");
        Ok(body)
    }

    /// Fetch and decode `getdevicelistinfos`.
    pub async fn device_list_infos(&self, sid: &SessionId) -> Result<Vec<DeviceElement>, Error> {
        let body = self
            .switch_command(sid, SwitchCommand::GetDeviceListInfos, None, None)
            .await?;
        xml::parse_device_list(&body)
    }
}

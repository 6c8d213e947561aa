use strum::{AsRefStr, Display, EnumString};

/// `switchcmd` values understood by `homeautoswitch.lua` that this client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SwitchCommand {
    /// Full device inventory as XML.
    GetDeviceListInfos,
    SetSwitchOn,
    SetSwitchOff,
    SetSwitchToggle,
    /// Thermostat set-point in raw half-degree units (`param`).
    SetHkrTsoll,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(SwitchCommand::GetDeviceListInfos.as_ref(), "getdevicelistinfos");
        assert_eq!(SwitchCommand::SetSwitchOn.as_ref(), "setswitchon");
        assert_eq!(SwitchCommand::SetSwitchOff.as_ref(), "setswitchoff");
        assert_eq!(SwitchCommand::SetSwitchToggle.as_ref(), "setswitchtoggle");
        assert_eq!(SwitchCommand::SetHkrTsoll.to_string(), "sethkrtsoll");
    }
}

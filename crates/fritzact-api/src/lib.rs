// fritzact-api: Async Rust client for the FRITZ!Box AHA HTTP interface
//
// Covers the two endpoints a remote control needs: `login_sid.lua` for the
// challenge/response session protocol and `homeautoswitch.lua` for device
// listing and actuator commands.

pub mod auth;
pub mod client;
pub mod command;
pub mod error;
pub mod login;
pub mod models;
pub mod switch;
pub mod transport;
pub mod xml;

pub use auth::{SessionId, UserRight, login_response};
pub use client::GatewayClient;
pub use command::SwitchCommand;
pub use error::Error;
pub use models::{
    DeviceElement, HkrElement, PowerMeterElement, SessionInfo, SwitchElement, TemperatureElement,
};
pub use transport::{TlsMode, TransportConfig};

//! Domain layer between `fritzact-api` and the CLI.
//!
//! - **[`Controller`]**: facade for one gateway and one run.
//!   [`ensure_session()`](Controller::ensure_session) reuses or refreshes
//!   the cached login, [`list_devices()`](Controller::list_devices) fetches
//!   the inventory, [`execute()`](Controller::execute) sends one actuator
//!   command under the configured access policy.
//!
//! - **Domain model** ([`model`]): [`Device`] snapshots with derived type,
//!   icon and display values, and the thermostat [`SetPoint`] encoding.
//!
//! - **[`ActivityMarker`]**: debounced "last command" timestamp file.

pub mod config;
pub mod controller;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod inventory;
pub mod marker;
pub mod model;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AccessPolicy, GatewayConfig, SessionPolicy, TlsVerification, gateway_url};
pub use controller::Controller;
pub use dispatch::{Action, CommandOutcome, CommandRequest, FixedSetpoint, SetpointChooser};
pub use error::CoreError;
pub use marker::ActivityMarker;
pub use session::{Session, StoredSession, session_candidate};

pub use fritzact_api::{SessionId, UserRight};

pub use model::{
    Actuator, Device, DeviceType, FunctionBitmask, Icon, SetPoint, SwitchState, is_group_ain,
};

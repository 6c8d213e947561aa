// ── Domain model ──

pub mod device;
pub mod setpoint;

pub use device::{Actuator, Device, DeviceType, FunctionBitmask, Icon, SwitchState, is_group_ain};
pub use setpoint::SetPoint;

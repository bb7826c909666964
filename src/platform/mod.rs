//! Platform abstraction layer
//!
//! The round core never touches browser APIs directly. Hosts answer
//! capability questions through these traits and push the result of any
//! asynchronous grant back into the controller.

use crate::error::GameError;

/// Motion sensor permission gate (e.g. iOS `DeviceOrientationEvent.requestPermission`)
pub trait MotionPermission {
    /// True if the platform wants an explicit user grant before
    /// orientation events are delivered
    fn gate_required(&self) -> bool;

    /// True once the grant has been given
    fn granted(&self) -> bool;
}

/// Outcome of an asynchronous permission request
pub type PermissionOutcome = Result<(), GameError>;

/// Platforms without a permission gate (desktop browsers, Android, native)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPermissionGate;

impl MotionPermission for NoPermissionGate {
    fn gate_required(&self) -> bool {
        false
    }

    fn granted(&self) -> bool {
        true
    }
}

/// Fixed answers, for hosts that track the grant themselves
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPermission {
    pub required: bool,
    pub granted: bool,
}

impl MotionPermission for StaticPermission {
    fn gate_required(&self) -> bool {
        self.required
    }

    fn granted(&self) -> bool {
        self.granted
    }
}

//! # Capability Registry
//!
//! Declares which optional CSI operations and volume access modes a driver
//! deployment supports, and validates inbound requests against them.
//!
//! ## Flow
//!
//! 1. Bootstrap builds a [`DriverRegistry`] from the driver identity.
//! 2. Each `add_*` call replaces one collection with the declared kinds.
//! 3. The dispatch layer calls `validate_*_request` before running a request
//!    and turns a [`RequestError`](crate::error::RequestError) into an
//!    `InvalidArgument` rejection.

pub mod capability;
pub mod kinds;
pub mod registry;

pub use capability::{
    ControllerServiceCapability, GroupControllerServiceCapability, VolumeCapabilityAccessMode,
};
pub use kinds::{AccessMode, ControllerRpc, GroupControllerRpc};
pub use registry::{CapabilityReport, DriverRegistry, PluginInfo};

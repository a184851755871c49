//! # csi-common
//!
//! Capability registry shared by CSI storage-plugin drivers.
//!
//! A driver declares, once at startup, which optional controller and group
//! controller operations and which volume access modes it supports. The
//! request dispatch layer then asks the registry whether an inbound request's
//! capability is permitted before running any business logic.
//!
//! ```
//! use csi_common::{ControllerRpc, DriverRegistry};
//!
//! let registry = DriverRegistry::new("rbd.csi.ceph.com", "3.11.0", "node-1", "default").unwrap();
//! registry.add_controller_service_capabilities(&[ControllerRpc::CreateDeleteVolume]);
//!
//! assert!(registry.validate_controller_service_request(ControllerRpc::CreateDeleteVolume).is_ok());
//! assert!(registry.validate_controller_service_request(ControllerRpc::Unknown).is_ok());
//! assert!(registry.validate_controller_service_request(ControllerRpc::CloneVolume).is_err());
//! ```

pub mod capabilities;
pub mod config;
pub mod error;
pub mod hooks;

pub use capabilities::{
    AccessMode, CapabilityReport, ControllerRpc, ControllerServiceCapability, DriverRegistry,
    GroupControllerRpc, GroupControllerServiceCapability, PluginInfo, VolumeCapabilityAccessMode,
};
pub use config::{DriverConfig, IdentityConfig};
pub use error::{ConfigError, IdentityField, RequestError};
pub use hooks::{CapabilityObserver, LogObserver, NoopObserver};

//! Capability records held by the registry.
//!
//! These mirror the shape of the CSI capability messages: a wrapper around a
//! kind that a response assembler can embed directly. Validation only ever
//! looks at the wrapped kind.

use serde::{Deserialize, Serialize};

use super::kinds::{AccessMode, ControllerRpc, GroupControllerRpc};

/// A declared controller service capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControllerServiceCapability {
    pub rpc: ControllerRpc,
}

impl ControllerServiceCapability {
    pub fn new(rpc: ControllerRpc) -> Self {
        Self { rpc }
    }

    pub fn kind(&self) -> ControllerRpc {
        self.rpc
    }
}

impl From<ControllerRpc> for ControllerServiceCapability {
    fn from(rpc: ControllerRpc) -> Self {
        Self::new(rpc)
    }
}

/// A declared group controller service capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupControllerServiceCapability {
    pub rpc: GroupControllerRpc,
}

impl GroupControllerServiceCapability {
    pub fn new(rpc: GroupControllerRpc) -> Self {
        Self { rpc }
    }

    pub fn kind(&self) -> GroupControllerRpc {
        self.rpc
    }
}

impl From<GroupControllerRpc> for GroupControllerServiceCapability {
    fn from(rpc: GroupControllerRpc) -> Self {
        Self::new(rpc)
    }
}

/// A supported volume access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeCapabilityAccessMode {
    pub mode: AccessMode,
}

impl VolumeCapabilityAccessMode {
    pub fn new(mode: AccessMode) -> Self {
        Self { mode }
    }

    pub fn kind(&self) -> AccessMode {
        self.mode
    }
}

impl From<AccessMode> for VolumeCapabilityAccessMode {
    fn from(mode: AccessMode) -> Self {
        Self::new(mode)
    }
}

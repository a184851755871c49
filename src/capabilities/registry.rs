//! Driver registry: identity plus the capabilities a deployment supports.
//!
//! A registry is built once at startup from four identity strings, filled by
//! the registration calls, and then shared (`Arc<DriverRegistry>`) with the
//! request dispatch layer, which validates every inbound request against it.
//!
//! Each collection lives behind an [`ArcSwap`]. Registration builds a fresh
//! immutable collection and swaps it in as a whole, so validation never takes
//! a lock and never observes a partially replaced collection.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;

use super::capability::{
    ControllerServiceCapability, GroupControllerServiceCapability, VolumeCapabilityAccessMode,
};
use super::kinds::{AccessMode, ControllerRpc, GroupControllerRpc};
use crate::error::{ConfigError, IdentityField, RequestError};
use crate::hooks::{CapabilityObserver, LogObserver};

/// Plugin identity as reported to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    pub name: String,
    pub vendor_version: String,
    pub manifest: HashMap<String, String>,
}

/// Point-in-time view of everything the registry advertises.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityReport {
    pub plugin: PluginInfo,
    pub node_id: String,
    pub instance_id: String,
    pub controller_capabilities: Vec<ControllerServiceCapability>,
    pub group_controller_capabilities: Vec<GroupControllerServiceCapability>,
    pub access_modes: Vec<VolumeCapabilityAccessMode>,
    pub topology: HashMap<String, String>,
}

/// Identity and declared capabilities of a running CSI driver.
pub struct DriverRegistry {
    name: String,
    node_id: String,
    version: String,

    /// Unique per CSI instance. Differentiates omap names when several
    /// instances share one storage cluster.
    instance: String,

    /// Topology constraints advertised by the node server.
    topology: ArcSwap<HashMap<String, String>>,
    capabilities: ArcSwap<Vec<ControllerServiceCapability>>,
    group_capabilities: ArcSwap<Vec<GroupControllerServiceCapability>>,
    access_modes: ArcSwap<Vec<VolumeCapabilityAccessMode>>,

    observer: Arc<dyn CapabilityObserver>,
}

impl DriverRegistry {
    /// Create a registry with no capabilities declared.
    ///
    /// The vendor version reported to the orchestrator equals `version` and
    /// no plugin manifest is published. Every identity field must be
    /// non-empty; the first empty one (checked as name, node id, version,
    /// instance id) is reported.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        node_id: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let version = version.into();
        let node_id = node_id.into();
        let instance = instance_id.into();

        let missing = [
            (IdentityField::Name, &name),
            (IdentityField::NodeId, &node_id),
            (IdentityField::Version, &version),
            (IdentityField::InstanceId, &instance),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(field, _)| field);

        if let Some(field) = missing {
            log::error!("{} missing", field);
            return Err(ConfigError::MissingIdentity(field));
        }

        Ok(Self {
            name,
            node_id,
            version,
            instance,
            topology: ArcSwap::from_pointee(HashMap::new()),
            capabilities: ArcSwap::from_pointee(Vec::new()),
            group_capabilities: ArcSwap::from_pointee(Vec::new()),
            access_modes: ArcSwap::from_pointee(Vec::new()),
            observer: Arc::new(LogObserver),
        })
    }

    /// Replace the registration observer.
    pub fn with_observer(mut self, observer: Arc<dyn CapabilityObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Instance identification of this CSI driver.
    pub fn instance_id(&self) -> &str {
        &self.instance
    }

    /// Store the topology map. It is returned unchanged by [`Self::topology`].
    pub fn set_topology(&self, topology: HashMap<String, String>) {
        self.topology.store(Arc::new(topology));
    }

    pub fn topology(&self) -> Arc<HashMap<String, String>> {
        self.topology.load_full()
    }

    pub fn plugin_info(&self) -> PluginInfo {
        PluginInfo {
            name: self.name.clone(),
            vendor_version: self.version.clone(),
            manifest: HashMap::new(),
        }
    }

    /// Replace the controller service capabilities with `rpcs`.
    pub fn add_controller_service_capabilities(&self, rpcs: &[ControllerRpc]) {
        let mut caps = Vec::with_capacity(rpcs.len());
        for &rpc in rpcs {
            self.observer.controller_capability_enabled(rpc);
            caps.push(ControllerServiceCapability::new(rpc));
        }

        self.capabilities.store(Arc::new(caps));
    }

    /// Replace the group controller service capabilities with `rpcs`.
    pub fn add_group_controller_service_capabilities(&self, rpcs: &[GroupControllerRpc]) {
        let mut caps = Vec::with_capacity(rpcs.len());
        for &rpc in rpcs {
            self.observer.group_controller_capability_enabled(rpc);
            caps.push(GroupControllerServiceCapability::new(rpc));
        }

        self.group_capabilities.store(Arc::new(caps));
    }

    /// Replace the supported volume access modes with `modes`.
    ///
    /// Returns the stored collection so callers can embed it in responses.
    pub fn add_volume_capability_access_modes(
        &self,
        modes: &[AccessMode],
    ) -> Arc<Vec<VolumeCapabilityAccessMode>> {
        let mut vca = Vec::with_capacity(modes.len());
        for &mode in modes {
            self.observer.access_mode_enabled(mode);
            vca.push(VolumeCapabilityAccessMode::new(mode));
        }

        let vca = Arc::new(vca);
        self.access_modes.store(Arc::clone(&vca));
        vca
    }

    pub fn volume_capability_access_modes(&self) -> Arc<Vec<VolumeCapabilityAccessMode>> {
        self.access_modes.load_full()
    }

    pub fn controller_service_capabilities(&self) -> Arc<Vec<ControllerServiceCapability>> {
        self.capabilities.load_full()
    }

    pub fn group_controller_service_capabilities(
        &self,
    ) -> Arc<Vec<GroupControllerServiceCapability>> {
        self.group_capabilities.load_full()
    }

    /// Check that a controller request's capability was declared.
    ///
    /// `Unknown` always passes.
    pub fn validate_controller_service_request(
        &self,
        rpc: ControllerRpc,
    ) -> Result<(), RequestError> {
        if rpc.is_unknown() {
            return Ok(());
        }

        if self.capabilities.load().iter().any(|cap| cap.kind() == rpc) {
            return Ok(());
        }

        Err(RequestError::InvalidArgument(rpc.as_str_name().to_string()))
    }

    /// Check that a group controller request's capability was declared.
    ///
    /// `Unknown` always passes.
    pub fn validate_group_controller_service_request(
        &self,
        rpc: GroupControllerRpc,
    ) -> Result<(), RequestError> {
        if rpc.is_unknown() {
            return Ok(());
        }

        if self
            .group_capabilities
            .load()
            .iter()
            .any(|cap| cap.kind() == rpc)
        {
            return Ok(());
        }

        Err(RequestError::InvalidArgument(rpc.as_str_name().to_string()))
    }

    pub fn report(&self) -> CapabilityReport {
        CapabilityReport {
            plugin: self.plugin_info(),
            node_id: self.node_id.clone(),
            instance_id: self.instance.clone(),
            controller_capabilities: self.capabilities.load_full().to_vec(),
            group_controller_capabilities: self.group_capabilities.load_full().to_vec(),
            access_modes: self.access_modes.load_full().to_vec(),
            topology: (*self.topology.load_full()).clone(),
        }
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("name", &self.name)
            .field("node_id", &self.node_id)
            .field("version", &self.version)
            .field("instance", &self.instance)
            .field("topology", &self.topology.load_full())
            .field("capabilities", &self.capabilities.load_full())
            .field("group_capabilities", &self.group_capabilities.load_full())
            .field("access_modes", &self.access_modes.load_full())
            .finish_non_exhaustive()
    }
}

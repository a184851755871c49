//! Driver declaration loaded at bootstrap.
//!
//! Example YAML:
//! ```yaml
//! driver:
//!   name: "rbd.csi.ceph.com"
//!   version: "3.11.0"
//!   node_id: "node-1"
//!   instance_id: "default"
//!   topology:
//!     topology.rbd.csi.ceph.com/zone: "zone-a"
//! controller_capabilities: [CREATE_DELETE_VOLUME, EXPAND_VOLUME]
//! group_controller_capabilities: [CREATE_DELETE_GET_VOLUME_GROUP_SNAPSHOT]
//! access_modes: [SINGLE_NODE_WRITER]
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::capabilities::{AccessMode, ControllerRpc, DriverRegistry, GroupControllerRpc};
use crate::error::ConfigError;
use crate::hooks::{CapabilityObserver, LogObserver};

/// Identity section of a driver declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub name: String,
    pub version: String,
    pub node_id: String,
    pub instance_id: String,

    #[serde(default)]
    pub topology: HashMap<String, String>,
}

/// Full driver declaration: identity plus the capabilities to register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    pub driver: IdentityConfig,

    #[serde(default)]
    pub controller_capabilities: Vec<ControllerRpc>,

    #[serde(default)]
    pub group_controller_capabilities: Vec<GroupControllerRpc>,

    #[serde(default)]
    pub access_modes: Vec<AccessMode>,
}

impl DriverConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded driver declaration from {}", path.display());
        Self::from_yaml(&content)
    }

    /// Build a registry and register every declared collection once.
    ///
    /// Registrations are logged through [`LogObserver`].
    pub fn build(&self) -> Result<DriverRegistry, ConfigError> {
        self.build_with_observer(Arc::new(LogObserver))
    }

    /// Like [`Self::build`], reporting registrations to `observer`.
    pub fn build_with_observer(
        &self,
        observer: Arc<dyn CapabilityObserver>,
    ) -> Result<DriverRegistry, ConfigError> {
        let registry = DriverRegistry::new(
            self.driver.name.as_str(),
            self.driver.version.as_str(),
            self.driver.node_id.as_str(),
            self.driver.instance_id.as_str(),
        )?
        .with_observer(observer);
        Ok(self.register(registry))
    }

    fn register(&self, registry: DriverRegistry) -> DriverRegistry {
        registry.add_controller_service_capabilities(&self.controller_capabilities);
        registry.add_group_controller_service_capabilities(&self.group_controller_capabilities);
        registry.add_volume_capability_access_modes(&self.access_modes);
        registry.set_topology(self.driver.topology.clone());
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{CapabilityEvent, RecordingObserver};
    use std::io::Write;

    fn full_yaml() -> &'static str {
        r#"
driver:
  name: "rbd.csi.ceph.com"
  version: "3.11.0"
  node_id: "node-1"
  instance_id: "default"
  topology:
    topology.rbd.csi.ceph.com/zone: "zone-a"
controller_capabilities: [CREATE_DELETE_VOLUME, EXPAND_VOLUME]
group_controller_capabilities: [CREATE_DELETE_GET_VOLUME_GROUP_SNAPSHOT]
access_modes: [SINGLE_NODE_WRITER]
"#
    }

    #[test]
    fn test_from_yaml_full() {
        let config = DriverConfig::from_yaml(full_yaml()).unwrap();
        assert_eq!(config.driver.name, "rbd.csi.ceph.com");
        assert_eq!(
            config.controller_capabilities,
            vec![ControllerRpc::CreateDeleteVolume, ControllerRpc::ExpandVolume]
        );
        assert_eq!(config.access_modes, vec![AccessMode::SingleNodeWriter]);
        assert_eq!(
            config.driver.topology.get("topology.rbd.csi.ceph.com/zone"),
            Some(&"zone-a".to_string())
        );
    }

    #[test]
    fn test_from_yaml_defaults_to_empty_lists() {
        let yaml = r#"
driver:
  name: "cephfs.csi.ceph.com"
  version: "3.11.0"
  node_id: "node-2"
  instance_id: "default"
"#;
        let config = DriverConfig::from_yaml(yaml).unwrap();
        assert!(config.controller_capabilities.is_empty());
        assert!(config.group_controller_capabilities.is_empty());
        assert!(config.access_modes.is_empty());
        assert!(config.driver.topology.is_empty());
    }

    #[test]
    fn test_from_yaml_rejects_unknown_kind() {
        let yaml = r#"
driver:
  name: "d"
  version: "1"
  node_id: "n"
  instance_id: "i"
controller_capabilities: [TELEPORT_VOLUME]
"#;
        let err = DriverConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_build_registers_everything() {
        let observer = Arc::new(RecordingObserver::new());
        let registry = DriverConfig::from_yaml(full_yaml())
            .unwrap()
            .build_with_observer(observer.clone())
            .unwrap();

        assert_eq!(registry.instance_id(), "default");
        assert!(registry
            .validate_controller_service_request(ControllerRpc::ExpandVolume)
            .is_ok());
        assert!(registry
            .validate_controller_service_request(ControllerRpc::CloneVolume)
            .is_err());
        assert!(registry
            .validate_group_controller_service_request(
                GroupControllerRpc::CreateDeleteGetVolumeGroupSnapshot
            )
            .is_ok());
        assert_eq!(registry.volume_capability_access_modes().len(), 1);
        assert_eq!(registry.topology().len(), 1);
        assert_eq!(observer.events().len(), 4);
        assert_eq!(
            observer.events()[0],
            CapabilityEvent::Controller(ControllerRpc::CreateDeleteVolume)
        );
    }

    #[test]
    fn test_build_matches_build_with_observer() {
        let config = DriverConfig::from_yaml(full_yaml()).unwrap();
        let logged = config.build().unwrap();
        let recorded = config
            .build_with_observer(Arc::new(RecordingObserver::new()))
            .unwrap();

        assert_eq!(logged.plugin_info(), recorded.plugin_info());
        assert_eq!(logged.instance_id(), recorded.instance_id());
        assert_eq!(
            logged.controller_service_capabilities(),
            recorded.controller_service_capabilities()
        );
        assert_eq!(
            logged.volume_capability_access_modes(),
            recorded.volume_capability_access_modes()
        );
        assert_eq!(logged.topology(), recorded.topology());
    }

    #[test]
    fn test_build_fails_on_empty_identity() {
        let mut config = DriverConfig::from_yaml(full_yaml()).unwrap();
        config.driver.instance_id.clear();
        let err = config.build().unwrap_err();
        assert_eq!(err.to_string(), "instance id missing");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(full_yaml().as_bytes()).unwrap();

        let config = DriverConfig::from_file(file.path()).unwrap();
        assert_eq!(config.driver.node_id, "node-1");
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = DriverConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }
}

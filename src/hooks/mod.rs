//! Observer hooks for capability registration.
//!
//! Registration reports every enabled kind through a [`CapabilityObserver`]
//! so operators can audit what a deployment advertises. The observer is
//! injected into the registry; replacing a collection is otherwise a plain
//! state transition.
//!
//! All methods have default no-op implementations, so implementors only
//! override the collections they care about.

use std::sync::Mutex;

use crate::capabilities::{AccessMode, ControllerRpc, GroupControllerRpc};

/// Receives one call per kind enabled by a registration.
pub trait CapabilityObserver: Send + Sync + 'static {
    fn controller_capability_enabled(&self, _rpc: ControllerRpc) {}

    fn group_controller_capability_enabled(&self, _rpc: GroupControllerRpc) {}

    fn access_mode_enabled(&self, _mode: AccessMode) {}
}

/// Default observer: one `info` log line per enabled kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl CapabilityObserver for LogObserver {
    fn controller_capability_enabled(&self, rpc: ControllerRpc) {
        log::info!("Enabling controller service capability: {}", rpc);
    }

    fn group_controller_capability_enabled(&self, rpc: GroupControllerRpc) {
        log::info!("Enabling group controller service capability: {}", rpc);
    }

    fn access_mode_enabled(&self, mode: AccessMode) {
        log::info!("Enabling volume access mode: {}", mode);
    }
}

/// Observer that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CapabilityObserver for NoopObserver {}

/// A single registration event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityEvent {
    Controller(ControllerRpc),
    GroupController(GroupControllerRpc),
    AccessMode(AccessMode),
}

/// Observer that keeps every event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<CapabilityEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<CapabilityEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, event: CapabilityEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

impl CapabilityObserver for RecordingObserver {
    fn controller_capability_enabled(&self, rpc: ControllerRpc) {
        self.record(CapabilityEvent::Controller(rpc));
    }

    fn group_controller_capability_enabled(&self, rpc: GroupControllerRpc) {
        self.record(CapabilityEvent::GroupController(rpc));
    }

    fn access_mode_enabled(&self, mode: AccessMode) {
        self.record(CapabilityEvent::AccessMode(mode));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::new();
        observer.access_mode_enabled(AccessMode::SingleNodeWriter);
        observer.controller_capability_enabled(ControllerRpc::ExpandVolume);
        observer.controller_capability_enabled(ControllerRpc::ExpandVolume);

        assert_eq!(
            observer.events(),
            vec![
                CapabilityEvent::AccessMode(AccessMode::SingleNodeWriter),
                CapabilityEvent::Controller(ControllerRpc::ExpandVolume),
                CapabilityEvent::Controller(ControllerRpc::ExpandVolume),
            ]
        );
    }

    #[test]
    fn test_recording_observer_survives_poisoned_lock() {
        let observer = RecordingObserver::new();
        observer.controller_capability_enabled(ControllerRpc::GetVolume);

        let result = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = observer.events.lock().unwrap();
                panic!("poison the event log");
            })
            .join()
        });
        assert!(result.is_err());
        assert!(observer.events.is_poisoned());

        observer.access_mode_enabled(AccessMode::MultiNodeReaderOnly);
        assert_eq!(
            observer.events(),
            vec![
                CapabilityEvent::Controller(ControllerRpc::GetVolume),
                CapabilityEvent::AccessMode(AccessMode::MultiNodeReaderOnly),
            ]
        );
    }
}

//! Startup configuration surface.
//!
//! The plugin descriptor set and the secured-room policies are externally
//! supplied configuration, loaded once at startup and replaceable as whole
//! snapshots. A malformed entry is skipped and reported; it never aborts the
//! bootstrap, so one operator typo cannot take the client down.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use vestibule_core::{
    PluginDescriptor, PluginRegistry, RegistryError, RoomId, SecuredRoomPolicy,
};

use crate::{Hub, HubEvent};

/// Admission policy configuration for one restricted room.
#[derive(Debug, Clone, Deserialize)]
pub struct SecuredRoomConfig {
    /// The restricted room.
    pub room_id: RoomId,
    /// Its admission policy; validated during deserialization.
    pub policy: SecuredRoomPolicy,
}

/// Configuration snapshot for a hub.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HubConfig {
    /// Plugin descriptors, in dispatch-priority registration order.
    #[serde(default)]
    pub plugins: Vec<PluginDescriptor>,
    /// Secured-room admission policies.
    #[serde(default)]
    pub secured_rooms: Vec<SecuredRoomConfig>,
}

/// Failure to read a configuration snapshot at all.
///
/// Per-entry problems are not errors of this type; they are collected in
/// [`HubBootstrap::rejected_plugins`].
#[derive(Error, Debug)]
pub enum HubConfigError {
    /// The snapshot is not valid JSON or has the wrong shape.
    #[error("malformed hub configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result of bootstrapping a hub from configuration.
#[derive(Debug)]
pub struct HubBootstrap {
    /// The hub, loaded with every accepted descriptor and policy.
    pub hub: Hub,
    /// Descriptors rejected at registration time, for operator reporting.
    pub rejected_plugins: Vec<RegistryError>,
}

impl HubConfig {
    /// Parse a configuration snapshot from JSON.
    ///
    /// Invalid secured-room policies (duplicate or unsatisfiable attributes)
    /// fail the parse here because [`SecuredRoomPolicy`] validates during
    /// deserialization; see [`vestibule_core::PolicyConfigError`] for the
    /// reasons.
    pub fn from_json(json: &str) -> Result<Self, HubConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a hub from this snapshot.
    ///
    /// Rejected plugin descriptors are skipped, logged, and returned;
    /// accepted ones dispatch in registration order. Secured-room policies
    /// are staged so they attach as soon as their room syncs in.
    pub fn bootstrap(self) -> HubBootstrap {
        let (registry, rejected_plugins) = PluginRegistry::load(self.plugins);
        if !rejected_plugins.is_empty() {
            warn!(count = rejected_plugins.len(), "rejected plugin descriptors during bootstrap");
        }

        let mut hub = Hub::new(registry);
        for secured in self.secured_rooms {
            let _ = hub.handle(HubEvent::SecuredPolicyLoaded {
                room_id: secured.room_id,
                policy: secured.policy,
            });
        }

        HubBootstrap { hub, rejected_plugins }
    }
}

//! Plugin registry.
//!
//! Holds the configured descriptor set. Registration rejects configuration
//! errors (duplicate enabled `(kind, selector)` pairs, duplicate enabled
//! names, malformed selectors) instead of silently tolerating them - a
//! rejected descriptor never enters the active set, but the process keeps
//! running with the descriptors that did.
//!
//! The registry is read-mostly. Reloads install a complete replacement
//! snapshot through [`RegistryHandle`] so a concurrent reader never observes
//! a mix of old and new descriptors.

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, warn};

use crate::plugin::{PluginDescriptor, PluginKind};
use crate::room::RoomKind;

/// Configuration error rejecting a descriptor at registration time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An enabled descriptor with the same `(kind, selector)` already exists.
    #[error("plugin {name}: conflicting enabled descriptor for {kind:?} selector {selector:?}")]
    Conflict {
        /// Name of the rejected descriptor.
        name: String,
        /// Kind of the conflicting pair.
        kind: PluginKind,
        /// Selector of the conflicting pair.
        selector: String,
    },

    /// An enabled descriptor with the same name already exists.
    #[error("plugin {name}: name already registered")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// The selector cannot match anything for its kind.
    #[error("plugin {name}: malformed selector {selector:?}")]
    MalformedSelector {
        /// Name of the rejected descriptor.
        name: String,
        /// The offending selector.
        selector: String,
    },
}

/// The set of configured extensions, keyed by kind and selector.
///
/// Registration order is preserved for deterministic iteration.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    descriptors: Vec<PluginDescriptor>,
}

impl PluginRegistry {
    /// Create an empty registry. Dispatch against it yields the built-in
    /// default handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor.
    ///
    /// Disabled descriptors are retained for inspection but never conflict
    /// and never dispatch. Enabled descriptors must have a unique name and a
    /// unique `(kind, selector)` pair; `RoomType` selectors must be a known
    /// room-kind wire string.
    pub fn register(&mut self, descriptor: PluginDescriptor) -> Result<(), RegistryError> {
        if descriptor.selector.is_empty()
            || (descriptor.kind == PluginKind::RoomType
                && RoomKind::from_wire_str(&descriptor.selector).is_none())
        {
            return Err(RegistryError::MalformedSelector {
                name: descriptor.name.clone(),
                selector: descriptor.selector.clone(),
            });
        }

        if descriptor.enabled {
            if self.enabled().any(|existing| existing.name == descriptor.name) {
                return Err(RegistryError::DuplicateName { name: descriptor.name.clone() });
            }
            if self.enabled().any(|existing| {
                existing.kind == descriptor.kind && existing.selector == descriptor.selector
            }) {
                return Err(RegistryError::Conflict {
                    name: descriptor.name.clone(),
                    kind: descriptor.kind,
                    selector: descriptor.selector.clone(),
                });
            }
        }

        debug!(name = %descriptor.name, kind = ?descriptor.kind, enabled = descriptor.enabled, "registered plugin");
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Build a registry from a configuration snapshot.
    ///
    /// Rejected descriptors are skipped and returned; one bad entry never
    /// aborts the load. Surviving descriptors keep their input order.
    pub fn load<I>(descriptors: I) -> (Self, Vec<RegistryError>)
    where
        I: IntoIterator<Item = PluginDescriptor>,
    {
        let mut registry = Self::new();
        let mut rejected = Vec::new();
        for descriptor in descriptors {
            if let Err(error) = registry.register(descriptor) {
                warn!(%error, "skipping rejected plugin descriptor");
                rejected.push(error);
            }
        }
        (registry, rejected)
    }

    /// Enabled descriptors of one kind, in registration order.
    ///
    /// The iterator is finite and restartable; dispatch walks it per lookup.
    pub fn of_kind(&self, kind: PluginKind) -> impl Iterator<Item = &PluginDescriptor> {
        self.enabled().filter(move |descriptor| descriptor.kind == kind)
    }

    /// All enabled descriptors, in registration order.
    pub fn enabled(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.descriptors.iter().filter(|descriptor| descriptor.enabled)
    }

    /// Every retained descriptor, including disabled ones, for inspection.
    pub fn descriptors(&self) -> &[PluginDescriptor] {
        &self.descriptors
    }

    /// Look up a retained descriptor by name.
    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.descriptors.iter().find(|descriptor| descriptor.name == name)
    }

    /// Number of enabled descriptors.
    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }
}

/// Shared, atomically replaceable registry snapshot.
///
/// Readers clone the current `Arc` and dispatch against an immutable
/// snapshot; [`RegistryHandle::replace`] installs a whole new registry.
/// Copy-on-write, never in-place mutation, so a dispatch in flight keeps the
/// registry it started with.
#[derive(Debug)]
pub struct RegistryHandle {
    inner: RwLock<Arc<PluginRegistry>>,
}

impl RegistryHandle {
    /// Wrap an initial registry.
    pub fn new(registry: PluginRegistry) -> Self {
        Self { inner: RwLock::new(Arc::new(registry)) }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<PluginRegistry> {
        Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Install a replacement snapshot.
    pub fn replace(&self, registry: PluginRegistry) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(registry);
    }
}

impl Default for RegistryHandle {
    fn default() -> Self {
        Self::new(PluginRegistry::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn room_id_plugin(name: &str, selector: &str) -> PluginDescriptor {
        PluginDescriptor::enabled(name, PluginKind::RoomId, selector, format!("plugin.{name}"))
    }

    #[test]
    fn duplicate_enabled_pair_conflicts() {
        let mut registry = PluginRegistry::new();
        registry.register(room_id_plugin("first", "!abc")).unwrap();

        let error = registry.register(room_id_plugin("second", "!abc")).unwrap_err();
        assert_eq!(error, RegistryError::Conflict {
            name: "second".to_owned(),
            kind: PluginKind::RoomId,
            selector: "!abc".to_owned(),
        });
        assert_eq!(registry.enabled_count(), 1);
    }

    #[test]
    fn same_pair_with_one_disabled_is_fine() {
        let mut registry = PluginRegistry::new();
        registry.register(room_id_plugin("first", "!abc")).unwrap();
        registry
            .register(PluginDescriptor::disabled("second", PluginKind::RoomId, "!abc", "plugin.second"))
            .unwrap();

        assert_eq!(registry.enabled_count(), 1);
        assert_eq!(registry.descriptors().len(), 2);
        assert!(registry.get("second").is_some());
    }

    #[test]
    fn same_selector_across_kinds_is_fine() {
        let mut registry = PluginRegistry::new();
        registry.register(room_id_plugin("by-id", "!abc")).unwrap();
        registry
            .register(PluginDescriptor::enabled("by-event", PluginKind::EventType, "!abc", "plugin.e"))
            .unwrap();

        assert_eq!(registry.enabled_count(), 2);
    }

    #[test]
    fn duplicate_enabled_name_rejected() {
        let mut registry = PluginRegistry::new();
        registry.register(room_id_plugin("twin", "!abc")).unwrap();

        let error = registry.register(room_id_plugin("twin", "!def")).unwrap_err();
        assert_eq!(error, RegistryError::DuplicateName { name: "twin".to_owned() });
    }

    #[test]
    fn malformed_room_type_selector_rejected() {
        let mut registry = PluginRegistry::new();
        let error = registry
            .register(PluginDescriptor::enabled("bad", PluginKind::RoomType, "not-a-kind", "plugin.b"))
            .unwrap_err();

        assert_eq!(error, RegistryError::MalformedSelector {
            name: "bad".to_owned(),
            selector: "not-a-kind".to_owned(),
        });
    }

    #[test]
    fn empty_selector_rejected() {
        let mut registry = PluginRegistry::new();
        assert!(registry.register(room_id_plugin("empty", "")).is_err());
    }

    #[test]
    fn of_kind_preserves_registration_order() {
        let mut registry = PluginRegistry::new();
        registry.register(room_id_plugin("c", "!c")).unwrap();
        registry
            .register(PluginDescriptor::enabled("ev", PluginKind::EventType, "m.poll", "plugin.p"))
            .unwrap();
        registry.register(room_id_plugin("a", "!a")).unwrap();
        registry.register(room_id_plugin("b", "!b")).unwrap();

        let names: Vec<_> =
            registry.of_kind(PluginKind::RoomId).map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn load_skips_only_rejected_descriptors() {
        let (registry, rejected) = PluginRegistry::load(vec![
            room_id_plugin("ok", "!abc"),
            room_id_plugin("clash", "!abc"),
            PluginDescriptor::enabled("forum", PluginKind::RoomType, "ph.forum-room", "plugin.f"),
            PluginDescriptor::enabled("bad", PluginKind::RoomType, "nope", "plugin.n"),
        ]);

        assert_eq!(registry.enabled_count(), 2);
        assert!(registry.get("ok").is_some());
        assert!(registry.get("forum").is_some());
        assert_eq!(rejected.len(), 2);
    }

    #[test]
    fn handle_replaces_whole_snapshot() {
        let mut first = PluginRegistry::new();
        first.register(room_id_plugin("old", "!abc")).unwrap();
        let handle = RegistryHandle::new(first);

        let held = handle.snapshot();

        let mut second = PluginRegistry::new();
        second.register(room_id_plugin("new", "!def")).unwrap();
        handle.replace(second);

        // The pre-replacement reader keeps its complete old snapshot.
        assert!(held.get("old").is_some());
        assert!(held.get("new").is_none());

        let fresh = handle.snapshot();
        assert!(fresh.get("old").is_none());
        assert!(fresh.get("new").is_some());
    }
}

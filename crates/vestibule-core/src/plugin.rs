//! Plugin descriptors.
//!
//! A descriptor binds a selector (room id, room kind, or event type) to a
//! handler reference the rendering host can mount. Descriptors are externally
//! supplied configuration, loaded once at startup and replaced as whole
//! snapshots (see [`crate::RegistryHandle`]).

use serde::{Deserialize, Serialize};

/// Opaque reference to a renderer in the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerId(String);

impl HandlerId {
    /// Handler mounted when no descriptor matches. Always present.
    const BUILT_IN: &'static str = "vestibule.room.default";

    /// Wrap a handler reference.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The non-removable built-in default handler.
    pub fn built_in() -> Self {
        Self(Self::BUILT_IN.to_owned())
    }

    /// Whether this is the built-in default handler.
    pub fn is_built_in(&self) -> bool {
        self.0 == Self::BUILT_IN
    }

    /// Reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a descriptor's selector matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginKind {
    /// Selector is a room id literal.
    RoomId,
    /// Selector is a room-kind wire string.
    RoomType,
    /// Selector is an event-type literal.
    EventType,
}

/// Configuration record binding a selector to a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Plugin name, unique among enabled descriptors.
    pub name: String,
    /// Whether the plugin takes part in dispatch.
    pub enabled: bool,
    /// What the selector matches against.
    pub kind: PluginKind,
    /// Room id literal, room-kind wire string, or event-type literal.
    pub selector: String,
    /// Handler the host mounts when this descriptor wins dispatch.
    pub handler: HandlerId,
}

impl PluginDescriptor {
    /// Shorthand for an enabled descriptor.
    pub fn enabled(
        name: impl Into<String>,
        kind: PluginKind,
        selector: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            kind,
            selector: selector.into(),
            handler: HandlerId::new(handler),
        }
    }

    /// Shorthand for a disabled descriptor, retained for inspection only.
    pub fn disabled(
        name: impl Into<String>,
        kind: PluginKind,
        selector: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        Self { enabled: false, ..Self::enabled(name, kind, selector, handler) }
    }
}

//! Protocol event read models.
//!
//! Events arrive already parsed from the protocol collaborator. The decision
//! core only inspects the declared type and an optional room-scoped plugin
//! override; the rest of the content stays opaque JSON.

use serde::{Deserialize, Serialize};

use crate::room::{Room, RoomId, RoomKind};

/// Content mapping of a room-creation state event.
///
/// The classifier reads the `type` key; everything else is ignored.
pub type CreationContent = serde_json::Map<String, serde_json::Value>;

/// Scope restricting an event's plugin handling to one room or room kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomScope {
    /// Only the room with this identifier.
    Id(RoomId),
    /// Only rooms of this kind.
    Kind(RoomKind),
}

impl RoomScope {
    /// Whether the scope permits plugin handling in the given room.
    pub fn permits(&self, room: &Room) -> bool {
        match self {
            Self::Id(id) => *id == room.id,
            Self::Kind(kind) => *kind == room.kind,
        }
    }
}

/// Snapshot of a timeline event.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    /// Declared event type (e.g. `m.room.message`).
    pub event_type: String,
    /// Room-scoped override permitting event-type plugin handling.
    ///
    /// Absent for ordinary events; event-type dispatch only applies when the
    /// event carries a scope matching the room it arrived in.
    pub room_scope: Option<RoomScope>,
    /// Event content, opaque to the decision core.
    pub content: serde_json::Map<String, serde_json::Value>,
}

impl TimelineEvent {
    /// Create an event with the given declared type and empty content.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self { event_type: event_type.into(), room_scope: None, content: serde_json::Map::new() }
    }

    /// Attach a room-scoped plugin override.
    pub fn scoped(mut self, scope: RoomScope) -> Self {
        self.room_scope = Some(scope);
        self
    }

    /// Attach content.
    pub fn with_content(mut self, content: serde_json::Map<String, serde_json::Value>) -> Self {
        self.content = content;
        self
    }

    /// Whether this event permits plugin handling in the given room.
    ///
    /// `false` when no scope is carried - event-type dispatch then falls
    /// through to the room-kind tier.
    pub fn permits_plugin_in(&self, room: &Room) -> bool {
        self.room_scope.as_ref().is_some_and(|scope| scope.permits(room))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_scope_matches_only_that_room() {
        let scope = RoomScope::Id(RoomId::from("!abc"));
        let here = Room::new(RoomId::from("!abc"), RoomKind::DefaultMessages);
        let elsewhere = Room::new(RoomId::from("!def"), RoomKind::DefaultMessages);

        assert!(scope.permits(&here));
        assert!(!scope.permits(&elsewhere));
    }

    #[test]
    fn kind_scope_matches_by_kind() {
        let scope = RoomScope::Kind(RoomKind::Forum);
        let forum = Room::new(RoomId::from("!f"), RoomKind::Forum);
        let dm = Room::new(RoomId::from("!d"), RoomKind::DirectMessage);

        assert!(scope.permits(&forum));
        assert!(!scope.permits(&dm));
    }

    #[test]
    fn unscoped_event_permits_nothing() {
        let event = TimelineEvent::new("m.room.message");
        let room = Room::new(RoomId::from("!abc"), RoomKind::DefaultMessages);
        assert!(!event.permits_plugin_in(&room));
    }
}

//! Room read models.
//!
//! Rooms are owned by the protocol collaborator; this crate only holds
//! snapshots of the fields the decision logic needs. The semantic
//! [`RoomKind`] is derived from creation state (see [`crate::classify`]) and
//! never stored authoritatively here.

use serde::{Deserialize, Serialize};

use crate::policy::SecuredRoomPolicy;

/// Opaque protocol-assigned room identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wrap a protocol room identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Opaque identity-provider account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an account identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Semantic kind of a chat room.
///
/// Closed taxonomy; a room's kind is immutable once derived because room
/// creation is append-only in the protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    /// Ordinary public messaging room.
    #[default]
    DefaultMessages,
    /// Room admitting members only via a secured attribute policy.
    RestrictedMessages,
    /// One-to-one direct message room.
    DirectMessage,
    /// Private group messaging room.
    GroupMessage,
    /// Contact channel to the hub administrators.
    AdminContact,
    /// Contact channel to the room stewards.
    StewardContact,
    /// Threaded forum room.
    Forum,
}

impl RoomKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::DefaultMessages,
        Self::RestrictedMessages,
        Self::DirectMessage,
        Self::GroupMessage,
        Self::AdminContact,
        Self::StewardContact,
        Self::Forum,
    ];

    /// The string this kind carries in room-creation state content.
    pub fn as_wire_str(self) -> &'static str {
        match self {
            Self::DefaultMessages => "ph.messages.default",
            Self::RestrictedMessages => "ph.messages.restricted",
            Self::DirectMessage => "ph.messages.dm",
            Self::GroupMessage => "ph.messages.group",
            Self::AdminContact => "ph.messages.admin.contact",
            Self::StewardContact => "ph.messages.steward.contact",
            Self::Forum => "ph.forum-room",
        }
    }

    /// Parse a creation-state `type` string. `None` for unknown strings.
    pub fn from_wire_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_wire_str() == s)
    }
}

impl std::fmt::Display for RoomKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// Snapshot of a room as seen by the decision core.
#[derive(Debug, Clone)]
pub struct Room {
    /// Protocol-assigned identifier.
    pub id: RoomId,
    /// Display name, if the protocol has one for this room.
    pub name: Option<String>,
    /// Room topic.
    pub topic: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Derived semantic kind.
    pub kind: RoomKind,
    /// Admission policy. Present only for restricted rooms.
    policy: Option<SecuredRoomPolicy>,
}

impl Room {
    /// Create a room snapshot of the given kind, without a policy.
    pub fn new(id: RoomId, kind: RoomKind) -> Self {
        Self { id, name: None, topic: None, description: None, kind, policy: None }
    }

    /// Create a restricted room with its admission policy.
    pub fn secured(id: RoomId, policy: SecuredRoomPolicy) -> Self {
        Self {
            id,
            name: None,
            topic: None,
            description: None,
            kind: RoomKind::RestrictedMessages,
            policy: Some(policy),
        }
    }

    /// Attach an admission policy.
    ///
    /// Returns `false` (and leaves the room unchanged) unless the room is a
    /// restricted room - only restricted rooms carry a policy.
    pub fn attach_policy(&mut self, policy: SecuredRoomPolicy) -> bool {
        if self.kind != RoomKind::RestrictedMessages {
            return false;
        }
        self.policy = Some(policy);
        true
    }

    /// Replace the derived kind with a fresh classification.
    ///
    /// Leaving the restricted kind drops the attached policy; only restricted
    /// rooms carry one.
    pub fn reclassify(&mut self, kind: RoomKind) {
        self.kind = kind;
        if kind != RoomKind::RestrictedMessages {
            self.policy = None;
        }
    }

    /// Admission policy. `None` unless the room is restricted and a policy
    /// snapshot has been loaded.
    pub fn policy(&self) -> Option<&SecuredRoomPolicy> {
        self.policy.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::policy::AttributeRule;

    #[test]
    fn wire_strings_round_trip() {
        for kind in RoomKind::ALL {
            assert_eq!(RoomKind::from_wire_str(kind.as_wire_str()), Some(kind));
        }
    }

    #[test]
    fn unknown_wire_string_is_none() {
        assert_eq!(RoomKind::from_wire_str("m.space"), None);
        assert_eq!(RoomKind::from_wire_str(""), None);
    }

    #[test]
    fn policy_only_attaches_to_restricted_rooms() {
        let policy = SecuredRoomPolicy::new(vec![AttributeRule::required_value(
            "email",
            ["a@x.org"],
        )])
        .unwrap();

        let mut forum = Room::new(RoomId::from("!forum"), RoomKind::Forum);
        assert!(!forum.attach_policy(policy.clone()));
        assert!(forum.policy().is_none());

        let mut restricted = Room::new(RoomId::from("!r"), RoomKind::RestrictedMessages);
        assert!(restricted.attach_policy(policy));
        assert!(restricted.policy().is_some());
    }

    #[test]
    fn leaving_restricted_kind_drops_the_policy() {
        let policy = SecuredRoomPolicy::new(vec![AttributeRule::required_value(
            "email",
            ["a@x.org"],
        )])
        .unwrap();
        let mut room = Room::secured(RoomId::from("!r"), policy);

        room.reclassify(RoomKind::RestrictedMessages);
        assert!(room.policy().is_some());

        room.reclassify(RoomKind::Forum);
        assert_eq!(room.kind, RoomKind::Forum);
        assert!(room.policy().is_none());
    }
}

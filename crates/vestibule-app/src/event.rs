//! Protocol notifications.
//!
//! This module defines [`HubEvent`], the set of inputs that drive the
//! [`crate::Hub`] state machine. Events are translated from the protocol
//! collaborator's already-parsed data; none of them carry live handles.

use vestibule_core::{CreationContent, Profile, RoomId, SecuredRoomPolicy, TimelineEvent, UserId};

/// Events processed by the Hub state machine.
#[derive(Debug, Clone)]
pub enum HubEvent {
    /// A room's creation state arrived (or re-arrived after a sync race).
    RoomCreated {
        /// Protocol room identifier.
        room_id: RoomId,
        /// Creation-state content; `None` while still being fetched.
        creation: Option<CreationContent>,
    },

    /// Room display metadata changed.
    RoomMeta {
        /// Protocol room identifier.
        room_id: RoomId,
        /// New display name, if any.
        name: Option<String>,
        /// New topic, if any.
        topic: Option<String>,
    },

    /// The admission policy for a restricted room was loaded or replaced.
    SecuredPolicyLoaded {
        /// Protocol room identifier.
        room_id: RoomId,
        /// The validated policy snapshot.
        policy: SecuredRoomPolicy,
    },

    /// A timeline event arrived in a room.
    TimelineMessage {
        /// Protocol room identifier.
        room_id: RoomId,
        /// The event snapshot.
        event: TimelineEvent,
    },

    /// A candidate asked to join a room, disclosing a profile.
    JoinRequested {
        /// Protocol room identifier.
        room_id: RoomId,
        /// The candidate.
        user: UserId,
        /// Disclosed identity attributes.
        profile: Profile,
    },

    /// The client left (or was removed from) a room.
    RoomLeft {
        /// Protocol room identifier.
        room_id: RoomId,
    },
}

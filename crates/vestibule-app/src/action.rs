//! Host instructions.
//!
//! This module defines [`HubAction`], the instructions produced by the
//! [`crate::Hub`] state machine for the embedding host to execute. Actions
//! are fire-and-forget: the hub never awaits their results.

use vestibule_core::{HandlerId, ModerationRequest, RoomId, UserId};

/// Actions produced by the Hub state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubAction {
    /// Re-render the UI.
    Render,

    /// Mount the resolved handler for a room.
    ///
    /// Only the identifier crosses the boundary; the rendering host re-reads
    /// room and event state itself.
    Mount {
        /// Room the surface belongs to.
        room_id: RoomId,
        /// Resolved handler.
        handler: HandlerId,
    },

    /// Admit a candidate into a room.
    Admit {
        /// Room being joined.
        room_id: RoomId,
        /// Admitted candidate.
        user: UserId,
    },

    /// Ask the identity collaborator for a missing profile attribute.
    ///
    /// Produced for an indeterminate admission; not a denial.
    RequestProfileAttribute {
        /// Room being joined.
        room_id: RoomId,
        /// Candidate whose profile is incomplete.
        user: UserId,
        /// The attribute to request.
        attribute: String,
    },

    /// Surface an admission denial to the user.
    NotifyDenied {
        /// Room that denied the join.
        room_id: RoomId,
        /// Denied candidate.
        user: UserId,
        /// The attribute that failed, for user-facing messaging.
        attribute: String,
    },

    /// Forward a moderation request to the identity collaborator.
    Moderation(ModerationRequest),
}

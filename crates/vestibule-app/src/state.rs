//! Observable hub state types.
//!
//! [`RoomView`] is the per-room view model the hub maintains for the host:
//! the classified room snapshot plus presentation state (unread count,
//! admitted members) that the protocol does not own.

use std::collections::HashSet;

use vestibule_core::{Room, UserId};

/// Per-room view state.
#[derive(Debug, Clone)]
pub struct RoomView {
    /// The classified room snapshot.
    pub room: Room,
    /// Messages that arrived while the room was not active.
    pub unread: u64,
    /// Members admitted through this client (used for explicit batch
    /// re-validation of secured rooms).
    pub members: HashSet<UserId>,
}

impl RoomView {
    /// Create a view for a room with no unread messages and no members.
    pub fn new(room: Room) -> Self {
        Self { room, unread: 0, members: HashSet::new() }
    }

    /// Record an unread message.
    pub fn add_unread(&mut self) {
        self.unread = self.unread.saturating_add(1);
    }

    /// Clear the unread counter, e.g. when the room becomes active.
    pub fn reset_unread(&mut self) {
        self.unread = 0;
    }
}

//! Dispatch resolution.
//!
//! Picks exactly one handler for a room (and optionally an event) from the
//! registry snapshot. The specificity order is fixed and lives in this one
//! function so it can be reviewed in a single place:
//!
//! 1. `RoomId` descriptor whose selector equals the room's id
//! 2. `EventType` descriptor whose selector equals the event's declared type,
//!    provided the event carries a room-scoped override matching this room
//! 3. `RoomType` descriptor whose selector equals the room's kind
//! 4. the built-in default handler
//!
//! Ties within a tier cannot occur: duplicate enabled `(kind, selector)`
//! pairs are rejected at registration, so the first match is the only match.

use tracing::debug;

use crate::event::TimelineEvent;
use crate::plugin::{HandlerId, PluginKind};
use crate::registry::PluginRegistry;
use crate::room::Room;

/// Resolve the handler for a room and optional event.
///
/// Pure lookup: no I/O, no mutation, safe to call on every render frame.
/// Never fails - an empty registry resolves to the built-in default.
pub fn resolve(registry: &PluginRegistry, room: &Room, event: Option<&TimelineEvent>) -> HandlerId {
    if let Some(descriptor) =
        registry.of_kind(PluginKind::RoomId).find(|d| d.selector == room.id.as_str())
    {
        debug!(room = %room.id, plugin = %descriptor.name, tier = "room_id", "resolved handler");
        return descriptor.handler.clone();
    }

    if let Some(event) = event {
        if event.permits_plugin_in(room) {
            if let Some(descriptor) =
                registry.of_kind(PluginKind::EventType).find(|d| d.selector == event.event_type)
            {
                debug!(room = %room.id, plugin = %descriptor.name, tier = "event_type", "resolved handler");
                return descriptor.handler.clone();
            }
        }
    }

    if let Some(descriptor) =
        registry.of_kind(PluginKind::RoomType).find(|d| d.selector == room.kind.as_wire_str())
    {
        debug!(room = %room.id, plugin = %descriptor.name, tier = "room_type", "resolved handler");
        return descriptor.handler.clone();
    }

    debug!(room = %room.id, tier = "built_in", "resolved handler");
    HandlerId::built_in()
}

//! Room kind classification.
//!
//! A room's semantic kind is declared in the `type` field of its creation
//! state content. Classification is total: anything missing, unknown, or
//! malformed falls back to [`RoomKind::DefaultMessages`] instead of failing,
//! because the creation event may be temporarily unavailable during sync and
//! a room must always render as something.

use crate::event::CreationContent;
use crate::room::RoomKind;

/// Derive a room's kind from its creation-state content.
///
/// Pure and idempotent: the same content always classifies to the same kind.
/// `None` (creation event not yet retrieved) classifies to the default.
pub fn classify(creation: Option<&CreationContent>) -> RoomKind {
    creation
        .and_then(|content| content.get("type"))
        .and_then(serde_json::Value::as_str)
        .and_then(RoomKind::from_wire_str)
        .unwrap_or_default()
}

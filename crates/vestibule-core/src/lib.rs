//! Decision core for a federated chat client.
//!
//! Pure, synchronous logic over already-retrieved protocol data: room
//! classification, secured-room admission, moderation capabilities, and
//! plugin dispatch. Network and storage live in the collaborators that feed
//! this crate; nothing in here blocks, suspends, or performs I/O.
//!
//! # Components
//!
//! - [`classify`]: derives a room's semantic kind from its creation content
//! - [`SecuredRoomPolicy`]: per-attribute admission rules for restricted rooms
//! - [`Administrator`] / [`Steward`]: capability handles for privileged actors
//! - [`PluginRegistry`]: conflict-checked set of enabled extensions
//! - [`resolve`]: picks exactly one handler via a fixed specificity order

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod access;
mod account;
mod classify;
mod event;
mod plugin;
mod policy;
mod registry;
mod resolve;
mod room;

pub use access::{AccessError, AccessList, Administrator, ModerationRequest, PermissionLevel, Steward};
pub use account::{ExternalId, UserAccount};
pub use classify::classify;
pub use event::{CreationContent, RoomScope, TimelineEvent};
pub use plugin::{HandlerId, PluginDescriptor, PluginKind};
pub use policy::{Admission, AttributeRule, PolicyConfigError, Profile, SecuredRoomPolicy};
pub use registry::{PluginRegistry, RegistryError, RegistryHandle};
pub use resolve::resolve;
pub use room::{Room, RoomId, RoomKind, UserId};

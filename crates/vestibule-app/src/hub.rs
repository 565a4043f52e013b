//! Hub orchestration state machine.
//!
//! This module defines [`Hub`], which manages the client's view of its rooms
//! completely decoupled from I/O and protocol mechanics.
//!
//! This is a pure state machine: it consumes [`crate::HubEvent`] inputs and
//! produces [`crate::HubAction`] instructions for the host to execute.
//!
//! # Responsibilities
//!
//! - Classifies rooms from creation state and tracks per-room view state.
//! - Evaluates secured-room admission and reports the outcome.
//! - Resolves the handler to mount for every room and timeline event.
//! - Forwards moderation requests without awaiting their results.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;
use vestibule_core::{
    classify, resolve, Admission, CreationContent, ModerationRequest, PluginRegistry, Profile,
    RegistryHandle, Room, RoomId, RoomKind, SecuredRoomPolicy, UserId,
};

use crate::{HubAction, HubEvent, RoomView};

/// Hub state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable without a server.
#[derive(Debug)]
pub struct Hub {
    /// Per-room view state.
    rooms: HashMap<RoomId, RoomView>,
    /// Policies that arrived before their room did.
    pending_policies: HashMap<RoomId, SecuredRoomPolicy>,
    /// Shared plugin registry snapshot.
    registry: RegistryHandle,
    /// Currently active room. `None` if no room is selected.
    active_room: Option<RoomId>,
}

impl Hub {
    /// Create a hub dispatching against the given registry.
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            rooms: HashMap::new(),
            pending_policies: HashMap::new(),
            registry: RegistryHandle::new(registry),
            active_room: None,
        }
    }

    /// Process a protocol notification and return host actions.
    pub fn handle(&mut self, event: HubEvent) -> Vec<HubAction> {
        match event {
            HubEvent::RoomCreated { room_id, creation } => {
                self.on_room_created(room_id, creation.as_ref())
            },
            HubEvent::RoomMeta { room_id, name, topic } => {
                if let Some(view) = self.rooms.get_mut(&room_id) {
                    if name.is_some() {
                        view.room.name = name;
                    }
                    if topic.is_some() {
                        view.room.topic = topic;
                    }
                }
                vec![HubAction::Render]
            },
            HubEvent::SecuredPolicyLoaded { room_id, policy } => {
                self.on_policy_loaded(room_id, policy)
            },
            HubEvent::TimelineMessage { room_id, event } => {
                let registry = self.registry.snapshot();
                let Some(view) = self.rooms.get_mut(&room_id) else {
                    warn!(room = %room_id, "timeline event for unknown room");
                    return vec![];
                };
                if self.active_room.as_ref() != Some(&room_id) {
                    view.add_unread();
                }
                let handler = resolve(&registry, &view.room, Some(&event));
                vec![HubAction::Mount { room_id, handler }, HubAction::Render]
            },
            HubEvent::JoinRequested { room_id, user, profile } => {
                self.on_join_requested(room_id, user, &profile)
            },
            HubEvent::RoomLeft { room_id } => {
                self.rooms.remove(&room_id);
                self.pending_policies.remove(&room_id);
                if self.active_room.as_ref() == Some(&room_id) {
                    self.active_room = None;
                }
                vec![HubAction::Render]
            },
        }
    }

    fn on_room_created(
        &mut self,
        room_id: RoomId,
        creation: Option<&CreationContent>,
    ) -> Vec<HubAction> {
        let view = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| RoomView::new(Room::new(room_id.clone(), classify(creation))));

        // Re-derivation from content is idempotent and may refine a default
        // assigned while the creation event was unavailable. A re-arrival
        // without content carries no information and never demotes the kind.
        if creation.is_some() {
            view.room.reclassify(classify(creation));
        }

        if view.room.kind == RoomKind::RestrictedMessages {
            if let Some(policy) = self.pending_policies.remove(&room_id) {
                view.room.attach_policy(policy);
            }
        } else if creation.is_some() && self.pending_policies.remove(&room_id).is_some() {
            // Definitive non-restricted classification; the staged policy can
            // never attach.
            warn!(room = %room_id, "discarding staged policy for non-restricted room");
        }

        let registry = self.registry.snapshot();
        let handler = resolve(&registry, &view.room, None);
        vec![HubAction::Mount { room_id, handler }, HubAction::Render]
    }

    fn on_policy_loaded(&mut self, room_id: RoomId, policy: SecuredRoomPolicy) -> Vec<HubAction> {
        match self.rooms.get_mut(&room_id) {
            Some(view) if view.room.kind == RoomKind::RestrictedMessages => {
                view.room.attach_policy(policy);
            },
            Some(view) => {
                warn!(room = %room_id, kind = %view.room.kind, "policy for non-restricted room ignored");
            },
            None => {
                // Room not synced yet; hold the policy until it arrives.
                self.pending_policies.insert(room_id, policy);
            },
        }
        vec![HubAction::Render]
    }

    fn on_join_requested(
        &mut self,
        room_id: RoomId,
        user: UserId,
        profile: &Profile,
    ) -> Vec<HubAction> {
        let Some(view) = self.rooms.get_mut(&room_id) else {
            warn!(room = %room_id, "join request for unknown room");
            return vec![];
        };

        if view.room.kind != RoomKind::RestrictedMessages {
            view.members.insert(user.clone());
            return vec![HubAction::Admit { room_id, user }, HubAction::Render];
        }

        let Some(policy) = view.room.policy() else {
            // Policy snapshot not loaded yet; the host retries once it is.
            warn!(room = %room_id, "join request before policy load");
            return vec![HubAction::Render];
        };

        match policy.evaluate(profile) {
            Admission::Granted => {
                view.members.insert(user.clone());
                vec![HubAction::Admit { room_id, user }, HubAction::Render]
            },
            Admission::Indeterminate { attribute } => {
                vec![HubAction::RequestProfileAttribute { room_id, user, attribute }, HubAction::Render]
            },
            Admission::Denied { attribute } => {
                vec![HubAction::NotifyDenied { room_id, user, attribute }, HubAction::Render]
            },
        }
    }

    /// Re-evaluate the admitted members of a restricted room against its
    /// current policy.
    ///
    /// Policy edits never trigger this implicitly; the host calls it
    /// explicitly and decides what to do with the results. Members without an
    /// entry in `profiles` evaluate against an empty profile and come back
    /// indeterminate.
    pub fn revalidate_room(
        &self,
        room_id: &RoomId,
        profiles: &HashMap<UserId, Profile>,
    ) -> Vec<(UserId, Admission)> {
        let Some(view) = self.rooms.get(room_id) else {
            return vec![];
        };
        let Some(policy) = view.room.policy() else {
            return vec![];
        };

        let empty = Profile::new();
        let mut members: Vec<_> = view.members.iter().collect();
        members.sort();
        policy.revalidate(
            members.into_iter().map(|user| (user, profiles.get(user).unwrap_or(&empty))),
        )
    }

    /// Wrap a moderation request for the host to forward.
    ///
    /// The request was produced by an [`vestibule_core::Administrator`] or
    /// [`vestibule_core::Steward`] capability handle; the hub only relays it.
    pub fn forward_moderation(&self, request: ModerationRequest) -> HubAction {
        HubAction::Moderation(request)
    }

    /// Install a replacement plugin set.
    ///
    /// The whole snapshot is swapped at once; dispatches in flight keep the
    /// registry they started with.
    pub fn reload_plugins(&self, registry: PluginRegistry) {
        self.registry.replace(registry);
    }

    /// The current registry snapshot.
    pub fn registry(&self) -> Arc<PluginRegistry> {
        self.registry.snapshot()
    }

    /// All tracked rooms.
    pub fn rooms(&self) -> &HashMap<RoomId, RoomView> {
        &self.rooms
    }

    /// View state for one room. `None` if the room is not tracked.
    pub fn room(&self, room_id: &RoomId) -> Option<&RoomView> {
        self.rooms.get(room_id)
    }

    /// Currently selected room. `None` if no room is selected.
    pub fn active_room(&self) -> Option<&RoomId> {
        self.active_room.as_ref()
    }

    /// Set the active room and clear its unread counter.
    ///
    /// Setting an untracked room is ignored.
    pub fn set_active_room(&mut self, room_id: RoomId) {
        if let Some(view) = self.rooms.get_mut(&room_id) {
            view.reset_unread();
            self.active_room = Some(room_id);
        }
    }
}

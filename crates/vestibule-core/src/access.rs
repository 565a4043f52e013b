//! Moderation capability model.
//!
//! Privileged actors hold a role-specific capability handle: [`Steward`]
//! exposes ban and kick, [`Administrator`] additionally permission changes
//! and account listing. Wrong-role invocation is impossible by construction -
//! a `Steward` simply has no administrator methods, so the invariant lives in
//! the type system instead of a runtime check.
//!
//! The handles never perform the moderation themselves. Every operation
//! returns a [`ModerationRequest`] value that the host forwards to the
//! identity collaborator, fire-and-forget; the collaborator surfaces the
//! result through its own channel.
//!
//! Allow-list behavior is shared between the roles through composition: each
//! role owns one [`AccessList`] manager rather than inheriting from a common
//! base, so role-specific code never duplicates allow-list logic.

use thiserror::Error;

use crate::account::UserAccount;
use crate::room::{RoomId, UserId};

/// Permission level granted by [`Administrator::change_permission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PermissionLevel {
    /// Ordinary member.
    User,
    /// Room steward.
    Steward,
    /// Hub administrator.
    Administrator,
}

impl PermissionLevel {
    /// Numeric power level used by the protocol collaborator.
    pub fn as_power_level(self) -> i64 {
        match self {
            Self::User => 0,
            Self::Steward => 50,
            Self::Administrator => 100,
        }
    }
}

/// A moderation action request, handed to the identity collaborator.
///
/// The core only decides *who* may produce these; performing them and
/// reporting their outcome is the collaborator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationRequest {
    /// Ban a user from the hub.
    Ban {
        /// Account to ban.
        user: UserId,
    },

    /// Kick a user from their current room.
    Kick {
        /// Account to kick.
        user: UserId,
    },

    /// Change a user's permission level in a room.
    ChangePermission {
        /// Account whose level changes.
        user: UserId,
        /// Room the level applies in.
        room: RoomId,
        /// New level.
        level: PermissionLevel,
    },

    /// List user accounts, paginated by cursor range.
    ListUsers {
        /// Cursor to start from.
        from: u64,
        /// Maximum number of accounts to return.
        limit: u64,
    },
}

/// Refusal to construct a capability handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The account is suspended, locked, or deactivated.
    #[error("account {user} is restricted and cannot hold a moderation capability")]
    AccountRestricted {
        /// The restricted account.
        user: UserId,
    },
}

/// Shared allow-list manager.
///
/// Holds the identities (e.g. email addresses) granted access through
/// moderation. Insertion order is preserved; add and remove are idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessList {
    entries: Vec<String>,
}

impl AccessList {
    /// Create an empty allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity. Adding an already-present identity is a no-op.
    ///
    /// Returns `true` if the list changed.
    pub fn add(&mut self, identity: impl Into<String>) -> bool {
        let identity = identity.into();
        if self.entries.contains(&identity) {
            return false;
        }
        self.entries.push(identity);
        true
    }

    /// Remove an identity. Removing an absent identity is a no-op.
    ///
    /// Returns `true` if the list changed.
    pub fn remove(&mut self, identity: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry != identity);
        self.entries.len() != before
    }

    /// Whether an identity is on the list.
    pub fn contains(&self, identity: &str) -> bool {
        self.entries.iter().any(|entry| entry == identity)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Administrator capability handle.
///
/// Can do everything a steward can, plus permission changes and account
/// listing.
#[derive(Debug, Clone)]
pub struct Administrator {
    actor: UserId,
    access_list: AccessList,
}

impl Administrator {
    /// Construct a handle for the given account.
    ///
    /// Restricted accounts (suspended, locked, deactivated) are refused.
    pub fn for_account(account: &UserAccount) -> Result<Self, AccessError> {
        if account.is_restricted() {
            return Err(AccessError::AccountRestricted { user: account.id.clone() });
        }
        Ok(Self { actor: account.id.clone(), access_list: AccessList::new() })
    }

    /// The acting account.
    pub fn actor(&self) -> &UserId {
        &self.actor
    }

    /// Request a hub-wide ban.
    pub fn ban(&self, user: UserId) -> ModerationRequest {
        ModerationRequest::Ban { user }
    }

    /// Request a kick.
    pub fn kick(&self, user: UserId) -> ModerationRequest {
        ModerationRequest::Kick { user }
    }

    /// Request a permission change for a user in a room.
    pub fn change_permission(
        &self,
        user: UserId,
        room: RoomId,
        level: PermissionLevel,
    ) -> ModerationRequest {
        ModerationRequest::ChangePermission { user, room, level }
    }

    /// Request a page of user accounts.
    pub fn list_users(&self, from: u64, limit: u64) -> ModerationRequest {
        ModerationRequest::ListUsers { from, limit }
    }

    /// The allow-list this administrator manages.
    pub fn access_list(&self) -> &AccessList {
        &self.access_list
    }

    /// Add an identity to the allow-list. Idempotent.
    pub fn add_to_access_list(&mut self, identity: impl Into<String>) -> bool {
        self.access_list.add(identity)
    }

    /// Remove an identity from the allow-list. Idempotent.
    pub fn remove_from_access_list(&mut self, identity: &str) -> bool {
        self.access_list.remove(identity)
    }
}

/// Steward capability handle.
///
/// Exposes ban and kick only. Administrator-only operations do not exist on
/// this type, so invoking them through a steward handle is a compile error.
#[derive(Debug, Clone)]
pub struct Steward {
    actor: UserId,
    access_list: AccessList,
}

impl Steward {
    /// Construct a handle for the given account.
    ///
    /// Restricted accounts (suspended, locked, deactivated) are refused.
    pub fn for_account(account: &UserAccount) -> Result<Self, AccessError> {
        if account.is_restricted() {
            return Err(AccessError::AccountRestricted { user: account.id.clone() });
        }
        Ok(Self { actor: account.id.clone(), access_list: AccessList::new() })
    }

    /// The acting account.
    pub fn actor(&self) -> &UserId {
        &self.actor
    }

    /// Request a hub-wide ban.
    pub fn ban(&self, user: UserId) -> ModerationRequest {
        ModerationRequest::Ban { user }
    }

    /// Request a kick.
    pub fn kick(&self, user: UserId) -> ModerationRequest {
        ModerationRequest::Kick { user }
    }

    /// The allow-list this steward manages.
    pub fn access_list(&self) -> &AccessList {
        &self.access_list
    }

    /// Add an identity to the allow-list. Idempotent.
    pub fn add_to_access_list(&mut self, identity: impl Into<String>) -> bool {
        self.access_list.add(identity)
    }

    /// Remove an identity from the allow-list. Idempotent.
    pub fn remove_from_access_list(&mut self, identity: &str) -> bool {
        self.access_list.remove(identity)
    }
}

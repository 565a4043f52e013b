//! Identity-provider account read model.
//!
//! Accounts are owned by the identity collaborator; this crate only reads the
//! flags that gate moderation capabilities. Mutations (ban, kick, permission
//! changes) are delegated back to the collaborator as
//! [`crate::ModerationRequest`] values.

use serde::{Deserialize, Serialize};

use crate::room::UserId;

/// An external identity bound to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalId {
    /// Authentication provider that vouches for the binding.
    pub auth_provider: String,
    /// Identity within that provider.
    pub external_id: String,
}

/// Read-only snapshot of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Account identifier.
    pub id: UserId,
    /// Display name, if set.
    pub display_name: Option<String>,
    /// Account is suspended by a moderator.
    #[serde(default)]
    pub suspended: bool,
    /// Account is locked by the identity provider.
    #[serde(default)]
    pub locked: bool,
    /// Account has been deactivated.
    #[serde(default)]
    pub deactivated: bool,
    /// External identity bindings.
    #[serde(default)]
    pub external_ids: Vec<ExternalId>,
    /// Creation timestamp, Unix milliseconds.
    #[serde(default)]
    pub creation_ts: u64,
}

impl UserAccount {
    /// An active account with no restrictions, for building snapshots.
    pub fn active(id: UserId) -> Self {
        Self {
            id,
            display_name: None,
            suspended: false,
            locked: false,
            deactivated: false,
            external_ids: Vec::new(),
            creation_ts: 0,
        }
    }

    /// Whether this account may hold a moderation capability.
    pub fn is_restricted(&self) -> bool {
        self.suspended || self.locked || self.deactivated
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn active_account_is_unrestricted() {
        assert!(!UserAccount::active(UserId::from("@a:hub")).is_restricted());
    }

    #[test]
    fn any_flag_restricts() {
        let mut account = UserAccount::active(UserId::from("@a:hub"));
        account.suspended = true;
        assert!(account.is_restricted());

        let mut account = UserAccount::active(UserId::from("@a:hub"));
        account.locked = true;
        assert!(account.is_restricted());

        let mut account = UserAccount::active(UserId::from("@a:hub"));
        account.deactivated = true;
        assert!(account.is_restricted());
    }

    #[test]
    fn deserializes_with_defaulted_flags() {
        let account: UserAccount =
            serde_json::from_str(r#"{ "id": "@a:hub", "display_name": "Alice" }"#)
                .unwrap();
        assert_eq!(account.id, UserId::from("@a:hub"));
        assert!(!account.is_restricted());
        assert!(account.external_ids.is_empty());
    }
}

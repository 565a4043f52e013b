//! Secured-room admission policies.
//!
//! A restricted room declares an ordered set of attribute rules. A candidate
//! is admitted only if their disclosed identity profile satisfies every rule.
//! Evaluation is deterministic: rules are checked left-to-right in declaration
//! order, never in map iteration order, so the first failing attribute is
//! stable across runs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::room::UserId;

/// Candidate identity profile: attribute name to disclosed value.
pub type Profile = HashMap<String, String>;

/// A single admission rule for one identity attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRule {
    /// Attribute name, unique within a policy.
    pub name: String,

    /// Whether the disclosed value must match one of `accepted_values`.
    ///
    /// When `false` the attribute only has to be disclosed with a non-empty
    /// value; `accepted_values` is ignored and may be empty ("attribute
    /// required, all values allowed").
    pub requires_profile_match: bool,

    /// Accepted values, in declaration order. Must be non-empty when
    /// `requires_profile_match` is set, or the rule can never be satisfied.
    #[serde(default)]
    pub accepted_values: Vec<String>,
}

impl AttributeRule {
    /// Rule requiring the attribute to match one of the given values.
    pub fn required_value<I, S>(name: impl Into<String>, accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            requires_profile_match: true,
            accepted_values: accepted.into_iter().map(Into::into).collect(),
        }
    }

    /// Rule requiring the attribute to be disclosed, any non-empty value.
    pub fn required_presence(name: impl Into<String>) -> Self {
        Self { name: name.into(), requires_profile_match: false, accepted_values: Vec::new() }
    }
}

/// Misconfigured admission policy, detected at construction.
///
/// These are configuration errors, not crashes: the host keeps the previous
/// policy (or none) and surfaces the problem to the operator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyConfigError {
    /// An attribute rule has an empty name.
    #[error("attribute rule with empty name")]
    EmptyAttributeName,

    /// Two rules declare the same attribute name.
    #[error("duplicate attribute rule: {name}")]
    DuplicateAttribute {
        /// The repeated attribute name.
        name: String,
    },

    /// A profile-matching rule has no accepted values, so no candidate can
    /// ever satisfy it.
    #[error("attribute {name} requires a profile match but accepts no values")]
    UnsatisfiableAttribute {
        /// The unsatisfiable attribute name.
        name: String,
    },
}

/// Outcome of evaluating a candidate against a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Every attribute rule is satisfied.
    Granted,

    /// The candidate's profile lacks an attribute the policy needs.
    ///
    /// Not a denial: the caller should re-request the missing profile data
    /// and evaluate again.
    Indeterminate {
        /// First attribute (in declaration order) missing from the profile.
        attribute: String,
    },

    /// An attribute was disclosed but does not satisfy its rule.
    Denied {
        /// First attribute (in declaration order) that failed.
        attribute: String,
    },
}

/// Validated admission policy for one restricted room.
///
/// Rule order is declaration order and is preserved; evaluation reports the
/// first failing attribute deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AttributeRule>", into = "Vec<AttributeRule>")]
pub struct SecuredRoomPolicy {
    rules: Vec<AttributeRule>,
}

impl SecuredRoomPolicy {
    /// Validate and construct a policy from rules in declaration order.
    pub fn new(rules: Vec<AttributeRule>) -> Result<Self, PolicyConfigError> {
        for (i, rule) in rules.iter().enumerate() {
            if rule.name.is_empty() {
                return Err(PolicyConfigError::EmptyAttributeName);
            }
            if rules[..i].iter().any(|earlier| earlier.name == rule.name) {
                return Err(PolicyConfigError::DuplicateAttribute { name: rule.name.clone() });
            }
            if rule.requires_profile_match && rule.accepted_values.is_empty() {
                return Err(PolicyConfigError::UnsatisfiableAttribute { name: rule.name.clone() });
            }
        }
        Ok(Self { rules })
    }

    /// The rules, in declaration order.
    pub fn rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    /// Evaluate a candidate profile against this policy.
    ///
    /// Checks rules left-to-right; the first missing attribute short-circuits
    /// to [`Admission::Indeterminate`], the first mismatch to
    /// [`Admission::Denied`]. Matching is exact and case-sensitive.
    pub fn evaluate(&self, profile: &Profile) -> Admission {
        for rule in &self.rules {
            let Some(value) = profile.get(&rule.name) else {
                return Admission::Indeterminate { attribute: rule.name.clone() };
            };
            let satisfied = if rule.requires_profile_match {
                rule.accepted_values.iter().any(|accepted| accepted == value)
            } else {
                !value.is_empty()
            };
            if !satisfied {
                return Admission::Denied { attribute: rule.name.clone() };
            }
        }
        Admission::Granted
    }

    /// Re-evaluate already-admitted members against the current policy.
    ///
    /// Policy edits never re-validate implicitly; the host triggers this
    /// batch explicitly and decides what to do with the results.
    pub fn revalidate<'a, I>(&self, members: I) -> Vec<(UserId, Admission)>
    where
        I: IntoIterator<Item = (&'a UserId, &'a Profile)>,
    {
        members
            .into_iter()
            .map(|(user, profile)| (user.clone(), self.evaluate(profile)))
            .collect()
    }
}

impl TryFrom<Vec<AttributeRule>> for SecuredRoomPolicy {
    type Error = PolicyConfigError;

    fn try_from(rules: Vec<AttributeRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<SecuredRoomPolicy> for Vec<AttributeRule> {
    fn from(policy: SecuredRoomPolicy) -> Self {
        policy.rules
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(pairs: &[(&str, &str)]) -> Profile {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    fn email_policy() -> SecuredRoomPolicy {
        SecuredRoomPolicy::new(vec![AttributeRule::required_value("email", ["a@x.org"])])
            .unwrap()
    }

    #[test]
    fn matching_value_grants() {
        let admission = email_policy().evaluate(&profile(&[("email", "a@x.org")]));
        assert_eq!(admission, Admission::Granted);
    }

    #[test]
    fn missing_attribute_is_indeterminate() {
        let admission = email_policy().evaluate(&Profile::new());
        assert_eq!(admission, Admission::Indeterminate { attribute: "email".to_owned() });
    }

    #[test]
    fn mismatched_value_denies() {
        let admission = email_policy().evaluate(&profile(&[("email", "b@x.org")]));
        assert_eq!(admission, Admission::Denied { attribute: "email".to_owned() });
    }

    #[test]
    fn matching_is_case_sensitive() {
        let admission = email_policy().evaluate(&profile(&[("email", "A@X.ORG")]));
        assert_eq!(admission, Admission::Denied { attribute: "email".to_owned() });
    }

    #[test]
    fn presence_rule_accepts_any_non_empty_value() {
        let policy =
            SecuredRoomPolicy::new(vec![AttributeRule::required_presence("city")]).unwrap();

        assert_eq!(policy.evaluate(&profile(&[("city", "Nijmegen")])), Admission::Granted);
        assert_eq!(
            policy.evaluate(&profile(&[("city", "")])),
            Admission::Denied { attribute: "city".to_owned() }
        );
    }

    #[test]
    fn first_failure_in_declaration_order_wins() {
        let policy = SecuredRoomPolicy::new(vec![
            AttributeRule::required_value("email", ["a@x.org"]),
            AttributeRule::required_value("city", ["Utrecht"]),
        ])
        .unwrap();

        // Both attributes mismatch; the earlier declaration is reported.
        let admission = policy.evaluate(&profile(&[("email", "no"), ("city", "no")]));
        assert_eq!(admission, Admission::Denied { attribute: "email".to_owned() });

        // A missing earlier attribute is reported before a later mismatch.
        let admission = policy.evaluate(&profile(&[("city", "no")]));
        assert_eq!(admission, Admission::Indeterminate { attribute: "email".to_owned() });
    }

    #[test]
    fn empty_name_rejected() {
        let result = SecuredRoomPolicy::new(vec![AttributeRule::required_presence("")]);
        assert_eq!(result, Err(PolicyConfigError::EmptyAttributeName));
    }

    #[test]
    fn duplicate_names_rejected() {
        let result = SecuredRoomPolicy::new(vec![
            AttributeRule::required_presence("email"),
            AttributeRule::required_value("email", ["a@x.org"]),
        ]);
        assert_eq!(result, Err(PolicyConfigError::DuplicateAttribute { name: "email".to_owned() }));
    }

    #[test]
    fn unsatisfiable_match_rule_rejected() {
        let result = SecuredRoomPolicy::new(vec![AttributeRule {
            name: "email".to_owned(),
            requires_profile_match: true,
            accepted_values: Vec::new(),
        }]);
        assert_eq!(
            result,
            Err(PolicyConfigError::UnsatisfiableAttribute { name: "email".to_owned() })
        );
    }

    #[test]
    fn empty_accepted_values_legal_for_presence_rule() {
        assert!(SecuredRoomPolicy::new(vec![AttributeRule::required_presence("email")]).is_ok());
    }

    #[test]
    fn revalidate_reports_each_member() {
        let policy = email_policy();
        let alice = UserId::from("@alice:hub");
        let bob = UserId::from("@bob:hub");
        let alice_profile = profile(&[("email", "a@x.org")]);
        let bob_profile = profile(&[("email", "b@x.org")]);

        let results =
            policy.revalidate([(&alice, &alice_profile), (&bob, &bob_profile)]);

        assert_eq!(results, vec![
            (alice, Admission::Granted),
            (bob, Admission::Denied { attribute: "email".to_owned() }),
        ]);
    }

    #[test]
    fn policy_deserialization_validates() {
        let ok: Result<SecuredRoomPolicy, _> = serde_json::from_str(
            r#"[{ "name": "email", "requires_profile_match": true, "accepted_values": ["a@x.org"] }]"#,
        );
        assert!(ok.is_ok());

        let bad: Result<SecuredRoomPolicy, _> = serde_json::from_str(
            r#"[{ "name": "", "requires_profile_match": false }]"#,
        );
        assert!(bad.is_err());
    }
}

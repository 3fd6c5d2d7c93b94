//! # Authorization Policy
//!
//! One capability-check function instead of inline role comparisons in every
//! handler. The role-to-capability mapping is the whole policy; keeping it
//! here makes it testable in one place.

use crate::error::{DomainError, Result};
use crate::models::{Actor, Role};

/// Elevated operations an actor may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create categories and run counter reconciliation. Admin only.
    ManageCategories,
    /// Toggle topic lock/pin flags. Admin or moderator.
    ModerateTopics,
}

impl Role {
    /// Whether this role grants the capability.
    pub fn allows(self, capability: Capability) -> bool {
        match capability {
            Capability::ManageCategories => matches!(self, Role::Admin),
            Capability::ModerateTopics => matches!(self, Role::Admin | Role::Moderator),
        }
    }
}

/// Fails with `Unauthorized` unless the actor's role grants `capability`.
pub fn require(actor: &Actor, capability: Capability) -> Result<()> {
    if actor.role.allows(capability) {
        Ok(())
    } else {
        Err(DomainError::Unauthorized("Unauthorized".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn actor(role: Role) -> Actor {
        Actor::new(Uuid::new_v4(), role)
    }

    #[test]
    fn capability_matrix() {
        let cases = [
            (Role::User, Capability::ManageCategories, false),
            (Role::User, Capability::ModerateTopics, false),
            (Role::Moderator, Capability::ManageCategories, false),
            (Role::Moderator, Capability::ModerateTopics, true),
            (Role::Admin, Capability::ManageCategories, true),
            (Role::Admin, Capability::ModerateTopics, true),
        ];
        for (role, capability, expected) in cases {
            assert_eq!(
                role.allows(capability),
                expected,
                "{role} / {capability:?}"
            );
        }
    }

    #[test]
    fn require_maps_denial_to_unauthorized() {
        let err = require(&actor(Role::User), Capability::ModerateTopics).unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
        assert!(require(&actor(Role::Moderator), Capability::ModerateTopics).is_ok());
    }
}

use std::fmt;

use super::domain::ActorId;
use super::error::PipelineError;
use super::identity::{Actor, Role};

/// Outcome of a role or ownership check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzDecision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    WrongRole { required: Role, actual: Role },
    NotOwner { entity: &'static str },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::WrongRole { required, actual } => {
                write!(f, "requires {required} role, caller is {actual}")
            }
            DenyReason::NotOwner { entity } => write!(f, "caller does not own this {entity}"),
        }
    }
}

impl AuthzDecision {
    pub fn require_role(actor: &Actor, required: Role) -> Self {
        if actor.role() == required {
            AuthzDecision::Allow
        } else {
            AuthzDecision::Deny(DenyReason::WrongRole {
                required,
                actual: actor.role(),
            })
        }
    }

    /// Ownership check parameterized by the entity's owner field.
    pub fn owner<T, F>(actor: &Actor, entity_name: &'static str, entity: &T, owner_of: F) -> Self
    where
        F: FnOnce(&T) -> &ActorId,
    {
        if owner_of(entity) == actor.id() {
            AuthzDecision::Allow
        } else {
            AuthzDecision::Deny(DenyReason::NotOwner {
                entity: entity_name,
            })
        }
    }

    /// Evaluates `next` only when this decision allows.
    pub fn and_then<F>(self, next: F) -> Self
    where
        F: FnOnce() -> AuthzDecision,
    {
        match self {
            AuthzDecision::Allow => next(),
            deny => deny,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthzDecision::Allow)
    }

    pub fn into_result(self) -> Result<(), PipelineError> {
        match self {
            AuthzDecision::Allow => Ok(()),
            AuthzDecision::Deny(reason) => Err(PipelineError::Forbidden(reason.to_string())),
        }
    }
}

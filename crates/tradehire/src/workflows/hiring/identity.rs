//! Identity context boundary.
//!
//! Callers arrive already authenticated; the engine only consumes an `(actor_id, role)` pair.
//! The role string is parsed exactly once here so every downstream check works against the
//! closed [`Role`] enum.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::ActorId;
use super::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Employer,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "candidate" => Some(Role::Candidate),
            "employer" => Some(Role::Employer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Actor {
    id: ActorId,
    role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Result<Self, PipelineError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PipelineError::Unauthenticated);
        }
        Ok(Self {
            id: ActorId(id),
            role,
        })
    }

    /// Resolve an actor from raw identity parts, rejecting anything incomplete.
    pub fn resolve(id: Option<&str>, role: Option<&str>) -> Result<Self, PipelineError> {
        let id = id.ok_or(PipelineError::Unauthenticated)?;
        let role = role
            .and_then(Role::parse)
            .ok_or(PipelineError::Unauthenticated)?;
        Self::new(id, role)
    }

    pub fn candidate(id: impl Into<String>) -> Result<Self, PipelineError> {
        Self::new(id, Role::Candidate)
    }

    pub fn employer(id: impl Into<String>) -> Result<Self, PipelineError> {
        Self::new(id, Role::Employer)
    }

    pub fn admin(id: impl Into<String>) -> Result<Self, PipelineError> {
        Self::new(id, Role::Admin)
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

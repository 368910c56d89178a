//! The in-memory authentication session.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::UserIdentity;

/// Whether a user is currently signed in, and who.
///
/// Only the identity is stored; `authenticated()` is derived from it, so an
/// authenticated session without an identity (or the reverse) cannot exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    identity: Option<UserIdentity>,
}

impl Session {
    /// The session every process starts with.
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn signed_in(identity: UserIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Rebuild a session from an externally supplied flag + identity pair.
    pub fn from_parts(authenticated: bool, identity: Option<UserIdentity>) -> DomainResult<Self> {
        match (authenticated, identity) {
            (true, Some(identity)) => Ok(Self::signed_in(identity)),
            (false, None) => Ok(Self::anonymous()),
            (true, None) => Err(DomainError::invariant(
                "authenticated session requires an identity",
            )),
            (false, Some(_)) => Err(DomainError::invariant(
                "unauthenticated session must not carry an identity",
            )),
        }
    }

    pub fn authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }
}

//! Notifications from the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use justifai_core::UserIdentity;

use crate::Event;

/// The identity provider's view of who is signed in changed.
///
/// `identity: None` means nobody is signed in: an explicit sign-out, or a
/// session the provider dropped on its own (expired token, revoked account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStateChanged {
    pub identity: Option<UserIdentity>,
    pub occurred_at: DateTime<Utc>,
}

impl AuthStateChanged {
    pub fn signed_in(identity: UserIdentity) -> Self {
        Self {
            identity: Some(identity),
            occurred_at: Utc::now(),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            identity: None,
            occurred_at: Utc::now(),
        }
    }
}

impl Event for AuthStateChanged {
    fn event_type(&self) -> &'static str {
        "auth.state.changed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

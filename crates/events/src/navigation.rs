//! Navigation requests emitted by state holders and consumed by a router.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use justifai_core::Route;

use crate::Event;

/// Why a navigation was requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationReason {
    /// The identity provider reported a signed-in user.
    SignedIn,
}

/// A request to move the UI to `target`.
///
/// Emitting an intent instead of navigating directly keeps the session state
/// machine free of any router dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIntent {
    pub target: Route,
    pub reason: NavigationReason,
    pub occurred_at: DateTime<Utc>,
}

impl NavigationIntent {
    pub fn new(target: Route, reason: NavigationReason) -> Self {
        Self {
            target,
            reason,
            occurred_at: Utc::now(),
        }
    }
}

impl Event for NavigationIntent {
    fn event_type(&self) -> &'static str {
        "navigation.requested"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

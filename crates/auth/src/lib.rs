//! `justifai-auth`: authentication boundary of the front-end.
//!
//! The identity provider is an external collaborator; this crate owns the
//! session state derived from it, the classification of its errors, and the
//! pure route guard that reads that state. No HTTP, no storage.

pub mod classify;
pub mod client;
pub mod flag;
pub mod guard;
pub mod in_memory;
pub mod provider;
pub mod store;

pub use classify::{AuthErrorKind, AuthFailure, AuthOperation};
pub use client::AuthClient;
pub use flag::{AuthFlagCache, AuthFlagError, InMemoryAuthFlag};
pub use guard::{GuardDecision, guard, guard_session};
pub use in_memory::InMemoryIdentityProvider;
pub use provider::{IdentityProvider, ProviderError};
pub use store::{SessionStore, SessionStoreError};

//! `justifai-core`: domain building blocks for the JustifAI front-end.
//!
//! This crate contains **pure domain** primitives (no IO, no provider or
//! transport concerns): who is signed in, and which screens exist.

pub mod error;
pub mod id;
pub mod route;
pub mod session;

pub use error::{DomainError, DomainResult};
pub use id::{ProviderUid, UserIdentity};
pub use route::{Route, RouteClass};
pub use session::Session;

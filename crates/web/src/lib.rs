//! `justifai-web`
//!
//! **Responsibility:** the JustifAI front-end shell.
//!
//! This crate provides:
//! - Configuration and the backend API client (`/upload`, `/predict`)
//! - An identity provider backed by the hosted identity toolkit REST API,
//!   with its refresh token saved so a restart keeps the user signed in
//! - Screen state machines, a guarded router and the headless [`AppShell`]
//! - A Leptos browser frontend (`wasm32` only)
//!
//! Session state lives in `justifai-auth`; this crate only reads it.

pub mod api;
pub mod config;
pub mod forms;
pub mod identity_toolkit;
pub mod router;
pub mod screens;
pub mod shell;
pub mod token_store;
pub mod types;

#[cfg(not(target_arch = "wasm32"))]
pub mod flag_file;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use api::{ApiError, BackendClient, PredictionService, SummaryService};
pub use config::{ConfigError, WebConfig};
pub use forms::{FormError, PdfDocument, PredictionForm, SelectedFile};
pub use identity_toolkit::IdentityToolkitProvider;
pub use router::{Resolution, Router};
pub use shell::AppShell;
pub use token_store::{InMemoryTokenStore, RefreshTokenStore, TokenStoreError};
pub use types::{
    DivorceReason, DivorceStatus, PredictionRequest, PredictionResult, SimilarCase,
};

#[cfg(not(target_arch = "wasm32"))]
pub use flag_file::{FileAuthFlag, FileTokenStore};

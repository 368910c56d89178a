//! Screen state machines and view models.
//!
//! Every screen that talks to a service is two-phase: `begin_*` validates
//! locally and hands back the request to send (or refuses), `finish_*` applies
//! the outcome. `submit` runs both around a single service call. Keeping the
//! phases apart lets the browser frontend await on its own executor while the
//! rules stay testable without one.

pub mod auth;
pub mod nav;
pub mod predict;
pub mod summarize;

pub use auth::{Credentials, LoginScreen, Registration, RegisterScreen};
pub use nav::{ChatbotView, DashboardCard, NavLink, NavbarView, dashboard_cards, navbar};
pub use predict::{PREDICTION_FAILED, PredictionScreen, PredictionView, SimilarCaseLine};
pub use summarize::{SUMMARY_FAILED, Summary, SummarizationScreen};

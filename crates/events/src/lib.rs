//! Events flowing between the identity provider, the session store and the
//! router, plus the pub/sub mechanics that carry them.

pub mod auth;
pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod navigation;

pub use auth::AuthStateChanged;
pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use navigation::{NavigationIntent, NavigationReason};

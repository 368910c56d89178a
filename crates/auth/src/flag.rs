//! Advisory "is authenticated" flag kept in per-browser storage.
//!
//! The flag is a cache hint for the next page load. The session store writes
//! it but never reads it; the provider's live notification is authoritative.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthFlagError {
    #[error("auth flag storage unavailable: {0}")]
    Unavailable(String),

    #[error("auth flag io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage for the advisory auth flag. Writing `false` removes the entry.
pub trait AuthFlagCache: Send + Sync {
    fn write(&self, authenticated: bool) -> Result<(), AuthFlagError>;

    fn read(&self) -> Result<bool, AuthFlagError>;
}

/// Process-local flag, for tests and headless use.
#[derive(Debug, Default)]
pub struct InMemoryAuthFlag {
    value: AtomicBool,
}

impl InMemoryAuthFlag {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthFlagCache for InMemoryAuthFlag {
    fn write(&self, authenticated: bool) -> Result<(), AuthFlagError> {
        self.value.store(authenticated, Ordering::SeqCst);
        Ok(())
    }

    fn read(&self) -> Result<bool, AuthFlagError> {
        Ok(self.value.load(Ordering::SeqCst))
    }
}

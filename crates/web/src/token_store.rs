//! Where the identity provider keeps its refresh token between runs.
//!
//! Only the refresh token is stored. ID tokens are short-lived and are minted
//! again from it when the session is restored.

use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token storage unavailable: {0}")]
    Unavailable(String),

    #[error("token storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage for a single refresh token. Saving `None` forgets it.
pub trait RefreshTokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    fn save(&self, token: Option<&str>) -> Result<(), TokenStoreError>;
}

/// Keeps the token for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RefreshTokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        self.token
            .lock()
            .map(|token| token.clone())
            .map_err(|_| TokenStoreError::Unavailable("token lock poisoned".to_string()))
    }

    fn save(&self, token: Option<&str>) -> Result<(), TokenStoreError> {
        let mut current = self
            .token
            .lock()
            .map_err(|_| TokenStoreError::Unavailable("token lock poisoned".to_string()))?;
        *current = token.map(str::to_string);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_forget() {
        let store = InMemoryTokenStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save(Some("r1")).unwrap();
        store.save(Some("r2")).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("r2"));

        store.save(None).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}

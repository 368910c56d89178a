//! Advisory auth flag and refresh token in the browser's `localStorage`.

use justifai_auth::{AuthFlagCache, AuthFlagError};

use crate::token_store::{RefreshTokenStore, TokenStoreError};

pub const AUTH_FLAG_KEY: &str = "isAuthenticated";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Looks up `localStorage` on every call; holds no JS handles.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageAuthFlag;

impl LocalStorageAuthFlag {
    fn storage() -> Result<web_sys::Storage, AuthFlagError> {
        web_sys::window()
            .ok_or_else(|| AuthFlagError::Unavailable("no window object".to_string()))?
            .local_storage()
            .map_err(|e| AuthFlagError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| AuthFlagError::Unavailable("localStorage disabled".to_string()))
    }
}

impl AuthFlagCache for LocalStorageAuthFlag {
    fn write(&self, authenticated: bool) -> Result<(), AuthFlagError> {
        let storage = Self::storage()?;
        let outcome = if authenticated {
            storage.set_item(AUTH_FLAG_KEY, "true")
        } else {
            storage.remove_item(AUTH_FLAG_KEY)
        };
        outcome.map_err(|e| AuthFlagError::Unavailable(format!("{e:?}")))
    }

    fn read(&self) -> Result<bool, AuthFlagError> {
        let value = Self::storage()?
            .get_item(AUTH_FLAG_KEY)
            .map_err(|e| AuthFlagError::Unavailable(format!("{e:?}")))?;
        Ok(value.as_deref() == Some("true"))
    }
}

/// Refresh token under [`REFRESH_TOKEN_KEY`], so a reload keeps the session.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageTokenStore;

impl RefreshTokenStore for LocalStorageTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        LocalStorageAuthFlag::storage()
            .map_err(|e| TokenStoreError::Unavailable(e.to_string()))?
            .get_item(REFRESH_TOKEN_KEY)
            .map_err(|e| TokenStoreError::Unavailable(format!("{e:?}")))
    }

    fn save(&self, token: Option<&str>) -> Result<(), TokenStoreError> {
        let storage =
            LocalStorageAuthFlag::storage().map_err(|e| TokenStoreError::Unavailable(e.to_string()))?;
        let outcome = match token {
            Some(token) => storage.set_item(REFRESH_TOKEN_KEY, token),
            None => storage.remove_item(REFRESH_TOKEN_KEY),
        };
        outcome.map_err(|e| TokenStoreError::Unavailable(format!("{e:?}")))
    }
}

//! The identity provider seam.
//!
//! The provider is the service of record for credentials and session
//! lifecycle. This crate never reimplements it; it only calls it and listens
//! to its notifications.

use async_trait::async_trait;
use thiserror::Error;

use justifai_core::UserIdentity;
use justifai_events::{AuthStateChanged, Subscription};

/// Raw failure reported by an identity provider.
///
/// `code` uses the hosted SDK vocabulary (`auth/wrong-password`, ...). It is
/// classified exactly once, by [`crate::AuthClient`]; nothing else should
/// inspect it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code})")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The code without the `auth/` namespace.
    pub fn bare_code(&self) -> &str {
        self.code.strip_prefix("auth/").unwrap_or(&self.code)
    }
}

/// Credential-based identity provider client.
///
/// Successful calls resolve *before* the matching [`AuthStateChanged`]
/// notification is consumed; callers must not assume the session already
/// reflects the outcome.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait IdentityProvider {
    async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, ProviderError>;

    async fn sign_up_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Listen for session changes. Dropping the subscription unsubscribes.
    fn subscribe(&self) -> Subscription<AuthStateChanged>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_code_strips_namespace() {
        assert_eq!(
            ProviderError::new("auth/wrong-password", "x").bare_code(),
            "wrong-password"
        );
        assert_eq!(
            ProviderError::new("wrong-password", "x").bare_code(),
            "wrong-password"
        );
    }
}

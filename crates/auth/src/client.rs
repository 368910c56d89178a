use std::sync::Arc;

use crate::classify::{AuthFailure, AuthOperation};
use crate::provider::IdentityProvider;

/// Credential operations against the identity provider.
///
/// None of these touch the session: a successful call only means the provider
/// accepted the request. The session changes when the provider's notification
/// is processed by [`crate::SessionStore`].
pub struct AuthClient<P> {
    provider: Arc<P>,
}

impl<P> Clone for AuthClient<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P> core::fmt::Debug for AuthClient<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthClient").finish_non_exhaustive()
    }
}

impl<P: IdentityProvider> AuthClient<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthFailure> {
        tracing::info!(email, "attempting sign-in");

        match self.provider.sign_in_with_credentials(email, password).await {
            Ok(identity) => {
                tracing::info!(email = identity.email(), uid = %identity.uid(), "sign-in accepted");
                Ok(())
            }
            Err(err) => {
                tracing::info!(email, code = %err.code, "sign-in rejected");
                Err(AuthFailure::classify(AuthOperation::SignIn, &err))
            }
        }
    }

    /// Register a new account.
    ///
    /// `username` is captured by the registration form but the provider has
    /// no field for it and there is no profile backend, so it goes nowhere.
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthFailure> {
        tracing::info!(email, "attempting registration");
        tracing::debug!(username, "username is not persisted");

        match self.provider.sign_up_with_credentials(email, password).await {
            Ok(identity) => {
                tracing::info!(email = identity.email(), uid = %identity.uid(), "registration accepted");
                Ok(())
            }
            Err(err) => {
                tracing::info!(email, code = %err.code, "registration rejected");
                Err(AuthFailure::classify(AuthOperation::SignUp, &err))
            }
        }
    }

    pub async fn sign_out(&self) -> Result<(), AuthFailure> {
        tracing::info!("attempting sign-out");

        self.provider.sign_out().await.map_err(|err| {
            tracing::info!(code = %err.code, "sign-out rejected");
            AuthFailure::classify(AuthOperation::SignOut, &err)
        })
    }
}

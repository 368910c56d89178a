//! In-memory identity provider for tests/dev.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use justifai_core::{ProviderUid, UserIdentity};
use justifai_events::{AuthStateChanged, EventBus, InMemoryEventBus, Subscription};

use crate::provider::{IdentityProvider, ProviderError};

/// Consecutive failed sign-ins for one email before the account is throttled.
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Shortest password the provider accepts at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug)]
struct Account {
    uid: ProviderUid,
    password: String,
    disabled: bool,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    current: Option<UserIdentity>,
    failed_attempts: HashMap<String, u32>,
}

/// Identity provider backed by a process-local account table.
///
/// - No IO
/// - Replays the current user to every new subscriber
/// - Notifies on every successful sign-in, sign-up and sign-out
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    state: Mutex<State>,
    bus: InMemoryEventBus<AuthStateChanged>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account (builder style).
    pub fn with_account(self, email: &str, password: &str) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.accounts.insert(
                email.to_string(),
                Account {
                    uid: new_uid(),
                    password: password.to_string(),
                    disabled: false,
                },
            );
        }
        self
    }

    pub fn disable_account(&self, email: &str) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(account) = state.accounts.get_mut(email) {
                account.disabled = true;
            }
        }
    }

    pub fn current_user(&self) -> Option<UserIdentity> {
        self.state.lock().ok().and_then(|state| state.current.clone())
    }

    /// Simulate the provider dropping the session on its own.
    pub fn expire_session(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.current = None;
        }
        self.notify(AuthStateChanged::signed_out());
    }

    /// Deliver an arbitrary notification, as the hosted provider would.
    pub fn announce(&self, identity: Option<UserIdentity>) {
        if let Ok(mut state) = self.state.lock() {
            state.current = identity.clone();
        }
        self.notify(match identity {
            Some(identity) => AuthStateChanged::signed_in(identity),
            None => AuthStateChanged::signed_out(),
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, ProviderError> {
        self.state
            .lock()
            .map_err(|_| ProviderError::new("auth/internal-error", "identity state unavailable"))
    }

    fn notify(&self, change: AuthStateChanged) {
        if let Err(e) = self.bus.publish(change) {
            tracing::warn!(error = %e, "failed to deliver auth state notification");
        }
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<UserIdentity, ProviderError> {
        check_email(email)?;

        let mut state = self.lock()?;

        let failures = state.failed_attempts.get(email).copied().unwrap_or(0);
        if failures >= MAX_FAILED_ATTEMPTS {
            return Err(ProviderError::new(
                "auth/too-many-requests",
                "access to this account has been temporarily disabled due to many failed login attempts",
            ));
        }

        let Some((uid, disabled, password_matches)) = state
            .accounts
            .get(email)
            .map(|a| (a.uid.clone(), a.disabled, a.password == password))
        else {
            return Err(ProviderError::new(
                "auth/user-not-found",
                "there is no user record corresponding to this identifier",
            ));
        };

        if disabled {
            return Err(ProviderError::new(
                "auth/user-disabled",
                "the user account has been disabled by an administrator",
            ));
        }

        if !password_matches {
            *state.failed_attempts.entry(email.to_string()).or_insert(0) += 1;
            return Err(ProviderError::new(
                "auth/wrong-password",
                "the password is invalid",
            ));
        }

        let identity = UserIdentity::new(uid, email);
        state.failed_attempts.remove(email);
        state.current = Some(identity.clone());

        Ok(identity)
    }

    fn register(&self, email: &str, password: &str) -> Result<UserIdentity, ProviderError> {
        check_email(email)?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ProviderError::new(
                "auth/weak-password",
                format!("password should be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }

        let mut state = self.lock()?;

        if state.accounts.contains_key(email) {
            return Err(ProviderError::new(
                "auth/email-already-in-use",
                "the email address is already in use by another account",
            ));
        }

        let uid = new_uid();
        state.accounts.insert(
            email.to_string(),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
                disabled: false,
            },
        );

        let identity = UserIdentity::new(uid, email);
        state.current = Some(identity.clone());

        Ok(identity)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, ProviderError> {
        let identity = self.authenticate(email, password)?;
        self.notify(AuthStateChanged::signed_in(identity.clone()));
        Ok(identity)
    }

    async fn sign_up_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, ProviderError> {
        // Registration signs the new account in, as hosted providers do.
        let identity = self.register(email, password)?;
        self.notify(AuthStateChanged::signed_in(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.lock()?.current = None;
        self.notify(AuthStateChanged::signed_out());
        Ok(())
    }

    fn subscribe(&self) -> Subscription<AuthStateChanged> {
        let current = match self.current_user() {
            Some(identity) => AuthStateChanged::signed_in(identity),
            None => AuthStateChanged::signed_out(),
        };
        self.bus.subscribe_starting_with(current)
    }
}

fn new_uid() -> ProviderUid {
    ProviderUid::from_uuid(Uuid::now_v7())
}

fn check_email(email: &str) -> Result<(), ProviderError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());

    if valid {
        Ok(())
    } else {
        Err(ProviderError::new(
            "auth/invalid-email",
            "the email address is badly formatted",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> InMemoryIdentityProvider {
        InMemoryIdentityProvider::new().with_account("a@b.com", "secret1")
    }

    #[tokio::test]
    async fn unknown_email_is_user_not_found() {
        let err = provider()
            .sign_in_with_credentials("nobody@b.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err.code, "auth/user-not-found");
    }

    #[tokio::test]
    async fn disabled_account_is_rejected() {
        let provider = provider();
        provider.disable_account("a@b.com");

        let err = provider
            .sign_in_with_credentials("a@b.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err.code, "auth/user-disabled");
    }

    #[tokio::test]
    async fn repeated_failures_throttle_until_success_resets() {
        let provider = provider();

        for _ in 0..MAX_FAILED_ATTEMPTS {
            let err = provider
                .sign_in_with_credentials("a@b.com", "nope")
                .await
                .unwrap_err();
            assert_eq!(err.code, "auth/wrong-password");
        }

        // Throttled even with the right password.
        let err = provider
            .sign_in_with_credentials("a@b.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err.code, "auth/too-many-requests");
    }

    #[tokio::test]
    async fn success_resets_failure_count() {
        let provider = provider();

        for _ in 0..MAX_FAILED_ATTEMPTS - 1 {
            let _ = provider.sign_in_with_credentials("a@b.com", "nope").await;
        }
        provider
            .sign_in_with_credentials("a@b.com", "secret1")
            .await
            .unwrap();

        let err = provider
            .sign_in_with_credentials("a@b.com", "nope")
            .await
            .unwrap_err();
        assert_eq!(err.code, "auth/wrong-password");
    }

    #[tokio::test]
    async fn registration_rules() {
        let provider = provider();

        let weak = provider
            .sign_up_with_credentials("new@b.com", "123")
            .await
            .unwrap_err();
        assert_eq!(weak.code, "auth/weak-password");

        let taken = provider
            .sign_up_with_credentials("a@b.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(taken.code, "auth/email-already-in-use");

        let malformed = provider
            .sign_up_with_credentials("not-an-email", "secret1")
            .await
            .unwrap_err();
        assert_eq!(malformed.code, "auth/invalid-email");

        let created = provider
            .sign_up_with_credentials("new@b.com", "secret1")
            .await
            .unwrap();
        assert_eq!(provider.current_user(), Some(created));
    }

    #[tokio::test]
    async fn subscribers_get_current_state_then_changes() {
        let provider = provider();
        provider
            .sign_in_with_credentials("a@b.com", "secret1")
            .await
            .unwrap();

        let sub = provider.subscribe();
        provider.sign_out().await.unwrap();

        let changes = sub.drain();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].identity.as_ref().unwrap().email(), "a@b.com");
        assert!(changes[1].identity.is_none());
    }

    #[tokio::test]
    async fn uid_is_stable_across_sign_ins() {
        let provider = provider();
        let first = provider
            .sign_in_with_credentials("a@b.com", "secret1")
            .await
            .unwrap();
        let second = provider
            .sign_in_with_credentials("a@b.com", "secret1")
            .await
            .unwrap();
        assert_eq!(first.uid(), second.uid());
    }
}

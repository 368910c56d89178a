//! Identity provider backed by the hosted identity toolkit REST API.
//!
//! Only email/password accounts are supported. The refresh token from each
//! sign-in is written to a [`RefreshTokenStore`]; [`IdentityToolkitProvider::restore`]
//! trades it for a fresh ID token on the next start and replays the user.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use justifai_auth::{IdentityProvider, ProviderError};
use justifai_core::{ProviderUid, UserIdentity};
use justifai_events::{AuthStateChanged, EventBus, InMemoryEventBus, Subscription};

use crate::token_store::{InMemoryTokenStore, RefreshTokenStore};

const INTERNAL_ERROR: &str = "auth/internal-error";
const NETWORK_ERROR: &str = "auth/network-request-failed";

pub const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";

/// REST error message → hosted SDK error code.
const REST_ERROR_CODES: [(&str, &str); 12] = [
    ("EMAIL_NOT_FOUND", "auth/user-not-found"),
    ("INVALID_PASSWORD", "auth/wrong-password"),
    ("INVALID_LOGIN_CREDENTIALS", "auth/invalid-credential"),
    ("USER_DISABLED", "auth/user-disabled"),
    ("TOO_MANY_ATTEMPTS_TRY_LATER", "auth/too-many-requests"),
    ("EMAIL_EXISTS", "auth/email-already-in-use"),
    ("WEAK_PASSWORD", "auth/weak-password"),
    ("INVALID_EMAIL", "auth/invalid-email"),
    ("TOKEN_EXPIRED", "auth/user-token-expired"),
    ("USER_NOT_FOUND", "auth/user-token-expired"),
    ("INVALID_REFRESH_TOKEN", "auth/invalid-user-token"),
    ("INVALID_ID_TOKEN", "auth/invalid-user-token"),
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

/// The secure token endpoint answers in snake_case.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RestErrorEnvelope {
    error: RestError,
}

#[derive(Debug, Deserialize)]
struct RestError {
    message: String,
}

pub struct IdentityToolkitProvider {
    base_url: String,
    token_url: String,
    api_key: String,
    http: reqwest::Client,
    tokens: Arc<dyn RefreshTokenStore>,
    current: Mutex<Option<UserIdentity>>,
    bus: InMemoryEventBus<AuthStateChanged>,
}

impl core::fmt::Debug for IdentityToolkitProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdentityToolkitProvider")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl IdentityToolkitProvider {
    /// Tokens are kept in memory until [`Self::with_token_store`] says otherwise.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token_url: DEFAULT_SECURE_TOKEN_URL.to_string(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
            tokens: Arc::new(InMemoryTokenStore::new()),
            current: Mutex::new(None),
            bus: InMemoryEventBus::new(),
        }
    }

    /// Base URL of the secure token service used by [`Self::restore`].
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_token_store(mut self, tokens: Arc<dyn RefreshTokenStore>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn current_user(&self) -> Option<UserIdentity> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    /// Bring back the session saved by an earlier run.
    ///
    /// Returns `Ok(None)` when nothing was saved. A token the service rejects
    /// is forgotten; on a network failure it is kept for the next attempt.
    pub async fn restore(&self) -> Result<Option<UserIdentity>, ProviderError> {
        let saved = match self.tokens.load() {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read saved refresh token");
                None
            }
        };
        let Some(refresh_token) = saved else {
            return Ok(None);
        };

        match self.refresh(&refresh_token).await {
            Ok(identity) => {
                tracing::info!(uid = %identity.uid(), "restored saved session");
                self.set_current(Some(identity.clone()));
                Ok(Some(identity))
            }
            Err(e) if e.code == NETWORK_ERROR => Err(e),
            Err(e) => {
                tracing::info!(code = %e.code, "saved session rejected; forgetting it");
                self.save_refresh_token(None);
                Err(e)
            }
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<UserIdentity, ProviderError> {
        let request = RefreshRequest {
            grant_type: "refresh_token",
            refresh_token,
        };
        let refreshed: RefreshResponse = self
            .call(self.http.post(self.token_endpoint()).form(&request))
            .await?;
        self.save_refresh_token(Some(&refreshed.refresh_token));

        let lookup = LookupRequest {
            id_token: &refreshed.id_token,
        };
        let found: LookupResponse = self
            .call(self.http.post(self.endpoint("lookup")).json(&lookup))
            .await?;
        let user = found
            .users
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::new(INTERNAL_ERROR, "account lookup returned no user"))?;

        let uid = parse_uid(&user.local_id)?;
        Ok(UserIdentity::new(uid, user.email.unwrap_or_default()))
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.base_url.trim_end_matches('/'),
            method,
            self.api_key
        )
    }

    fn token_endpoint(&self) -> String {
        format!(
            "{}/v1/token?key={}",
            self.token_url.trim_end_matches('/'),
            self.api_key
        )
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::new(NETWORK_ERROR, e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::new(NETWORK_ERROR, e.to_string()))?;

        if !status.is_success() {
            return Err(rest_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| ProviderError::new(INTERNAL_ERROR, format!("malformed identity response: {e}")))
    }

    async fn password_call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, ProviderError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let account: AccountResponse = self
            .call(self.http.post(self.endpoint(method)).json(&body))
            .await?;

        let uid = parse_uid(&account.local_id)?;
        let identity = UserIdentity::new(uid, account.email.unwrap_or_else(|| email.to_string()));
        if let Some(refresh_token) = account.refresh_token.as_deref() {
            self.save_refresh_token(Some(refresh_token));
        }
        self.set_current(Some(identity.clone()));

        Ok(identity)
    }

    fn save_refresh_token(&self, token: Option<&str>) {
        if let Err(e) = self.tokens.save(token) {
            tracing::warn!(error = %e, "failed to persist refresh token");
        }
    }

    fn set_current(&self, user: Option<UserIdentity>) {
        let change = match &user {
            Some(identity) => AuthStateChanged::signed_in(identity.clone()),
            None => AuthStateChanged::signed_out(),
        };

        match self.current.lock() {
            Ok(mut current) => *current = user,
            Err(_) => tracing::warn!("identity toolkit state lock poisoned"),
        }

        if let Err(e) = self.bus.publish(change) {
            tracing::warn!(error = %e, "failed to deliver auth state notification");
        }
    }
}

fn parse_uid(local_id: &str) -> Result<ProviderUid, ProviderError> {
    local_id
        .parse()
        .map_err(|_| ProviderError::new(INTERNAL_ERROR, "account response has no localId"))
}

/// Translate a REST error body into a provider error with an SDK code.
fn rest_error(status: u16, body: &str) -> ProviderError {
    let Ok(envelope) = serde_json::from_str::<RestErrorEnvelope>(body) else {
        return ProviderError::new(INTERNAL_ERROR, format!("identity service returned status {status}"));
    };

    let message = envelope.error.message;
    let key = message.split(" : ").next().unwrap_or_default().trim();

    match REST_ERROR_CODES.iter().find(|(rest, _)| *rest == key) {
        Some((_, code)) => ProviderError::new(*code, message),
        None => ProviderError::new(INTERNAL_ERROR, message),
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl IdentityProvider for IdentityToolkitProvider {
    async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, ProviderError> {
        self.password_call("signInWithPassword", email, password).await
    }

    async fn sign_up_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, ProviderError> {
        self.password_call("signUp", email, password).await
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.save_refresh_token(None);
        self.set_current(None);
        Ok(())
    }

    fn subscribe(&self) -> Subscription<AuthStateChanged> {
        let replay = match self.current_user() {
            Some(identity) => AuthStateChanged::signed_in(identity),
            None => AuthStateChanged::signed_out(),
        };
        self.bus.subscribe_starting_with(replay)
    }
}

//! The full shell against stub identity toolkit and backend servers.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use common::{
    API_KEY, Accounts, BackendLog, SECURE_TOKEN_PREFIX, TestServer, backend_app, identity_app,
};
use justifai_auth::{AuthFlagCache, AuthFailure, IdentityProvider};
use justifai_core::Route;
use justifai_web::{
    AppShell, BackendClient, FileAuthFlag, FileTokenStore, IdentityToolkitProvider,
    RefreshTokenStore,
};

type Shell = AppShell<IdentityToolkitProvider, BackendClient>;

struct Harness {
    identity: TestServer,
    backend: TestServer,
    _dir: tempfile::TempDir,
    api_key: String,
    flag: Arc<FileAuthFlag>,
    tokens: Arc<FileTokenStore>,
    provider: Arc<IdentityToolkitProvider>,
    shell: Shell,
}

fn launch(
    identity_url: &str,
    backend_url: &str,
    api_key: &str,
    flag: &Arc<FileAuthFlag>,
    tokens: &Arc<FileTokenStore>,
) -> (Arc<IdentityToolkitProvider>, Shell) {
    let provider = Arc::new(
        IdentityToolkitProvider::new(identity_url, api_key)
            .with_token_url(format!("{identity_url}{SECURE_TOKEN_PREFIX}"))
            .with_token_store(tokens.clone()),
    );
    let shell = AppShell::new(
        Arc::clone(&provider),
        flag.clone(),
        Arc::new(BackendClient::new(backend_url)),
        "https://chat.example.com",
    );
    (provider, shell)
}

impl Harness {
    /// A provider and shell as a new process would build them, sharing the
    /// servers and the on-disk flag and token.
    fn relaunch(&self) -> (Arc<IdentityToolkitProvider>, Shell) {
        launch(
            &self.identity.base_url,
            &self.backend.base_url,
            &self.api_key,
            &self.flag,
            &self.tokens,
        )
    }
}

async fn harness(api_key: &str) -> Harness {
    let accounts: Accounts = Arc::new(Mutex::new(HashMap::from([(
        "a@b.com".to_string(),
        "secret1".to_string(),
    )])));
    let identity = TestServer::spawn(identity_app(accounts)).await;
    let backend = TestServer::spawn(backend_app(Arc::new(Mutex::new(BackendLog::default())))).await;

    let dir = tempfile::tempdir().unwrap();
    let flag = Arc::new(FileAuthFlag::new(dir.path().join("auth-flag")));
    let tokens = Arc::new(FileTokenStore::beside(&flag));
    let (provider, shell) = launch(&identity.base_url, &backend.base_url, api_key, &flag, &tokens);

    Harness {
        identity,
        backend,
        _dir: dir,
        api_key: api_key.to_string(),
        flag,
        tokens,
        provider,
        shell,
    }
}

#[tokio::test]
async fn sign_in_flow_updates_session_route_and_flag() {
    let mut h = harness(API_KEY).await;

    assert_eq!(h.shell.start("/chatbot").unwrap(), &Route::Login);
    assert!(!h.flag.read().unwrap());

    assert!(h.shell.login("a@b.com", "secret1").await);

    assert_eq!(h.shell.current_route(), &Route::Dashboard);
    assert_eq!(h.shell.session().identity().unwrap().uid().as_str(), "uid-a");
    assert!(h.flag.read().unwrap());
    assert_eq!(h.tokens.load().unwrap().as_deref(), Some("refresh:a@b.com"));

    assert_eq!(h.shell.visit("/chatbot").rendered, Route::Chatbot);
    assert_eq!(h.shell.chatbot().frame_url, "https://chat.example.com");

    h.shell.logout().await.unwrap();
    assert_eq!(h.shell.current_route(), &Route::Login);
    assert!(!h.flag.read().unwrap());
    assert_eq!(h.tokens.load().unwrap(), None);
}

#[tokio::test]
async fn provider_errors_are_classified() {
    let mut h = harness(API_KEY).await;
    h.shell.start("/login").unwrap();

    assert!(!h.shell.login("a@b.com", "wrong-pass").await);
    assert_eq!(h.shell.login.error(), Some("Incorrect password. Please try again."));

    assert!(!h.shell.login("nobody@b.com", "secret1").await);
    assert_eq!(
        h.shell.login.error(),
        Some("No account found with this email. Please register first.")
    );

    assert_eq!(h.shell.current_route(), &Route::Login);
    assert!(!h.shell.session().authenticated());
}

#[tokio::test]
async fn registration_signs_in_and_lands_on_dashboard() {
    let mut h = harness(API_KEY).await;
    h.shell.start("/register").unwrap();

    assert!(h.shell.register("newbie", "new@b.com", "longenough").await);
    assert_eq!(h.shell.current_route(), &Route::Dashboard);
    assert_eq!(h.shell.session().identity().unwrap().email(), "new@b.com");
}

#[tokio::test]
async fn duplicate_registration_shows_raw_provider_message() {
    let mut h = harness(API_KEY).await;
    h.shell.start("/register").unwrap();

    assert!(!h.shell.register("ana", "a@b.com", "secret1").await);
    assert_eq!(h.shell.register.error(), Some("EMAIL_EXISTS"));
    assert_eq!(h.shell.current_route(), &Route::Register);
}

#[tokio::test]
async fn bad_api_key_is_internal_error_with_raw_message() {
    let h = harness("wrong-key").await;

    let err = h
        .provider
        .sign_in_with_credentials("a@b.com", "secret1")
        .await
        .unwrap_err();
    assert_eq!(err.code, "auth/internal-error");

    let failure = AuthFailure::classify(justifai_auth::AuthOperation::SignIn, &err);
    assert!(failure.to_string().starts_with("API key not valid"));
}

#[tokio::test]
async fn unreachable_identity_service_is_network_failure() {
    let provider = IdentityToolkitProvider::new("http://127.0.0.1:9", API_KEY);

    let err = provider
        .sign_in_with_credentials("a@b.com", "secret1")
        .await
        .unwrap_err();
    assert_eq!(err.code, "auth/network-request-failed");
}

#[tokio::test]
async fn restart_restores_signed_in_user() {
    let mut h = harness(API_KEY).await;
    h.shell.start("/login").unwrap();
    assert!(h.shell.login("a@b.com", "secret1").await);

    let (provider, mut shell) = h.relaunch();
    let restored = provider.restore().await.unwrap().unwrap();
    assert_eq!(restored.uid().as_str(), "uid-a");
    assert_eq!(restored.email(), "a@b.com");

    assert_eq!(shell.start("/dashboard").unwrap(), &Route::Dashboard);
    assert!(shell.session().authenticated());
    assert_eq!(shell.navbar().unwrap().email, "a@b.com");
    assert!(h.flag.read().unwrap());
    assert_eq!(h.tokens.load().unwrap().as_deref(), Some("refresh:a@b.com"));
}

#[tokio::test]
async fn restart_after_logout_stays_signed_out() {
    let mut h = harness(API_KEY).await;
    h.shell.start("/login").unwrap();
    assert!(h.shell.login("a@b.com", "secret1").await);
    h.shell.logout().await.unwrap();

    let (provider, mut shell) = h.relaunch();
    assert_eq!(provider.restore().await.unwrap(), None);
    assert_eq!(shell.start("/dashboard").unwrap(), &Route::Login);
}

#[tokio::test]
async fn rejected_saved_token_is_forgotten() {
    let h = harness(API_KEY).await;
    h.tokens.save(Some("refresh:gone@b.com")).unwrap();

    let (provider, mut shell) = h.relaunch();
    let err = provider.restore().await.unwrap_err();
    assert_eq!(err.code, "auth/invalid-user-token");
    assert_eq!(h.tokens.load().unwrap(), None);

    assert_eq!(shell.start("/dashboard").unwrap(), &Route::Login);
    assert!(!h.flag.read().unwrap());
}

#[tokio::test]
async fn unreachable_token_service_keeps_saved_token() {
    let h = harness(API_KEY).await;
    h.tokens.save(Some("refresh:a@b.com")).unwrap();

    let provider = IdentityToolkitProvider::new(&h.identity.base_url, API_KEY)
        .with_token_url("http://127.0.0.1:9")
        .with_token_store(h.tokens.clone());
    let err = provider.restore().await.unwrap_err();

    assert_eq!(err.code, "auth/network-request-failed");
    assert!(provider.current_user().is_none());
    assert_eq!(h.tokens.load().unwrap().as_deref(), Some("refresh:a@b.com"));
}

//! Headless application shell: session store, router and screens wired
//! together the way the browser frontend and the native shell drive them.
//!
//! The shell is pull-based. Provider notifications queue up until [`AppShell::tick`]
//! applies them; every credential call ticks once on return, so a caller
//! normally never needs to.

use std::sync::Arc;

use justifai_auth::{
    AuthFailure, AuthFlagCache, IdentityProvider, SessionStore, SessionStoreError,
};
use justifai_core::{Route, Session};
use justifai_events::{NavigationIntent, Subscription};

use crate::api::{PredictionService, SummaryService};
use crate::router::{Resolution, Router};
use crate::screens::{
    ChatbotView, DashboardCard, LoginScreen, NavbarView, PredictionScreen, RegisterScreen,
    SummarizationScreen, dashboard_cards, navbar,
};

pub struct AppShell<P, B> {
    store: SessionStore<P>,
    router: Router,
    navigation: Subscription<NavigationIntent>,
    backend: Arc<B>,
    chatbot_url: String,
    pub login: LoginScreen,
    pub register: RegisterScreen,
    pub summarization: SummarizationScreen,
    pub prediction: PredictionScreen,
}

impl<P, B> core::fmt::Debug for AppShell<P, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppShell")
            .field("store", &self.store)
            .field("route", self.router.current())
            .finish_non_exhaustive()
    }
}

impl<P, B> AppShell<P, B>
where
    P: IdentityProvider,
    B: SummaryService + PredictionService,
{
    pub fn new(
        provider: Arc<P>,
        flag: Arc<dyn AuthFlagCache>,
        backend: Arc<B>,
        chatbot_url: impl Into<String>,
    ) -> Self {
        let store = SessionStore::new(provider, flag);
        let navigation = store.navigation();

        Self {
            store,
            router: Router::new(),
            navigation,
            backend,
            chatbot_url: chatbot_url.into(),
            login: LoginScreen::default(),
            register: RegisterScreen::default(),
            summarization: SummarizationScreen::default(),
            prediction: PredictionScreen::default(),
        }
    }

    /// Subscribe to the provider, resolve the initial path, then apply
    /// whatever the provider replayed.
    pub fn start(&mut self, initial_path: &str) -> Result<&Route, SessionStoreError> {
        self.store.initialize()?;
        self.router.visit(initial_path, self.store.session());
        self.tick();
        Ok(self.router.current())
    }

    /// Apply queued notifications, follow the intents they produced and
    /// re-check the current screen. Returns how many notifications were
    /// applied.
    pub fn tick(&mut self) -> usize {
        let applied = self.store.process_pending();

        for intent in self.navigation.drain() {
            self.router.apply(&intent, self.store.session());
        }
        if let Some(resolution) = self.router.revalidate(self.store.session()) {
            tracing::debug!(rendered = resolution.rendered.path(), "session change moved the user");
        }

        applied
    }

    pub fn visit(&mut self, path: &str) -> Resolution {
        self.router.visit(path, self.store.session())
    }

    pub fn navigate(&mut self, route: Route) -> Resolution {
        self.router.navigate(route, self.store.session())
    }

    pub fn session(&self) -> &Session {
        self.store.session()
    }

    pub fn current_route(&self) -> &Route {
        self.router.current()
    }

    pub fn history(&self) -> &[Route] {
        self.router.history()
    }

    pub fn watch(&self) -> Subscription<Session> {
        self.store.watch()
    }

    pub fn store(&self) -> &SessionStore<P> {
        &self.store
    }

    /// Submit the login screen with the given credentials.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.login.email = email.to_string();
        self.login.password = password.to_string();

        let auth = self.store.auth();
        let accepted = self.login.submit(&auth).await;
        self.tick();
        accepted
    }

    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> bool {
        self.register.username = username.to_string();
        self.register.email = email.to_string();
        self.register.password = password.to_string();

        let auth = self.store.auth();
        let accepted = self.register.submit(&auth).await;
        self.tick();
        accepted
    }

    /// Sign out, then go to the login screen without waiting for the
    /// provider's notification.
    pub async fn logout(&mut self) -> Result<(), AuthFailure> {
        let outcome = self.store.auth().sign_out().await;
        self.tick();

        if outcome.is_ok() {
            self.router.navigate(Route::Login, self.store.session());
        }
        outcome
    }

    pub async fn submit_summary(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.summarization.submit(backend.as_ref()).await;
    }

    pub async fn submit_prediction(&mut self) {
        let backend = Arc::clone(&self.backend);
        self.prediction.submit(backend.as_ref()).await;
    }

    pub fn navbar(&self) -> Option<NavbarView> {
        navbar(self.store.session())
    }

    pub fn dashboard(&self) -> [DashboardCard; 3] {
        dashboard_cards()
    }

    pub fn chatbot(&self) -> ChatbotView {
        ChatbotView::new(self.chatbot_url.clone())
    }

    pub fn shutdown(self) {
        self.store.shutdown();
    }
}

//! The session store: single source of truth for who is signed in.
//!
//! One writer. Every change to [`Session`] happens inside `apply`, which only
//! runs for notifications delivered by the identity provider, one at a time
//! and in arrival order. Everything else reads or subscribes.

use std::sync::Arc;
use std::sync::mpsc::TryRecvError;

use thiserror::Error;

use justifai_core::{Route, Session};
use justifai_events::{
    AuthStateChanged, Event, EventBus, InMemoryEventBus, NavigationIntent, NavigationReason,
    Subscription,
};

use crate::client::AuthClient;
use crate::flag::AuthFlagCache;
use crate::provider::IdentityProvider;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    #[error("session store is already subscribed to the identity provider")]
    AlreadyInitialized,
}

pub struct SessionStore<P> {
    provider: Arc<P>,
    flag: Arc<dyn AuthFlagCache>,
    session: Session,
    initialized: bool,
    notifications: Option<Subscription<AuthStateChanged>>,
    navigation: InMemoryEventBus<NavigationIntent>,
    observers: InMemoryEventBus<Session>,
}

impl<P> core::fmt::Debug for SessionStore<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session)
            .field("initialized", &self.initialized)
            .field("listening", &self.notifications.is_some())
            .finish_non_exhaustive()
    }
}

impl<P: IdentityProvider> SessionStore<P> {
    pub fn new(provider: Arc<P>, flag: Arc<dyn AuthFlagCache>) -> Self {
        Self {
            provider,
            flag,
            session: Session::anonymous(),
            initialized: false,
            notifications: None,
            navigation: InMemoryEventBus::new(),
            observers: InMemoryEventBus::new(),
        }
    }

    /// Register the store's single listener with the identity provider.
    pub fn initialize(&mut self) -> Result<(), SessionStoreError> {
        if self.initialized {
            return Err(SessionStoreError::AlreadyInitialized);
        }

        self.notifications = Some(self.provider.subscribe());
        self.initialized = true;
        tracing::debug!("session store listening for auth state changes");

        Ok(())
    }

    /// Credential operations. They never mutate the session directly.
    pub fn auth(&self) -> AuthClient<P> {
        AuthClient::new(Arc::clone(&self.provider))
    }

    /// Stop listening to the provider. Dropping the store does the same.
    pub fn shutdown(mut self) {
        self.notifications = None;
        tracing::debug!("session store released its provider subscription");
    }
}

impl<P> SessionStore<P> {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.authenticated()
    }

    /// Session snapshots, published whenever the session actually changes.
    pub fn watch(&self) -> Subscription<Session> {
        self.observers.subscribe()
    }

    /// Navigation requests for the router.
    pub fn navigation(&self) -> Subscription<NavigationIntent> {
        self.navigation.subscribe()
    }

    /// Apply every notification that has arrived, in order.
    ///
    /// Returns how many were applied.
    pub fn process_pending(&mut self) -> usize {
        let Some(subscription) = self.notifications.as_ref() else {
            return 0;
        };

        let mut pending = Vec::new();
        let mut disconnected = false;
        loop {
            match subscription.try_recv() {
                Ok(change) => pending.push(change),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        let applied = pending.len();
        for change in pending {
            self.apply(change);
        }

        if disconnected {
            tracing::warn!("identity provider closed its notification channel");
            self.notifications = None;
        }

        applied
    }

    fn apply(&mut self, change: AuthStateChanged) {
        tracing::debug!(event = change.event_type(), at = %change.occurred_at(), "applying");

        match change.identity {
            Some(identity) => {
                tracing::debug!(email = identity.email(), uid = %identity.uid(), "auth state: signed in");
                self.persist_flag(true);
                self.replace(Session::signed_in(identity));

                // Every signed-in notification sends the user to the landing
                // screen, wherever they were.
                let intent = NavigationIntent::new(Route::LANDING, NavigationReason::SignedIn);
                tracing::debug!(event = intent.event_type(), to = intent.target.path(), "requesting navigation");
                if let Err(e) = self.navigation.publish(intent) {
                    tracing::warn!(error = %e, "failed to publish navigation intent");
                }
            }
            None => {
                tracing::debug!("auth state: signed out");
                self.persist_flag(false);
                self.replace(Session::anonymous());
            }
        }
    }

    fn replace(&mut self, next: Session) {
        if self.session == next {
            return;
        }

        self.session = next;
        if let Err(e) = self.observers.publish(self.session.clone()) {
            tracing::warn!(error = %e, "failed to publish session change");
        }
    }

    fn persist_flag(&self, authenticated: bool) {
        if let Err(e) = self.flag.write(authenticated) {
            tracing::warn!(error = %e, authenticated, "failed to persist advisory auth flag");
        }
    }
}

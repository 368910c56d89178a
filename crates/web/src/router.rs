//! Route resolution on top of the pure guard.
//!
//! The router owns where the UI *is*. It never looks at the provider: every
//! decision is the guard's, fed with the session the caller passes in.

use justifai_auth::guard_session;
use justifai_core::{Route, Session};
use justifai_events::NavigationIntent;

/// Unknown → login → landing is the longest redirect chain.
const MAX_REDIRECTS: usize = 2;

/// Outcome of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub requested: Route,
    pub rendered: Route,
    pub redirected: bool,
}

#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Nothing rendered yet; `current` is the root until the first visit.
    pub fn new() -> Self {
        Self {
            current: Route::Root,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Rendered routes, oldest first.
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Navigate to a browser path.
    pub fn visit(&mut self, path: &str, session: &Session) -> Resolution {
        self.navigate(Route::parse(path), session)
    }

    pub fn navigate(&mut self, requested: Route, session: &Session) -> Resolution {
        let rendered = resolve(&requested, session);
        let redirected = rendered != requested;

        tracing::debug!(
            requested = requested.path(),
            rendered = rendered.path(),
            redirected,
            "route resolved"
        );

        if rendered != self.current || self.history.is_empty() {
            self.history.push(rendered.clone());
        }
        self.current = rendered.clone();

        Resolution {
            requested,
            rendered,
            redirected,
        }
    }

    /// Follow a navigation intent; the guard still has the last word.
    pub fn apply(&mut self, intent: &NavigationIntent, session: &Session) -> Resolution {
        tracing::debug!(to = intent.target.path(), reason = ?intent.reason, "navigation intent");
        self.navigate(intent.target.clone(), session)
    }

    /// Re-check the current screen after the session changed.
    ///
    /// Returns `None` when the current screen may stay.
    pub fn revalidate(&mut self, session: &Session) -> Option<Resolution> {
        if self.history.is_empty() {
            return None;
        }

        let current = self.current.clone();
        let rendered = resolve(&current, session);
        if rendered == current {
            return None;
        }

        Some(self.navigate(current, session))
    }
}

fn resolve(requested: &Route, session: &Session) -> Route {
    let mut route = requested.clone();
    for _ in 0..MAX_REDIRECTS {
        match guard_session(&route, session).redirect_target() {
            Some(next) => route = next,
            None => return route,
        }
    }
    route
}

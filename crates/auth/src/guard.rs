use justifai_core::{Route, RouteClass, Session};

/// What the router should do with a requested route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    RedirectToLogin,
    RedirectToLanding,
}

impl GuardDecision {
    /// Where to go instead, if anywhere.
    pub fn redirect_target(self) -> Option<Route> {
        match self {
            GuardDecision::Render => None,
            GuardDecision::RedirectToLogin => Some(Route::Login),
            GuardDecision::RedirectToLanding => Some(Route::LANDING),
        }
    }
}

/// Decide whether `route` may be rendered for the given auth state.
///
/// - No IO
/// - No state (the caller supplies the session's flag)
/// - The root and any unclassified path always go to the login screen
pub fn guard(route: &Route, authenticated: bool) -> GuardDecision {
    if *route == Route::Root {
        return GuardDecision::RedirectToLogin;
    }

    match (route.classification(), authenticated) {
        (None, _) => GuardDecision::RedirectToLogin,
        (Some(RouteClass::Private), false) => GuardDecision::RedirectToLogin,
        (Some(RouteClass::Public), true) => GuardDecision::RedirectToLanding,
        (Some(RouteClass::Private), true) | (Some(RouteClass::Public), false) => {
            GuardDecision::Render
        }
    }
}

pub fn guard_session(route: &Route, session: &Session) -> GuardDecision {
    guard(route, session.authenticated())
}

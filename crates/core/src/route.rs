//! Navigable screens and their static access classification.

use serde::{Deserialize, Serialize};

/// Who may view a screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteClass {
    /// Only reachable while signed out (login, registration).
    Public,
    /// Only reachable while signed in.
    Private,
}

/// A navigable location in the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Root,
    Login,
    Register,
    Dashboard,
    Chatbot,
    Summarization,
    Prediction,
    /// A path that matches no known screen (kept for logging).
    Unknown(String),
}

/// Build-time routing table: path, screen, classification.
const ROUTES: [(&str, Route, RouteClass); 6] = [
    ("/login", Route::Login, RouteClass::Public),
    ("/register", Route::Register, RouteClass::Public),
    ("/dashboard", Route::Dashboard, RouteClass::Private),
    ("/chatbot", Route::Chatbot, RouteClass::Private),
    ("/summarization", Route::Summarization, RouteClass::Private),
    ("/prediction", Route::Prediction, RouteClass::Private),
];

impl Route {
    /// The private landing screen users are sent to after signing in.
    pub const LANDING: Route = Route::Dashboard;

    /// Resolve a browser path to a route.
    ///
    /// Query strings, fragments and a single trailing slash are ignored.
    /// Matching is case-sensitive.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        if path.is_empty() || path == "/" {
            return Route::Root;
        }

        let trimmed = path.strip_suffix('/').unwrap_or(path);

        ROUTES
            .iter()
            .find(|(p, _, _)| *p == trimmed)
            .map(|(_, route, _)| route.clone())
            .unwrap_or_else(|| Route::Unknown(path.to_string()))
    }

    /// Static classification; `None` for the root and unknown paths.
    pub fn classification(&self) -> Option<RouteClass> {
        ROUTES
            .iter()
            .find(|(_, route, _)| route == self)
            .map(|(_, _, class)| *class)
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Root => "/",
            Route::Unknown(path) => path,
            known => ROUTES
                .iter()
                .find(|(_, route, _)| route == known)
                .map(|(p, _, _)| *p)
                .unwrap_or("/"),
        }
    }

    /// Human-readable screen title.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Root => "Home",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::Chatbot => "Legal Chatbot",
            Route::Summarization => "Legal Document Summarization",
            Route::Prediction => "Case Outcome Prediction",
            Route::Unknown(_) => "Not Found",
        }
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_paths_round_trip() {
        for (path, route, _) in ROUTES.iter() {
            assert_eq!(Route::parse(path), *route);
            assert_eq!(route.path(), *path);
        }
    }

    #[test]
    fn root_and_unknown_are_unclassified() {
        assert_eq!(Route::parse("/"), Route::Root);
        assert_eq!(Route::parse(""), Route::Root);
        assert_eq!(Route::Root.classification(), None);

        let unknown = Route::parse("/admin");
        assert_eq!(unknown, Route::Unknown("/admin".to_string()));
        assert_eq!(unknown.classification(), None);
        assert_eq!(unknown.path(), "/admin");
    }

    #[test]
    fn classification_matches_table() {
        assert_eq!(Route::Login.classification(), Some(RouteClass::Public));
        assert_eq!(Route::Register.classification(), Some(RouteClass::Public));
        assert_eq!(Route::Dashboard.classification(), Some(RouteClass::Private));
        assert_eq!(Route::Chatbot.classification(), Some(RouteClass::Private));
        assert_eq!(Route::Summarization.classification(), Some(RouteClass::Private));
        assert_eq!(Route::Prediction.classification(), Some(RouteClass::Private));
        assert_eq!(Route::LANDING, Route::Dashboard);
    }

    #[test]
    fn query_fragment_and_trailing_slash_are_ignored() {
        assert_eq!(Route::parse("/login/"), Route::Login);
        assert_eq!(Route::parse("/dashboard?tab=1"), Route::Dashboard);
        assert_eq!(Route::parse("/prediction#result"), Route::Prediction);
        assert_eq!(Route::parse("/?next=/dashboard"), Route::Root);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(matches!(Route::parse("/Login"), Route::Unknown(_)));
        assert!(matches!(Route::parse("/login//"), Route::Unknown(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: parsing never panics, and anything it classifies is one of
        /// the table's screens.
        #[test]
        fn parse_is_total(path in "/?[a-zA-Z0-9/_?#=-]{0,24}") {
            let route = Route::parse(&path);
            if route.classification().is_some() {
                prop_assert!(ROUTES.iter().any(|(_, r, _)| *r == route));
            }
        }
    }
}

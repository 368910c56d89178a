//! Navbar, dashboard and chatbot view models.

use justifai_core::{Route, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

/// The top navigation bar. Only exists for a signed-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavbarView {
    pub brand: &'static str,
    pub home: Route,
    pub links: Vec<NavLink>,
    pub email: String,
}

pub fn navbar(session: &Session) -> Option<NavbarView> {
    let identity = session.identity()?;

    Some(NavbarView {
        brand: "JustifAI",
        home: Route::LANDING,
        links: vec![
            NavLink { label: "Chatbot", route: Route::Chatbot },
            NavLink { label: "Summarization", route: Route::Summarization },
            NavLink { label: "Prediction", route: Route::Prediction },
        ],
        email: identity.email().to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardCard {
    pub title: &'static str,
    pub description: &'static str,
    pub route: Route,
}

pub fn dashboard_cards() -> [DashboardCard; 3] {
    [
        DashboardCard {
            title: "Legal Chatbot",
            description: "Get instant, AI-powered answers to your legal questions with our sophisticated chatbot assistant.",
            route: Route::Chatbot,
        },
        DashboardCard {
            title: "Document Summarization",
            description: "Transform complex legal documents into clear, concise summaries with our advanced AI technology.",
            route: Route::Summarization,
        },
        DashboardCard {
            title: "Case Prediction",
            description: "Get data-driven insights and predictions for custody and compensation cases using AI analysis.",
            route: Route::Prediction,
        },
    ]
}

/// The chatbot screen embeds a hosted widget; only its URL is ours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatbotView {
    pub title: &'static str,
    pub frame_url: String,
}

impl ChatbotView {
    pub fn new(frame_url: impl Into<String>) -> Self {
        Self {
            title: "Legal Assistant Chat",
            frame_url: frame_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use justifai_core::{ProviderUid, UserIdentity};

    use super::*;

    #[test]
    fn navbar_hidden_when_signed_out() {
        assert!(navbar(&Session::anonymous()).is_none());
    }

    #[test]
    fn navbar_links_private_screens() {
        let identity = UserIdentity::new("u1".parse::<ProviderUid>().unwrap(), "a@b.com");
        let view = navbar(&Session::signed_in(identity)).unwrap();

        let routes: Vec<_> = view.links.iter().map(|l| l.route.clone()).collect();
        assert_eq!(routes, vec![Route::Chatbot, Route::Summarization, Route::Prediction]);
        assert_eq!(view.email, "a@b.com");
        assert_eq!(view.home, Route::Dashboard);
    }

    #[test]
    fn dashboard_cards_point_at_private_routes() {
        for card in dashboard_cards() {
            assert_eq!(card.route.classification(), Some(justifai_core::RouteClass::Private));
        }
    }
}

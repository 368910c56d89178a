use justifai_auth::{AuthClient, AuthFailure, IdentityProvider};

use crate::forms::FormError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Login form state.
///
/// Success does not navigate: the redirect arrives later, through the
/// session store's navigation intent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginScreen {
    pub email: String,
    pub password: String,
    loading: bool,
    error: Option<String>,
}

impl LoginScreen {
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns `None` when already loading or when a field is empty.
    pub fn begin_sign_in(&mut self) -> Option<Credentials> {
        if self.loading {
            return None;
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.error = Some(FormError::MissingFields.to_string());
            return None;
        }

        self.loading = true;
        self.error = None;
        Some(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    pub fn finish_sign_in(&mut self, outcome: Result<(), AuthFailure>) {
        self.loading = false;
        self.error = outcome.err().map(|failure| failure.to_string());
    }

    /// Returns whether the provider accepted the credentials.
    pub async fn submit<P: IdentityProvider>(&mut self, auth: &AuthClient<P>) -> bool {
        let Some(credentials) = self.begin_sign_in() else {
            return false;
        };

        let outcome = auth.sign_in(&credentials.email, &credentials.password).await;
        let accepted = outcome.is_ok();
        self.finish_sign_in(outcome);
        accepted
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Registration form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterScreen {
    pub username: String,
    pub email: String,
    pub password: String,
    loading: bool,
    error: Option<String>,
}

impl RegisterScreen {
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_sign_up(&mut self) -> Option<Registration> {
        if self.loading {
            return None;
        }
        let blank = [&self.username, &self.email]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank || self.password.is_empty() {
            self.error = Some(FormError::MissingFields.to_string());
            return None;
        }

        self.loading = true;
        self.error = None;
        Some(Registration {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    pub fn finish_sign_up(&mut self, outcome: Result<(), AuthFailure>) {
        self.loading = false;
        self.error = outcome.err().map(|failure| failure.to_string());
    }

    pub async fn submit<P: IdentityProvider>(&mut self, auth: &AuthClient<P>) -> bool {
        let Some(registration) = self.begin_sign_up() else {
            return false;
        };

        let outcome = auth
            .sign_up(&registration.username, &registration.email, &registration.password)
            .await;
        let accepted = outcome.is_ok();
        self.finish_sign_up(outcome);
        accepted
    }
}

//! Provider error classification.
//!
//! Provider-specific codes are mapped through one table into a small,
//! provider-neutral taxonomy. Screens only ever see [`AuthFailure`].

use thiserror::Error;

use crate::provider::ProviderError;

/// Which auth operation failed. Selects the fallback message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthOperation {
    SignIn,
    SignUp,
    SignOut,
}

impl AuthOperation {
    fn fallback_message(self) -> &'static str {
        match self {
            AuthOperation::SignIn => "An error occurred during login. Please try again.",
            AuthOperation::SignUp => "Registration failed",
            AuthOperation::SignOut => "Logout failed",
        }
    }
}

/// Provider-neutral reason an auth operation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredential,
    UserNotFound,
    WrongPassword,
    TooManyRequests,
    UserDisabled,
    Unknown(String),
}

/// Provider code (without the `auth/` namespace) -> taxonomy kind.
const CLASSIFICATION: [(&str, AuthErrorKind); 5] = [
    ("invalid-credential", AuthErrorKind::InvalidCredential),
    ("user-not-found", AuthErrorKind::UserNotFound),
    ("wrong-password", AuthErrorKind::WrongPassword),
    ("too-many-requests", AuthErrorKind::TooManyRequests),
    ("user-disabled", AuthErrorKind::UserDisabled),
];

impl AuthErrorKind {
    pub fn classify(operation: AuthOperation, err: &ProviderError) -> Self {
        let code = err.bare_code();

        if let Some((_, kind)) = CLASSIFICATION.iter().find(|(c, _)| *c == code) {
            return kind.clone();
        }

        let message = err.message.trim();
        if message.is_empty() {
            AuthErrorKind::Unknown(operation.fallback_message().to_string())
        } else {
            AuthErrorKind::Unknown(message.to_string())
        }
    }

    /// The text shown to the user, verbatim.
    pub fn message(&self) -> &str {
        match self {
            AuthErrorKind::InvalidCredential => {
                "Invalid email or password. Please check your credentials and try again."
            }
            AuthErrorKind::UserNotFound => "No account found with this email. Please register first.",
            AuthErrorKind::WrongPassword => "Incorrect password. Please try again.",
            AuthErrorKind::TooManyRequests => {
                "Too many failed login attempts. Please try again later."
            }
            AuthErrorKind::UserDisabled => "This account has been disabled. Please contact support.",
            AuthErrorKind::Unknown(message) => message,
        }
    }
}

/// A classified auth failure, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .kind.message())]
pub struct AuthFailure {
    pub operation: AuthOperation,
    pub kind: AuthErrorKind,
}

impl AuthFailure {
    pub fn classify(operation: AuthOperation, err: &ProviderError) -> Self {
        Self {
            operation,
            kind: AuthErrorKind::classify(operation, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(code: &str, message: &str) -> ProviderError {
        ProviderError::new(code, message)
    }

    #[test]
    fn table_codes_map_to_their_kind() {
        let cases = [
            ("auth/invalid-credential", AuthErrorKind::InvalidCredential),
            ("auth/user-not-found", AuthErrorKind::UserNotFound),
            ("auth/wrong-password", AuthErrorKind::WrongPassword),
            ("auth/too-many-requests", AuthErrorKind::TooManyRequests),
            ("auth/user-disabled", AuthErrorKind::UserDisabled),
        ];

        for (code, expected) in cases {
            assert_eq!(
                AuthErrorKind::classify(AuthOperation::SignIn, &err(code, "raw")),
                expected
            );
        }
    }

    #[test]
    fn wrong_password_message_is_fixed() {
        let failure = AuthFailure::classify(
            AuthOperation::SignIn,
            &err("wrong-password", "Firebase: Error (auth/wrong-password)."),
        );
        assert_eq!(failure.to_string(), "Incorrect password. Please try again.");
    }

    #[test]
    fn unknown_code_surfaces_provider_message() {
        let kind = AuthErrorKind::classify(
            AuthOperation::SignUp,
            &err("auth/email-already-in-use", "email address is already in use"),
        );
        assert_eq!(
            kind,
            AuthErrorKind::Unknown("email address is already in use".to_string())
        );
    }

    #[test]
    fn empty_message_falls_back_per_operation() {
        let blank = err("auth/internal-error", "  ");
        assert_eq!(
            AuthErrorKind::classify(AuthOperation::SignIn, &blank).message(),
            "An error occurred during login. Please try again."
        );
        assert_eq!(
            AuthErrorKind::classify(AuthOperation::SignUp, &blank).message(),
            "Registration failed"
        );
        assert_eq!(
            AuthErrorKind::classify(AuthOperation::SignOut, &blank).message(),
            "Logout failed"
        );
    }

    #[test]
    fn classification_is_the_same_for_every_operation() {
        for op in [AuthOperation::SignIn, AuthOperation::SignUp, AuthOperation::SignOut] {
            assert_eq!(
                AuthErrorKind::classify(op, &err("auth/user-disabled", "")),
                AuthErrorKind::UserDisabled
            );
        }
    }
}

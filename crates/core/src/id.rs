//! Identity types handed to us by the identity provider.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Opaque identifier the identity provider assigns to an account.
///
/// We never interpret its contents; it is only compared and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderUid(String);

impl ProviderUid {
    /// Mint a uid locally (in-process providers, fixtures).
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProviderUid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProviderUid {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(DomainError::invalid_id("ProviderUid: must not be empty"));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ProviderUid {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(DomainError::invalid_id("ProviderUid: must not be empty"));
        }
        Ok(Self(value))
    }
}

impl From<ProviderUid> for String {
    fn from(value: ProviderUid) -> Self {
        value.0
    }
}

/// The signed-in user as reported by the identity provider.
///
/// Immutable once attached to a session; a new sign-in replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    uid: ProviderUid,
    email: String,
}

impl UserIdentity {
    pub fn new(uid: ProviderUid, email: impl Into<String>) -> Self {
        Self {
            uid,
            email: email.into(),
        }
    }

    pub fn uid(&self) -> &ProviderUid {
        &self.uid
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_uid_is_rejected() {
        assert!(matches!(
            "".parse::<ProviderUid>(),
            Err(DomainError::InvalidId(_))
        ));
        assert!("   ".parse::<ProviderUid>().is_err());
        assert!(ProviderUid::try_from(String::new()).is_err());
    }

    #[test]
    fn uid_is_opaque_text() {
        let uid: ProviderUid = "u1".parse().unwrap();
        assert_eq!(uid.as_str(), "u1");
        assert_eq!(uid.to_string(), "u1");
        assert_eq!(serde_json::to_string(&uid).unwrap(), "\"u1\"");
        assert!(serde_json::from_str::<ProviderUid>("\"\"").is_err());
    }
}

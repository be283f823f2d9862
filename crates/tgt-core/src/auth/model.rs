//! Identity record and provider error codes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Opaque unique identifier assigned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Credential record owned by the identity provider.
///
/// The session manager only observes it; it never creates or edits one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<UserId>, email: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            email,
        }
    }
}

/// Error codes surfaced by the identity provider.
///
/// The set is closed: provider SDK codes outside it arrive as
/// `OperationNotAllowed` or `Unavailable`. Turning a code into user-facing
/// copy is left to the presentation layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("wrong password")]
    WrongPassword,
    #[error("user not found")]
    UserNotFound,
    #[error("email already in use")]
    EmailAlreadyInUse,
    #[error("password is too weak")]
    WeakPassword,
    #[error("operation not allowed")]
    OperationNotAllowed,
    /// Transport or service failure talking to the provider.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

impl AuthError {
    /// Returns the provider's `auth/<code>` string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "auth/invalid-email",
            Self::WrongPassword => "auth/wrong-password",
            Self::UserNotFound => "auth/user-not-found",
            Self::EmailAlreadyInUse => "auth/email-already-in-use",
            Self::WeakPassword => "auth/weak-password",
            Self::OperationNotAllowed => "auth/operation-not-allowed",
            Self::Unavailable(_) => "auth/network-request-failed",
        }
    }
}

impl FromStr for AuthError {
    type Err = std::convert::Infallible;

    /// Parses a provider code. The `auth/` prefix is optional; unknown codes
    /// map to `Unavailable` carrying the raw code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.strip_prefix("auth/").unwrap_or(s);
        Ok(match code {
            "invalid-email" => Self::InvalidEmail,
            "wrong-password" => Self::WrongPassword,
            "user-not-found" => Self::UserNotFound,
            "email-already-in-use" => Self::EmailAlreadyInUse,
            "weak-password" => Self::WeakPassword,
            "operation-not-allowed" => Self::OperationNotAllowed,
            other => Self::Unavailable(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for err in [
            AuthError::InvalidEmail,
            AuthError::WrongPassword,
            AuthError::UserNotFound,
            AuthError::EmailAlreadyInUse,
            AuthError::WeakPassword,
            AuthError::OperationNotAllowed,
        ] {
            let parsed: AuthError = err.code().parse().unwrap();
            assert_eq!(parsed, err);
        }
    }

    #[test]
    fn test_code_without_prefix() {
        let parsed: AuthError = "user-not-found".parse().unwrap();
        assert_eq!(parsed, AuthError::UserNotFound);
    }

    #[test]
    fn test_unknown_code_is_unavailable() {
        let parsed: AuthError = "auth/too-many-requests".parse().unwrap();
        assert_eq!(
            parsed,
            AuthError::Unavailable("too-many-requests".to_string())
        );
    }

    #[test]
    fn test_identity_serializes_flat() {
        let identity = Identity::new("U1", Some("a@b.co".to_string()));
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json, serde_json::json!({"uid": "U1", "email": "a@b.co"}));
    }
}

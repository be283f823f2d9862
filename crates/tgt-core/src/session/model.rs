//! Session domain model.

use serde::{Deserialize, Serialize};

use crate::auth::{Identity, UserId};
use crate::error::Result;
use crate::user::{Role, UserProfile};

/// The signed-in user: provider identity plus remote profile.
///
/// Serializes flat, identity fields alongside profile fields. That JSON is
/// the on-device snapshot format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl Session {
    pub fn new(identity: Identity, profile: UserProfile) -> Self {
        Self { identity, profile }
    }

    pub fn uid(&self) -> &UserId {
        &self.identity.uid
    }

    pub fn email(&self) -> Option<&str> {
        self.identity.email.as_deref()
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }

    /// Encodes the session as snapshot bytes.
    pub fn to_snapshot(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes snapshot bytes written by [`Session::to_snapshot`].
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Lifecycle status derived from a [`SessionView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// What readers of the session manager observe.
///
/// `session` may already be populated from a snapshot while `initialized`
/// is still false; consumers should not rely on it until initialization
/// completes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionView {
    pub session: Option<Session>,
    pub initialized: bool,
}

impl SessionView {
    pub fn status(&self) -> SessionStatus {
        match (self.initialized, &self.session) {
            (false, _) => SessionStatus::Initializing,
            (true, Some(_)) => SessionStatus::Authenticated,
            (true, None) => SessionStatus::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::AppSettings;
    use serde_json::json;

    fn session() -> Session {
        Session::new(
            Identity::new("U1", Some("jo@example.com".to_string())),
            UserProfile {
                first_name: "Jo".to_string(),
                role: Role::Admin,
                settings: AppSettings {
                    dark_mode: Some(true),
                    language: Some("en".to_string()),
                },
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_snapshot_is_flat_json() {
        let bytes = session().to_snapshot().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["uid"], "U1");
        assert_eq!(value["email"], "jo@example.com");
        assert_eq!(value["firstName"], "Jo");
        assert_eq!(value["role"], "admin");
        assert_eq!(value["settings"], json!({ "darkMode": true, "language": "en" }));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let original = session();
        let decoded = Session::from_snapshot(&original.to_snapshot().unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_malformed_snapshot_is_error() {
        assert!(Session::from_snapshot(b"{\"uid\":").is_err());
        // uid is required
        assert!(Session::from_snapshot(b"{\"firstName\":\"Jo\"}").is_err());
    }

    #[test]
    fn test_view_status() {
        let mut view = SessionView::default();
        assert_eq!(view.status(), SessionStatus::Initializing);

        view.session = Some(session());
        assert_eq!(view.status(), SessionStatus::Initializing);

        view.initialized = true;
        assert_eq!(view.status(), SessionStatus::Authenticated);
        assert!(view.is_authenticated());

        view.session = None;
        assert_eq!(view.status(), SessionStatus::Unauthenticated);
    }
}

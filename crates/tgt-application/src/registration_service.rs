//! Account registration use case.
//!
//! Creates an identity with the provider and writes the matching profile
//! document with the defaults every new member starts from.

use std::sync::Arc;

use chrono::Utc;
use tgt_core::auth::IdentityProvider;
use tgt_core::error::{Result, TgtError};
use tgt_core::session::Session;
use tgt_core::user::{
    AppSettings, Metrics, NotificationSettings, ProfileRepository, Role, Targets, UserProfile,
    VerificationStatus,
};

/// Input collected by the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    /// Checked against `password` when present.
    pub confirm_password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub business_number: String,
    pub phone_number: Option<String>,
    pub role: Role,
}

impl RegistrationRequest {
    fn validate(&self) -> Result<()> {
        let required = [
            ("email", &self.email),
            ("password", &self.password),
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("business number", &self.business_number),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(TgtError::validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        if let Some(confirm) = &self.confirm_password {
            if confirm != &self.password {
                return Err(TgtError::validation("passwords do not match"));
            }
        }
        Ok(())
    }

    /// Profile document written for a new account.
    fn initial_profile(&self) -> UserProfile {
        UserProfile {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            role: self.role,
            business_number: self.business_number.trim().to_string(),
            phone_number: self
                .phone_number
                .as_ref()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            debi_check_status: VerificationStatus::Pending,
            metrics: Metrics::initial(),
            targets: Targets::standard(),
            notification_settings: NotificationSettings::all_enabled(),
            settings: AppSettings {
                dark_mode: Some(true),
                language: Some(AppSettings::DEFAULT_LANGUAGE.to_string()),
            },
            created_at: Some(Utc::now()),
        }
    }
}

pub struct RegistrationService {
    identity_provider: Arc<dyn IdentityProvider>,
    profile_repository: Arc<dyn ProfileRepository>,
}

impl RegistrationService {
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        profile_repository: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            identity_provider,
            profile_repository,
        }
    }

    /// Validates `request`, creates the account and writes its profile.
    ///
    /// Providers sign a new account in immediately, so a running
    /// [`SessionManager`](crate::SessionManager) may see the identity before
    /// the profile document exists. Pass the returned identity to
    /// `handle_identity_change` to pick the session up.
    ///
    /// # Errors
    ///
    /// - `TgtError::Validation` for missing fields or a password mismatch
    /// - `TgtError::Auth` with the provider's code if account creation fails
    /// - the store error if the profile document cannot be written
    pub async fn register(&self, request: &RegistrationRequest) -> Result<Session> {
        request.validate()?;

        let identity = self
            .identity_provider
            .create_account(request.email.trim(), &request.password)
            .await?;
        tracing::info!("[RegistrationService] Created account {}", identity.uid);

        let profile = request.initial_profile();
        if let Err(e) = self.profile_repository.set(&identity.uid, &profile).await {
            tracing::error!(
                "[RegistrationService] Account {} created but profile write failed: {}",
                identity.uid,
                e
            );
            return Err(e);
        }

        Ok(Session::new(identity, profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tgt_core::auth::{AuthError, UserId};
    use tgt_infrastructure::{LocalIdentityProvider, MemoryProfileRepository};

    fn request() -> RegistrationRequest {
        RegistrationRequest {
            email: "jo@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: Some("secret1".to_string()),
            first_name: "Jo".to_string(),
            last_name: "Dube".to_string(),
            business_number: "BN-7".to_string(),
            phone_number: Some("  ".to_string()),
            role: Role::Admin,
        }
    }

    fn service(dir: &TempDir) -> (RegistrationService, Arc<MemoryProfileRepository>) {
        let auth = Arc::new(
            LocalIdentityProvider::open(dir.path().join("accounts.json"), 6).unwrap(),
        );
        let profiles = Arc::new(MemoryProfileRepository::new());
        (RegistrationService::new(auth, profiles.clone()), profiles)
    }

    #[tokio::test]
    async fn test_register_writes_initial_profile() {
        let dir = TempDir::new().unwrap();
        let (service, profiles) = service(&dir);

        let session = service.register(&request()).await.unwrap();

        let stored = profiles.find_by_id(session.uid()).await.unwrap().unwrap();
        assert_eq!(stored, session.profile);
        assert_eq!(stored.role, Role::Admin);
        assert_eq!(stored.debi_check_status, VerificationStatus::Pending);
        assert_eq!(stored.metrics, Metrics::initial());
        assert_eq!(stored.targets, Targets::standard());
        assert!(stored.settings.dark_mode());
        assert_eq!(stored.settings.language(), "en");
        assert_eq!(stored.phone_number, None);
        assert!(stored.created_at.is_some());
        assert_eq!(session.email(), Some("jo@example.com"));
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_before_provider() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);
        let mut req = request();
        req.first_name = " ".to_string();
        req.business_number.clear();

        let err = service.register(&req).await.unwrap_err();
        assert_eq!(
            err,
            TgtError::validation("missing required field(s): first name, business number")
        );
        assert!(!dir.path().join("accounts.json").exists());
    }

    #[tokio::test]
    async fn test_password_mismatch() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);
        let mut req = request();
        req.confirm_password = Some("secret2".to_string());

        let err = service.register(&req).await.unwrap_err();
        assert_eq!(err, TgtError::validation("passwords do not match"));
    }

    #[tokio::test]
    async fn test_duplicate_email_surfaces_provider_code() {
        let dir = TempDir::new().unwrap();
        let (service, profiles) = service(&dir);
        let first = service.register(&request()).await.unwrap();

        let mut again = request();
        again.first_name = "Imposter".to_string();
        let err = service.register(&again).await.unwrap_err();
        assert_eq!(err.auth_error(), Some(&AuthError::EmailAlreadyInUse));

        // The original profile is untouched
        let stored: UserId = first.uid().clone();
        assert_eq!(
            profiles.find_by_id(&stored).await.unwrap().unwrap().first_name,
            "Jo"
        );
    }
}

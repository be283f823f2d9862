//! End-to-end session flow over the local file-backed adapters.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use tgt_application::{RegistrationRequest, RegistrationService, SessionManager};
use tgt_core::auth::IdentityProvider;
use tgt_core::permissions::Capability;
use tgt_core::session::{SessionStatus, SnapshotStore};
use tgt_core::user::{AppSettings, ProfilePatch, Role};
use tgt_infrastructure::{FileSnapshotStore, JsonFileProfileRepository, LocalIdentityProvider};

struct Backend {
    auth: Arc<LocalIdentityProvider>,
    profiles: Arc<JsonFileProfileRepository>,
    snapshots: Arc<FileSnapshotStore>,
}

fn backend(dir: &Path) -> Backend {
    Backend {
        auth: Arc::new(LocalIdentityProvider::open(dir.join("accounts.json"), 6).unwrap()),
        profiles: Arc::new(JsonFileProfileRepository::new(dir.join("users.json"))),
        snapshots: Arc::new(FileSnapshotStore::new(dir.join("session.json"))),
    }
}

fn manager(backend: &Backend) -> Arc<SessionManager> {
    Arc::new(SessionManager::new(
        backend.auth.clone(),
        backend.profiles.clone(),
        backend.snapshots.clone(),
    ))
}

fn registration() -> RegistrationRequest {
    RegistrationRequest {
        email: "lead@example.com".to_string(),
        password: "secret1".to_string(),
        confirm_password: None,
        first_name: "Thandi".to_string(),
        last_name: "Mokoena".to_string(),
        business_number: "BN-100".to_string(),
        phone_number: None,
        role: Role::User,
    }
}

#[tokio::test]
async fn register_update_restart_logout() {
    let dir = TempDir::new().unwrap();
    let b = backend(dir.path());

    let registered = RegistrationService::new(b.auth.clone(), b.profiles.clone())
        .register(&registration())
        .await
        .unwrap();

    let first = manager(&b);
    first
        .handle_identity_change(Some(registered.identity.clone()))
        .await;
    assert_eq!(
        first.current_session().status(),
        SessionStatus::Authenticated
    );
    assert!(!first.capabilities().can(Capability::InviteMembers));

    // Spread the current settings to change only dark mode
    let current = first.current_session().session.unwrap();
    first
        .update(&ProfilePatch {
            settings: Some(AppSettings {
                dark_mode: Some(false),
                ..current.profile.settings.clone()
            }),
            ..Default::default()
        })
        .await
        .unwrap();

    // A fresh process sees the same session
    let b2 = backend(dir.path());
    let second = manager(&b2);
    let handle = second.start();
    let view = second.wait_until_initialized().await.unwrap();
    assert_eq!(view.status(), SessionStatus::Authenticated);
    let session = view.session.unwrap();
    assert_eq!(session.uid(), registered.uid());
    assert!(!session.profile.settings.dark_mode());
    assert_eq!(session.profile.settings.language(), "en");

    second.logout().await.unwrap();
    assert!(b2.snapshots.load().await.unwrap().is_none());
    assert!(!dir.path().join("session.json").exists());
    assert_eq!(
        second.current_session().status(),
        SessionStatus::Unauthenticated
    );

    handle.abort();
}

#[tokio::test]
async fn restart_after_profile_removed() {
    let dir = TempDir::new().unwrap();
    let b = backend(dir.path());

    let registered = RegistrationService::new(b.auth.clone(), b.profiles.clone())
        .register(&registration())
        .await
        .unwrap();
    let first = manager(&b);
    first
        .handle_identity_change(Some(registered.identity.clone()))
        .await;
    assert!(dir.path().join("session.json").exists());

    // Profile document deleted remotely while the app was closed
    std::fs::write(dir.path().join("users.json"), "{}").unwrap();

    let b2 = backend(dir.path());
    let second = manager(&b2);
    let handle = second.start();
    let view = second.wait_until_initialized().await.unwrap();

    assert_eq!(view.status(), SessionStatus::Unauthenticated);
    assert!(b2.snapshots.load().await.unwrap().is_none());

    handle.abort();
}

#[tokio::test]
async fn sign_in_through_manager() {
    let dir = TempDir::new().unwrap();
    let b = backend(dir.path());
    let registered = RegistrationService::new(b.auth.clone(), b.profiles.clone())
        .register(&registration())
        .await
        .unwrap();
    b.auth.sign_out().await.unwrap();

    let m = manager(&b);
    let handle = m.start();
    assert_eq!(
        m.wait_until_initialized().await.unwrap().status(),
        SessionStatus::Unauthenticated
    );

    let err = m.sign_in("lead@example.com", "wrong-pass").await.unwrap_err();
    assert!(err.auth_error().is_some());

    let identity = m.sign_in("lead@example.com", "secret1").await.unwrap();
    assert_eq!(&identity.uid, registered.uid());
    let view = m.wait_for(|v| v.session.is_some()).await.unwrap();
    assert_eq!(view.session.unwrap().profile.first_name, "Thandi");

    handle.abort();
}

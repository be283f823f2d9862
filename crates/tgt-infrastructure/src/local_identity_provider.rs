//! Local identity provider.
//!
//! Stands in for the managed authentication service when running without a
//! backend. Accounts live in `accounts.json` with argon2 password hashes,
//! and the signed-in uid is remembered across restarts the way mobile auth
//! SDKs persist their session.

use std::path::PathBuf;
use std::sync::Arc;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex as SyncMutex;
use password_hash::{PasswordHash, SaltString};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tgt_core::auth::{AuthError, Identity, IdentityEvents, IdentityProvider};
use tgt_core::{Result, TgtError};
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::paths::{ServiceType, TgtPaths};
use crate::storage::AtomicJsonFile;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Account {
    uid: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl Account {
    fn identity(&self) -> Identity {
        Identity::new(self.uid.clone(), Some(self.email.clone()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AccountsFile {
    accounts: Vec<Account>,
    current_uid: Option<String>,
}

impl AccountsFile {
    fn find_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
    }

    fn current(&self) -> Option<Identity> {
        let uid = self.current_uid.as_deref()?;
        self.accounts
            .iter()
            .find(|a| a.uid == uid)
            .map(Account::identity)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| TgtError::internal(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| TgtError::internal(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| TgtError::internal(e.to_string()))?
        .to_string();
    Ok(phc)
}

fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// File-backed [`IdentityProvider`] with in-process change notifications.
#[derive(Clone)]
pub struct LocalIdentityProvider {
    file: Arc<Mutex<AtomicJsonFile<AccountsFile>>>,
    current: Arc<SyncMutex<Option<Identity>>>,
    subscribers: Arc<SyncMutex<Vec<UnboundedSender<Option<Identity>>>>>,
    email_pattern: Regex,
    min_password_length: usize,
}

impl LocalIdentityProvider {
    /// Opens (or lazily creates) the accounts file at `path`.
    pub fn open(path: PathBuf, min_password_length: usize) -> Result<Self> {
        let file = AtomicJsonFile::<AccountsFile>::new(path);
        let current = file.load()?.unwrap_or_default().current();
        let email_pattern =
            Regex::new(EMAIL_PATTERN).map_err(|e| TgtError::internal(e.to_string()))?;

        Ok(Self {
            file: Arc::new(Mutex::new(file)),
            current: Arc::new(SyncMutex::new(current)),
            subscribers: Arc::new(SyncMutex::new(Vec::new())),
            email_pattern,
            min_password_length,
        })
    }

    pub fn from_paths(paths: &TgtPaths, min_password_length: usize) -> Result<Self> {
        Self::open(paths.get_path(ServiceType::Accounts)?, min_password_length)
    }

    /// The identity currently signed in, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        self.current.lock().clone()
    }

    fn validate_email(&self, email: &str) -> Result<()> {
        if self.email_pattern.is_match(email) {
            Ok(())
        } else {
            Err(AuthError::InvalidEmail.into())
        }
    }

    /// Records `identity` as current and notifies live subscribers.
    fn publish(&self, identity: Option<Identity>) {
        let mut subscribers = self.subscribers.lock();
        *self.current.lock() = identity.clone();
        subscribers.retain(|tx| tx.send(identity.clone()).is_ok());
        tracing::debug!(
            "[LocalIdentityProvider] Notified {} subscriber(s)",
            subscribers.len()
        );
    }

    async fn with_file<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&AtomicJsonFile<AccountsFile>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || {
            let file = file.blocking_lock();
            f(&file)
        })
        .await
        .map_err(|e| TgtError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        self.validate_email(email)?;
        let email = email.to_string();
        let password = password.to_string();

        let identity = self
            .with_file(move |file| {
                file.update(AccountsFile::default(), |accounts| {
                    let account = accounts
                        .find_by_email(&email)
                        .ok_or(AuthError::UserNotFound)?;
                    if !verify_password(&account.password_hash, &password) {
                        return Err(AuthError::WrongPassword.into());
                    }
                    let identity = account.identity();
                    accounts.current_uid = Some(identity.uid.to_string());
                    Ok(identity)
                })
            })
            .await?;

        tracing::info!("[LocalIdentityProvider] Signed in {}", identity.uid);
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity> {
        self.validate_email(email)?;
        if password.chars().count() < self.min_password_length {
            return Err(AuthError::WeakPassword.into());
        }
        let email = email.to_string();
        let password = password.to_string();

        let identity = self
            .with_file(move |file| {
                file.update(AccountsFile::default(), |accounts| {
                    if accounts.find_by_email(&email).is_some() {
                        return Err(AuthError::EmailAlreadyInUse.into());
                    }
                    let account = Account {
                        uid: uuid::Uuid::new_v4().simple().to_string(),
                        email,
                        password_hash: hash_password(&password)?,
                        created_at: Utc::now(),
                    };
                    let identity = account.identity();
                    accounts.current_uid = Some(account.uid.clone());
                    accounts.accounts.push(account);
                    Ok(identity)
                })
            })
            .await?;

        tracing::info!("[LocalIdentityProvider] Created account {}", identity.uid);
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        self.with_file(|file| {
            file.update(AccountsFile::default(), |accounts| {
                accounts.current_uid = None;
                Ok(())
            })
        })
        .await?;

        tracing::info!("[LocalIdentityProvider] Signed out");
        self.publish(None);
        Ok(())
    }

    fn subscribe(&self) -> IdentityEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscribers = self.subscribers.lock();
        // Current state first, under the same lock as registration
        let _ = tx.send(self.current.lock().clone());
        subscribers.push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn provider(dir: &TempDir) -> LocalIdentityProvider {
        LocalIdentityProvider::open(dir.path().join("accounts.json"), 6).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_sign_in() {
        let dir = TempDir::new().unwrap();
        let auth = provider(&dir);

        let created = auth.create_account("jo@example.com", "secret1").await.unwrap();
        assert_eq!(created.email.as_deref(), Some("jo@example.com"));
        assert_eq!(auth.current_identity(), Some(created.clone()));

        auth.sign_out().await.unwrap();
        assert!(auth.current_identity().is_none());

        let signed_in = auth.sign_in("JO@example.com", "secret1").await.unwrap();
        assert_eq!(signed_in.uid, created.uid);
    }

    #[tokio::test]
    async fn test_error_codes() {
        let dir = TempDir::new().unwrap();
        let auth = provider(&dir);
        auth.create_account("jo@example.com", "secret1").await.unwrap();

        let code = |r: Result<Identity>| r.unwrap_err().auth_error().cloned();
        assert_eq!(
            code(auth.sign_in("not-an-email", "x").await),
            Some(AuthError::InvalidEmail)
        );
        assert_eq!(
            code(auth.sign_in("jo@example.com", "wrong!!").await),
            Some(AuthError::WrongPassword)
        );
        assert_eq!(
            code(auth.sign_in("al@example.com", "secret1").await),
            Some(AuthError::UserNotFound)
        );
        assert_eq!(
            code(auth.create_account("jo@example.com", "secret2").await),
            Some(AuthError::EmailAlreadyInUse)
        );
        assert_eq!(
            code(auth.create_account("al@example.com", "12345").await),
            Some(AuthError::WeakPassword)
        );
    }

    #[tokio::test]
    async fn test_subscribe_emits_current_then_changes() {
        let dir = TempDir::new().unwrap();
        let auth = provider(&dir);

        let mut events = auth.subscribe();
        assert_eq!(events.recv().await, Some(None));

        let identity = auth.create_account("jo@example.com", "secret1").await.unwrap();
        assert_eq!(events.recv().await, Some(Some(identity)));

        auth.sign_out().await.unwrap();
        assert_eq!(events.recv().await, Some(None));
    }

    #[tokio::test]
    async fn test_current_identity_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let identity = provider(&dir)
            .create_account("jo@example.com", "secret1")
            .await
            .unwrap();

        let reopened = provider(&dir);
        let mut events = reopened.subscribe();
        assert_eq!(events.recv().await, Some(Some(identity)));
    }

    #[test]
    fn test_password_hash_verifies() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password(&hash, "secret1"));
        assert!(!verify_password(&hash, "secret2"));
        assert!(!verify_password("not-a-phc-string", "secret1"));
    }
}

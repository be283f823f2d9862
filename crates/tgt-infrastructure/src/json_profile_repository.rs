//! File-backed profile document store.
//!
//! Keeps every document in one `users.json` object keyed by uid. Patches
//! are merged at the JSON-object level, the same contract the managed
//! document database offers.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tgt_core::auth::UserId;
use tgt_core::user::{
    ProfileDocument, ProfilePatch, ProfileRepository, UserProfile, shallow_merge,
};
use tgt_core::{Result, TgtError};
use tokio::sync::Mutex;

use crate::memory_profile_repository::{from_document, to_document};
use crate::paths::{ServiceType, TgtPaths};
use crate::storage::AtomicJsonFile;

type DocumentMap = BTreeMap<String, ProfileDocument>;

#[derive(Clone)]
pub struct JsonFileProfileRepository {
    file: Arc<Mutex<AtomicJsonFile<DocumentMap>>>,
}

impl JsonFileProfileRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(Mutex::new(AtomicJsonFile::new(path))),
        }
    }

    pub fn from_paths(paths: &TgtPaths) -> Result<Self> {
        Ok(Self::new(paths.get_path(ServiceType::Profiles)?))
    }

    /// Runs `f` against the document map on the blocking pool.
    async fn with_file<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&AtomicJsonFile<DocumentMap>) -> Result<R> + Send + 'static,
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
impl ProfileRepository for JsonFileProfileRepository {
    async fn find_by_id(&self, uid: &UserId) -> Result<Option<UserProfile>> {
        let key = uid.to_string();
        let document = self
            .with_file(move |file| Ok(file.load()?.and_then(|mut docs| docs.remove(&key))))
            .await?;
        document.map(from_document).transpose()
    }

    async fn list(&self) -> Result<Vec<(UserId, UserProfile)>> {
        let documents = self
            .with_file(|file| Ok(file.load()?.unwrap_or_default()))
            .await?;
        documents
            .into_iter()
            .map(|(uid, doc)| Ok((UserId::from(uid), from_document(doc)?)))
            .collect()
    }

    async fn set(&self, uid: &UserId, profile: &UserProfile) -> Result<()> {
        let key = uid.to_string();
        let document = to_document(profile)?;
        self.with_file(move |file| {
            file.update(DocumentMap::new(), |docs| {
                docs.insert(key, document);
                Ok(())
            })
        })
        .await?;
        tracing::debug!("[JsonFileProfileRepository] Set profile {}", uid);
        Ok(())
    }

    async fn update(&self, uid: &UserId, patch: &ProfilePatch) -> Result<()> {
        let key = uid.to_string();
        let patch = patch.to_document()?;
        self.with_file(move |file| {
            file.update(DocumentMap::new(), |docs| {
                let document = docs
                    .get_mut(&key)
                    .ok_or_else(|| TgtError::not_found("profile", key.clone()))?;
                shallow_merge(document, patch);
                Ok(())
            })
        })
        .await?;
        tracing::debug!("[JsonFileProfileRepository] Updated profile {}", uid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tgt_core::user::{Metrics, Role};

    #[tokio::test]
    async fn test_set_then_find() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonFileProfileRepository::new(temp_dir.path().join("users.json"));
        let uid = UserId::from("U1");
        let profile = UserProfile {
            first_name: "Jo".to_string(),
            role: Role::Admin,
            metrics: Metrics::initial(),
            ..Default::default()
        };

        repo.set(&uid, &profile).await.unwrap();
        assert_eq!(repo.find_by_id(&uid).await.unwrap(), Some(profile));
        assert!(repo.find_by_id(&UserId::from("U2")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");
        let uid = UserId::from("U1");

        let repo = JsonFileProfileRepository::new(path.clone());
        repo.set(&uid, &UserProfile::default()).await.unwrap();
        repo.update(
            &uid,
            &ProfilePatch {
                metrics: Some(Metrics {
                    total_recruits: Some(4),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let reopened = JsonFileProfileRepository::new(path);
        let profile = reopened.find_by_id(&uid).await.unwrap().unwrap();
        assert_eq!(profile.metrics.total_recruits, Some(4));
        assert_eq!(profile.metrics.total_invites, None);
    }

    #[tokio::test]
    async fn test_list_reads_every_document() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonFileProfileRepository::new(temp_dir.path().join("users.json"));
        assert!(repo.list().await.unwrap().is_empty());

        let admin = UserProfile {
            role: Role::Admin,
            ..Default::default()
        };
        repo.set(&UserId::from("b"), &UserProfile::default()).await.unwrap();
        repo.set(&UserId::from("a"), &admin).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], (UserId::from("a"), admin));
        assert_eq!(listed[1].0, UserId::from("b"));
    }

    #[tokio::test]
    async fn test_update_missing_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");
        let repo = JsonFileProfileRepository::new(path.clone());

        let err = repo
            .update(&UserId::from("ghost"), &ProfilePatch::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!path.exists());
    }
}

//! In-memory profile document store.
//!
//! Holds raw JSON documents and applies patches with [`shallow_merge`], so
//! it behaves like the managed document database for tests and demos.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tgt_core::auth::UserId;
use tgt_core::user::{
    ProfileDocument, ProfilePatch, ProfileRepository, UserProfile, shallow_merge,
};
use tgt_core::{Result, TgtError};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryProfileRepository {
    documents: Arc<RwLock<HashMap<UserId, ProfileDocument>>>,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw document, bypassing the typed model.
    pub async fn insert_document(&self, uid: impl Into<UserId>, document: ProfileDocument) {
        self.documents.write().await.insert(uid.into(), document);
    }

    pub async fn remove(&self, uid: &UserId) -> Option<ProfileDocument> {
        self.documents.write().await.remove(uid)
    }

    /// Returns the raw stored document.
    pub async fn document(&self, uid: &UserId) -> Option<ProfileDocument> {
        self.documents.read().await.get(uid).cloned()
    }
}

pub(crate) fn to_document(profile: &UserProfile) -> Result<ProfileDocument> {
    match serde_json::to_value(profile)? {
        Value::Object(map) => Ok(map),
        other => Err(TgtError::internal(format!(
            "profile serialized to non-object: {other}"
        ))),
    }
}

pub(crate) fn from_document(document: ProfileDocument) -> Result<UserProfile> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn find_by_id(&self, uid: &UserId) -> Result<Option<UserProfile>> {
        let documents = self.documents.read().await;
        documents.get(uid).cloned().map(from_document).transpose()
    }

    async fn list(&self) -> Result<Vec<(UserId, UserProfile)>> {
        let documents = self.documents.read().await;
        let mut profiles = documents
            .iter()
            .map(|(uid, doc)| Ok((uid.clone(), from_document(doc.clone())?)))
            .collect::<Result<Vec<_>>>()?;
        profiles.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
        Ok(profiles)
    }

    async fn set(&self, uid: &UserId, profile: &UserProfile) -> Result<()> {
        let document = to_document(profile)?;
        self.documents.write().await.insert(uid.clone(), document);
        Ok(())
    }

    async fn update(&self, uid: &UserId, patch: &ProfilePatch) -> Result<()> {
        let patch = patch.to_document()?;
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(uid)
            .ok_or_else(|| TgtError::not_found("profile", uid.as_str()))?;
        shallow_merge(document, patch);
        Ok(())
    }
}

//! Profile repository trait.
//!
//! Defines the interface to the remote profile document store.

use async_trait::async_trait;

use super::model::UserProfile;
use super::patch::ProfilePatch;
use crate::auth::UserId;
use crate::error::Result;

/// An abstract remote store holding one profile document per user id.
///
/// # Implementation Notes
///
/// `update` must follow the backend's partial-update contract: a shallow
/// merge at the top level where nested sub-records in the patch replace the
/// stored ones wholesale. Updating a document that does not exist is an
/// error, not an upsert.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds the profile document for `uid`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UserProfile))`: Document found
    /// - `Ok(None)`: No document for this id
    /// - `Err(_)`: The store could not be reached or the document is unreadable
    async fn find_by_id(&self, uid: &UserId) -> Result<Option<UserProfile>>;

    /// Every stored document with its id, ordered by id.
    async fn list(&self) -> Result<Vec<(UserId, UserProfile)>>;

    /// Writes the whole document for `uid`, replacing any existing one.
    async fn set(&self, uid: &UserId, profile: &UserProfile) -> Result<()>;

    /// Merges `patch` into the existing document for `uid`.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Patch applied
    /// - `Err(TgtError::NotFound)`: No document for this id
    /// - `Err(_)`: The write failed; the stored document is unchanged
    async fn update(&self, uid: &UserId, patch: &ProfilePatch) -> Result<()>;
}

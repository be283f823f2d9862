//! Identity provider trait.
//!
//! Defines the contract for the external authentication service.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use super::model::Identity;
use crate::error::Result;

/// Stream of identity-change notifications.
///
/// `Some` carries the newly authenticated identity, `None` reports that the
/// identity was cleared. Dropping the receiver unsubscribes.
pub type IdentityEvents = UnboundedReceiver<Option<Identity>>;

/// An abstract external identity provider.
///
/// Decouples the session manager from a specific authentication SDK.
///
/// # Implementation Notes
///
/// - `subscribe` must deliver the provider's current identity (or `None`)
///   as the first notification to every new subscriber.
/// - Failures are reported as [`TgtError::Auth`](crate::error::TgtError::Auth)
///   carrying one of the closed [`AuthError`](super::AuthError) codes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Signs in with email and password.
    ///
    /// On success subscribers also receive `Some(identity)`.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// Creates a new account and signs it in.
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity>;

    /// Signs the current identity out.
    ///
    /// On success subscribers also receive `None`.
    async fn sign_out(&self) -> Result<()>;

    /// Subscribes to identity-change notifications.
    fn subscribe(&self) -> IdentityEvents;
}

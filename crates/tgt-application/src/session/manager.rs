use std::sync::Arc;

use tgt_core::auth::{Identity, IdentityEvents, IdentityProvider};
use tgt_core::error::{Result, TgtError};
use tgt_core::permissions::Capabilities;
use tgt_core::session::{Session, SessionView, SnapshotStore};
use tgt_core::user::{ProfilePatch, ProfileRepository};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

/// Owns the signed-in user's session and keeps it in sync with the
/// identity provider, the remote profile store and the local snapshot.
///
/// `SessionManager` is responsible for:
/// - Restoring the last session from the snapshot and revalidating it
/// - Following identity-change notifications from the provider
/// - Applying profile updates remote-first
/// - Signing out
///
/// Every state transition runs under a single lock, so at most one
/// operation is in flight and snapshot writes never interleave. Readers go
/// through [`current_session`](Self::current_session) or
/// [`subscribe`](Self::subscribe); nothing else can mutate the session.
pub struct SessionManager {
    identity_provider: Arc<dyn IdentityProvider>,
    profile_repository: Arc<dyn ProfileRepository>,
    snapshot_store: Arc<dyn SnapshotStore>,
    view: watch::Sender<SessionView>,
    op_lock: Mutex<()>,
}

impl SessionManager {
    /// Creates a manager in the `Initializing` state.
    ///
    /// # Arguments
    ///
    /// * `identity_provider` - External authentication service
    /// * `profile_repository` - Remote profile document store
    /// * `snapshot_store` - On-device cache of the last-known session
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        profile_repository: Arc<dyn ProfileRepository>,
        snapshot_store: Arc<dyn SnapshotStore>,
    ) -> Self {
        let (view, _) = watch::channel(SessionView::default());
        Self {
            identity_provider,
            profile_repository,
            snapshot_store,
            view,
            op_lock: Mutex::new(()),
        }
    }

    /// Starts the manager on the current tokio runtime.
    ///
    /// Subscribes to the provider first so no notification is missed, then
    /// restores the snapshot, then consumes notifications one at a time for
    /// as long as the provider keeps the channel open.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let events = self.identity_provider.subscribe();
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = manager.restore().await {
                tracing::warn!("[SessionManager] Snapshot revalidation failed: {}", e);
            }
            manager.run(events).await;
        })
    }

    /// Processes identity notifications until the channel closes.
    pub async fn run(&self, mut events: IdentityEvents) {
        while let Some(identity) = events.recv().await {
            self.handle_identity_change(identity).await;
        }
        tracing::debug!("[SessionManager] Identity notifications closed");
    }

    /// Restores the persisted snapshot, if any, and revalidates it.
    ///
    /// The snapshot is published immediately, then replaced by the remote
    /// profile (remote wins over stale local fields) before the snapshot is
    /// rewritten; a failed rewrite is logged. A malformed snapshot or a
    /// missing remote document clears both the session and the snapshot.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if a session was restored, `Ok(false)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the store error if the snapshot cannot be read or the remote
    /// profile cannot be fetched. In the latter case the session and the
    /// snapshot are cleared before returning.
    pub async fn restore(&self) -> Result<bool> {
        let _guard = self.op_lock.lock().await;

        let Some(bytes) = self.snapshot_store.load().await? else {
            tracing::debug!("[SessionManager] No persisted session");
            return Ok(false);
        };

        let snapshot = match Session::from_snapshot(&bytes) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("[SessionManager] Discarding malformed snapshot: {}", e);
                self.snapshot_store.clear().await?;
                return Ok(false);
            }
        };

        let uid = snapshot.uid().clone();
        self.publish(Some(snapshot.clone()));

        match self.profile_repository.find_by_id(&uid).await {
            Ok(Some(profile)) => {
                let session = Session::new(snapshot.identity, profile);
                self.publish(Some(session.clone()));
                if let Err(e) = self.persist(&session).await {
                    tracing::warn!("[SessionManager] Failed to refresh snapshot: {}", e);
                }
                tracing::info!("[SessionManager] Restored session for {}", uid);
                Ok(true)
            }
            Ok(None) => {
                tracing::warn!(
                    "[SessionManager] Profile for persisted session {} no longer exists",
                    uid
                );
                self.discard_session().await;
                Ok(false)
            }
            Err(e) => {
                tracing::error!(
                    "[SessionManager] Failed to revalidate session {}: {}",
                    uid,
                    e
                );
                self.discard_session().await;
                Err(e)
            }
        }
    }

    /// Applies one identity-change notification.
    ///
    /// `Some` fetches the profile document and, if it exists, makes it the
    /// session. A missing document is logged and clears the session and the
    /// snapshot. A failed fetch is logged and leaves the manager signed out
    /// with the snapshot intact. `None` clears the session.
    pub async fn handle_identity_change(&self, identity: Option<Identity>) {
        let _guard = self.op_lock.lock().await;

        match identity {
            Some(identity) => {
                let uid = identity.uid.clone();
                match self.profile_repository.find_by_id(&uid).await {
                    Ok(Some(profile)) => {
                        let session = Session::new(identity, profile);
                        if let Err(e) = self.persist(&session).await {
                            tracing::warn!("[SessionManager] Failed to persist session: {}", e);
                        }
                        self.publish(Some(session));
                        tracing::info!("[SessionManager] Authenticated {}", uid);
                    }
                    Ok(None) => {
                        tracing::error!(
                            "[SessionManager] Profile document not found for {}",
                            uid
                        );
                        self.discard_session().await;
                    }
                    Err(e) => {
                        // Keep the snapshot for offline continuity
                        tracing::error!(
                            "[SessionManager] Failed to fetch profile for {}: {}",
                            uid,
                            e
                        );
                        self.publish(None);
                    }
                }
            }
            None => {
                tracing::info!("[SessionManager] Identity cleared");
                self.discard_session().await;
            }
        }

        self.view.send_if_modified(|view| {
            let changed = !view.initialized;
            view.initialized = true;
            changed
        });
    }

    /// Signs in through the identity provider.
    ///
    /// The session itself is populated when the resulting notification is
    /// processed; use [`wait_for`](Self::wait_for) to observe it.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        self.identity_provider.sign_in(email, password).await
    }

    /// Merges `patch` into the signed-in user's profile.
    ///
    /// The remote document is written first; the in-memory session and the
    /// snapshot change only after that succeeds. Sub-records carried by the
    /// patch replace the stored ones wholesale.
    ///
    /// Does nothing when no session is active.
    ///
    /// # Errors
    ///
    /// Returns the remote store error unchanged; the session is untouched.
    pub async fn update(&self, patch: &ProfilePatch) -> Result<()> {
        let _guard = self.op_lock.lock().await;

        let current = self.view.borrow().session.clone();
        let Some(current) = current else {
            tracing::debug!("[SessionManager] Ignoring update without a session");
            return Ok(());
        };

        if let Err(e) = self.profile_repository.update(current.uid(), patch).await {
            tracing::error!("[SessionManager] Error updating profile: {}", e);
            return Err(e);
        }

        let mut next = current;
        next.profile.apply(patch);
        self.publish(Some(next.clone()));
        self.persist(&next).await
    }

    /// Signs out and clears the local session.
    ///
    /// Safe to call when already signed out.
    ///
    /// # Errors
    ///
    /// If the provider rejects the sign-out its error is returned and the
    /// local session and snapshot are kept, so the call can be retried.
    pub async fn logout(&self) -> Result<()> {
        let _guard = self.op_lock.lock().await;

        if let Err(e) = self.identity_provider.sign_out().await {
            tracing::error!("[SessionManager] Error logging out: {}", e);
            return Err(e);
        }

        self.publish(None);
        self.snapshot_store.clear().await
    }

    /// Returns the current session (or none) and whether initialization
    /// has completed.
    pub fn current_session(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// Receiver that observes every published [`SessionView`].
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.subscribe()
    }

    /// Capability view of the current session.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_session(self.view.borrow().session.as_ref())
    }

    /// Waits until `predicate` holds for the published view.
    pub async fn wait_for<F>(&self, predicate: F) -> Result<SessionView>
    where
        F: FnMut(&SessionView) -> bool,
    {
        let mut rx = self.view.subscribe();
        let view = rx
            .wait_for(predicate)
            .await
            .map_err(|e| TgtError::internal(format!("Session channel closed: {}", e)))?;
        Ok(view.clone())
    }

    pub async fn wait_until_initialized(&self) -> Result<SessionView> {
        self.wait_for(|view| view.initialized).await
    }

    fn publish(&self, session: Option<Session>) {
        self.view.send_modify(|view| view.session = session);
    }

    async fn persist(&self, session: &Session) -> Result<()> {
        self.snapshot_store.save(&session.to_snapshot()?).await
    }

    /// Publishes an empty session and drops the snapshot.
    async fn discard_session(&self) {
        self.publish(None);
        if let Err(e) = self.snapshot_store.clear().await {
            tracing::warn!("[SessionManager] Failed to clear snapshot: {}", e);
        }
    }
}

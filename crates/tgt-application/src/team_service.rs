//! Admin team management.
//!
//! Lists the team's members and changes their verification status and
//! daily targets. Every operation is checked against the capabilities of the
//! signed-in session before the store is touched.

use std::sync::Arc;

use tgt_core::auth::UserId;
use tgt_core::error::{Result, TgtError};
use tgt_core::permissions::Capability;
use tgt_core::user::{
    ProfilePatch, ProfileRepository, Role, Targets, UserProfile, VerificationStatus,
};

use crate::SessionManager;

/// A team member's profile document with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMember {
    pub uid: UserId,
    pub profile: UserProfile,
}

pub struct TeamService {
    session_manager: Arc<SessionManager>,
    profile_repository: Arc<dyn ProfileRepository>,
}

impl TeamService {
    pub fn new(
        session_manager: Arc<SessionManager>,
        profile_repository: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            session_manager,
            profile_repository,
        }
    }

    /// Profiles with the `user` role, ordered by id.
    ///
    /// Requires `manageUsers`.
    pub async fn list_members(&self) -> Result<Vec<TeamMember>> {
        self.require(Capability::ManageUsers)?;

        let members = self
            .profile_repository
            .list()
            .await?
            .into_iter()
            .filter(|(_, profile)| profile.role == Role::User)
            .map(|(uid, profile)| TeamMember { uid, profile })
            .collect();
        Ok(members)
    }

    /// Sets a member's debit-order verification status.
    ///
    /// Requires `manageUsers`.
    pub async fn set_member_status(
        &self,
        uid: &UserId,
        status: VerificationStatus,
    ) -> Result<()> {
        self.require(Capability::ManageUsers)?;

        let patch = ProfilePatch {
            debi_check_status: Some(status),
            ..Default::default()
        };
        self.patch_member(uid, &patch).await?;
        tracing::info!("[TeamService] Set status of {} to {}", uid, status);
        Ok(())
    }

    /// Replaces a member's daily targets.
    ///
    /// Requires `editTeamTargets`.
    pub async fn set_member_targets(&self, uid: &UserId, targets: Targets) -> Result<()> {
        self.require(Capability::EditTeamTargets)?;

        let patch = ProfilePatch {
            targets: Some(targets),
            ..Default::default()
        };
        self.patch_member(uid, &patch).await?;
        tracing::info!("[TeamService] Updated targets of {}", uid);
        Ok(())
    }

    fn require(&self, capability: Capability) -> Result<()> {
        if self.session_manager.capabilities().can(capability) {
            return Ok(());
        }
        tracing::warn!("[TeamService] Refused: {} required", capability);
        Err(TgtError::permission_denied(format!(
            "{} capability required",
            capability
        )))
    }

    /// Writes `patch` to `uid`'s document. Changes to the acting user's own
    /// document go through the session manager so the session follows.
    async fn patch_member(&self, uid: &UserId, patch: &ProfilePatch) -> Result<()> {
        let acting = self.session_manager.current_session().session;
        if acting.as_ref().map(|s| s.uid()) == Some(uid) {
            self.session_manager.update(patch).await
        } else {
            self.profile_repository.update(uid, patch).await
        }
    }
}

//! Capability view derived from the session role.
//!
//! Pure and recomputed on every read; nothing here is persisted.

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::session::Session;
use crate::user::Role;

/// Something a signed-in user may be allowed to do.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumIter, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Capability {
    ManageUsers,
    ManagePermissions,
    ViewAdminControls,
    EditTeamTargets,
    InviteMembers,
    ViewPerformanceMetrics,
    LogActivities,
    ViewProfile,
    EditProfile,
    ViewTeam,
}

impl Capability {
    /// Granted to every authenticated role, not only admins.
    pub fn is_member_capability(self) -> bool {
        matches!(
            self,
            Self::ViewPerformanceMetrics
                | Self::LogActivities
                | Self::ViewProfile
                | Self::EditProfile
                | Self::ViewTeam
        )
    }
}

/// Fixed capability map for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    role: Option<Role>,
}

impl Capabilities {
    /// Capabilities of `role`; `None` means signed out and grants nothing.
    pub fn for_role(role: Option<Role>) -> Self {
        Self { role }
    }

    pub fn for_session(session: Option<&Session>) -> Self {
        Self::for_role(session.map(Session::role))
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn can(&self, capability: Capability) -> bool {
        match self.role {
            None => false,
            Some(Role::Admin) => true,
            Some(Role::User) => capability.is_member_capability(),
        }
    }

    /// Every capability paired with whether it is granted.
    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        Capability::iter().map(move |c| (c, self.can(c)))
    }

    pub fn granted(&self) -> Vec<Capability> {
        self.iter().filter(|(_, ok)| *ok).map(|(c, _)| c).collect()
    }
}

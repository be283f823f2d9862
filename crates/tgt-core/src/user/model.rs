//! UserProfile domain model.
//!
//! Mirrors the remote profile document stored per user id. Field names are
//! camelCase on the wire to match the documents written by the mobile client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Role attached to a profile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    /// Older team-management screens wrote `member` for regular users.
    #[default]
    #[serde(alias = "member")]
    User,
}

/// Debit-order verification status of a team member.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VerificationStatus {
    #[serde(alias = "Active")]
    Active,
    #[default]
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Inactive")]
    Inactive,
}

/// Growth counters tracked for a member.
///
/// Fields are optional because the document store replaces the whole
/// sub-record on update; a patch that omits a counter drops it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_invites: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_presentations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_recruits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_level: Option<u32>,
}

impl Metrics {
    /// Counters for a freshly registered member.
    pub fn initial() -> Self {
        Self {
            total_invites: Some(0),
            total_presentations: Some(0),
            total_recruits: Some(0),
            current_level: Some(1),
        }
    }

    pub fn total_invites(&self) -> u32 {
        self.total_invites.unwrap_or(0)
    }

    pub fn total_presentations(&self) -> u32 {
        self.total_presentations.unwrap_or(0)
    }

    pub fn total_recruits(&self) -> u32 {
        self.total_recruits.unwrap_or(0)
    }

    pub fn current_level(&self) -> u32 {
        self.current_level.unwrap_or(1)
    }
}

/// Daily activity targets an admin sets for a member.
///
/// Optional for the same reason as [`Metrics`]; accessors fall back to the
/// team defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Targets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invites: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruits: Option<u32>,
}

impl Targets {
    pub const DEFAULT_INVITES: u32 = 10;
    pub const DEFAULT_PRESENTATIONS: u32 = 5;
    pub const DEFAULT_RECRUITS: u32 = 2;

    /// Targets every new member starts with.
    pub fn standard() -> Self {
        Self::new(
            Self::DEFAULT_INVITES,
            Self::DEFAULT_PRESENTATIONS,
            Self::DEFAULT_RECRUITS,
        )
    }

    pub fn new(invites: u32, presentations: u32, recruits: u32) -> Self {
        Self {
            invites: Some(invites),
            presentations: Some(presentations),
            recruits: Some(recruits),
        }
    }

    pub fn invites(&self) -> u32 {
        self.invites.unwrap_or(Self::DEFAULT_INVITES)
    }

    pub fn presentations(&self) -> u32 {
        self.presentations.unwrap_or(Self::DEFAULT_PRESENTATIONS)
    }

    pub fn recruits(&self) -> u32 {
        self.recruits.unwrap_or(Self::DEFAULT_RECRUITS)
    }
}

/// Which notification channels the member opted into.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<bool>,
}

impl NotificationSettings {
    pub fn all_enabled() -> Self {
        Self {
            email: Some(true),
            push: Some(true),
            sound: Some(true),
        }
    }
}

/// Application preferences.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl AppSettings {
    pub const DEFAULT_LANGUAGE: &'static str = "en";

    pub fn dark_mode(&self) -> bool {
        self.dark_mode.unwrap_or(false)
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(Self::DEFAULT_LANGUAGE)
    }
}

/// Remote profile document for one user.
///
/// Unknown document fields are ignored on read; missing ones take their
/// defaults, since documents written by older clients are sparse.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub business_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub debi_check_status: VerificationStatus,
    pub metrics: Metrics,
    pub targets: Targets,
    pub notification_settings: NotificationSettings,
    pub settings: AppSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// "First Last", trimmed when either part is empty.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

//! Partial profile updates with shallow top-level merge semantics.
//!
//! A patch replaces each top-level field it carries. Sub-records are
//! replaced wholesale, never merged field by field: patching
//! `settings = { darkMode: true }` over `{ darkMode: false, language: "en" }`
//! leaves `{ darkMode: true }`. Callers that want to change one nested field
//! spread the current sub-record into the patch themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::{
    AppSettings, Metrics, NotificationSettings, Role, Targets, UserProfile, VerificationStatus,
};
use crate::error::{Result, TgtError};

/// A profile document as a raw JSON object.
pub type ProfileDocument = Map<String, Value>;

/// Any subset of [`UserProfile`] fields.
///
/// Unknown keys are rejected so a misspelled field is never dropped silently.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debi_check_status: Option<VerificationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Targets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_settings: Option<NotificationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<AppSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProfilePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The patch as a JSON object holding only the keys it carries.
    pub fn to_document(&self) -> Result<ProfileDocument> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(TgtError::internal(format!(
                "profile patch serialized to non-object: {other}"
            ))),
        }
    }
}

impl UserProfile {
    /// Applies `patch` with shallow top-level merge semantics.
    pub fn apply(&mut self, patch: &ProfilePatch) {
        let patch = patch.clone();
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.role {
            self.role = v;
        }
        if let Some(v) = patch.business_number {
            self.business_number = v;
        }
        if let Some(v) = patch.phone_number {
            self.phone_number = Some(v);
        }
        if let Some(v) = patch.debi_check_status {
            self.debi_check_status = v;
        }
        if let Some(v) = patch.metrics {
            self.metrics = v;
        }
        if let Some(v) = patch.targets {
            self.targets = v;
        }
        if let Some(v) = patch.notification_settings {
            self.notification_settings = v;
        }
        if let Some(v) = patch.settings {
            self.settings = v;
        }
        if let Some(v) = patch.created_at {
            self.created_at = Some(v);
        }
    }

    /// Returns a copy of `self` with `patch` applied.
    pub fn merged(&self, patch: &ProfilePatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

/// Merges `patch` into `target` one top-level key at a time.
///
/// Nested objects in `patch` replace the existing value under the same key.
pub fn shallow_merge(target: &mut ProfileDocument, patch: ProfileDocument) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

//! User domain module.
//!
//! This module contains the profile document model, the partial-update
//! patch with its shallow-merge semantics, and the remote store contract.
//!
//! # Module Structure
//!
//! - `model`: `UserProfile` and its sub-records
//! - `patch`: `ProfilePatch` and document-level `shallow_merge`
//! - `repository`: `ProfileRepository` trait
//!
//! # Usage
//!
//! ```ignore
//! use tgt_core::user::{UserProfile, ProfilePatch, ProfileRepository};
//! ```

mod model;
mod patch;
mod repository;

// Re-export public API
pub use model::{
    AppSettings, Metrics, NotificationSettings, Role, Targets, UserProfile, VerificationStatus,
};
pub use patch::{ProfileDocument, ProfilePatch, shallow_merge};
pub use repository::ProfileRepository;

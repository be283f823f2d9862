//! Infrastructure adapters for the TGT session core.
//!
//! Local stand-ins for the managed backend (identity provider, profile
//! document store) plus the on-device snapshot store, configuration and
//! path management.

pub mod config_service;
pub mod file_snapshot_store;
pub mod json_profile_repository;
pub mod local_identity_provider;
pub mod memory_profile_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::file_snapshot_store::FileSnapshotStore;
pub use crate::json_profile_repository::JsonFileProfileRepository;
pub use crate::local_identity_provider::LocalIdentityProvider;
pub use crate::memory_profile_repository::MemoryProfileRepository;
pub use crate::paths::{ServiceType, TgtPaths};

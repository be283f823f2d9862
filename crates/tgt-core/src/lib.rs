//! Domain layer for the TGT session core.
//!
//! Types and collaborator traits only; concrete adapters live in
//! `tgt-infrastructure` and the session state machine in `tgt-application`.

pub mod auth;
pub mod config;
pub mod error;
pub mod permissions;
pub mod session;
pub mod user;

// Re-export common error type
pub use error::{Result, TgtError};

//! Authentication domain module.
//!
//! # Module Structure
//!
//! - `model`: Identity record and the provider's error codes
//! - `provider`: The `IdentityProvider` trait consumed by the session manager

mod model;
mod provider;

pub use model::{AuthError, Identity, UserId};
pub use provider::{IdentityEvents, IdentityProvider};

//! Application layer for the TGT session core.
//!
//! Coordinates the domain traits from `tgt-core` into the session state
//! machine, the account registration use case and admin team management.

pub mod registration_service;
pub mod session;
pub mod team_service;

pub use registration_service::{RegistrationRequest, RegistrationService};
pub use session::SessionManager;
pub use team_service::{TeamMember, TeamService};

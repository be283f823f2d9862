//! Session application services.

mod manager;

pub use manager::SessionManager;

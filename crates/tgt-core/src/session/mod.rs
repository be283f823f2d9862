//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: `Session`, the reader-facing `SessionView` and `SessionStatus`
//! - `snapshot`: `SnapshotStore` trait for the on-device session cache

mod model;
mod snapshot;

pub use model::{Session, SessionStatus, SessionView};
pub use snapshot::SnapshotStore;

//! File storage primitives shared by the local adapters.

pub mod atomic_json;

pub use atomic_json::{AtomicJsonFile, write_atomic};

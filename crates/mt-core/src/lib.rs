//! mistake-tracker/crates/mt-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the Mistake Tracker.

pub mod error;
pub mod models;
pub mod ops;
pub mod tally;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ops::*;
pub use tally::Tally;
pub use traits::*;

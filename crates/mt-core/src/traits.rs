//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AnalyticsSnapshot, Mistake, MistakeFilter, MistakePatch, NewMistake};

/// Persistence contract for mistakes.
///
/// Absent records are `Ok(None)` / `Ok(false)`, not errors.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MistakeRepo: Send + Sync {
    /// Filtered records, newest `date_added` first.
    async fn list(&self, filter: MistakeFilter) -> Result<Vec<Mistake>>;
    async fn get(&self, id: &str) -> Result<Option<Mistake>>;
    async fn add(&self, input: NewMistake) -> Result<Mistake>;
    async fn update(&self, id: &str, patch: MistakePatch) -> Result<Option<Mistake>>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Distinct non-empty topics, sorted.
    async fn topics(&self) -> Result<Vec<String>>;
    async fn analytics(&self) -> Result<AnalyticsSnapshot>;
}

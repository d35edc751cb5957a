//! Progress store trait.

use super::model::ProgressRecord;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for cumulative progress.
///
/// The store is a dumb collaborator: each operation is individually durable
/// but carries no once-per-session semantics. Enforcing that the
/// Results-phase award fires at most once per session is the session
/// engine's job (it checks [`is_completed`] before crediting).
///
/// [`is_completed`]: ProgressStore::is_completed
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Loads the current progress record.
    async fn load(&self) -> Result<ProgressRecord>;

    /// Adds points (and recomputes the level). Returns the updated record.
    async fn add_points(&self, amount: u64) -> Result<ProgressRecord>;

    /// Unlocks a badge. Duplicate unlocks are no-ops.
    async fn add_badge(&self, badge: &str) -> Result<()>;

    /// Records an id as credited.
    async fn mark_completed(&self, id: &str) -> Result<()>;

    /// True when the id has already been credited.
    async fn is_completed(&self, id: &str) -> Result<bool>;

    /// Clears all progress.
    async fn reset(&self) -> Result<()>;
}

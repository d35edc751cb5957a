//! Progress service: single-writer discipline over the progress store.
//!
//! Every component that wants to touch cumulative progress goes through
//! this service; nothing else writes the store. The service also enforces
//! the once-per-session award contract the store itself does not promise.

use rhetor_core::error::Result;
use rhetor_core::progress::{ProgressRecord, ProgressStore};
use std::sync::Arc;

/// Badge unlocked by the first completed session.
pub const FIRST_STEPS_BADGE: &str = "first-steps";

/// Mediates all progress reads and writes.
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn ProgressStore>,
}

impl ProgressService {
    /// Creates a new service over the given store.
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// Credits a completed session exactly once.
    ///
    /// A session id that has already been credited is skipped, so revisiting
    /// Results for the same attempt can never double-award. Returns whether
    /// the session was newly credited.
    pub async fn record_completion(&self, session_id: &str, points: u32) -> Result<bool> {
        if self.store.is_completed(session_id).await? {
            tracing::debug!(session_id, "completion already recorded");
            return Ok(false);
        }

        self.store.add_points(u64::from(points)).await?;
        self.store.mark_completed(session_id).await?;

        let record = self.store.load().await?;
        if record.completed.len() == 1 {
            self.store.add_badge(FIRST_STEPS_BADGE).await?;
        }

        Ok(true)
    }

    /// Current cumulative progress.
    pub async fn overview(&self) -> Result<ProgressRecord> {
        self.store.load().await
    }

    /// Clears all progress.
    pub async fn reset(&self) -> Result<()> {
        self.store.reset().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        record: Mutex<ProgressRecord>,
        add_points_calls: Mutex<u32>,
    }

    #[async_trait]
    impl ProgressStore for MemoryStore {
        async fn load(&self) -> Result<ProgressRecord> {
            Ok(self.record.lock().unwrap().clone())
        }

        async fn add_points(&self, amount: u64) -> Result<ProgressRecord> {
            *self.add_points_calls.lock().unwrap() += 1;
            let mut record = self.record.lock().unwrap();
            record.add_points(amount);
            Ok(record.clone())
        }

        async fn add_badge(&self, badge: &str) -> Result<()> {
            self.record.lock().unwrap().add_badge(badge);
            Ok(())
        }

        async fn mark_completed(&self, id: &str) -> Result<()> {
            self.record.lock().unwrap().mark_completed(id);
            Ok(())
        }

        async fn is_completed(&self, id: &str) -> Result<bool> {
            Ok(self.record.lock().unwrap().is_completed(id))
        }

        async fn reset(&self) -> Result<()> {
            *self.record.lock().unwrap() = ProgressRecord::default();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_completion_credits_exactly_once() {
        let store = Arc::new(MemoryStore::default());
        let service = ProgressService::new(store.clone());

        assert!(service.record_completion("session-1", 50).await.unwrap());
        assert!(!service.record_completion("session-1", 50).await.unwrap());
        assert!(!service.record_completion("session-1", 50).await.unwrap());

        assert_eq!(*store.add_points_calls.lock().unwrap(), 1);
        let record = service.overview().await.unwrap();
        assert_eq!(record.points, 50);
    }

    #[tokio::test]
    async fn test_first_completion_unlocks_badge() {
        let service = ProgressService::new(Arc::new(MemoryStore::default()));

        service.record_completion("session-1", 25).await.unwrap();
        let record = service.overview().await.unwrap();
        assert_eq!(record.badges, vec![FIRST_STEPS_BADGE.to_string()]);

        service.record_completion("session-2", 25).await.unwrap();
        let record = service.overview().await.unwrap();
        assert_eq!(record.badges.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_sessions_both_credit() {
        let service = ProgressService::new(Arc::new(MemoryStore::default()));

        assert!(service.record_completion("session-1", 50).await.unwrap());
        assert!(service.record_completion("session-2", 75).await.unwrap());

        let record = service.overview().await.unwrap();
        assert_eq!(record.points, 125);
        assert_eq!(record.level, 2);
    }
}

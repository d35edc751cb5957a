//! End-to-end session flow through the public engine API.

use async_trait::async_trait;
use rhetor_application::{EngineConfig, ProgressService, SessionController};
use rhetor_core::challenge::builtin_challenges;
use rhetor_core::error::Result;
use rhetor_core::progress::{ProgressRecord, ProgressStore};
use rhetor_core::session::{Phase, SessionConfig};
use rhetor_interaction::ScriptedOpponent;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct MemoryStore {
    record: Mutex<ProgressRecord>,
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn load(&self) -> Result<ProgressRecord> {
        Ok(self.record.lock().unwrap().clone())
    }

    async fn add_points(&self, amount: u64) -> Result<ProgressRecord> {
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

const TURNS: [&str; 2] = [
    "Research shows that later start times improve attendance and grades.",
    "For example, districts that shifted schedules saw measurable gains in test data.",
];

#[tokio::test(start_paused = true)]
async fn test_two_round_session_to_completion() {
    let challenge = builtin_challenges()[0].clone();
    let points = challenge.points;
    let store = Arc::new(MemoryStore::default());
    let controller = SessionController::start(
        challenge,
        Arc::new(ScriptedOpponent::new()),
        ProgressService::new(store.clone()),
        EngineConfig {
            session: SessionConfig {
                prep_secs: 5,
                max_rounds: 2,
            },
            thinking_delay: Duration::from_millis(500),
            reply_timeout: Duration::from_secs(10),
        },
    );
    let mut snapshot = controller.subscribe();

    // Prep countdown expires on its own and the exchange opens.
    let session = snapshot
        .wait_for(|s| s.phase == Phase::Exchange)
        .await
        .unwrap()
        .clone();
    assert_eq!(session.messages.len(), 1);

    controller.submit_turn(TURNS[0]).await;
    snapshot.wait_for(|s| s.round == 2).await.unwrap();

    controller.submit_turn(TURNS[1]).await;
    let session = snapshot
        .wait_for(|s| s.phase == Phase::Results)
        .await
        .unwrap()
        .clone();

    // Opening + two user turns + two resolved replies, none pending.
    assert_eq!(session.messages.len(), 5);
    assert!(!session.reply_pending());
    assert_eq!(session.round, 2);

    let summary = session.summary();
    assert_eq!(summary.exchanges, 5);
    assert_eq!(summary.points, points);
    assert!(summary.average_score.is_some());

    // The award landed exactly once.
    tokio::time::sleep(Duration::from_secs(2)).await;
    let record = store.load().await.unwrap();
    assert_eq!(record.points, u64::from(points));
    assert_eq!(record.history.len(), 1);
    assert_eq!(record.completed.len(), 1);

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_retry_after_reset_credits_again() {
    let store = Arc::new(MemoryStore::default());
    let controller = SessionController::start(
        builtin_challenges()[2].clone(),
        Arc::new(ScriptedOpponent::new()),
        ProgressService::new(store.clone()),
        EngineConfig {
            session: SessionConfig {
                prep_secs: 60,
                max_rounds: 1,
            },
            thinking_delay: Duration::from_millis(500),
            reply_timeout: Duration::from_secs(10),
        },
    );
    let mut snapshot = controller.subscribe();

    for completions in 1..=2u64 {
        controller.start_exchange().await;
        snapshot.wait_for(|s| s.phase == Phase::Exchange).await.unwrap();
        controller.submit_turn(TURNS[0]).await;
        snapshot.wait_for(|s| s.phase == Phase::Results).await.unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;
        let record = store.load().await.unwrap();
        assert_eq!(record.completed.len(), completions as usize);
        assert_eq!(record.points, 25 * completions);

        controller.reset().await;
        snapshot
            .wait_for(|s| s.phase == Phase::Preparation)
            .await
            .unwrap();
    }

    // The badge stays unique across attempts.
    let record = store.load().await.unwrap();
    assert_eq!(record.badges.len(), 1);

    controller.stop().await;
}

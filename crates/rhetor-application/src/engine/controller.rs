//! The session phase controller.
//!
//! [`SessionController`] drives one practice session: it owns the session
//! state machine inside a single driver task, runs the one-second
//! countdown, requests opponent replies at the right moments, and awards
//! progress exactly once when the session reaches Results.
//!
//! The driver task is the only code that touches the [`Session`] value.
//! Timer ticks, user commands, and async reply arrivals are all handled in
//! its select loop, so updates can never interleave. Observers read
//! consistent snapshots from a watch channel.

use super::command::{EngineEvent, SessionCommand};
use crate::progress_service::ProgressService;
use rhetor_core::challenge::ChallengeDefinition;
use rhetor_core::session::{Phase, Session, SessionConfig, TurnTicket};
use rhetor_interaction::{OpponentAgent, ReplyRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Engine tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Session parameters (prep countdown, round budget)
    pub session: SessionConfig,
    /// Simulated thinking pause before the opponent call is made
    pub thinking_delay: Duration,
    /// The engine's own timeout on the opponent call; on expiry the
    /// placeholder resolves with fallback content
    pub reply_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            thinking_delay: Duration::from_millis(1500),
            reply_timeout: Duration::from_secs(20),
        }
    }
}

/// Handle to a running session engine.
///
/// Cheap to share by reference; dropping the handle aborts the driver task
/// so no interval or in-flight reply can outlive the session.
pub struct SessionController {
    events: mpsc::Sender<EngineEvent>,
    snapshot: watch::Receiver<Session>,
    driver: JoinHandle<()>,
}

impl SessionController {
    /// Spawns the driver task for a new session on the given challenge.
    ///
    /// The session starts in Preparation with the prep countdown running.
    pub fn start(
        challenge: ChallengeDefinition,
        agent: Arc<dyn OpponentAgent>,
        progress: ProgressService,
        config: EngineConfig,
    ) -> Self {
        let session = Session::new(challenge, config.session);
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.clone());

        let driver = Driver {
            session,
            agent,
            progress,
            config,
            events_tx: events_tx.clone(),
            snapshot: snapshot_tx,
        };
        let handle = tokio::spawn(driver.run(events_rx));

        Self {
            events: events_tx,
            snapshot: snapshot_rx,
            driver: handle,
        }
    }

    /// Returns a fresh snapshot receiver for observing session state.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.snapshot.clone()
    }

    /// Sends a command to the engine. Returns false once the engine has
    /// stopped.
    pub async fn send(&self, command: SessionCommand) -> bool {
        self.events
            .send(EngineEvent::Command(command))
            .await
            .is_ok()
    }

    /// Starts the exchange early.
    pub async fn start_exchange(&self) -> bool {
        self.send(SessionCommand::StartExchange).await
    }

    /// Submits one user turn.
    pub async fn submit_turn(&self, content: impl Into<String>) -> bool {
        self.send(SessionCommand::SubmitTurn {
            content: content.into(),
        })
        .await
    }

    /// Freezes the countdown.
    pub async fn pause(&self) -> bool {
        self.send(SessionCommand::Pause).await
    }

    /// Continues the countdown.
    pub async fn resume(&self) -> bool {
        self.send(SessionCommand::Resume).await
    }

    /// Discards this attempt and returns to Preparation.
    pub async fn reset(&self) -> bool {
        self.send(SessionCommand::Reset).await
    }

    /// Shuts the engine down.
    pub async fn stop(&self) {
        let _ = self.send(SessionCommand::Stop).await;
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

/// The driver task: sole owner and mutator of the session.
struct Driver {
    session: Session,
    agent: Arc<dyn OpponentAgent>,
    progress: ProgressService,
    config: EngineConfig,
    events_tx: mpsc::Sender<EngineEvent>,
    snapshot: watch::Sender<Session>,
}

impl Driver {
    async fn run(mut self, mut events: mpsc::Receiver<EngineEvent>) {
        // First tick one full period out; Skip keeps a delayed host from
        // bursting catch-up ticks, so the stored remaining time stays
        // authoritative.
        let period = Duration::from_secs(1);
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            session_id = %self.session.id,
            challenge = %self.session.challenge.id,
            "session started"
        );

        loop {
            tokio::select! {
                biased;
                event = events.recv() => {
                    let Some(event) = event else { break };
                    if !self.handle_event(event).await {
                        break;
                    }
                    self.publish();
                }
                _ = interval.tick() => {
                    if let Some(phase) = self.session.tick() {
                        self.on_phase_change(phase).await;
                    }
                    self.publish();
                }
            }
        }

        tracing::debug!(session_id = %self.session.id, "session engine stopped");
    }

    /// Returns false when the engine should shut down.
    async fn handle_event(&mut self, event: EngineEvent) -> bool {
        match event {
            EngineEvent::Command(SessionCommand::StartExchange) => {
                if let Some(phase) = self.session.start_exchange() {
                    self.on_phase_change(phase).await;
                }
            }
            EngineEvent::Command(SessionCommand::SubmitTurn { content }) => {
                if let Some(ticket) = self.session.submit_turn(&content) {
                    let request = ReplyRequest::from_session(&self.session, content.trim());
                    self.spawn_reply(ticket, request);
                }
            }
            EngineEvent::Command(SessionCommand::Pause) => self.session.pause(),
            EngineEvent::Command(SessionCommand::Resume) => self.session.resume(),
            EngineEvent::Command(SessionCommand::Reset) => {
                tracing::info!(session_id = %self.session.id, "session reset");
                self.session.reset();
            }
            EngineEvent::Command(SessionCommand::Stop) => return false,
            EngineEvent::ReplyResolved {
                generation,
                content,
                score_hint,
            } => {
                if let Some(phase) = self.session.resolve_reply(generation, content, score_hint) {
                    self.on_phase_change(phase).await;
                }
            }
        }
        true
    }

    async fn on_phase_change(&mut self, phase: Phase) {
        tracing::info!(session_id = %self.session.id, phase = ?phase, "phase transition");
        if phase == Phase::Results {
            self.award_points().await;
        }
    }

    /// Fires the award side effect at most once per attempt. Store failures
    /// are logged and absorbed; the session still reaches Results.
    async fn award_points(&mut self) {
        if self.session.points_awarded {
            return;
        }
        self.session.points_awarded = true;
        match self
            .progress
            .record_completion(&self.session.id, self.session.challenge.points)
            .await
        {
            Ok(true) => {
                tracing::info!(
                    session_id = %self.session.id,
                    points = self.session.challenge.points,
                    "points awarded"
                );
            }
            Ok(false) => {
                tracing::debug!(session_id = %self.session.id, "session already credited");
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to record session completion");
            }
        }
    }

    fn spawn_reply(&self, ticket: TurnTicket, request: ReplyRequest) {
        let agent = Arc::clone(&self.agent);
        let events = self.events_tx.clone();
        let thinking_delay = self.config.thinking_delay;
        let reply_timeout = self.config.reply_timeout;

        tokio::spawn(async move {
            tokio::time::sleep(thinking_delay).await;
            let outcome =
                tokio::time::timeout(reply_timeout, agent.counter_argument(&request)).await;
            let (content, score_hint) = match outcome {
                Ok(Ok(reply)) => (Some(reply.reply_text), reply.score_hint),
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, round = ticket.round, "opponent reply failed");
                    (None, None)
                }
                Err(_) => {
                    tracing::warn!(round = ticket.round, "opponent reply timed out");
                    (None, None)
                }
            };
            // The engine may be gone; a dead channel just drops the reply.
            let _ = events
                .send(EngineEvent::ReplyResolved {
                    generation: ticket.generation,
                    content,
                    score_hint,
                })
                .await;
        });
    }

    fn publish(&self) {
        let _ = self.snapshot.send(self.session.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rhetor_core::challenge::builtin_challenges;
    use rhetor_core::error::Result;
    use rhetor_core::progress::{ProgressRecord, ProgressStore};
    use rhetor_core::session::FALLBACK_REPLY;
    use rhetor_interaction::{AgentError, OpponentReply};
    use std::sync::Mutex;

    const TURN: &str = "Evidence from sleep studies supports a later start.";

    // Opponent that replies instantly with a fixed counter.
    struct EchoOpponent;

    #[async_trait]
    impl OpponentAgent for EchoOpponent {
        async fn counter_argument(
            &self,
            request: &ReplyRequest,
        ) -> std::result::Result<OpponentReply, AgentError> {
            Ok(OpponentReply {
                reply_text: format!("Countering round {}", request.round),
                score_hint: Some(60),
            })
        }
    }

    // Opponent that always fails.
    struct FailingOpponent;

    #[async_trait]
    impl OpponentAgent for FailingOpponent {
        async fn counter_argument(
            &self,
            _request: &ReplyRequest,
        ) -> std::result::Result<OpponentReply, AgentError> {
            Err(AgentError::ExecutionFailed("boom".into()))
        }
    }

    // Opponent that never answers within any reasonable timeout.
    struct StalledOpponent;

    #[async_trait]
    impl OpponentAgent for StalledOpponent {
        async fn counter_argument(
            &self,
            _request: &ReplyRequest,
        ) -> std::result::Result<OpponentReply, AgentError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!("the engine times out first")
        }
    }

    // In-memory progress store that counts point awards.
    #[derive(Default)]
    struct MemoryProgressStore {
        record: Mutex<ProgressRecord>,
    }

    #[async_trait]
    impl ProgressStore for MemoryProgressStore {
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

    fn config() -> EngineConfig {
        EngineConfig {
            session: SessionConfig {
                prep_secs: 60,
                max_rounds: 4,
            },
            thinking_delay: Duration::from_millis(1500),
            reply_timeout: Duration::from_secs(20),
        }
    }

    fn controller_with(
        agent: Arc<dyn OpponentAgent>,
        config: EngineConfig,
    ) -> (SessionController, Arc<MemoryProgressStore>) {
        let store = Arc::new(MemoryProgressStore::default());
        let progress = ProgressService::new(store.clone());
        let controller =
            SessionController::start(builtin_challenges()[0].clone(), agent, progress, config);
        (controller, store)
    }

    #[tokio::test(start_paused = true)]
    async fn test_exchange_opens_with_counterpart_message() {
        let (controller, _store) = controller_with(Arc::new(EchoOpponent), config());
        let mut snapshot = controller.subscribe();

        controller.start_exchange().await;
        let session = snapshot
            .wait_for(|s| s.phase == Phase::Exchange)
            .await
            .unwrap()
            .clone();

        assert_eq!(session.messages.len(), 1);
        assert!(session.messages[0].content.contains(&session.challenge.motion));
        controller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_round_trip_advances_round() {
        let (controller, _store) = controller_with(Arc::new(EchoOpponent), config());
        let mut snapshot = controller.subscribe();

        controller.start_exchange().await;
        snapshot.wait_for(|s| s.phase == Phase::Exchange).await.unwrap();

        controller.submit_turn(TURN).await;
        let session = snapshot.wait_for(|s| s.round == 2).await.unwrap().clone();

        assert!(!session.reply_pending());
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[2].content, "Countering round 1");
        assert_eq!(session.score_hints, vec![60]);
        controller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_reply_resolves_with_fallback() {
        let (controller, _store) = controller_with(Arc::new(FailingOpponent), config());
        let mut snapshot = controller.subscribe();

        controller.start_exchange().await;
        snapshot.wait_for(|s| s.phase == Phase::Exchange).await.unwrap();

        controller.submit_turn(TURN).await;
        let session = snapshot.wait_for(|s| s.round == 2).await.unwrap().clone();

        assert_eq!(session.messages[2].content, FALLBACK_REPLY);
        assert!(!session.reply_pending());
        controller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_reply_times_out_to_fallback() {
        let mut cfg = config();
        cfg.reply_timeout = Duration::from_secs(5);
        let (controller, _store) = controller_with(Arc::new(StalledOpponent), cfg);
        let mut snapshot = controller.subscribe();

        controller.start_exchange().await;
        snapshot.wait_for(|s| s.phase == Phase::Exchange).await.unwrap();

        controller.submit_turn(TURN).await;
        let session = snapshot.wait_for(|s| s.round == 2).await.unwrap().clone();

        assert_eq!(session.messages[2].content, FALLBACK_REPLY);
        controller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_prep_expiry_auto_starts_exchange() {
        let mut cfg = config();
        cfg.session.prep_secs = 2;
        let (controller, _store) = controller_with(Arc::new(EchoOpponent), cfg);
        let mut snapshot = controller.subscribe();

        let session = snapshot
            .wait_for(|s| s.phase == Phase::Exchange)
            .await
            .unwrap()
            .clone();
        assert_eq!(session.time_remaining, session.challenge.time_limit_secs);
        controller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rounds_exhausted_awards_points_once() {
        let mut cfg = config();
        cfg.session.max_rounds = 1;
        let (controller, store) = controller_with(Arc::new(EchoOpponent), cfg);
        let mut snapshot = controller.subscribe();

        controller.start_exchange().await;
        snapshot.wait_for(|s| s.phase == Phase::Exchange).await.unwrap();
        controller.submit_turn(TURN).await;
        snapshot.wait_for(|s| s.phase == Phase::Results).await.unwrap();

        // Let any stray award work settle, then inspect the store.
        tokio::time::sleep(Duration::from_secs(2)).await;
        let record = store.load().await.unwrap();
        assert_eq!(record.points, 50);
        assert_eq!(record.history.len(), 1);
        assert_eq!(record.badges, vec!["first-steps".to_string()]);
        controller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_discards_in_flight_reply() {
        let mut cfg = config();
        cfg.thinking_delay = Duration::from_secs(4);
        let (controller, _store) = controller_with(Arc::new(EchoOpponent), cfg);
        let mut snapshot = controller.subscribe();

        controller.start_exchange().await;
        snapshot.wait_for(|s| s.phase == Phase::Exchange).await.unwrap();
        controller.submit_turn(TURN).await;
        snapshot.wait_for(|s| s.reply_pending()).await.unwrap();

        controller.reset().await;
        let reset_id = snapshot
            .wait_for(|s| s.phase == Phase::Preparation && s.messages.is_empty())
            .await
            .unwrap()
            .id
            .clone();

        // Give the stale reply time to arrive and be discarded.
        tokio::time::sleep(Duration::from_secs(10)).await;
        let session = snapshot.borrow().clone();
        assert_eq!(session.id, reset_id);
        assert!(session.messages.is_empty());
        assert_eq!(session.round, 1);
        controller.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_countdown() {
        let (controller, _store) = controller_with(Arc::new(EchoOpponent), config());
        let mut snapshot = controller.subscribe();

        controller.start_exchange().await;
        snapshot.wait_for(|s| s.phase == Phase::Exchange).await.unwrap();
        controller.pause().await;
        let frozen = snapshot
            .wait_for(|s| !s.running)
            .await
            .unwrap()
            .time_remaining;

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(snapshot.borrow().time_remaining, frozen);

        controller.resume().await;
        snapshot
            .wait_for(|s| s.running && s.time_remaining < frozen)
            .await
            .unwrap();
        controller.stop().await;
    }
}

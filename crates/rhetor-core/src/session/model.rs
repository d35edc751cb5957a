//! Session domain model and phase state machine.
//!
//! A [`Session`] is one practice attempt against a challenge. It owns the
//! phase (`Preparation -> Exchange -> Results`), the countdown, the round
//! counter, and the append-only exchange log. All mutation goes through the
//! methods here; the async engine in `rhetor-application` only decides
//! *when* to call them, which keeps every timing and turn-taking rule
//! testable without a clock.

use super::message::ExchangeMessage;
use super::phase::Phase;
use crate::challenge::ChallengeDefinition;
use serde::{Deserialize, Serialize};

/// Replaces a placeholder whose counterpart reply failed, timed out, or was
/// cut off by the end of the session.
pub const FALLBACK_REPLY: &str = "No response available. Let's move on to your next point.";

/// Submissions shorter than this (after trimming) are ignored. Filters out
/// stray transcription fragments.
pub const MIN_TURN_CHARS: usize = 10;

/// Tunable session parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Preparation-phase countdown in seconds
    pub prep_secs: u32,
    /// Number of user-turn/counterpart-turn rounds in the exchange
    pub max_rounds: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prep_secs: 60,
            max_rounds: 4,
        }
    }
}

/// Claim ticket returned by [`Session::submit_turn`].
///
/// Carries the generation the turn was accepted under so that an async
/// reply produced for an earlier attempt can be recognized as stale and
/// discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTicket {
    pub generation: u64,
    pub round: u32,
}

/// Read-only summary derived from a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Seconds of exchange time used
    pub elapsed_secs: u32,
    /// Total messages in the exchange log
    pub exchanges: usize,
    /// Points this session is worth
    pub points: u32,
    /// Mean of the opponent's per-turn score hints, if any arrived
    pub average_score: Option<u32>,
}

/// One practice attempt.
///
/// Invariants maintained by the methods below:
/// - `time_remaining` never goes negative and never increases while running
/// - `round` stays within `[1, max_rounds]`
/// - phases only ever advance, except for an explicit [`reset`](Self::reset)
/// - at most one pending placeholder exists, and every placeholder is
///   eventually resolved (with real content or [`FALLBACK_REPLY`])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique attempt identifier (UUID format); reassigned on reset
    pub id: String,
    /// The challenge this session runs against
    pub challenge: ChallengeDefinition,
    /// Current phase
    pub phase: Phase,
    /// Current round, 1-based
    pub round: u32,
    /// Fixed round budget
    pub max_rounds: u32,
    /// Remaining seconds in the current phase
    pub time_remaining: u32,
    /// False while paused or once in Results
    pub running: bool,
    /// Append-only exchange log
    pub messages: Vec<ExchangeMessage>,
    /// Timestamp when the attempt was created (RFC 3339)
    pub created_at: String,
    /// Staleness counter for async replies; bumped on reset and on finish
    pub generation: u64,
    /// Guards the Results-phase award side effect within this attempt
    pub points_awarded: bool,
    /// Exchange seconds used, fixed at finish
    pub elapsed_secs: u32,
    /// Per-turn score hints reported by the opponent
    pub score_hints: Vec<u32>,
    prep_secs: u32,
}

impl Session {
    /// Creates a new session in `Preparation` with the prep countdown running.
    pub fn new(challenge: ChallengeDefinition, config: SessionConfig) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            challenge,
            phase: Phase::Preparation,
            round: 1,
            max_rounds: config.max_rounds.max(1),
            time_remaining: config.prep_secs,
            running: true,
            messages: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
            generation: 0,
            points_awarded: false,
            elapsed_secs: 0,
            score_hints: Vec::new(),
            prep_secs: config.prep_secs,
        }
    }

    /// True while a counterpart reply is outstanding.
    pub fn reply_pending(&self) -> bool {
        self.messages.iter().any(|m| m.pending)
    }

    /// Advances the countdown by one second.
    ///
    /// The tick that drains the clock fires the phase-appropriate
    /// transition exactly once: `Preparation` auto-starts the exchange,
    /// `Exchange` finishes into `Results`. Ticks are ignored while paused
    /// or once the session is in `Results`, so the stored remaining time is
    /// authoritative and can never go negative.
    ///
    /// Returns the newly entered phase when a transition fired.
    pub fn tick(&mut self) -> Option<Phase> {
        if !self.running {
            return None;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return None;
        }
        match self.phase {
            Phase::Preparation => {
                self.begin_exchange();
                Some(Phase::Exchange)
            }
            Phase::Exchange => {
                self.finish();
                Some(Phase::Results)
            }
            Phase::Results => None,
        }
    }

    /// Starts the exchange early, before the prep countdown expires.
    ///
    /// No-op outside `Preparation`.
    pub fn start_exchange(&mut self) -> Option<Phase> {
        if self.phase != Phase::Preparation {
            tracing::debug!(phase = ?self.phase, "start_exchange ignored outside Preparation");
            return None;
        }
        self.begin_exchange();
        Some(Phase::Exchange)
    }

    fn begin_exchange(&mut self) {
        self.phase = Phase::Exchange;
        self.time_remaining = self.challenge.time_limit_secs;
        self.running = true;
        let opening = format!(
            "Welcome to this {}! I'll be challenging your arguments on: \"{}\". \
             I believe there are significant issues with this position. \
             Please present your opening argument, and I'll respond accordingly.",
            self.challenge.title, self.challenge.motion,
        );
        self.messages.push(ExchangeMessage::counterpart(opening));
    }

    /// Accepts a user turn during the exchange.
    ///
    /// Appends the user message and a pending counterpart placeholder, and
    /// returns a [`TurnTicket`] the caller uses to request a reply. Returns
    /// `None` (and appends nothing) when the turn is rejected: wrong phase,
    /// a reply is already pending, or the content is too short.
    pub fn submit_turn(&mut self, content: &str) -> Option<TurnTicket> {
        if self.phase != Phase::Exchange {
            tracing::debug!(phase = ?self.phase, "submit_turn ignored outside Exchange");
            return None;
        }
        if self.reply_pending() {
            tracing::debug!("submit_turn ignored while a reply is pending");
            return None;
        }
        let content = content.trim();
        if content.len() < MIN_TURN_CHARS {
            tracing::debug!(len = content.len(), "submit_turn ignored: too short");
            return None;
        }
        self.messages.push(ExchangeMessage::user(content));
        self.messages.push(ExchangeMessage::placeholder());
        Some(TurnTicket {
            generation: self.generation,
            round: self.round,
        })
    }

    /// Resolves the outstanding placeholder with the counterpart's reply.
    ///
    /// `content = None` resolves with [`FALLBACK_REPLY`] (collaborator
    /// failure or timeout). A resolution whose `generation` no longer
    /// matches is stale (the session was reset or finished since the turn
    /// was accepted) and is discarded without touching state.
    ///
    /// After resolution the round advances, clamped to `max_rounds`; when
    /// the final round resolves the session finishes into `Results`.
    /// Returns the newly entered phase when that transition fired.
    pub fn resolve_reply(
        &mut self,
        generation: u64,
        content: Option<String>,
        score_hint: Option<u32>,
    ) -> Option<Phase> {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "discarding stale counterpart reply"
            );
            return None;
        }
        let placeholder = self.messages.iter_mut().find(|m| m.pending)?;
        placeholder.resolve(content.unwrap_or_else(|| FALLBACK_REPLY.to_string()));
        if let Some(score) = score_hint {
            self.score_hints.push(score.min(100));
        }
        if self.round >= self.max_rounds {
            self.finish();
            Some(Phase::Results)
        } else {
            self.round += 1;
            None
        }
    }

    /// Freezes the countdown. The clock keeps its value; an in-flight
    /// reply is unaffected. No-op in `Results`.
    pub fn pause(&mut self) {
        if self.phase != Phase::Results {
            self.running = false;
        }
    }

    /// Resumes the countdown from its frozen value. No-op in `Results`.
    pub fn resume(&mut self) {
        if self.phase != Phase::Results {
            self.running = true;
        }
    }

    /// Discards this attempt and starts a fresh one in `Preparation`.
    ///
    /// Clears the exchange log, restores the prep countdown, reassigns the
    /// attempt id, and bumps the generation so any in-flight reply for the
    /// old attempt is discarded on arrival.
    pub fn reset(&mut self) {
        self.id = uuid::Uuid::new_v4().to_string();
        self.phase = Phase::Preparation;
        self.round = 1;
        self.time_remaining = self.prep_secs;
        self.running = true;
        self.messages.clear();
        self.generation += 1;
        self.points_awarded = false;
        self.elapsed_secs = 0;
        self.score_hints.clear();
    }

    /// Enters `Results`: stops the timer, finalizes any still-pending
    /// placeholder with the fallback text, and bumps the generation so a
    /// late reply cannot mutate the finished session.
    fn finish(&mut self) {
        if let Some(placeholder) = self.messages.iter_mut().find(|m| m.pending) {
            placeholder.resolve(FALLBACK_REPLY);
        }
        self.elapsed_secs = self
            .challenge
            .time_limit_secs
            .saturating_sub(self.time_remaining);
        self.phase = Phase::Results;
        self.running = false;
        self.generation += 1;
    }

    /// Derives the read-only results summary.
    pub fn summary(&self) -> SessionSummary {
        let average_score = if self.score_hints.is_empty() {
            None
        } else {
            let total: u64 = self.score_hints.iter().map(|s| u64::from(*s)).sum();
            Some((total / self.score_hints.len() as u64) as u32)
        };
        SessionSummary {
            elapsed_secs: self.elapsed_secs,
            exchanges: self.messages.len(),
            points: self.challenge.points,
            average_score,
        }
    }
}

//! Session phase types.

use serde::{Deserialize, Serialize};

/// The current stage of a session's lifecycle.
///
/// Phase transitions are monotonic: `Preparation -> Exchange -> Results`.
/// The only way back is an explicit reset, which returns the session to
/// `Preparation` as a fresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Prep countdown is running; no messages exist yet.
    Preparation,
    /// Live turn-taking against the opponent.
    Exchange,
    /// Terminal summary state; the timer is stopped.
    Results,
}

impl Phase {
    /// Human-readable phase title.
    pub fn title(&self) -> &'static str {
        match self {
            Phase::Preparation => "Preparation Time",
            Phase::Exchange => "Live Debate Challenge",
            Phase::Results => "Challenge Complete",
        }
    }
}

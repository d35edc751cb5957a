//! Opponent agent trait and wire types.
//!
//! The session engine talks to its counterpart through this narrow seam; it
//! does not care whether replies come from a local script or a remote LLM.

use async_trait::async_trait;
use rhetor_core::session::{Session, Speaker};
use thiserror::Error;

/// Errors an opponent agent can produce.
///
/// The session engine absorbs all of these: a failed or timed-out reply is
/// replaced with fallback content, never surfaced to the session as fatal.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The agent could not execute at all (bad configuration, empty input).
    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),

    /// The backing process/HTTP call failed.
    #[error("Agent call failed: {message}")]
    Process {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
    },

    /// The agent responded but the reply could not be decoded.
    #[error("Failed to parse agent response: {0}")]
    Parse(String),
}

/// Everything an opponent needs to produce the next counter-argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    /// The full exchange transcript so far, one line per message.
    pub transcript: String,
    /// The user's latest turn.
    pub latest_turn: String,
    /// Current round, 1-based.
    pub round: u32,
    /// Round budget for the session.
    pub max_rounds: u32,
    /// The motion under debate.
    pub motion: String,
    /// Opposing argument list from the challenge definition.
    pub opposing_arguments: Vec<String>,
}

impl ReplyRequest {
    /// Builds a reply request from a live session and the user's latest turn.
    ///
    /// Pending placeholders are left out of the transcript.
    pub fn from_session(session: &Session, latest_turn: &str) -> Self {
        let transcript = session
            .messages
            .iter()
            .filter(|m| !m.pending)
            .map(|m| {
                let speaker = match m.speaker {
                    Speaker::User => "User",
                    Speaker::Counterpart => "Opponent",
                };
                format!("{speaker}: {}", m.content)
            })
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            transcript,
            latest_turn: latest_turn.to_string(),
            round: session.round,
            max_rounds: session.max_rounds,
            motion: session.challenge.motion.clone(),
            opposing_arguments: session.challenge.key_arguments.opposing.clone(),
        }
    }
}

/// A counter-argument plus an optional performance score for the user's turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpponentReply {
    pub reply_text: String,
    /// 0-100 rating of the user's latest turn, when the agent provides one.
    pub score_hint: Option<u32>,
}

/// A source of counterpart replies.
#[async_trait]
pub trait OpponentAgent: Send + Sync {
    /// Produces a counter-argument to the user's latest turn.
    async fn counter_argument(&self, request: &ReplyRequest) -> Result<OpponentReply, AgentError>;
}

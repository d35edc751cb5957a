//! Scripted local opponent.
//!
//! Produces counter-arguments from the challenge's opposing argument list
//! without any network dependency. Fully deterministic: the response
//! register is chosen by round position, the template by round parity, and
//! the opposing argument by round index, so the same inputs always produce
//! the same reply. Useful offline and as the fallback opponent when no API
//! key is configured.

use crate::agent::{AgentError, OpponentAgent, OpponentReply, ReplyRequest};
use async_trait::async_trait;

/// Which rhetorical register the reply uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Register {
    Opening,
    Counter,
    StrongCounter,
    Closing,
}

/// A deterministic, offline opponent seeded by the challenge content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedOpponent;

impl ScriptedOpponent {
    pub fn new() -> Self {
        Self
    }

    fn register_for(request: &ReplyRequest) -> Register {
        if request.round <= 1 {
            Register::Opening
        } else if request.round + 1 >= request.max_rounds {
            Register::Closing
        } else if turn_is_strong(&request.latest_turn) {
            Register::StrongCounter
        } else {
            Register::Counter
        }
    }

    fn compose(register: Register, argument: &str, variant: usize) -> String {
        match (register, variant % 2) {
            (Register::Opening, 0) => format!(
                "That's an interesting perspective, but I fundamentally disagree. {argument} \
                 This is crucial because it directly undermines the foundation of your argument."
            ),
            (Register::Opening, _) => format!(
                "I appreciate your opening, however, there are several critical flaws in that \
                 reasoning. {argument} This is particularly important when we consider the \
                 real-world implications."
            ),
            (Register::Counter, 0) => format!(
                "While you make some valid points, your argument overlooks a fundamental issue: \
                 {argument} This significantly weakens your position."
            ),
            (Register::Counter, _) => format!(
                "I understand your perspective, but the evidence actually suggests otherwise. \
                 {argument} This contradicts your claims."
            ),
            (Register::StrongCounter, 0) => format!(
                "You've presented a well-researched argument, and I respect the evidence you've \
                 provided. However, there's a critical counterpoint: {argument} Recent studies \
                 have shown that this correlation doesn't hold up under scrutiny."
            ),
            (Register::StrongCounter, _) => format!(
                "I acknowledge the strength of your evidence, but there's a significant \
                 methodological flaw in that reasoning. {argument} Leading experts consistently \
                 argue that this approach creates more problems than it solves."
            ),
            (Register::Closing, 0) => format!(
                "As we conclude this debate, I want to emphasize that while you've made some \
                 compelling points, the fundamental issues remain unresolved. {argument} The \
                 evidence clearly supports my position."
            ),
            (Register::Closing, _) => format!(
                "Thank you for this engaging debate. Throughout our discussion, it's become \
                 clear that {argument} The arguments I've presented demonstrate why this \
                 position is ultimately problematic."
            ),
        }
    }
}

/// A turn counts as strong when it is substantial and cites evidence or an
/// example.
fn turn_is_strong(turn: &str) -> bool {
    let lower = turn.to_lowercase();
    let has_evidence =
        lower.contains("study") || lower.contains("research") || lower.contains("data");
    let has_example = lower.contains("example") || lower.contains("instance");
    turn.len() > 100 && (has_evidence || has_example)
}

/// Deterministic 0-100 rating of a turn: length plus evidence markers.
fn score_turn(turn: &str) -> u32 {
    let lower = turn.to_lowercase();
    let mut score = 40 + (turn.len() as u32 / 10).min(30);
    if lower.contains("study") || lower.contains("research") || lower.contains("data") {
        score += 15;
    }
    if lower.contains("example") || lower.contains("instance") {
        score += 10;
    }
    score.min(100)
}

#[async_trait]
impl OpponentAgent for ScriptedOpponent {
    async fn counter_argument(&self, request: &ReplyRequest) -> Result<OpponentReply, AgentError> {
        if request.opposing_arguments.is_empty() {
            return Err(AgentError::ExecutionFailed(
                "challenge has no opposing arguments to draw from".into(),
            ));
        }
        let register = Self::register_for(request);
        let index = (request.round.saturating_sub(1)) as usize % request.opposing_arguments.len();
        let argument = &request.opposing_arguments[index];
        let reply_text = Self::compose(register, argument, request.round as usize);
        Ok(OpponentReply {
            reply_text,
            score_hint: Some(score_turn(&request.latest_turn)),
        })
    }
}

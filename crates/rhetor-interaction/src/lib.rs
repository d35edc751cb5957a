//! Opponent collaborators for rhetor sessions.
//!
//! Provides the [`OpponentAgent`] seam the session engine calls for
//! counter-arguments, plus two implementations: a deterministic offline
//! [`ScriptedOpponent`] and a network-backed [`GeminiOpponent`].

mod agent;
mod gemini;
mod scripted;

pub use agent::{AgentError, OpponentAgent, OpponentReply, ReplyRequest};
pub use gemini::GeminiOpponent;
pub use scripted::ScriptedOpponent;

//! Challenge domain model.
//!
//! A challenge is the immutable content a practice session is built around:
//! the motion under debate, the prompt shown during preparation, and the two
//! opposing argument lists the opponent draws from.

use serde::{Deserialize, Serialize};

/// Difficulty rating of a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// The skill a challenge exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Construct an argument from scratch
    Argument,
    /// Respond to an opposing argument
    Rebuttal,
    /// Identify a logical fallacy
    Fallacy,
    /// Break a motion down into clash areas
    Analysis,
}

/// The two opposing argument sets attached to a challenge.
///
/// `supporting` is shown to the user during preparation; `opposing` seeds
/// the opponent's counter-arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyArguments {
    pub supporting: Vec<String>,
    pub opposing: Vec<String>,
}

/// A single practice challenge.
///
/// Challenges are read-only configuration from the session engine's point of
/// view: supplied by a [`ChallengeRepository`](super::ChallengeRepository),
/// never mutated by a running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeDefinition {
    /// Unique challenge identifier (kebab-case slug)
    pub id: String,
    /// Display title
    pub title: String,
    /// Short description shown in challenge listings
    pub description: String,
    /// Difficulty rating
    pub difficulty: Difficulty,
    /// Points awarded on completion
    pub points: u32,
    /// Exchange-phase time budget in seconds
    pub time_limit_secs: u32,
    /// The skill this challenge exercises
    pub kind: ChallengeKind,
    /// Task prompt shown during preparation
    pub prompt: String,
    /// The motion under debate
    pub motion: String,
    /// Supporting and opposing argument lists
    pub key_arguments: KeyArguments,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChallengeDefinition {
        ChallengeDefinition {
            id: "sample".to_string(),
            title: "Sample".to_string(),
            description: "A sample challenge".to_string(),
            difficulty: Difficulty::Medium,
            points: 50,
            time_limit_secs: 300,
            kind: ChallengeKind::Argument,
            prompt: "Argue something".to_string(),
            motion: "This house believes in samples".to_string(),
            key_arguments: KeyArguments {
                supporting: vec!["for".to_string()],
                opposing: vec!["against".to_string()],
            },
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let challenge = sample();
        let text = toml::to_string_pretty(&challenge).unwrap();
        let parsed: ChallengeDefinition = toml::from_str(&text).unwrap();
        assert_eq!(parsed, challenge);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ChallengeKind::Rebuttal).unwrap();
        assert_eq!(json, "\"rebuttal\"");
    }
}

//! Challenge domain module.
//!
//! - `model`: challenge content types (`ChallengeDefinition`, `Difficulty`,
//!   `ChallengeKind`, `KeyArguments`)
//! - `repository`: the catalog lookup trait
//! - `preset`: built-in challenge catalog

mod model;
mod preset;
mod repository;

pub use model::{ChallengeDefinition, ChallengeKind, Difficulty, KeyArguments};
pub use preset::builtin_challenges;
pub use repository::ChallengeRepository;

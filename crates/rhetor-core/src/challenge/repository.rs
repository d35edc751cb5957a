//! Challenge repository trait.
//!
//! Defines the interface for looking up challenge content.

use super::model::{ChallengeDefinition, Difficulty};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract source of challenge definitions.
///
/// Decouples the session engine from where challenge content actually lives
/// (built-in presets, TOML catalog files on disk, a remote service).
///
/// A missing challenge is reported as `Ok(None)` from [`find_by_id`]; the
/// caller decides whether that is an error. The session engine refuses to
/// start a session for an unknown id.
///
/// [`find_by_id`]: ChallengeRepository::find_by_id
#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    /// Finds a challenge by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ChallengeDefinition))`: challenge found
    /// - `Ok(None)`: no challenge with this id
    /// - `Err(_)`: the catalog could not be read
    async fn find_by_id(&self, challenge_id: &str) -> Result<Option<ChallengeDefinition>>;

    /// Lists every known challenge.
    async fn list_all(&self) -> Result<Vec<ChallengeDefinition>>;

    /// Lists challenges with the given difficulty.
    async fn find_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<ChallengeDefinition>>;
}

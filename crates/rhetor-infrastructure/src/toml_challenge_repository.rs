//! TOML-catalog-backed challenge repository.
//!
//! Serves the built-in presets, overlaid with any `*.toml` challenge files
//! found in a catalog directory. A user file with the same id as a preset
//! replaces it; new ids extend the catalog. A missing catalog directory
//! just means presets only.

use async_trait::async_trait;
use rhetor_core::challenge::{
    ChallengeDefinition, ChallengeRepository, Difficulty, builtin_challenges,
};
use rhetor_core::error::Result;
use std::fs;
use std::path::PathBuf;

/// Challenge repository reading user definitions from a directory of TOML
/// files.
pub struct TomlChallengeRepository {
    catalog_dir: Option<PathBuf>,
}

impl TomlChallengeRepository {
    /// Creates a repository over the default user catalog
    /// (`~/.config/rhetor/challenges/`).
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Some(crate::paths::RhetorPaths::challenges_dir()?)))
    }

    /// Creates a repository over an explicit catalog directory, or presets
    /// only when `None`.
    pub fn new(catalog_dir: Option<PathBuf>) -> Self {
        Self { catalog_dir }
    }

    /// Presets overlaid with user catalog files.
    fn catalog(&self) -> Result<Vec<ChallengeDefinition>> {
        let mut challenges: Vec<ChallengeDefinition> = builtin_challenges().to_vec();

        let Some(dir) = &self.catalog_dir else {
            return Ok(challenges);
        };
        if !dir.is_dir() {
            return Ok(challenges);
        }

        let mut extras = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            match toml::from_str::<ChallengeDefinition>(&content) {
                Ok(challenge) => {
                    if let Some(existing) =
                        challenges.iter_mut().find(|c| c.id == challenge.id)
                    {
                        *existing = challenge;
                    } else {
                        extras.push(challenge);
                    }
                }
                Err(err) => {
                    // One bad file should not hide the rest of the catalog.
                    tracing::warn!(path = %path.display(), error = %err, "skipping invalid challenge file");
                }
            }
        }

        extras.sort_by(|a, b| a.id.cmp(&b.id));
        challenges.extend(extras);
        Ok(challenges)
    }
}

#[async_trait]
impl ChallengeRepository for TomlChallengeRepository {
    async fn find_by_id(&self, challenge_id: &str) -> Result<Option<ChallengeDefinition>> {
        Ok(self
            .catalog()?
            .into_iter()
            .find(|c| c.id == challenge_id))
    }

    async fn list_all(&self) -> Result<Vec<ChallengeDefinition>> {
        self.catalog()
    }

    async fn find_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<ChallengeDefinition>> {
        Ok(self
            .catalog()?
            .into_iter()
            .filter(|c| c.difficulty == difficulty)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_challenge(dir: &TempDir, file: &str, id: &str, title: &str) {
        let content = format!(
            r#"
id = "{id}"
title = "{title}"
description = "User challenge"
difficulty = "Easy"
points = 10
time_limit_secs = 120
kind = "rebuttal"
prompt = "Rebut this"
motion = "This house tests catalogs"

[key_arguments]
supporting = ["for"]
opposing = ["against"]
"#
        );
        std::fs::write(dir.path().join(file), content).unwrap();
    }

    #[tokio::test]
    async fn test_presets_only_without_catalog_dir() {
        let repo = TomlChallengeRepository::new(None);
        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), builtin_challenges().len());
    }

    #[tokio::test]
    async fn test_missing_directory_falls_back_to_presets() {
        let dir = TempDir::new().unwrap();
        let repo = TomlChallengeRepository::new(Some(dir.path().join("nope")));
        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), builtin_challenges().len());
    }

    #[tokio::test]
    async fn test_user_file_extends_catalog() {
        let dir = TempDir::new().unwrap();
        write_challenge(&dir, "custom.toml", "custom-drill", "Custom Drill");

        let repo = TomlChallengeRepository::new(Some(dir.path().to_path_buf()));
        let found = repo.find_by_id("custom-drill").await.unwrap();
        assert_eq!(found.unwrap().title, "Custom Drill");
        assert_eq!(
            repo.list_all().await.unwrap().len(),
            builtin_challenges().len() + 1
        );
    }

    #[tokio::test]
    async fn test_user_file_overrides_preset() {
        let dir = TempDir::new().unwrap();
        write_challenge(&dir, "override.toml", "daily-argument", "My Version");

        let repo = TomlChallengeRepository::new(Some(dir.path().to_path_buf()));
        let found = repo.find_by_id("daily-argument").await.unwrap().unwrap();
        assert_eq!(found.title, "My Version");
        assert_eq!(
            repo.list_all().await.unwrap().len(),
            builtin_challenges().len()
        );
    }

    #[tokio::test]
    async fn test_invalid_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not valid = [").unwrap();

        let repo = TomlChallengeRepository::new(Some(dir.path().to_path_buf()));
        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), builtin_challenges().len());
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let repo = TomlChallengeRepository::new(None);
        assert!(repo.find_by_id("no-such-challenge").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_difficulty() {
        let repo = TomlChallengeRepository::new(None);
        let hard = repo.find_by_difficulty(Difficulty::Hard).await.unwrap();
        assert!(hard.iter().all(|c| c.difficulty == Difficulty::Hard));
        assert!(!hard.is_empty());
    }
}

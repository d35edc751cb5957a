pub mod paths;
pub mod toml_challenge_repository;
pub mod toml_progress_store;

pub use crate::paths::RhetorPaths;
pub use crate::toml_challenge_repository::TomlChallengeRepository;
pub use crate::toml_progress_store::TomlProgressStore;

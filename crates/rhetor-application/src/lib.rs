//! Application layer: the session phase controller and progress service.

pub mod engine;
pub mod progress_service;

pub use engine::{EngineConfig, SessionCommand, SessionController};
pub use progress_service::{FIRST_STEPS_BADGE, ProgressService};

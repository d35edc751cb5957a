//! Progress domain module.
//!
//! - `model`: cumulative gamification state (`ProgressRecord`,
//!   `ProgressEntry`)
//! - `store`: the persistence trait (`ProgressStore`)

mod model;
mod store;

pub use model::{ProgressEntry, ProgressRecord};
pub use store::ProgressStore;

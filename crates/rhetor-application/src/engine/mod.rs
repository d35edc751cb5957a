//! Session engine module.
//!
//! - `command`: the command surface (`SessionCommand`)
//! - `controller`: the driver task and its handle (`SessionController`,
//!   `EngineConfig`)

mod command;
mod controller;

pub use command::SessionCommand;
pub use controller::{EngineConfig, SessionController};

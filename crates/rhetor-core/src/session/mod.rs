//! Session domain module.
//!
//! - `phase`: session lifecycle stages (`Phase`)
//! - `message`: exchange log types (`Speaker`, `ExchangeMessage`)
//! - `model`: the session state machine (`Session`, `SessionConfig`,
//!   `TurnTicket`, `SessionSummary`)

mod message;
mod model;
mod phase;

pub use message::{ExchangeMessage, Speaker};
pub use model::{
    FALLBACK_REPLY, MIN_TURN_CHARS, Session, SessionConfig, SessionSummary, TurnTicket,
};
pub use phase::Phase;

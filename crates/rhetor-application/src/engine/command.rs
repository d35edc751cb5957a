//! Engine command and event types.

/// User-facing commands accepted by a running [`SessionController`].
///
/// Commands that are invalid in the current phase are ignored, not errors;
/// the engine is defensive against out-of-order or duplicate UI events.
///
/// [`SessionController`]: super::SessionController
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start the exchange before the prep countdown expires.
    StartExchange,
    /// Submit one user turn (typed or transcribed; the engine does not
    /// distinguish).
    SubmitTurn { content: String },
    /// Freeze the countdown.
    Pause,
    /// Continue the countdown from its frozen value.
    Resume,
    /// Discard this attempt and return to Preparation.
    Reset,
    /// Shut the engine down.
    Stop,
}

/// Everything the driver task reacts to.
///
/// All three event sources (user commands, timer ticks, async reply
/// arrivals) funnel into the driver's single select loop; ticks come from
/// the driver's own interval, the rest through one mpsc channel, so every
/// state update is serialized.
#[derive(Debug)]
pub(super) enum EngineEvent {
    Command(SessionCommand),
    ReplyResolved {
        generation: u64,
        content: Option<String>,
        score_hint: Option<u32>,
    },
}

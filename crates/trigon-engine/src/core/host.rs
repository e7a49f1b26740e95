use std::time::Duration;

use crate::input::MotionSample;
use crate::lifecycle::AppCommand;

/// Result of one poll of the host's event queue.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PollOutcome {
    /// At least one event source was processed; poll again.
    Dispatched,
    /// Nothing was ready before the timeout expired.
    TimedOut,
}

/// Answer to a lifecycle command, for commands the host expects data back from.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandReply {
    Done,
    /// Bytes to persist in answer to `AppCommand::SaveState`.
    SavedState(Vec<u8>),
}

/// Activity host as seen by the frame driver.
pub trait EventSource {
    /// Waits up to `timeout` (`None` blocks indefinitely) for host events and
    /// passes every lifecycle command to `handler`.
    fn poll(
        &mut self,
        timeout: Option<Duration>,
        handler: &mut dyn FnMut(AppCommand) -> CommandReply,
    ) -> PollOutcome;

    /// Passes every pending motion sample to `handler` and clears the host's
    /// input buffer.
    fn drain_motion(&mut self, handler: &mut dyn FnMut(&MotionSample));
}

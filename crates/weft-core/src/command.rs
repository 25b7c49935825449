//! User-issued lifecycle commands.

use std::fmt;

/// A lifecycle command sent to a simulator's coordination loop.
///
/// Commands are drained and applied before any event delivery on each loop
/// iteration. A command arriving while an event delivery is in flight is
/// observed only after the simulation acknowledges that delivery.
///
/// # Examples
///
/// ```
/// use weft_core::Command;
///
/// let cmd = Command::Pause;
/// assert_ne!(cmd, Command::Activate);
/// assert_eq!(cmd.to_string(), "pause");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resume (or begin) event delivery.
    Activate,
    /// Suspend event delivery until the next [`Activate`](Command::Activate).
    Pause,
    /// Terminate the coordination loop.
    Interrupt,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Activate => "activate",
            Self::Pause => "pause",
            Self::Interrupt => "interrupt",
        };
        write!(f, "{name}")
    }
}

//! Lifecycle states and simulation run statuses.
//!
//! Two independent signal classes meet in the coordinator: user commands
//! (see [`crate::command`]) and run statuses emitted by the simulation. The
//! coordinator folds both into one resting [`LifecycleState`].

use std::fmt;

/// Resting state of a simulator's coordination loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Post-construction, pre-run.
    Ready,
    /// Delivering events to the simulation.
    Active,
    /// Suspended by the user; no event delivery is attempted.
    Paused,
    /// Terminal: the user requested a stop.
    Interrupted,
    /// Terminal: the simulation signaled normal completion.
    Finished,
    /// Terminal: the input source was exhausted.
    EndInput,
    /// Terminal: the simulation signaled an unrecoverable error.
    Fatal,
}

impl LifecycleState {
    /// Whether this state is terminal.
    ///
    /// Terminal states are absorbing: once reached, no user command changes
    /// the state again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Interrupted | Self::Finished | Self::EndInput | Self::Fatal
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ready => "ready",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Interrupted => "interrupted",
            Self::Finished => "finished",
            Self::EndInput => "end-input",
            Self::Fatal => "fatal",
        };
        write!(f, "{name}")
    }
}

/// Status reported by a simulation back to its coordinator.
///
/// One status answers each forwarded event (via the delivery's reply
/// channel); one final status answers the closing of the event channel (via
/// the outcome channel). [`Processing`](RunStatus::Processing) is the only
/// non-terminal status: it acknowledges the event and asks for more input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// The event was consumed; the simulation expects more input.
    Processing,
    /// The simulation reached its end time.
    Finished,
    /// The simulation observed the end of its input.
    EndInput,
    /// The simulation hit an unrecoverable error.
    Fatal {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl RunStatus {
    /// Whether this status terminates the run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Finished => write!(f, "finished"),
            Self::EndInput => write!(f, "end-input"),
            Self::Fatal { reason } => write!(f, "fatal: {reason}"),
        }
    }
}

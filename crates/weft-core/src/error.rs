//! Error types for the Weft simulation harness.

use std::error::Error;
use std::fmt;

/// Error returned by registry lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// No simulator with the requested identifier is registered.
    NotFound {
        /// The identifier as the caller supplied it.
        id: String,
    },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "simulator with id '{id}' not found"),
        }
    }
}

impl Error for LookupError {}

/// Terminal failure recorded on a simulator.
///
/// Recovery, if any, is the simulation's responsibility before it emits the
/// fatal signal; the coordinator records the error and exits its loop. The
/// caller discovers it by polling `err()` — nothing is re-raised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunError {
    /// The simulation reported an unrecoverable error.
    SimulationFatal {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimulationFatal { reason } => write!(f, "simulation fatal: {reason}"),
        }
    }
}

impl Error for RunError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_names_the_requested_id() {
        let err = LookupError::NotFound { id: "C".into() };
        assert!(err.to_string().contains("'C'"));
    }

    #[test]
    fn run_error_carries_the_reason() {
        let err = RunError::SimulationFatal {
            reason: "divergence at step 3".into(),
        };
        assert!(err.to_string().contains("divergence at step 3"));
    }
}

//! Simulator identifiers.

use std::fmt;

use uuid::Uuid;

/// Process-unique identifier for a simulator.
///
/// Generated once at construction and immutable thereafter. The hyphenated
/// rendering (via [`Display`](fmt::Display)) is the sole lookup key in the
/// registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SimulatorId(Uuid);

impl SimulatorId {
    /// Generate a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SimulatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = SimulatorId::generate();
        let b = SimulatorId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn display_matches_uuid_rendering() {
        let id = SimulatorId::generate();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }
}

//! Dynamic value model for events, observations, and simulation variables.
//!
//! Simulations carry open schemas: the harness never knows at compile time
//! which keys a reader produces or a simulation emits. [`Value`] keeps that
//! flexibility while making every read type-checked at the point of use.

use indexmap::IndexMap;

/// A dynamically typed value carried inside [`Event`] and [`Observations`].
///
/// # Examples
///
/// ```
/// use weft_core::Value;
///
/// let v = Value::from(3.5);
/// assert_eq!(v.as_float(), Some(3.5));
/// assert_eq!(v.as_int(), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Text.
    Text(String),
    /// Ordered sequence of values.
    Seq(Vec<Value>),
    /// Nested string-keyed mapping, iterated in insertion order.
    Map(IndexMap<String, Value>),
}

impl Value {
    /// The boolean payload, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float payload, if this is a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The text payload, if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The sequence payload, if this is a [`Value::Seq`].
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(s) => Some(s),
            _ => None,
        }
    }

    /// The mapping payload, if this is a [`Value::Map`].
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Seq(v)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(v: IndexMap<String, Value>) -> Self {
        Self::Map(v)
    }
}

/// One unit of external input delivered to a running simulation.
///
/// Created by a reader, consumed exactly once by the coordinator, forwarded
/// at most once to the simulation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    entries: IndexMap<String, Value>,
}

impl Event {
    /// Create an empty event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any existing value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the event carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Event {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One unit of simulation output, delivered to exactly one writer.
///
/// Iteration order is the intended read order: entries come back out in the
/// order the simulation inserted them, and [`keys`](Observations::keys)
/// exposes that order directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Observations {
    entries: IndexMap<String, Value>,
}

impl Observations {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Re-inserting a key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Key names in intended read order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in intended read order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Observations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Time-varying condition of the modeled system.
///
/// Owned and mutated solely by the simulation implementation; the harness
/// never inspects it.
pub type State = IndexMap<String, Value>;

/// Time-invariant inputs and unknowns to be estimated.
///
/// Owned and mutated solely by the simulation implementation; the harness
/// never inspects it.
pub type Parameters = IndexMap<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accessors_reject_other_variants() {
        let v = Value::Int(7);
        assert_eq!(v.as_int(), Some(7));
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.as_float(), None);
        assert_eq!(v.as_text(), None);
        assert_eq!(v.as_seq(), None);
        assert!(v.as_map().is_none());
    }

    #[test]
    fn event_replaces_on_duplicate_key() {
        let mut event = Event::new();
        event.insert("t", 1i64);
        event.insert("t", 2i64);
        assert_eq!(event.len(), 1);
        assert_eq!(event.get("t"), Some(&Value::Int(2)));
    }

    #[test]
    fn observations_keys_follow_insertion_order() {
        let mut obs = Observations::new();
        obs.insert("z", 1i64);
        obs.insert("a", 2i64);
        obs.insert("m", 3i64);
        let keys: Vec<&str> = obs.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn state_and_parameters_are_plain_ordered_maps() {
        let mut state = State::new();
        state.insert("level".into(), Value::Float(0.5));
        let mut parameters = Parameters::new();
        parameters.insert("decay".into(), Value::Float(0.9));
        assert_eq!(state["level"].as_float(), Some(0.5));
        assert_eq!(parameters["decay"].as_float(), Some(0.9));
    }

    #[test]
    fn from_iterator_preserves_order() {
        let obs: Observations = [("b", 1i64), ("a", 2i64)].into_iter().collect();
        let keys: Vec<&str> = obs.keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    // Finite floats only: NaN breaks the equality assertions below.
    fn arb_scalar() -> impl Strategy<Value = super::Value> {
        prop_oneof![
            any::<bool>().prop_map(super::Value::Bool),
            any::<i64>().prop_map(super::Value::Int),
            (-1.0e9..1.0e9f64).prop_map(super::Value::Float),
            "[a-z]{0,8}".prop_map(super::Value::Text),
        ]
    }

    proptest! {
        #[test]
        fn event_get_returns_inserted(key in "[a-z]{1,8}", value in arb_scalar()) {
            let mut event = Event::new();
            event.insert(key.clone(), value.clone());
            prop_assert_eq!(event.get(&key), Some(&value));
        }

        #[test]
        fn observations_iter_matches_keys(
            entries in prop::collection::vec(("[a-z]{1,6}", arb_scalar()), 0..16)
        ) {
            let obs: Observations = entries.into_iter().collect();
            let from_iter: Vec<&str> = obs.iter().map(|(k, _)| k).collect();
            let from_keys: Vec<&str> = obs.keys().collect();
            prop_assert_eq!(from_iter, from_keys);
        }
    }
}

//! Per-run mutable generation state.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Mutable state owned by exactly one generator for the lifetime of a run.
///
/// Both caches hold exactly one entry per declared field, created by
/// [`GenState::track_field`] before any value is produced for that field and
/// never removed while the run lives. The state is not shared across
/// concurrent callers without external serialization.
#[derive(Debug)]
pub struct GenState {
    /// Events emitted so far; advanced by exactly one per successful emit.
    pub counter: u64,
    /// Rendered forms of values already produced per field, for fields that
    /// must never repeat a value.
    pub prev_for_dup: HashMap<String, HashSet<String>>,
    /// Distinct values produced so far per cardinality-bounded field, cycled
    /// once the configured cardinality is reached.
    pub prev_cardinality: HashMap<String, Vec<Value>>,
    /// Seeded RNG; all randomness for the run flows through here so that a
    /// given seed reproduces the same corpus.
    pub rng: StdRng,
}

impl GenState {
    pub fn new(seed: u64) -> Self {
        Self {
            counter: 0,
            prev_for_dup: HashMap::new(),
            prev_cardinality: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create the cache entries for a field. Idempotent.
    pub fn track_field(&mut self, name: &str) {
        self.prev_for_dup.entry(name.to_string()).or_default();
        self.prev_cardinality.entry(name.to_string()).or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_track_field_creates_empty_entries() {
        let mut state = GenState::new(0);
        state.track_field("host.name");

        assert!(state.prev_for_dup["host.name"].is_empty());
        assert!(state.prev_cardinality["host.name"].is_empty());
    }

    #[test]
    fn test_track_field_is_idempotent() {
        let mut state = GenState::new(0);
        state.track_field("x");
        state.prev_cardinality.get_mut("x").unwrap().push(Value::from(1));
        state.track_field("x");

        assert_eq!(state.prev_cardinality["x"].len(), 1);
    }

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = GenState::new(42);
        let mut b = GenState::new(42);

        let xs: Vec<u64> = (0..8).map(|_| a.rng.gen()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.rng.gen()).collect();
        assert_eq!(xs, ys);
    }
}

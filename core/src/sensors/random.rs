use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of uniform draws in `[0, 1)` consumed by the motion sensor.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

/// Unseeded production source backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic source for replayable demo sessions.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, then keeps returning `fallback`.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRandom {
    /// Once exhausted the sensor reads as quiet.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self::with_fallback(values, 0.99)
    }

    pub fn with_fallback(values: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_source_replays_then_falls_back() {
        let mut source = ScriptedRandom::with_fallback([0.1, 0.5], 0.7);
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(source.next_unit(), 0.5);
        assert_eq!(source.next_unit(), 0.7);
        source.push(0.2);
        assert_eq!(source.next_unit(), 0.2);
    }

    #[test]
    fn seeded_source_is_reproducible_and_bounded() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..32 {
            let value = a.next_unit();
            assert_eq!(value, b.next_unit());
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn thread_source_stays_in_unit_interval() {
        let mut source = ThreadRandom;
        for _ in 0..64 {
            assert!((0.0..1.0).contains(&source.next_unit()));
        }
    }
}

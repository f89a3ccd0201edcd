//! Injectable randomness for the fallback responder's generic replies.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A source of uniform template picks.
pub trait RandomSource: Send + Sync {
    /// Pick an index in `0..len`. Callers never pass `len == 0`.
    fn pick(&self, len: usize) -> usize;
}

/// `StdRng`-backed source, seeded from the OS or from a fixed seed.
pub struct StdRandom {
    rng: Mutex<StdRng>,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic source: the same seed yields the same picks.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn pick(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(0..len)
    }
}

/// Replays a scripted sequence of picks, cycling when exhausted.
/// Each pick is reduced modulo `len`.
pub struct SequenceRandom {
    picks: Vec<usize>,
    next: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(picks: impl Into<Vec<usize>>) -> Self {
        Self {
            picks: picks.into(),
            next: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn pick(&self, len: usize) -> usize {
        if self.picks.is_empty() {
            return 0;
        }
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        self.picks[i % self.picks.len()] % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_agree() {
        let a = StdRandom::seeded(42);
        let b = StdRandom::seeded(42);
        let picks_a: Vec<usize> = (0..20).map(|_| a.pick(7)).collect();
        let picks_b: Vec<usize> = (0..20).map(|_| b.pick(7)).collect();
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(|&p| p < 7));
    }

    #[test]
    fn sequence_cycles_and_wraps() {
        let seq = SequenceRandom::new(vec![1, 0, 5]);
        assert_eq!(seq.pick(2), 1);
        assert_eq!(seq.pick(2), 0);
        assert_eq!(seq.pick(2), 1); // 5 % 2
        assert_eq!(seq.pick(2), 1); // cycled back to the first pick
    }

    #[test]
    fn empty_sequence_picks_first() {
        assert_eq!(SequenceRandom::new(Vec::new()).pick(3), 0);
    }
}

//! Injectable randomness.
//!
//! Every random decision in the core (accuracy rolls, monster move picks,
//! card draws, grid shuffles) goes through [`GameRng`], so tests can supply
//! a scripted sequence instead of ambient global randomness.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use std::collections::VecDeque;

/// Source of random values for combat and progression.
pub trait GameRng {
    /// Generate a random u32.
    fn next_u32(&mut self) -> u32;

    /// Uniform roll in `[0, 100)`.
    fn roll_percent(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0) * 100.0
    }

    /// Uniform index in `[0, len)`. Returns 0 when `len` is 0.
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.next_u32() as usize % len
    }

    /// Uniform integer in `[min, max]`.
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32()) % span) as u32
    }

    /// Shuffle a slice with a uniform random permutation (Fisher-Yates).
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.pick_index(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Seedable generator backed by `rand`'s `StdRng`.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::rng::{GameRng, SeededRng};
///
/// let mut a = SeededRng::seed_from_u64(7);
/// let mut b = SeededRng::seed_from_u64(7);
/// assert_eq!(a.roll_percent(), b.roll_percent());
///
/// let roll = a.roll_percent();
/// assert!((0.0..100.0).contains(&roll));
/// ```
#[derive(Debug, Clone)]
pub struct SeededRng(StdRng);

impl SeededRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Seed from the operating system.
    pub fn from_os_rng() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl GameRng for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn roll_percent(&mut self) -> f64 {
        self.0.random_range(0.0..100.0)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.0.random_range(0..len)
    }

    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.0.random_range(min..=max)
    }

    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }
}

/// Replays pre-recorded values, for tests and replays.
///
/// Percent rolls come from one queue, every other draw (indices, ranges,
/// shuffle swaps) from a second queue of raw `u32`s. An exhausted queue
/// yields `0.0` / `0`, so an unscripted `ScriptedRng` always hits and
/// always picks the first option.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::rng::{GameRng, ScriptedRng};
///
/// let mut rng = ScriptedRng::new().with_rolls([99.5, 0.0]).with_draws([2]);
/// assert_eq!(rng.roll_percent(), 99.5);
/// assert_eq!(rng.roll_percent(), 0.0);
/// assert_eq!(rng.pick_index(3), 2);
/// assert_eq!(rng.pick_index(3), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    rolls: VecDeque<f64>,
    draws: VecDeque<u32>,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue percent rolls, consumed in order.
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = f64>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Queue raw draws for picks, ranges and shuffles.
    pub fn with_draws(mut self, draws: impl IntoIterator<Item = u32>) -> Self {
        self.draws.extend(draws);
        self
    }
}

impl GameRng for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.draws.pop_front().unwrap_or(0)
    }

    fn roll_percent(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(0.0)
    }
}

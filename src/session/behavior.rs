//! Randomized guest behavior.
//!
//! Decides what a guest does on each cycle and how long it waits in
//! between. All sampling goes through a caller-supplied RNG so a run can
//! be made reproducible with a seed.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use rand::Rng;

use crate::protocol::Espoused;

// ============================================================================
// Constants
// ============================================================================

/// Length of a generated display name.
pub const NAME_LEN: usize = 5;

/// Default chance per cycle that a guest leaves and rejoins.
pub const DEFAULT_REMOVE_NAME_PROBABILITY: f64 = 0.01;

/// Default pause between two actions.
pub const DEFAULT_GUESS_INTERVAL: DelayRange =
    DelayRange::new(Duration::from_secs(1), Duration::from_secs(3));

/// Default pause between leaving and rejoining.
pub const DEFAULT_RENAME_DELAY: DelayRange =
    DelayRange::new(Duration::from_secs(3), Duration::from_secs(5));

// ============================================================================
// Functions
// ============================================================================

/// Generates a display name of [`NAME_LEN`] random lowercase ASCII letters.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..NAME_LEN)
        .map(|_| char::from(b'a' + rng.random_range(0..26u8)))
        .collect()
}

// ============================================================================
// DelayRange
// ============================================================================

/// Half-open range `[min, max)` of wait durations, sampled uniformly.
///
/// When `min == max` the range is a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// Creates a new range. Validity (`min <= max`) is checked by the
    /// driver builder, see [`DelayRange::is_valid`].
    #[inline]
    #[must_use]
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Creates a range that always yields `delay`.
    #[inline]
    #[must_use]
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    /// Lower bound (inclusive).
    #[inline]
    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound (exclusive).
    #[inline]
    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Returns `true` if `min <= max`.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Draws a delay from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        rng.random_range(self.min..self.max)
    }
}

// ============================================================================
// Action
// ============================================================================

/// What a guest does on one cycle of its sender loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Send a guess for the given side.
    Guess(Espoused),
    /// Leave the game, wait out the rename delay, then rejoin.
    RemoveName,
}

// ============================================================================
// Behavior
// ============================================================================

/// Timing and probability parameters shared by every session of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Behavior {
    /// Chance per cycle of [`Action::RemoveName`]; `0.0` disables it.
    pub remove_name_probability: f64,

    /// Pause after every action.
    pub guess_interval: DelayRange,

    /// Pause between `RemoveName` and the following `SetName`.
    pub rename_delay: DelayRange,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            remove_name_probability: DEFAULT_REMOVE_NAME_PROBABILITY,
            guess_interval: DEFAULT_GUESS_INTERVAL,
            rename_delay: DEFAULT_RENAME_DELAY,
        }
    }
}

impl Behavior {
    /// Guests that only ever guess and never leave.
    #[inline]
    #[must_use]
    pub fn guess_only() -> Self {
        Self {
            remove_name_probability: 0.0,
            ..Self::default()
        }
    }

    /// Picks the next action.
    ///
    /// `remove_name_probability` must lie in `[0, 1]`.
    pub fn next_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        if self.remove_name_probability > 0.0 && rng.random_bool(self.remove_name_probability) {
            Action::RemoveName
        } else {
            Action::Guess(Espoused::random(rng))
        }
    }

    /// Samples the pause that follows an action.
    #[inline]
    pub fn guess_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        self.guess_interval.sample(rng)
    }

    /// Samples the pause between leaving and rejoining.
    #[inline]
    pub fn rename_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        self.rename_delay.sample(rng)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const CYCLES: usize = 100_000;

    #[test]
    fn test_name_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let name = random_name(&mut rng);
            assert_eq!(name.len(), NAME_LEN);
            assert!(name.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_names_vary() {
        let mut rng = StdRng::seed_from_u64(2);
        let a = random_name(&mut rng);
        let b = random_name(&mut rng);
        let c = random_name(&mut rng);
        assert!(a != b || b != c);
    }

    proptest! {
        #[test]
        fn prop_name_is_five_lowercase_letters(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let name = random_name(&mut rng);
            prop_assert_eq!(name.chars().count(), 5);
            prop_assert!(name.bytes().all(|b| b.is_ascii_lowercase()));
        }

        #[test]
        fn prop_delay_within_range(seed in any::<u64>(), min_ms in 0u64..5000, span_ms in 1u64..5000) {
            let range = DelayRange::new(
                Duration::from_millis(min_ms),
                Duration::from_millis(min_ms + span_ms),
            );
            let mut rng = StdRng::seed_from_u64(seed);
            let delay = range.sample(&mut rng);
            prop_assert!(delay >= range.min());
            prop_assert!(delay < range.max());
        }
    }

    #[test]
    fn test_removal_frequency_converges() {
        let behavior = Behavior::default();
        let mut rng = StdRng::seed_from_u64(42);

        let removals = (0..CYCLES)
            .filter(|_| behavior.next_action(&mut rng) == Action::RemoveName)
            .count();

        let fraction = removals as f64 / CYCLES as f64;
        assert!(
            (fraction - 0.01).abs() < 0.002,
            "removal fraction {fraction} too far from 1%"
        );
    }

    #[test]
    fn test_guess_split_is_even() {
        let behavior = Behavior::default();
        let mut rng = StdRng::seed_from_u64(43);

        let mut brides = 0usize;
        let mut grooms = 0usize;
        for _ in 0..CYCLES {
            match behavior.next_action(&mut rng) {
                Action::Guess(Espoused::Bride) => brides += 1,
                Action::Guess(Espoused::Groom) => grooms += 1,
                Action::RemoveName => {}
            }
        }

        let fraction = brides as f64 / (brides + grooms) as f64;
        assert!(
            (fraction - 0.5).abs() < 0.01,
            "bride fraction {fraction} too far from 50%"
        );
    }

    #[test]
    fn test_guess_only_never_removes() {
        let behavior = Behavior::guess_only();
        let mut rng = StdRng::seed_from_u64(44);
        assert!(
            (0..CYCLES).all(|_| matches!(behavior.next_action(&mut rng), Action::Guess(_)))
        );
    }

    #[test]
    fn test_always_remove() {
        let behavior = Behavior {
            remove_name_probability: 1.0,
            ..Behavior::default()
        };
        let mut rng = StdRng::seed_from_u64(45);
        assert_eq!(behavior.next_action(&mut rng), Action::RemoveName);
    }

    #[test]
    fn test_default_timings() {
        let behavior = Behavior::default();
        let mut rng = StdRng::seed_from_u64(46);
        for _ in 0..1000 {
            let guess = behavior.guess_delay(&mut rng);
            assert!(guess >= Duration::from_secs(1) && guess < Duration::from_secs(3));

            let rename = behavior.rename_delay(&mut rng);
            assert!(rename >= Duration::from_secs(3) && rename < Duration::from_secs(5));
        }
    }

    #[test]
    fn test_fixed_delay() {
        let range = DelayRange::fixed(Duration::from_millis(250));
        let mut rng = StdRng::seed_from_u64(47);
        assert!(range.is_valid());
        assert_eq!(range.sample(&mut rng), Duration::from_millis(250));
    }

    #[test]
    fn test_inverted_range_is_invalid() {
        let range = DelayRange::new(Duration::from_secs(3), Duration::from_secs(1));
        assert!(!range.is_valid());
    }
}

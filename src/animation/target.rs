//! Randomly sampled animation targets.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MaxSeconds;
use crate::types::{Brightness, Hue, Saturation};

/// Saturation range targets are drawn from; keeps colors vivid.
pub const TARGET_SATURATION: RangeInclusive<u8> = 150..=254;
/// Brightness range targets are drawn from.
pub const TARGET_BRIGHTNESS: RangeInclusive<u8> = 10..=254;
/// Shortest transition, in seconds.
pub const MIN_DURATION_SECS: f64 = MaxSeconds::FLOOR;

/// Where one cycle of the animation is heading and how long it takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTarget {
    pub hue: Hue,
    pub saturation: Saturation,
    pub brightness: Brightness,
    pub duration: Duration,
}

impl AnimationTarget {
    /// Draw a target uniformly from the target ranges, with a duration
    /// between half a second and `max_seconds`.
    ///
    /// Draws too long for a [`Duration`] saturate to [`Duration::MAX`].
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, max_seconds: f64) -> Self {
        let max_seconds = max_seconds.max(MIN_DURATION_SECS);
        AnimationTarget {
            hue: Hue::new(rng.gen_range(Hue::MIN..=Hue::MAX)),
            saturation: Saturation::saturating(rng.gen_range(TARGET_SATURATION)),
            brightness: Brightness::saturating(rng.gen_range(TARGET_BRIGHTNESS)),
            duration: Duration::try_from_secs_f64(rng.gen_range(MIN_DURATION_SECS..=max_seconds))
                .unwrap_or(Duration::MAX),
        }
    }
}

/// Supplies the next target for a light each cycle.
pub trait TargetSource: Send + Sync {
    fn next_target(&mut self, max_seconds: f64) -> AnimationTarget;
}

/// Uniformly random targets.
#[derive(Debug, Clone)]
pub struct RandomTargets {
    rng: StdRng,
}

impl RandomTargets {
    pub fn new() -> Self {
        RandomTargets {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of targets.
    pub fn seeded(seed: u64) -> Self {
        RandomTargets {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomTargets {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetSource for RandomTargets {
    fn next_target(&mut self, max_seconds: f64) -> AnimationTarget {
        AnimationTarget::sample(&mut self.rng, max_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_stay_in_target_ranges() {
        let mut targets = RandomTargets::seeded(7);
        for _ in 0..5000 {
            let target = targets.next_target(3.0);
            assert!(TARGET_SATURATION.contains(&target.saturation.value()));
            assert!(TARGET_BRIGHTNESS.contains(&target.brightness.value()));
            let secs = target.duration.as_secs_f64();
            assert!((0.5..=3.0).contains(&secs), "duration {secs}");
        }
    }

    #[test]
    fn test_minimum_max_seconds_gives_half_second() {
        let mut targets = RandomTargets::seeded(1);
        for max in [0.5, 0.1, 0.0] {
            assert_eq!(
                targets.next_target(max).duration,
                Duration::from_millis(500)
            );
        }
    }

    #[test]
    fn test_huge_max_seconds_saturates() {
        let mut targets = RandomTargets::seeded(1);
        let max = MaxSeconds::fixed(1e30).resolve();
        for _ in 0..100 {
            let target = targets.next_target(max);
            assert!(target.duration >= Duration::from_millis(500));
        }
        assert_eq!(
            AnimationTarget::sample(&mut StdRng::seed_from_u64(9), f64::MAX).duration,
            Duration::MAX
        );
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = RandomTargets::seeded(42);
        let mut b = RandomTargets::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.next_target(30.0), b.next_target(30.0));
        }
    }
}

//! Linear interpolation between two light states.

use std::time::Duration;

use super::target::AnimationTarget;
use crate::state::LightState;
use crate::types::{Brightness, Hue, Saturation};

/// Pause between two writes of a transition.
pub const TICK: Duration = Duration::from_millis(100);

/// Number of ticks needed to cover `duration`, never less than one.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hue_mood::animation::step_count;
///
/// assert_eq!(step_count(Duration::from_millis(500)), 5);
/// assert_eq!(step_count(Duration::from_millis(20)), 1);
/// assert_eq!(step_count(Duration::from_millis(1260)), 13);
/// ```
pub fn step_count(duration: Duration) -> u32 {
    let steps = (duration.as_secs_f64() / TICK.as_secs_f64()).round();
    (steps as u32).max(1)
}

/// Per-tick states of one cycle, from a starting state towards a target.
///
/// Hue, saturation and brightness move by a fixed increment per tick. The
/// position is kept as `f64` so fractional increments add up; each yielded
/// state is the position rounded and clamped into the channel's range, with
/// power on. Hue moves linearly along 0..=65535 and never wraps.
#[derive(Debug, Clone)]
pub struct Transition {
    steps: u32,
    taken: u32,
    position: [f64; 3],
    increment: [f64; 3],
}

impl Transition {
    pub fn new(from: &LightState, target: &AnimationTarget) -> Self {
        let steps = step_count(target.duration);
        let position = [
            f64::from(from.hue.value()),
            f64::from(from.saturation.value()),
            f64::from(from.brightness.value()),
        ];
        let goal = [
            f64::from(target.hue.value()),
            f64::from(target.saturation.value()),
            f64::from(target.brightness.value()),
        ];
        let increment = [0, 1, 2].map(|i| (goal[i] - position[i]) / f64::from(steps));

        Transition {
            steps,
            taken: 0,
            position,
            increment,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Increments as `(hue, saturation, brightness)`.
    pub fn increments(&self) -> (f64, f64, f64) {
        (self.increment[0], self.increment[1], self.increment[2])
    }
}

impl Iterator for Transition {
    type Item = LightState;

    fn next(&mut self) -> Option<LightState> {
        if self.taken >= self.steps {
            return None;
        }
        self.taken += 1;
        for (position, increment) in self.position.iter_mut().zip(self.increment) {
            *position += increment;
        }

        Some(LightState {
            on: true,
            hue: Hue::from_position(self.position[0]),
            saturation: Saturation::from_position(self.position[1]),
            brightness: Brightness::from_position(self.position[2]),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.steps - self.taken) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Transition {}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(hue: u16, sat: u8, bri: u8) -> LightState {
        LightState::new(
            true,
            Brightness::saturating(bri),
            Hue::new(hue),
            Saturation::saturating(sat),
        )
    }

    fn target(hue: u16, sat: u8, bri: u8, millis: u64) -> AnimationTarget {
        AnimationTarget {
            hue: Hue::new(hue),
            saturation: Saturation::saturating(sat),
            brightness: Brightness::saturating(bri),
            duration: Duration::from_millis(millis),
        }
    }

    #[test]
    fn test_increments_and_first_tick() {
        let mut transition = Transition::new(&state(0, 200, 200), &target(100, 150, 100, 500));
        assert_eq!(transition.steps(), 5);
        assert_eq!(transition.increments(), (20.0, -10.0, -20.0));
        assert_eq!(transition.next(), Some(state(20, 190, 180)));
    }

    #[test]
    fn test_last_tick_lands_on_target() {
        let transition = Transition::new(&state(30000, 254, 1), &target(123, 151, 222, 1700));
        assert_eq!(transition.len(), 17);
        assert_eq!(transition.last(), Some(state(123, 151, 222)));
    }

    #[test]
    fn test_fractional_increments_accumulate() {
        // 2 levels over 5 ticks: each tick is 0.4 of a level.
        let values: Vec<u8> = Transition::new(&state(0, 200, 100), &target(0, 200, 102, 500))
            .map(|s| s.brightness().value())
            .collect();
        assert_eq!(values, vec![100, 101, 101, 102, 102]);
    }

    #[test]
    fn test_hue_does_not_wrap() {
        let hues: Vec<u16> = Transition::new(&state(65000, 200, 200), &target(500, 200, 200, 200))
            .map(|s| s.hue().value())
            .collect();
        assert_eq!(hues, vec![32750, 500]);
    }

    #[test]
    fn test_states_stay_in_range() {
        let transition = Transition::new(&state(65535, 0, 1), &target(0, 254, 254, 3000));
        for s in transition {
            assert!(s.on());
            assert!(s.saturation().value() <= 254);
            assert!((1..=254).contains(&s.brightness().value()));
        }
    }

    #[test]
    fn test_short_duration_still_takes_one_tick() {
        let mut transition = Transition::new(&state(0, 0, 1), &target(10, 10, 10, 0));
        assert_eq!(transition.steps(), 1);
        assert_eq!(transition.next(), Some(state(10, 10, 10)));
        assert_eq!(transition.next(), None);
    }
}

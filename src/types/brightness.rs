//! Brightness channel of a Hue light.

use serde::{Deserialize, Serialize};

/// Brightness level from 1 to 254.
///
/// The bridge treats 0 as "off" rather than "dim", so the floor is 1. Values
/// read from the bridge are clamped into range instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 254;
    /// Assumed when the bridge omits `bri`.
    pub const FALLBACK: u8 = 200;

    pub fn new() -> Self {
        Brightness {
            value: Self::FALLBACK,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is outside valid range (1-254).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_mood::Brightness;
    ///
    /// assert!(Brightness::create(1).is_some());
    /// assert!(Brightness::create(0).is_none());
    /// assert!(Brightness::create(255).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if Self::is_valid(value) {
            Some(Brightness { value })
        } else {
            None
        }
    }

    /// Clamps `value` into the valid range.
    pub fn saturating(value: u8) -> Self {
        Brightness {
            value: value.clamp(Self::MIN, Self::MAX),
        }
    }

    /// Rounds an interpolated position to the nearest level, then clamps.
    pub(crate) fn from_position(position: f64) -> Self {
        let value = position.round().clamp(f64::from(Self::MIN), f64::from(Self::MAX));
        Brightness { value: value as u8 }
    }

    fn is_valid(value: u8) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self::saturating(value)
    }
}

impl From<Brightness> for u8 {
    fn from(brightness: Brightness) -> Self {
        brightness.value
    }
}

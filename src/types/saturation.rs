//! Saturation channel of a Hue light.

use serde::{Deserialize, Serialize};

/// Color saturation from 0 (white) to 254 (fully saturated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Saturation {
    pub(crate) value: u8,
}

impl Saturation {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 254;
    /// Assumed when the bridge omits `sat`.
    pub const FALLBACK: u8 = 200;

    pub fn new() -> Self {
        Saturation {
            value: Self::FALLBACK,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is above 254.
    pub fn create(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Saturation { value })
        } else {
            None
        }
    }

    pub fn saturating(value: u8) -> Self {
        Saturation {
            value: value.min(Self::MAX),
        }
    }

    pub(crate) fn from_position(position: f64) -> Self {
        let value = position.round().clamp(f64::from(Self::MIN), f64::from(Self::MAX));
        Saturation { value: value as u8 }
    }
}

impl Default for Saturation {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u8> for Saturation {
    fn from(value: u8) -> Self {
        Self::saturating(value)
    }
}

impl From<Saturation> for u8 {
    fn from(saturation: Saturation) -> Self {
        saturation.value
    }
}

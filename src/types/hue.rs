//! Hue channel of a Hue light.

use serde::{Deserialize, Serialize};

/// Hue angle on the bridge's 16-bit scale (0-65535).
///
/// The scale is a ring in color terms, but interpolation treats it as a plain
/// scalar: moving from 65000 to 500 goes down through the middle of the range.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Hue {
    pub(crate) value: u16,
}

impl Hue {
    pub const MIN: u16 = 0;
    pub const MAX: u16 = 65535;

    pub fn new(value: u16) -> Self {
        Hue { value }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub(crate) fn from_position(position: f64) -> Self {
        let value = position.round().clamp(f64::from(Self::MIN), f64::from(Self::MAX));
        Hue {
            value: value as u16,
        }
    }
}

impl From<u16> for Hue {
    fn from(value: u16) -> Self {
        Hue { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_position_stays_on_scale() {
        assert_eq!(Hue::from_position(65535.4).value(), 65535);
        assert_eq!(Hue::from_position(70000.0).value(), 65535);
        assert_eq!(Hue::from_position(-0.6).value(), 0);
        assert_eq!(Hue::from_position(19.5).value(), 20);
    }
}

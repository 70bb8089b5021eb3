//! Light state snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Brightness, Hue, Saturation};

/// Snapshot of a light's power, brightness, hue and saturation.
///
/// Deserializes from the `state` object the bridge returns for a light.
/// Missing fields fall back to `on = false`, `bri = 200`, `hue = 0` and
/// `sat = 200`, so white-only bulbs still produce a usable snapshot.
///
/// # Examples
///
/// ```
/// use hue_mood::LightState;
///
/// let state: LightState = serde_json::from_str(r#"{"on": true, "bri": 80}"#).unwrap();
/// assert!(state.on());
/// assert_eq!(state.brightness().value(), 80);
/// assert_eq!(state.hue().value(), 0);
/// assert_eq!(state.saturation().value(), 200);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    #[serde(default)]
    pub(crate) on: bool,
    #[serde(rename = "bri", default)]
    pub(crate) brightness: Brightness,
    #[serde(default)]
    pub(crate) hue: Hue,
    #[serde(rename = "sat", default)]
    pub(crate) saturation: Saturation,
}

impl LightState {
    pub fn new(on: bool, brightness: Brightness, hue: Hue, saturation: Saturation) -> Self {
        LightState {
            on,
            brightness,
            hue,
            saturation,
        }
    }

    pub fn on(&self) -> bool {
        self.on
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    pub fn hue(&self) -> Hue {
        self.hue
    }

    pub fn saturation(&self) -> Saturation {
        self.saturation
    }

    /// The same color with power forced on.
    pub fn powered(self) -> Self {
        LightState { on: true, ..self }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bri={} hue={} sat={}",
            if self.on { "on" } else { "off" },
            self.brightness.value(),
            self.hue.value(),
            self.saturation.value()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_uses_fallbacks() {
        let state: LightState = serde_json::from_str("{}").unwrap();
        assert!(!state.on());
        assert_eq!(state.brightness().value(), 200);
        assert_eq!(state.hue().value(), 0);
        assert_eq!(state.saturation().value(), 200);
    }

    #[test]
    fn test_full_bridge_state() {
        let state: LightState = serde_json::from_str(
            r#"{"on": true, "bri": 144, "hue": 13088, "sat": 212, "effect": "none",
                "xy": [0.5128, 0.4147], "ct": 467, "alert": "none",
                "colormode": "xy", "reachable": true}"#,
        )
        .unwrap();
        assert_eq!(
            state,
            LightState::new(
                true,
                Brightness::saturating(144),
                Hue::new(13088),
                Saturation::saturating(212)
            )
        );
    }

    #[test]
    fn test_out_of_range_channels_are_clamped() {
        let state: LightState = serde_json::from_str(r#"{"bri": 0, "sat": 255}"#).unwrap();
        assert_eq!(state.brightness().value(), 1);
        assert_eq!(state.saturation().value(), 254);
    }

    #[test]
    fn test_display() {
        let state = LightState::new(
            false,
            Brightness::saturating(10),
            Hue::new(500),
            Saturation::saturating(150),
        );
        assert_eq!(state.to_string(), "off bri=10 hue=500 sat=150");
    }
}

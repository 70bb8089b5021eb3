//! Partial state writes for Hue lights.

use serde::{Deserialize, Serialize};

use crate::state::LightState;
use crate::types::{Brightness, Hue, Saturation};

/// A partial state update to send to a Hue light.
///
/// Only attributes that were set are serialized, so the bridge leaves every
/// other attribute of the light untouched.
///
/// # Creating Updates
///
/// 1. **Builder pattern** for combining attributes:
///    ```
///    use hue_mood::{Brightness, Hue, StateUpdate};
///    let mut update = StateUpdate::new();
///    update.on(true);
///    update.brightness(&Brightness::saturating(180));
///    update.hue(&Hue::new(46920));
///    ```
///
/// 2. **From a snapshot**, writing every channel at once:
///    ```
///    use hue_mood::{LightState, StateUpdate};
///    let update = StateUpdate::from(&LightState::default());
///    assert!(update.is_valid());
///    ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    pub(crate) on: Option<bool>,
    #[serde(rename = "bri")]
    pub(crate) brightness: Option<u8>,
    pub(crate) hue: Option<u16>,
    #[serde(rename = "sat")]
    pub(crate) saturation: Option<u8>,
    /// In multiples of 100ms.
    #[serde(rename = "transitiontime")]
    pub(crate) transition_time: Option<u16>,
}

impl StateUpdate {
    /// Create a new empty update.
    ///
    /// At least one state attribute must be set for the update to be valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_mood::StateUpdate;
    ///
    /// let mut update = StateUpdate::new();
    /// assert_eq!(update.is_valid(), false);
    ///
    /// update.transition_time(0);
    /// assert_eq!(update.is_valid(), false);
    ///
    /// update.on(false);
    /// assert_eq!(update.is_valid(), true);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this update changes at least one state attribute.
    ///
    /// A transition time alone changes nothing.
    pub fn is_valid(&self) -> bool {
        self.on.is_some()
            || self.brightness.is_some()
            || self.hue.is_some()
            || self.saturation.is_some()
    }

    pub fn on(&mut self, on: bool) -> &mut Self {
        self.on = Some(on);
        self
    }

    pub fn brightness(&mut self, brightness: &Brightness) -> &mut Self {
        self.brightness = Some(brightness.value);
        self
    }

    pub fn hue(&mut self, hue: &Hue) -> &mut Self {
        self.hue = Some(hue.value);
        self
    }

    pub fn saturation(&mut self, saturation: &Saturation) -> &mut Self {
        self.saturation = Some(saturation.value);
        self
    }

    /// Set the bridge-side fade, in multiples of 100ms.
    pub fn transition_time(&mut self, deciseconds: u16) -> &mut Self {
        self.transition_time = Some(deciseconds);
        self
    }

    /// Write every channel of `state` with no bridge-side fade.
    pub fn immediate(state: &LightState) -> Self {
        let mut update = StateUpdate::from(state);
        update.transition_time(0);
        update
    }
}

impl From<&LightState> for StateUpdate {
    fn from(state: &LightState) -> Self {
        let mut update = StateUpdate::new();
        update
            .on(state.on)
            .brightness(&state.brightness)
            .hue(&state.hue)
            .saturation(&state.saturation);
        update
    }
}

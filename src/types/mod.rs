//! Range-checked values for the color channels of a light.

mod brightness;
mod hue;
mod saturation;

pub use brightness::Brightness;
pub use hue::Hue;
pub use saturation::Saturation;

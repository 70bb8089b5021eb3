//! # hue_mood
//!
//! Randomized mood lighting for Philips Hue bulbs.
//!
//! Each configured bulb is driven by its own [`AnimationLoop`]: it drifts in
//! 100ms ticks towards a randomly drawn hue, saturation and brightness, picks
//! a new target when it gets there, and keeps going until the session is
//! stopped. On the way out every bulb is put back exactly as it was found.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use hue_mood::{AnimationGroup, HueBridge, MaxSeconds, Settings, StopReason};
//!
//! async fn mood() -> Result<(), Box<dyn std::error::Error>> {
//!     // HUE_USER_ID, HUE_BRIDGE_IP and REQUEST_TIMEOUT come from the environment
//!     let bridge = Arc::new(HueBridge::new(&Settings::from_env())?);
//!
//!     let group = AnimationGroup::new(bridge, ["Billy", "Anna"], MaxSeconds::new(None));
//!     let report = group
//!         .run(async {
//!             tokio::signal::ctrl_c().await.ok();
//!             StopReason::Interrupt
//!         })
//!         .await;
//!     println!("restored: {:?}", report.restored());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bridge access**: resolve lights by name, read and write state through [`HueBridge`],
//!   or plug in any other [`Bridge`]
//! - **Animation**: [`Transition`] interpolates linearly with per-tick clamping
//! - **Coordinated shutdown**: one [`CancellationSignal`] stops every loop; the
//!   [`AnimationGroup`] waits a bounded time for each light to be restored
//! - **Configuration**: [`Settings`] from the environment and the [`MaxSeconds`]
//!   override / `HUE_MOOD_MAX_SECONDS` / default chain
//!
//! ## Logging
//!
//! The library logs through the [`log`] facade and never installs a logger.
//!
//! ## Feature Flags
//!
//! - `cli` (default): build the `hue-mood` binary

pub mod animation;
mod bridge;
mod config;
mod errors;
mod payload;
mod state;
#[cfg(test)]
mod testing;
mod types;

// Re-export public API
pub use animation::{
    AnimationGroup, AnimationLoop, AnimationTarget, CancellationSignal, GroupReport, LoopExit,
    LoopOutcome, LoopReport, RandomTargets, SetupStage, StopReason, TargetSource, Transition,
};
pub use bridge::{Bridge, HueBridge, build_base_url, find_light_id};
pub use config::{Lookup, MaxSeconds, Settings, redact_user_id, resolve_max_seconds};
pub use errors::Error;
pub use payload::StateUpdate;
pub use state::LightState;
pub use types::{Brightness, Hue, Saturation};

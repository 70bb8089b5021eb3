//! The animation engine: per-light loops and their coordinating group.

mod animation_loop;
mod group;
mod report;
mod signal;
mod target;
mod transition;

pub use animation_loop::AnimationLoop;
pub use group::{AnimationGroup, GroupReport, LoopExit, StopReason};
pub use report::{LoopOutcome, LoopReport, SetupStage};
pub use signal::CancellationSignal;
pub use target::{
    AnimationTarget, MIN_DURATION_SECS, RandomTargets, TARGET_BRIGHTNESS, TARGET_SATURATION,
    TargetSource,
};
pub use transition::{TICK, Transition, step_count};

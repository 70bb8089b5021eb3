//! Animation lifecycle of a single light.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use log::{debug, error, info, warn};
use tokio::time;

use super::report::{LoopOutcome, LoopReport, SetupStage};
use super::signal::CancellationSignal;
use super::target::{RandomTargets, TargetSource};
use super::transition::{TICK, Transition};
use crate::bridge::Bridge;
use crate::config::MaxSeconds;
use crate::errors::Error;
use crate::payload::StateUpdate;
use crate::state::LightState;

/// Animates one light until the shared signal is raised, then restores it.
///
/// A loop owns its light exclusively for the whole session:
///
/// 1. Resolve the light by name, read and keep its state, and switch it on
///    if it is off. Any failure here ends the loop without touching the light
///    again.
/// 2. Repeatedly draw a target and walk towards it in [`TICK`] steps, one
///    write per tick. A failed write is logged and the next tick continues
///    from the advanced position.
/// 3. Write the captured state back exactly once, however step 2 ended.
///
/// The signal is checked before every cycle and every tick, so a loop stops
/// at most one tick after cancellation.
pub struct AnimationLoop<B, T = RandomTargets> {
    bridge: Arc<B>,
    name: String,
    signal: CancellationSignal,
    max_seconds: MaxSeconds,
    targets: T,
}

impl<B: Bridge> AnimationLoop<B, RandomTargets> {
    pub fn new(
        bridge: Arc<B>,
        name: &str,
        signal: CancellationSignal,
        max_seconds: MaxSeconds,
    ) -> Self {
        AnimationLoop {
            bridge,
            name: name.to_string(),
            signal,
            max_seconds,
            targets: RandomTargets::new(),
        }
    }
}

impl<B: Bridge, T: TargetSource> AnimationLoop<B, T> {
    /// Replace where targets come from.
    pub fn with_targets<U: TargetSource>(self, targets: U) -> AnimationLoop<B, U> {
        AnimationLoop {
            bridge: self.bridge,
            name: self.name,
            signal: self.signal,
            max_seconds: self.max_seconds,
            targets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the full lifecycle and report how it went. Never fails.
    pub async fn run(mut self) -> LoopReport {
        let mut report = LoopReport::new(&self.name);
        let Some((light_id, original)) = self.start(&mut report).await else {
            return report;
        };
        info!(
            "Starting mood loop for '{}' (id={light_id}), original state {original}",
            self.name
        );

        let animation = AssertUnwindSafe(self.animate(&light_id, original, &mut report))
            .catch_unwind()
            .await;
        if animation.is_err() {
            error!(
                "Mood loop for '{}' (id={light_id}) panicked; restoring",
                self.name
            );
        }

        report.outcome = self.restore(&light_id, &original).await;
        report
    }

    async fn start(&self, report: &mut LoopReport) -> Option<(String, LightState)> {
        let light_id = match self.bridge.resolve(&self.name).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                error!("Light named '{}' not found on the bridge", self.name);
                report.outcome = LoopOutcome::NotFound;
                return None;
            }
            Err(e) => {
                error!("Failed to fetch lights from Hue bridge: {e}");
                report.outcome = setup_failed(SetupStage::Resolve, &e);
                return None;
            }
        };
        report.light_id = Some(light_id.clone());

        let original = match self.bridge.read_state(&light_id).await {
            Ok(state) => state,
            Err(e) => {
                error!("Failed to get state for light {light_id}: {e}");
                report.outcome = setup_failed(SetupStage::ReadState, &e);
                return None;
            }
        };

        if !original.on() {
            let mut power_on = StateUpdate::new();
            power_on.on(true);
            if let Err(e) = self.bridge.write_state(&light_id, &power_on).await {
                error!("Failed to turn on light {light_id}: {e}");
                report.outcome = setup_failed(SetupStage::PowerOn, &e);
                return None;
            }
        }

        Some((light_id, original))
    }

    async fn animate(&mut self, light_id: &str, original: LightState, report: &mut LoopReport) {
        let mut current = original.powered();

        while !self.signal.is_cancelled() {
            let target = self.targets.next_target(self.max_seconds.resolve());
            let transition = Transition::new(&current, &target);
            report.cycles += 1;
            debug!(
                "'{}' heading to hue={} sat={} bri={} in {} ticks",
                self.name,
                target.hue.value(),
                target.saturation.value(),
                target.brightness.value(),
                transition.steps()
            );

            for next in transition {
                if self.signal.is_cancelled() {
                    break;
                }
                current = next;
                match self
                    .bridge
                    .write_state(light_id, &StateUpdate::immediate(&current))
                    .await
                {
                    Ok(()) => report.ticks_written += 1,
                    Err(e) => {
                        report.failed_writes += 1;
                        warn!("Transient error setting state of light {light_id}: {e}");
                    }
                }
                time::sleep(TICK).await;
            }
        }
    }

    async fn restore(&self, light_id: &str, original: &LightState) -> LoopOutcome {
        match self
            .bridge
            .write_state(light_id, &StateUpdate::immediate(original))
            .await
        {
            Ok(()) => {
                info!(
                    "Restored '{}' (id={light_id}) to original state",
                    self.name
                );
                LoopOutcome::Restored
            }
            Err(e) => {
                warn!("Failed to restore original state for light {light_id}: {e}");
                LoopOutcome::RestoreFailed(e.to_string())
            }
        }
    }
}

fn setup_failed(stage: SetupStage, err: &Error) -> LoopOutcome {
    LoopOutcome::SetupFailed {
        stage,
        reason: err.to_string(),
    }
}

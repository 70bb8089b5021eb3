//! Coordinated start and shutdown of several animation loops.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tokio::time;

use super::animation_loop::AnimationLoop;
use super::report::{LoopOutcome, LoopReport};
use super::signal::CancellationSignal;
use crate::bridge::Bridge;
use crate::config::MaxSeconds;

/// What ended a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// The Esc key was pressed.
    Escape,
    /// SIGINT / Ctrl-C.
    Interrupt,
    /// SIGTERM.
    Terminate,
}

/// How the group's wait on one loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopExit {
    Finished(LoopReport),
    /// The loop was still running when the join bound expired and was left
    /// behind; its light may not be restored.
    TimedOut { name: String },
    /// The loop's task died without producing a report.
    Panicked { name: String },
}

impl LoopExit {
    pub fn name(&self) -> &str {
        match self {
            LoopExit::Finished(report) => &report.name,
            LoopExit::TimedOut { name } | LoopExit::Panicked { name } => name,
        }
    }

    pub fn report(&self) -> Option<&LoopReport> {
        match self {
            LoopExit::Finished(report) => Some(report),
            _ => None,
        }
    }
}

/// Outcome of a whole session, one entry per configured light in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub reason: StopReason,
    pub loops: Vec<LoopExit>,
}

impl GroupReport {
    /// Names of lights that were animated and are known to be restored.
    pub fn restored(&self) -> Vec<&str> {
        self.loops
            .iter()
            .filter_map(LoopExit::report)
            .filter(|report| report.outcome == LoopOutcome::Restored)
            .map(|report| report.name.as_str())
            .collect()
    }
}

/// Runs one [`AnimationLoop`] per light name until a stop trigger fires.
///
/// All loops share one [`CancellationSignal`]. Loops never affect each other:
/// a light that cannot be found or read only ends its own loop.
///
/// ```ignore
/// let bridge = Arc::new(HueBridge::new(&Settings::from_env())?);
/// let group = AnimationGroup::new(bridge, ["Billy", "Anna"], MaxSeconds::new(None));
/// let report = group.run(async { tokio::signal::ctrl_c().await.ok(); StopReason::Interrupt }).await;
/// ```
pub struct AnimationGroup<B> {
    bridge: Arc<B>,
    names: Vec<String>,
    max_seconds: MaxSeconds,
    signal: CancellationSignal,
}

impl<B: Bridge + 'static> AnimationGroup<B> {
    /// How long shutdown waits for each loop to restore its light.
    pub const JOIN_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new<I, S>(bridge: Arc<B>, names: I, max_seconds: MaxSeconds) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnimationGroup {
            bridge,
            names: names.into_iter().map(Into::into).collect(),
            max_seconds,
            signal: CancellationSignal::new(),
        }
    }

    /// Use an externally owned signal instead of a fresh one.
    pub fn with_signal(mut self, signal: CancellationSignal) -> Self {
        self.signal = signal;
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn signal(&self) -> CancellationSignal {
        self.signal.clone()
    }

    /// Start every loop, wait for `stop`, then cancel and wait for the loops.
    ///
    /// Each loop gets at most [`Self::JOIN_TIMEOUT`] after cancellation; the
    /// waits run concurrently, so shutdown takes no longer than that overall.
    pub async fn run<F>(self, stop: F) -> GroupReport
    where
        F: Future<Output = StopReason>,
    {
        let handles: Vec<_> = self
            .names
            .iter()
            .map(|name| {
                let animation = AnimationLoop::new(
                    Arc::clone(&self.bridge),
                    name,
                    self.signal.clone(),
                    self.max_seconds.clone(),
                );
                (name.clone(), tokio::spawn(animation.run()))
            })
            .collect();
        info!("Mood loops started for bulbs: {}", self.names.join(", "));

        let reason = stop.await;
        info!("Stop requested ({reason}); stopping mood loops and restoring bulbs...");
        self.signal.cancel();

        let loops = join_all(handles.into_iter().map(|(name, handle)| async move {
            match time::timeout(Self::JOIN_TIMEOUT, handle).await {
                Ok(Ok(report)) => LoopExit::Finished(report),
                Ok(Err(e)) => {
                    error!("Mood loop for '{name}' died: {e}");
                    LoopExit::Panicked { name }
                }
                Err(_) => {
                    warn!(
                        "Mood loop for '{name}' did not stop within {:?}; its light may not be restored",
                        Self::JOIN_TIMEOUT
                    );
                    LoopExit::TimedOut { name }
                }
            }
        }))
        .await;

        info!("All mood loops stopped.");
        GroupReport { reason, loops }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SetupStage;
    use crate::payload::StateUpdate;
    use crate::state::LightState;
    use crate::testing::FakeBridge;
    use crate::types::{Brightness, Hue, Saturation};

    fn state(on: bool, hue: u16, sat: u8, bri: u8) -> LightState {
        LightState::new(
            on,
            Brightness::saturating(bri),
            Hue::new(hue),
            Saturation::saturating(sat),
        )
    }

    async fn stop_after(delay: Duration, reason: StopReason) -> StopReason {
        time::sleep(delay).await;
        reason
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_light_does_not_affect_others() {
        let billy = state(true, 1000, 180, 120);
        let anna = state(false, 40000, 20, 254);
        let bridge = Arc::new(
            FakeBridge::new()
                .with_light("1", "Billy", billy)
                .with_light("2", "Anna", anna),
        );
        let group = AnimationGroup::new(
            Arc::clone(&bridge),
            ["Billy", "Anna", "Sleepy"],
            MaxSeconds::fixed(1.0),
        );
        let signal = group.signal();

        let report = group
            .run(stop_after(Duration::from_secs(3), StopReason::Interrupt))
            .await;

        assert!(signal.is_cancelled());
        assert_eq!(report.reason, StopReason::Interrupt);
        assert_eq!(
            report.loops.iter().map(LoopExit::name).collect::<Vec<_>>(),
            vec!["Billy", "Anna", "Sleepy"]
        );
        assert_eq!(report.restored(), vec!["Billy", "Anna"]);
        assert_eq!(
            report.loops[2].report().map(|r| r.outcome.clone()),
            Some(LoopOutcome::NotFound)
        );

        for (id, original) in [("1", billy), ("2", anna)] {
            let writes = bridge.writes_for(id);
            assert!(writes.len() > 10, "light {id} barely animated");
            assert_eq!(writes.last(), Some(&StateUpdate::immediate(&original)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_loop_is_abandoned_after_join_timeout() {
        let signal = CancellationSignal::new();
        let bridge = Arc::new(
            FakeBridge::new()
                .with_light("1", "Billy", state(true, 0, 200, 200))
                .hang_after(&signal),
        );
        let group = AnimationGroup::new(Arc::clone(&bridge), ["Billy"], MaxSeconds::fixed(0.5))
            .with_signal(signal);

        let started = time::Instant::now();
        let report = group
            .run(stop_after(Duration::from_secs(1), StopReason::Escape))
            .await;

        assert_eq!(
            report.loops,
            vec![LoopExit::TimedOut {
                name: "Billy".to_string()
            }]
        );
        assert!(report.restored().is_empty());
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(11), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(12), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_group_waits_for_stop_even_if_every_loop_ended() {
        let bridge = Arc::new(FakeBridge::new().failing_resolve());
        let group = AnimationGroup::new(Arc::clone(&bridge), ["Billy"], MaxSeconds::fixed(0.5));

        let started = time::Instant::now();
        let report = group
            .run(stop_after(Duration::from_secs(5), StopReason::Terminate))
            .await;

        assert!(started.elapsed() >= Duration::from_secs(5));
        assert_eq!(report.reason, StopReason::Terminate);
        assert!(matches!(
            report.loops[0].report().map(|r| &r.outcome),
            Some(LoopOutcome::SetupFailed {
                stage: SetupStage::Resolve,
                ..
            })
        ));
        assert!(bridge.writes().is_empty());
    }

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(StopReason::Escape.to_string(), "escape");
        assert_eq!(StopReason::Interrupt.to_string(), "interrupt");
    }
}

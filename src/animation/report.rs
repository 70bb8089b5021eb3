//! Per-loop outcome summaries.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Startup step at which a loop gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SetupStage {
    Resolve,
    ReadState,
    PowerOn,
}

/// How an [`AnimationLoop`](super::AnimationLoop) ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopOutcome {
    /// No light carries the configured name. Nothing was changed.
    NotFound,
    /// Startup failed before the light was modified.
    SetupFailed { stage: SetupStage, reason: String },
    /// The light was animated and put back to its captured state.
    Restored,
    /// The light was animated but the restoring write failed.
    RestoreFailed(String),
}

/// Summary of one light's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopReport {
    pub name: String,
    pub light_id: Option<String>,
    /// Cycles started, including one cut short by cancellation.
    pub cycles: u32,
    pub ticks_written: u32,
    pub failed_writes: u32,
    pub outcome: LoopOutcome,
}

impl LoopReport {
    pub(crate) fn new(name: &str) -> Self {
        LoopReport {
            name: name.to_string(),
            light_id: None,
            cycles: 0,
            ticks_written: 0,
            failed_writes: 0,
            outcome: LoopOutcome::NotFound,
        }
    }

    /// Whether the light was left as it was found.
    pub fn is_clean(&self) -> bool {
        !matches!(self.outcome, LoopOutcome::RestoreFailed(_))
    }
}

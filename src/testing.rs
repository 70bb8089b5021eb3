//! In-memory bridge for engine tests.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::animation::CancellationSignal;
use crate::bridge::Bridge;
use crate::errors::Error;
use crate::payload::StateUpdate;
use crate::state::LightState;

type Result<T> = std::result::Result<T, Error>;

/// Records every write and fails or stalls on request.
#[derive(Default)]
pub(crate) struct FakeBridge {
    lights: Vec<(String, String, LightState)>,
    writes: Mutex<Vec<(String, StateUpdate)>>,
    fail_resolve: bool,
    failing_reads: HashSet<String>,
    /// 1-based write ordinals that fail after being recorded.
    failing_writes: HashSet<usize>,
    cancel_after: Option<(usize, CancellationSignal)>,
    hang_after: Option<CancellationSignal>,
}

impl FakeBridge {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_light(mut self, id: &str, name: &str, state: LightState) -> Self {
        self.lights.push((id.to_string(), name.to_string(), state));
        self
    }

    pub(crate) fn failing_resolve(mut self) -> Self {
        self.fail_resolve = true;
        self
    }

    pub(crate) fn failing_read(mut self, id: &str) -> Self {
        self.failing_reads.insert(id.to_string());
        self
    }

    pub(crate) fn failing_write(mut self, ordinal: usize) -> Self {
        self.failing_writes.insert(ordinal);
        self
    }

    /// Raise `signal` while recording write number `ordinal`.
    pub(crate) fn cancel_after_writes(mut self, ordinal: usize, signal: &CancellationSignal) -> Self {
        self.cancel_after = Some((ordinal, signal.clone()));
        self
    }

    /// Never complete a write issued once `signal` is raised.
    pub(crate) fn hang_after(mut self, signal: &CancellationSignal) -> Self {
        self.hang_after = Some(signal.clone());
        self
    }

    pub(crate) fn writes(&self) -> Vec<(String, StateUpdate)> {
        self.writes.lock().unwrap().clone()
    }

    pub(crate) fn writes_for(&self, id: &str) -> Vec<StateUpdate> {
        self.writes()
            .into_iter()
            .filter(|(light, _)| light == id)
            .map(|(_, update)| update)
            .collect()
    }

    fn light(&self, id: &str) -> Option<&LightState> {
        self.lights
            .iter()
            .find(|(light, _, _)| light == id)
            .map(|(_, _, state)| state)
    }
}

impl Bridge for FakeBridge {
    async fn resolve(&self, name: &str) -> Result<Option<String>> {
        if self.fail_resolve {
            return Err(Error::bridge(1, "/lights", "unauthorized user"));
        }
        let wanted = name.trim().to_lowercase();
        Ok(self
            .lights
            .iter()
            .find(|(_, known, _)| known.trim().to_lowercase() == wanted)
            .map(|(id, _, _)| id.clone()))
    }

    async fn read_state(&self, light_id: &str) -> Result<LightState> {
        let address = format!("/lights/{light_id}");
        if self.failing_reads.contains(light_id) {
            return Err(Error::bridge(901, &address, "internal error"));
        }
        self.light(light_id)
            .copied()
            .ok_or_else(|| Error::bridge(3, &address, "resource not available"))
    }

    async fn write_state(&self, light_id: &str, update: &StateUpdate) -> Result<()> {
        if let Some(signal) = &self.hang_after
            && signal.is_cancelled()
        {
            std::future::pending::<()>().await;
        }

        let ordinal = {
            let mut writes = self.writes.lock().unwrap();
            writes.push((light_id.to_string(), update.clone()));
            writes.len()
        };

        if let Some((at, signal)) = &self.cancel_after
            && ordinal == *at
        {
            signal.cancel();
        }

        if self.failing_writes.contains(&ordinal) {
            return Err(Error::bridge(
                901,
                &format!("/lights/{light_id}/state"),
                "internal error",
            ));
        }
        Ok(())
    }
}

//! Hue bridge access.

use std::future::Future;
use std::time::Duration;

use log::debug;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use crate::config::Settings;
use crate::errors::Error;
use crate::payload::StateUpdate;
use crate::state::LightState;

type Result<T> = std::result::Result<T, Error>;

/// Operations the animation engine needs from a bridge.
///
/// Implementations are shared between concurrently running loops, so every
/// future they return must be `Send`.
pub trait Bridge: Send + Sync {
    /// Find a light id by its name (trimmed, case-insensitive).
    fn resolve(&self, name: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Read the current state of a light.
    fn read_state(&self, light_id: &str) -> impl Future<Output = Result<LightState>> + Send;

    /// Send a partial state update to a light.
    ///
    /// Values are written as given; callers are responsible for range checks.
    fn write_state(
        &self,
        light_id: &str,
        update: &StateUpdate,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Compose the base URL of the bridge's REST API for a user.
///
/// # Examples
///
/// ```
/// use hue_mood::build_base_url;
///
/// assert_eq!(build_base_url("user1234", "10.0.0.2"), "http://10.0.0.2/api/user1234/");
/// ```
pub fn build_base_url(user_id: &str, bridge_ip: &str) -> String {
    format!("http://{bridge_ip}/api/{user_id}/")
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{base}/{}", path.trim_start_matches('/'))
}

/// Find the id of the first light whose name matches `name`.
///
/// Names are compared trimmed and case-insensitively. A name that is not a
/// JSON string is compared by its JSON text, so `42` matches `"42"`. Entries
/// are scanned in the order the bridge listed them, so with duplicate names
/// the first one wins.
pub fn find_light_id(lights: &Map<String, Value>, name: &str) -> Option<String> {
    let wanted = name.trim().to_lowercase();
    lights
        .iter()
        .find(|(_, info)| {
            info.get("name")
                .map(|n| match n {
                    Value::String(s) => s.trim().to_lowercase(),
                    other => other.to_string().to_lowercase(),
                })
                .is_some_and(|n| n == wanted)
        })
        .map(|(id, _)| id.clone())
}

/// Extract the first entry of the bridge's `[{"error": {...}}]` envelope.
fn bridge_error(reply: &Value) -> Option<Error> {
    let error = reply.as_array()?.iter().find_map(|entry| entry.get("error"))?;
    Some(Error::bridge(
        error.get("type").and_then(|t| t.as_u64()).unwrap_or_default(),
        error.get("address").and_then(|a| a.as_str()).unwrap_or_default(),
        error
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or_default(),
    ))
}

/// HTTP client for one Hue bridge and one whitelisted user.
///
/// All requests share a single connection pool and the configured timeout.
#[derive(Debug, Clone)]
pub struct HueBridge {
    base_url: String,
    client: reqwest::Client,
}

impl HueBridge {
    /// Build a client from settings; fails if no user id is configured.
    pub fn new(settings: &Settings) -> Result<Self> {
        let user_id = settings.require_user_id()?;
        Self::with_base_url(
            &build_base_url(user_id, &settings.bridge_ip),
            settings.request_timeout,
        )
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http("build client", e))?;
        Ok(HueBridge {
            base_url: base_url.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the whole bridge datastore (lights, groups, config, ...).
    pub async fn fetch_root(&self) -> Result<Value> {
        self.get_json("").await
    }

    /// Fetch all lights keyed by id, in the order the bridge lists them.
    pub async fn lights(&self) -> Result<Map<String, Value>> {
        let reply = self.get_json("lights").await?;
        if let Some(err) = bridge_error(&reply) {
            return Err(err);
        }
        match reply {
            Value::Object(lights) => Ok(lights),
            _ => Ok(Map::new()),
        }
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = endpoint(&self.base_url, path);
        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::http("get", e))?;
        let body = resp.bytes().await.map_err(|e| Error::http("read body", e))?;
        serde_json::from_slice(&body).map_err(Error::JsonLoad)
    }
}

impl Bridge for HueBridge {
    async fn resolve(&self, name: &str) -> Result<Option<String>> {
        let lights = self.lights().await?;
        Ok(find_light_id(&lights, name))
    }

    async fn read_state(&self, light_id: &str) -> Result<LightState> {
        let reply = self.get_json(&format!("lights/{light_id}")).await?;
        if let Some(err) = bridge_error(&reply) {
            return Err(err);
        }
        match reply.get("state") {
            Some(state) => serde_json::from_value(state.clone()).map_err(Error::JsonLoad),
            None => Ok(LightState::default()),
        }
    }

    async fn write_state(&self, light_id: &str, update: &StateUpdate) -> Result<()> {
        if !update.is_valid() {
            return Err(Error::NoAttribute);
        }

        let url = endpoint(&self.base_url, &format!("lights/{light_id}/state"));
        let body = serde_json::to_vec(update).map_err(Error::JsonDump)?;
        let resp = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::http("put", e))?;

        // Per-attribute rejections (e.g. "device is off") are expected and
        // don't fail the write.
        if let Ok(body) = resp.bytes().await
            && let Ok(reply) = serde_json::from_slice::<Value>(&body)
            && let Some(err) = bridge_error(&reply)
        {
            debug!("Bridge rejected part of update for light {light_id}: {err}");
        }
        Ok(())
    }
}

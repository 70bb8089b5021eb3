//! Environment configuration and the transition length setting.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Lookup function for named settings, usually [`std::env::var`].
pub type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

fn process_env() -> Lookup {
    Arc::new(|key: &str| std::env::var(key).ok())
}

/// Connection settings for the bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub user_id: Option<String>,
    pub bridge_ip: String,
    pub log_level: String,
    pub request_timeout: Duration,
}

impl Settings {
    pub const USER_ID_KEY: &'static str = "HUE_USER_ID";
    pub const BRIDGE_IP_KEY: &'static str = "HUE_BRIDGE_IP";
    pub const LOG_LEVEL_KEY: &'static str = "LOG_LEVEL";
    pub const TIMEOUT_KEY: &'static str = "REQUEST_TIMEOUT";

    pub const DEFAULT_BRIDGE_IP: &'static str = "192.168.1.2";
    pub const DEFAULT_LOG_LEVEL: &'static str = "INFO";
    pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, applying defaults for absent keys.
    ///
    /// The user id stays optional here; [`Settings::require_user_id`] is the
    /// point where its absence becomes an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use hue_mood::Settings;
    ///
    /// let settings = Settings::from_lookup(|key| match key {
    ///     "HUE_BRIDGE_IP" => Some("10.0.0.10".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(settings.bridge_ip, "10.0.0.10");
    /// assert_eq!(settings.request_timeout, Duration::from_secs(5));
    /// assert!(settings.user_id.is_none());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match lookup(Self::TIMEOUT_KEY) {
            None => Self::DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 => secs,
                _ => {
                    warn!(
                        "Invalid {}={raw}, defaulting to {}",
                        Self::TIMEOUT_KEY,
                        Self::DEFAULT_TIMEOUT_SECS
                    );
                    Self::DEFAULT_TIMEOUT_SECS
                }
            },
        };

        Settings {
            user_id: lookup(Self::USER_ID_KEY).filter(|id| !id.is_empty()),
            bridge_ip: lookup(Self::BRIDGE_IP_KEY)
                .unwrap_or_else(|| Self::DEFAULT_BRIDGE_IP.to_string()),
            log_level: lookup(Self::LOG_LEVEL_KEY)
                .unwrap_or_else(|| Self::DEFAULT_LOG_LEVEL.to_string()),
            request_timeout: Duration::from_secs_f64(timeout_secs),
        }
    }

    pub fn require_user_id(&self) -> Result<&str> {
        self.user_id
            .as_deref()
            .ok_or(Error::MissingCredential(Self::USER_ID_KEY))
    }
}

/// Mask a bridge user id for logging, keeping only its last four characters.
///
/// # Examples
///
/// ```
/// use hue_mood::redact_user_id;
///
/// assert_eq!(redact_user_id("abc12345"), "***2345");
/// assert_eq!(redact_user_id("abcd"), "***");
/// assert_eq!(redact_user_id(""), "<missing>");
/// ```
pub fn redact_user_id(user_id: &str) -> String {
    let chars: Vec<char> = user_id.chars().collect();
    match chars.len() {
        0 => "<missing>".to_string(),
        1..=4 => "***".to_string(),
        n => format!("***{}", chars[n - 4..].iter().collect::<String>()),
    }
}

/// Upper bound for a randomly drawn transition, in seconds.
///
/// Resolved on every call from, highest priority first: an explicit override,
/// the `HUE_MOOD_MAX_SECONDS` setting, and a default of 30 seconds. The result
/// is never below half a second.
#[derive(Clone)]
pub struct MaxSeconds {
    explicit: Option<f64>,
    lookup: Lookup,
}

impl MaxSeconds {
    pub const KEY: &'static str = "HUE_MOOD_MAX_SECONDS";
    pub const DEFAULT: f64 = 30.0;
    pub const FLOOR: f64 = 0.5;

    /// Resolve against the process environment.
    pub fn new(explicit: Option<f64>) -> Self {
        MaxSeconds {
            explicit,
            lookup: process_env(),
        }
    }

    pub fn with_lookup<F>(explicit: Option<f64>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        MaxSeconds {
            explicit,
            lookup: Arc::new(lookup),
        }
    }

    /// Always resolves to `seconds` (floored), ignoring the environment.
    pub fn fixed(seconds: f64) -> Self {
        Self::with_lookup(Some(seconds), |_| None)
    }

    pub fn resolve(&self) -> f64 {
        resolve_max_seconds(self.explicit, (self.lookup)(Self::KEY).as_deref())
    }
}

impl fmt::Debug for MaxSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaxSeconds")
            .field("explicit", &self.explicit)
            .finish_non_exhaustive()
    }
}

/// Apply the override, setting, default chain and the half-second floor.
///
/// Values that are not finite numbers are skipped as if absent.
///
/// # Examples
///
/// ```
/// use hue_mood::resolve_max_seconds;
///
/// assert_eq!(resolve_max_seconds(Some(2.0), Some("10.0")), 2.0);
/// assert_eq!(resolve_max_seconds(None, Some("0.1")), 0.5);
/// assert_eq!(resolve_max_seconds(None, None), 30.0);
/// ```
pub fn resolve_max_seconds(explicit: Option<f64>, setting: Option<&str>) -> f64 {
    explicit
        .filter(|v| v.is_finite())
        .or_else(|| {
            setting
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
        })
        .unwrap_or(MaxSeconds::DEFAULT)
        .max(MaxSeconds::FLOOR)
}

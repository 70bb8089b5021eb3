/// All error types that can occur when talking to a Hue bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize a state update to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// The bridge reply was not valid JSON or had an unexpected shape.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// An HTTP request to the bridge failed.
    #[error("http {action} error: {err}")]
    Http { action: String, err: reqwest::Error },

    /// The bridge answered with its error envelope instead of data.
    #[error("bridge error {kind} at {address}: {description}")]
    Bridge {
        kind: u64,
        address: String,
        description: String,
    },

    /// Attempted to send a [`crate::StateUpdate`] with no state attributes set.
    #[error("invalid state update; no attributes set")]
    NoAttribute,

    /// A required setting is missing from the environment.
    #[error("{0} is not set")]
    MissingCredential(&'static str),
}

impl Error {
    /// Create a new HTTP error
    pub fn http(action: &str, err: reqwest::Error) -> Self {
        Error::Http {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new bridge error
    pub fn bridge(kind: u64, address: &str, description: &str) -> Self {
        Error::Bridge {
            kind,
            address: address.to_string(),
            description: description.to_string(),
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

//! Crate-level error types.
//!
//! [`DashError`] unifies every failure the dashboard can hit (configuration,
//! transport, backend-reported errors, malformed data) behind a single enum so
//! callers can match on the variant they care about while still using the `?`
//! operator for propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DashError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    /// Configuration could not be read or holds an invalid value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The backend could not be reached or answered with a non-2xx status.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The backend answered with a well-formed body carrying an `error` field.
    #[error("api error: {0}")]
    Api(String),

    /// The response violated ordering or shape invariants.
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal or file I/O failed.
    #[error("io error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for DashError {
    fn from(err: reqwest::Error) -> Self {
        DashError::Fetch(err.to_string())
    }
}


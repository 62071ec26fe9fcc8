//! Environment-variable configuration helpers

use std::str::FromStr;
use thiserror::Error;

/// Error reading a configuration value from the environment
#[derive(Debug, Error)]
pub enum EnvError {
    /// Variable is set but does not parse into the expected type
    #[error("invalid value for {key}: {value:?} ({detail})")]
    Invalid {
        key: String,
        value: String,
        detail: String,
    },
}

/// Read a variable, treating unset, non-unicode and blank values alike as absent
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse a variable
///
/// Returns `Ok(None)` when the variable is absent and an error when it is
/// present but malformed, so a typo never silently falls back to a default.
pub fn env_parse<T>(key: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|value| {
            value.parse::<T>().map_err(|e| EnvError::Invalid {
                key: key.to_string(),
                detail: e.to_string(),
                value,
            })
        })
        .transpose()
}

//! Error types for the catalog core
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to the frontend.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The backing store rejected or failed to complete an operation.
    #[error("Remote error: {0}")]
    Remote(String),

    /// A single-row lookup matched zero rows.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Login failed or the session call could not be completed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A required field was left empty; raised before any remote call.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Remote(err.to_string())
    }
}

impl serde::Serialize for AppError {
    // Spelled out because the crate's own `Result` alias shadows the
    // prelude's two-parameter form here.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_serialize_as_their_display_string() {
        let err = AppError::NotFound("no courses row matched the query".to_string());

        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json, "Not found: no courses row matched the query");
    }
}

//! Error types for the repshift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for repshift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Document store error
    #[error("Document store error: {0}")]
    Store(String),

    /// No active user
    #[error("No active user")]
    NotAuthenticated,

    /// Plan generation found no usable exercises
    #[error("No exercises match the requested goal, level, and equipment")]
    NoMatchingExercises,

    /// Plan generation was asked for a schedule it has no split for
    #[error("Unsupported schedule: {0} days per week")]
    UnsupportedSchedule(u8),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

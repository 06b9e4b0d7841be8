//! Error types for the strand engine.
//!
//! All crates return `StrandResult<T>` from fallible operations.
//! Expected outcomes of interactive grooming (dropped tasks, singular
//! constraint systems, iteration caps) are reported as values, not errors.

use thiserror::Error;

/// Unified error type for the strand engine.
#[derive(Debug, Error)]
pub enum StrandError {
    /// Guide data is malformed or inconsistent.
    #[error("Invalid guide: {0}")]
    InvalidGuide(String),

    /// Surface geometry is malformed.
    #[error("Invalid surface: {0}")]
    InvalidSurface(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The brush worker thread could not be started.
    #[error("Failed to acquire brush worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// The solver thread pool could not be built.
    #[error("Failed to build solver thread pool: {0}")]
    ThreadPool(String),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, StrandError>`.
pub type StrandResult<T> = Result<T, StrandError>;

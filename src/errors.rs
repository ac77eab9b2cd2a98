use thiserror::Error;

// Define an enum to represent the error conditions the crate can surface
#[derive(Debug, Error)]
pub enum FlagError {
    // Raised by `is_enabled` when the named flag is absent and the merged
    // context is not a production context. Intentionally noisy so typos
    // surface early in development and test environments.
    #[error("feature flag \"{0}\" not found")]
    FlagNotFound(String),

    // Stored flag data that cannot be turned back into a flag record,
    // e.g. a defaultValue that is neither a boolean nor absent.
    #[error("invalid flag value: {0}")]
    InvalidValue(String),

    // I/O failure in the file-backed store.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

// Type alias for results that use `FlagError` as the error type
pub type Result<T> = std::result::Result<T, FlagError>;

use thiserror::Error;

/// Invalid user-facing settings, reported before any work is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unsupported grid size {0}: expected 3, 5, 7 or 9")]
    UnsupportedGridSize(u32),

    #[error("Card count must be between 1 and {max}, got {count}")]
    CardCount { count: usize, max: usize },

    #[error("Invalid month {0}: expected a value between 1 and 12")]
    InvalidMonth(u8),

    #[error("Species pool size must be between {min} and {max}, got {size}")]
    PoolSize { size: usize, min: usize, max: usize },

    #[error("Invalid value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

use bingo_types::ConfigurationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read species data from '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed species_counts response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No species data saved for place {place_id} (expected '{path}')")]
    PlaceNotFound { place_id: u64, path: PathBuf },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

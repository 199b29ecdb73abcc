use bingo_compose::ComposeError;
use bingo_render_lopdf::RenderError;
use bingo_source::SourceError;
use bingo_types::ConfigurationError;
use thiserror::Error;

/// A comprehensive error type for the whole card generation pipeline.
#[derive(Error, Debug)]
pub enum BingoError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Fetching species failed: {0}")]
    Source(#[from] SourceError),

    #[error("Composing cards failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file is not valid JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Pipeline is not set up: {0}")]
    Setup(String),
}

use bingo_types::GridSize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF generation error: {0}")]
    Pdf(String),

    #[error("Card {card} is {actual} but the document is laid out for {expected}")]
    DimensionMismatch {
        card: usize,
        expected: GridSize,
        actual: GridSize,
    },

    #[error(
        "Card {card}, cell ({row}, {col}) does not fit: needs {needed:.1}pt, only {available:.1}pt available"
    )]
    CellOverflow {
        card: usize,
        row: usize,
        col: usize,
        needed: f32,
        available: f32,
    },

    #[error("Page of {width:.1}x{height:.1}pt leaves no room for a grid inside its margins")]
    PageTooSmall { width: f32, height: f32 },

    #[error("Image error: {0}")]
    Image(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Image(err.to_string())
    }
}

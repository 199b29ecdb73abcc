//! Core data model shared by every bingo crate.
//!
//! - [`Species`] and [`SpeciesPool`]: the ranked, deduplicated input to card composition
//! - [`GridSize`], [`GridCell`], [`Grid`], [`Card`] and [`CardSet`]: composed cards
//! - [`PageSize`], [`Orientation`], [`Rect`] and [`Color`]: page geometry used by renderers

pub mod color;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod species;

pub use color::Color;
pub use error::ConfigurationError;
pub use geometry::{inches, Orientation, PageSize, Rect, Size, POINTS_PER_INCH};
pub use grid::{validate_card_count, Card, CardSet, Grid, GridCell, GridError, GridSize, MAX_CARDS};
pub use species::{Species, SpeciesPool, TaxonId};

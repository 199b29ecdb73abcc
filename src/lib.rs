//! Printable species bingo cards from iNaturalist observation data.
//!
//! The heavy lifting lives in the workspace crates; this crate wires them
//! together behind [`PipelineBuilder`] and a command-line binary.

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::BingoConfig;
pub use error::BingoError;
pub use pipeline::{BingoPipeline, PipelineBuilder};

pub use bingo_compose::{compose, CardRequest, ComposeError, GridComposer};
pub use bingo_render_lopdf::{orientation_for, render, CardRenderer, RenderError, RenderOptions};
pub use bingo_resource::FilesystemImageSource;
pub use bingo_source::{
    CachedSpeciesSource, DirectorySpeciesSource, PlaceQuery, SourceError, SpeciesCountsResponse, SpeciesQuery,
    SpeciesSource, StaticSpeciesSource,
};
pub use bingo_traits::{ImageSource, InMemoryImageSource, NoImages, ResourceError};
pub use bingo_types::{
    Card, CardSet, ConfigurationError, Grid, GridCell, GridSize, Orientation, PageSize, Species, SpeciesPool, TaxonId,
};

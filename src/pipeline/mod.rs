//! Card generation pipeline.
//!
//! - [`PipelineBuilder`]: fluent builder that wires a species source, an image
//!   source and a [`BingoConfig`](crate::config::BingoConfig) together
//! - [`BingoPipeline`]: runs query, composition and rendering for one request
//!
//! # Example
//!
//! ```ignore
//! use inat_bingo::{BingoConfig, PipelineBuilder};
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_config(BingoConfig::from_file("bingo.json")?)
//!     .with_species_dir("responses")
//!     .with_images_dir("photos")
//!     .build()?;
//!
//! pipeline.generate_to_file("cards.pdf")?;
//! ```

mod builder;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use orchestrator::BingoPipeline;

//! Species sources for the bingo pipeline.
//!
//! The observation API itself is reached by an external HTTP collaborator;
//! this crate owns everything around it:
//!
//! - [`SpeciesQuery`]: validated request parameters, rendered exactly as the
//!   `/v1/observations/species_counts` endpoint expects them
//! - [`SpeciesCountsResponse`]: the endpoint's JSON, filtered down to
//!   research-grade, species-level taxa with permissively licensed photos
//! - [`SpeciesSource`]: the trait a fetcher implements, with offline
//!   implementations reading saved responses
//! - [`CachedSpeciesSource`]: a fixed-TTL cache in front of any source
//!
//! ## Example
//!
//! ```ignore
//! use bingo_source::{CachedSpeciesSource, DirectorySpeciesSource, SpeciesQuery, SpeciesSource};
//!
//! let source = CachedSpeciesSource::new(DirectorySpeciesSource::new("data"));
//! let pool = source.species(&SpeciesQuery::new(1, 25))?;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod query;
pub mod response;
pub mod source;

pub use cache::CachedSpeciesSource;
pub use error::SourceError;
pub use query::{PlaceQuery, SpeciesQuery};
pub use response::{SpeciesCountResult, SpeciesCountsResponse, Taxon, TaxonPhoto};
pub use source::{DirectorySpeciesSource, SpeciesSource, StaticSpeciesSource};

use crate::error::SourceError;
use crate::query::SpeciesQuery;
use crate::response::SpeciesCountsResponse;
use bingo_types::SpeciesPool;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Something that can turn a [`SpeciesQuery`] into a ranked pool.
///
/// An HTTP fetcher against the live API implements this outside the core;
/// the implementations here read responses that were saved earlier.
pub trait SpeciesSource: Send + Sync + Debug {
    fn species(&self, query: &SpeciesQuery) -> Result<SpeciesPool, SourceError>;

    /// Returns a human-readable name for this source (for logging/debugging).
    fn name(&self) -> &'static str;
}

impl<S: SpeciesSource + ?Sized> SpeciesSource for Box<S> {
    fn species(&self, query: &SpeciesQuery) -> Result<SpeciesPool, SourceError> {
        (**self).species(query)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

fn read_response(path: &Path) -> Result<SpeciesCountsResponse, SourceError> {
    let json = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SpeciesCountsResponse::from_json(&json)?)
}

/// Serves one saved response regardless of the place asked for.
#[derive(Debug, Clone)]
pub struct StaticSpeciesSource {
    response: SpeciesCountsResponse,
}

impl StaticSpeciesSource {
    pub fn new(response: SpeciesCountsResponse) -> Self {
        Self { response }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        read_response(path.as_ref()).map(Self::new)
    }
}

impl SpeciesSource for StaticSpeciesSource {
    fn species(&self, query: &SpeciesQuery) -> Result<SpeciesPool, SourceError> {
        if query.months().is_some() {
            log::debug!("Static species source ignores the month filter of {}", query);
        }
        Ok(self.response.clone().into_pool(query.top_n))
    }

    fn name(&self) -> &'static str {
        "StaticSpeciesSource"
    }
}

/// Reads saved responses from a directory, one file per query
/// (see [`SpeciesQuery::response_file_name`]).
#[derive(Debug, Clone)]
pub struct DirectorySpeciesSource {
    base_path: PathBuf,
}

impl DirectorySpeciesSource {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, query: &SpeciesQuery) -> PathBuf {
        self.base_path.join(query.response_file_name())
    }
}

impl SpeciesSource for DirectorySpeciesSource {
    fn species(&self, query: &SpeciesQuery) -> Result<SpeciesPool, SourceError> {
        let path = self.path_for(query);
        if !path.is_file() {
            return Err(SourceError::PlaceNotFound {
                place_id: query.place_id,
                path,
            });
        }
        log::info!("Reading species for {} from {}", query, path.display());
        Ok(read_response(&path)?.into_pool(query.top_n))
    }

    fn name(&self) -> &'static str {
        "DirectorySpeciesSource"
    }
}

//! ImageSource trait for abstracting species photo loading.
//!
//! The renderer never fetches photos itself. Whatever downloaded or cached
//! them hands the bytes over through this trait, keyed by taxon id.

use bingo_types::{Species, TaxonId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for image loading operations.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("No image for taxon {0}")]
    NotFound(TaxonId),

    #[error("Failed to load image for taxon {id}: {message}")]
    LoadFailed { id: TaxonId, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared image bytes (encoded JPEG, PNG or GIF).
pub type SharedImageData = Arc<Vec<u8>>;

/// A source of already-fetched species photos.
///
/// Implementations:
///
/// - [`InMemoryImageSource`]: pre-populated map, works anywhere
/// - [`NoImages`]: always reports `NotFound`
/// - `FilesystemImageSource` in `bingo-resource`: `<taxon_id>.<ext>` files in a directory
///
/// A `NotFound` or failed load is never fatal to rendering; the cell is drawn
/// without its photo.
pub trait ImageSource: Send + Sync + Debug {
    /// Load the encoded photo for `species`.
    fn load(&self, species: &Species) -> Result<SharedImageData, ResourceError>;

    /// Returns a human-readable name for this source (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory image source keyed by taxon id.
#[derive(Debug, Default)]
pub struct InMemoryImageSource {
    images: RwLock<HashMap<TaxonId, SharedImageData>>,
}

impl InMemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the photo for `id`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, id: impl Into<TaxonId>, data: Vec<u8>) -> Result<(), ResourceError> {
        let id = id.into();
        let mut images = self.images.write().map_err(|_| ResourceError::LoadFailed {
            id,
            message: "image store lock poisoned".to_string(),
        })?;
        images.insert(id, Arc::new(data));
        Ok(())
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.images.read().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ImageSource for InMemoryImageSource {
    fn load(&self, species: &Species) -> Result<SharedImageData, ResourceError> {
        let images = self.images.read().map_err(|_| ResourceError::LoadFailed {
            id: species.id,
            message: "image store lock poisoned".to_string(),
        })?;
        images
            .get(&species.id)
            .cloned()
            .ok_or(ResourceError::NotFound(species.id))
    }

    fn name(&self) -> &'static str {
        "InMemoryImageSource"
    }
}

/// Used when photos are switched off or nothing was fetched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoImages;

impl ImageSource for NoImages {
    fn load(&self, species: &Species) -> Result<SharedImageData, ResourceError> {
        Err(ResourceError::NotFound(species.id))
    }

    fn name(&self) -> &'static str {
        "NoImages"
    }
}

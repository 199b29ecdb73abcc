//! Filesystem-based image source for native platforms.
//!
//! Photos are looked up as `<taxon_id>.jpg`, `<taxon_id>.jpeg` or
//! `<taxon_id>.png` under a base directory, in that order. Resolved paths
//! must stay inside the base directory.

use bingo_traits::{ImageSource, ResourceError, SharedImageData};
use bingo_types::{Species, TaxonId};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An image source that reads species photos from a local directory.
#[derive(Debug)]
pub struct FilesystemImageSource {
    base_path: PathBuf,
    /// Canonicalized base path for containment checks
    canonical_base: Option<PathBuf>,
}

impl FilesystemImageSource {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// First existing candidate file for `id`, if any.
    fn locate(&self, id: TaxonId) -> Option<PathBuf> {
        EXTENSIONS
            .iter()
            .map(|ext| self.base_path.join(format!("{}.{}", id, ext)))
            .find(|p| p.is_file())
            .and_then(|p| self.contain(p))
    }

    /// Rejects paths that resolve outside the base directory (e.g. via symlinks).
    fn contain(&self, path: PathBuf) -> Option<PathBuf> {
        match (path.canonicalize(), &self.canonical_base) {
            (Ok(canonical), Some(base)) if canonical.starts_with(base) => Some(canonical),
            (Ok(_), Some(_)) => {
                log::warn!("Ignoring image outside {}: {}", self.base_path.display(), path.display());
                None
            }
            _ => Some(path),
        }
    }

    pub fn exists(&self, id: TaxonId) -> bool {
        self.locate(id).is_some()
    }
}

impl ImageSource for FilesystemImageSource {
    fn load(&self, species: &Species) -> Result<SharedImageData, ResourceError> {
        let path = self.locate(species.id).ok_or(ResourceError::NotFound(species.id))?;
        log::debug!("Loading photo for {} from {}", species.id, path.display());

        std::fs::read(&path)
            .map(Arc::new)
            .map_err(|e| ResourceError::LoadFailed {
                id: species.id,
                message: format!("{}: {}", path.display(), e),
            })
    }

    fn name(&self) -> &'static str {
        "FilesystemImageSource"
    }
}

use super::orchestrator::BingoPipeline;
use crate::config::BingoConfig;
use crate::error::BingoError;
use bingo_resource::FilesystemImageSource;
use bingo_source::{CachedSpeciesSource, DirectorySpeciesSource, SpeciesSource, StaticSpeciesSource};
use bingo_traits::{ImageSource, NoImages};
use std::path::Path;

/// A builder for creating a [`BingoPipeline`].
pub struct PipelineBuilder {
    config: BingoConfig,
    species: Option<Box<dyn SpeciesSource>>,
    images: Option<Box<dyn ImageSource>>,
    cache: bool,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            config: BingoConfig::default(),
            species: None,
            images: None,
            cache: true,
        }
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: BingoConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the configuration from a JSON file.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, BingoError> {
        self.config = BingoConfig::from_file(path)?;
        Ok(self)
    }

    pub fn with_species_source<S: SpeciesSource + 'static>(mut self, source: S) -> Self {
        self.species = Some(Box::new(source));
        self
    }

    /// Reads saved `species_counts` responses from `path`, one file per query.
    pub fn with_species_dir<P: AsRef<Path>>(self, path: P) -> Self {
        self.with_species_source(DirectorySpeciesSource::new(path))
    }

    /// Serves every query from one saved `species_counts` response.
    pub fn with_species_file<P: AsRef<Path>>(self, path: P) -> Result<Self, BingoError> {
        let source = StaticSpeciesSource::from_file(path)?;
        Ok(self.with_species_source(source))
    }

    pub fn with_image_source<I: ImageSource + 'static>(mut self, source: I) -> Self {
        self.images = Some(Box::new(source));
        self
    }

    /// Loads photos named `<taxon_id>.<ext>` from `path`.
    pub fn with_images_dir<P: AsRef<Path>>(self, path: P) -> Self {
        self.with_image_source(FilesystemImageSource::new(path))
    }

    /// Puts a TTL cache in front of the species source (on by default).
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Validates the configuration and assembles the pipeline.
    pub fn build(self) -> Result<BingoPipeline, BingoError> {
        self.config.validate()?;

        let species = self.species.ok_or_else(|| {
            BingoError::Setup(
                "No species source has been configured. Use `with_species_dir` or `with_species_source`."
                    .to_string(),
            )
        })?;
        let species: Box<dyn SpeciesSource> = if self.cache {
            log::debug!("Caching species from {} for {:?}", species.name(), self.config.cache_ttl());
            Box::new(CachedSpeciesSource::with_ttl(species, self.config.cache_ttl()))
        } else {
            species
        };

        let images = self.images.unwrap_or_else(|| {
            log::info!("No image source configured; cards will be text-only.");
            Box::new(NoImages)
        });

        Ok(BingoPipeline::new(self.config, species, images))
    }
}

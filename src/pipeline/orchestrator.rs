use crate::config::BingoConfig;
use crate::error::BingoError;
use bingo_compose::GridComposer;
use bingo_render_lopdf::CardRenderer;
use bingo_source::SpeciesSource;
use bingo_traits::ImageSource;
use bingo_types::{CardSet, SpeciesPool};
use chrono::Utc;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Generates one card set per call: species query, composition, rendering.
///
/// Calls are independent. The only state kept between them is the species
/// cache, when the builder installed one.
pub struct BingoPipeline {
    config: BingoConfig,
    species: Box<dyn SpeciesSource>,
    images: Box<dyn ImageSource>,
}

impl BingoPipeline {
    pub(crate) fn new(config: BingoConfig, species: Box<dyn SpeciesSource>, images: Box<dyn ImageSource>) -> Self {
        Self {
            config,
            species,
            images,
        }
    }

    pub fn config(&self) -> &BingoConfig {
        &self.config
    }

    pub fn species_pool(&self) -> Result<SpeciesPool, BingoError> {
        let query = self.config.to_query()?;
        let pool = self.species.species(&query)?;
        log::info!("{} species in the pool for {} ({})", pool.len(), query, self.species.name());
        Ok(pool)
    }

    pub fn compose(&self, pool: &SpeciesPool) -> Result<CardSet, BingoError> {
        Ok(GridComposer::new(pool).compose(&self.config.card_request())?)
    }

    pub fn render(&self, cards: &CardSet) -> Result<Vec<u8>, BingoError> {
        let options = self.config.render_options().with_creation_date(Utc::now());
        Ok(CardRenderer::new(options).render(cards, &*self.images)?)
    }

    /// Runs the whole pipeline and returns the PDF bytes.
    pub fn generate(&self) -> Result<Vec<u8>, BingoError> {
        let start = Instant::now();
        let pool = self.species_pool()?;
        let cards = self.compose(&pool)?;
        let bytes = self.render(&cards)?;
        log::info!(
            "Generated {} card(s), {} bytes in {:.2?}",
            cards.len(),
            bytes.len(),
            start.elapsed()
        );
        Ok(bytes)
    }

    pub fn generate_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), BingoError> {
        let bytes = self.generate()?;
        fs::write(path.as_ref(), bytes)?;
        log::info!("Wrote {}", path.as_ref().display());
        Ok(())
    }
}

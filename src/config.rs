use crate::error::BingoError;
use bingo_compose::CardRequest;
use bingo_render_lopdf::RenderOptions;
use bingo_source::SpeciesQuery;
use bingo_types::{validate_card_count, ConfigurationError, GridSize, PageSize};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TITLE: &str = "Bingo: Field Trip Edition";
pub const POOL_SIZE_RANGE: RangeInclusive<usize> = 10..=100;
pub const DEFAULT_POOL_SIZE: usize = 25;
pub const DEFAULT_CARD_COUNT: usize = 10;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 12 * 60 * 60;
const FALLBACK_FILE_STEM: &str = "bingo-cards";

/// Everything one generation request needs.
///
/// Loaded from JSON with every field optional; command-line flags are
/// applied on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BingoConfig {
    pub place_id: Option<u64>,
    /// How many of the most observed species make up the pool.
    pub top_n: usize,
    pub grid_size: GridSize,
    pub card_count: usize,
    /// Base seed. `0` and `None` both mean "seed from entropy".
    pub seed: Option<u64>,
    pub free_center: bool,
    pub show_photo: bool,
    pub show_common_name: bool,
    pub show_scientific_name: bool,
    pub title: String,
    /// Restricts observations to these months (1-12). Empty means all year.
    pub months: Vec<u8>,
    pub cache_ttl_secs: u64,
    pub page_size: PageSize,
}

impl Default for BingoConfig {
    fn default() -> Self {
        Self {
            place_id: None,
            top_n: DEFAULT_POOL_SIZE,
            grid_size: GridSize::Five,
            card_count: DEFAULT_CARD_COUNT,
            seed: None,
            free_center: true,
            show_photo: true,
            show_common_name: true,
            show_scientific_name: true,
            title: DEFAULT_TITLE.to_string(),
            months: Vec::new(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            page_size: PageSize::default(),
        }
    }
}

impl BingoConfig {
    pub fn from_json(json: &str) -> Result<Self, BingoError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BingoError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Checks ranges that do not depend on the species data.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !POOL_SIZE_RANGE.contains(&self.top_n) {
            return Err(ConfigurationError::PoolSize {
                size: self.top_n,
                min: *POOL_SIZE_RANGE.start(),
                max: *POOL_SIZE_RANGE.end(),
            });
        }
        validate_card_count(self.card_count)?;
        if let Some(&month) = self.months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(ConfigurationError::InvalidMonth(month));
        }
        Ok(())
    }

    pub fn effective_seed(&self) -> Option<u64> {
        self.seed.filter(|&seed| seed != 0)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn to_query(&self) -> Result<SpeciesQuery, ConfigurationError> {
        let place_id = self.place_id.ok_or_else(|| ConfigurationError::Invalid {
            field: "place_id",
            message: "a place id is required".to_string(),
        })?;
        SpeciesQuery::new(place_id, self.top_n).with_months(&self.months)
    }

    pub fn card_request(&self) -> CardRequest {
        CardRequest::new(self.grid_size, self.card_count)
            .with_free_center(self.free_center)
            .with_seed(self.effective_seed())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.grid_size)
            .with_photo(self.show_photo)
            .with_common_name(self.show_common_name)
            .with_scientific_name(self.show_scientific_name)
            .with_title(self.title.clone())
            .with_page_size(self.page_size)
    }

    /// Output name derived from the title, e.g. `bingo-field-trip-edition.pdf`.
    pub fn output_file_name(&self) -> String {
        let stem = slug::slugify(&self.title);
        if stem.is_empty() {
            format!("{}.pdf", FALLBACK_FILE_STEM)
        } else {
            format!("{}.pdf", stem)
        }
    }
}

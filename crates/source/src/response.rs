//! The `/v1/observations/species_counts` response and its filtering rules.

use crate::config::{is_allowed_license, SPECIES_RANK_LEVELS};
use bingo_types::{Species, SpeciesPool};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeciesCountsResponse {
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub results: Vec<SpeciesCountResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesCountResult {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub taxon: Option<Taxon>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Taxon {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferred_common_name: Option<String>,
    #[serde(default)]
    pub rank_level: Option<f64>,
    #[serde(default)]
    pub default_photo: Option<TaxonPhoto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxonPhoto {
    #[serde(default)]
    pub license_code: Option<String>,
    #[serde(default)]
    pub square_url: Option<String>,
    #[serde(default)]
    pub medium_url: Option<String>,
}

impl Taxon {
    /// Species through variety. Fractional levels (e.g. 33.5) never qualify.
    fn is_species_level(&self) -> bool {
        self.rank_level.is_some_and(|level| {
            level.fract() == 0.0 && SPECIES_RANK_LEVELS.contains(&(level as u32))
        })
    }

    /// A photo without a license code is kept; one with a restrictive code is not.
    fn has_usable_photo_license(&self) -> bool {
        self.default_photo
            .as_ref()
            .and_then(|p| p.license_code.as_deref())
            .is_none_or(is_allowed_license)
    }

    fn photo_url(&self) -> Option<&str> {
        let photo = self.default_photo.as_ref()?;
        photo
            .square_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(photo.medium_url.as_deref())
    }
}

impl SpeciesCountsResponse {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Filtered species in response order, stopping after `top_n`.
    pub fn species(&self, top_n: usize) -> Vec<Species> {
        let mut species = Vec::with_capacity(top_n.min(self.results.len()));

        for result in &self.results {
            if species.len() >= top_n {
                break;
            }
            let Some(taxon) = &result.taxon else {
                continue;
            };
            if !taxon.is_species_level() {
                log::trace!("Skipping taxon {}: rank level {:?}", taxon.id, taxon.rank_level);
                continue;
            }
            if !taxon.has_usable_photo_license() {
                log::debug!("Skipping taxon {}: photo license not permitted", taxon.id);
                continue;
            }
            let Some(name) = taxon.name.as_deref().filter(|n| !n.trim().is_empty()) else {
                log::debug!("Skipping taxon {}: no scientific name", taxon.id);
                continue;
            };

            let mut entry = Species::new(taxon.id, name).with_observation_count(result.count);
            if let Some(common) = &taxon.preferred_common_name {
                entry = entry.with_common_name(common.as_str());
            }
            if let Some(url) = taxon.photo_url() {
                entry = entry.with_photo_url(url);
            }
            species.push(entry);
        }

        species
    }

    /// The ranked, deduplicated pool of at most `top_n` species.
    pub fn into_pool(self, top_n: usize) -> SpeciesPool {
        SpeciesPool::ranked(self.species(top_n), top_n)
    }
}

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An iNaturalist taxon identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxonId(pub u64);

impl TaxonId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TaxonId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TaxonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A species as reported by the observation API. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: TaxonId,
    pub scientific_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub observation_count: u64,
}

impl Species {
    pub fn new(id: impl Into<TaxonId>, scientific_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scientific_name: scientific_name.into(),
            common_name: None,
            photo_url: None,
            observation_count: 0,
        }
    }

    /// Sets the common name. Blank names are treated as absent.
    pub fn with_common_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.common_name = if name.trim().is_empty() { None } else { Some(name) };
        self
    }

    /// Sets the photo URL. Blank URLs are treated as absent.
    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.photo_url = if url.trim().is_empty() { None } else { Some(url) };
        self
    }

    pub fn with_observation_count(mut self, count: u64) -> Self {
        self.observation_count = count;
        self
    }

    /// The common name when there is one, otherwise the scientific name.
    pub fn display_name(&self) -> &str {
        self.common_name.as_deref().unwrap_or(&self.scientific_name)
    }
}

/// Species ranked by observation count, deduplicated and truncated.
///
/// Ordering is fully deterministic: ties in observation count are broken by
/// ascending taxon id, so the same input always yields the same pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesPool {
    species: Vec<Arc<Species>>,
}

impl SpeciesPool {
    /// Ranks `species` by observation count (descending), drops repeated
    /// taxon ids (keeping the best-ranked entry) and keeps at most `max_size`.
    pub fn ranked(species: impl IntoIterator<Item = Species>, max_size: usize) -> Self {
        let species = species
            .into_iter()
            .sorted_by(|a, b| {
                b.observation_count
                    .cmp(&a.observation_count)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .unique_by(|s| s.id)
            .take(max_size)
            .map(Arc::new)
            .collect();
        Self { species }
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Species>> {
        self.species.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Species>> {
        self.species.iter()
    }

    pub fn as_slice(&self) -> &[Arc<Species>] {
        &self.species
    }

    pub fn contains(&self, id: TaxonId) -> bool {
        self.species.iter().any(|s| s.id == id)
    }
}

impl<'a> IntoIterator for &'a SpeciesPool {
    type Item = &'a Arc<Species>;
    type IntoIter = std::slice::Iter<'a, Arc<Species>>;

    fn into_iter(self) -> Self::IntoIter {
        self.species.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(id: u64, count: u64) -> Species {
        Species::new(id, format!("Genus species{}", id)).with_observation_count(count)
    }

    #[test]
    fn test_pool_ranks_by_observation_count() {
        let pool = SpeciesPool::ranked(vec![species(1, 5), species(2, 50), species(3, 20)], 10);
        let ids: Vec<u64> = pool.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_pool_breaks_ties_by_taxon_id() {
        let pool = SpeciesPool::ranked(vec![species(9, 7), species(4, 7), species(6, 7)], 10);
        let ids: Vec<u64> = pool.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![4, 6, 9]);
    }

    #[test]
    fn test_pool_deduplicates_keeping_best_ranked() {
        let pool = SpeciesPool::ranked(vec![species(1, 3), species(1, 30), species(2, 10)], 10);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(0).map(|s| s.observation_count), Some(30));
    }

    #[test]
    fn test_pool_truncates_to_max_size() {
        let pool = SpeciesPool::ranked((1..=40).map(|i| species(i, i)), 25);
        assert_eq!(pool.len(), 25);
        assert_eq!(pool.get(0).map(|s| s.id.get()), Some(40));
        assert!(!pool.contains(TaxonId(1)));
    }

    #[test]
    fn test_display_name_falls_back_to_scientific_name() {
        let plain = Species::new(1u64, "Turdus migratorius");
        assert_eq!(plain.display_name(), "Turdus migratorius");

        let named = plain.clone().with_common_name("American Robin");
        assert_eq!(named.display_name(), "American Robin");

        let blank = plain.with_common_name("   ");
        assert_eq!(blank.common_name, None);
    }

    #[test]
    fn test_species_deserializes_with_defaults() {
        let json = r#"{ "id": 12727, "scientific_name": "Turdus migratorius" }"#;
        let parsed: Species = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, TaxonId(12727));
        assert_eq!(parsed.common_name, None);
        assert_eq!(parsed.observation_count, 0);
    }
}

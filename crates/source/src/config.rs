//! Fixed settings for talking to the observation API.

use std::ops::RangeInclusive;
use std::time::Duration;

pub const SPECIES_COUNTS_ENDPOINT: &str = "https://api.inaturalist.org/v1/observations/species_counts";

/// Photo licenses that allow reuse on printed cards.
pub const ALLOWED_LICENSES: [&str; 5] = ["cc0", "cc-by", "cc-by-nc", "cc-by-sa", "cc-by-nc-sa"];

/// Species (10) through variety (15).
pub const SPECIES_RANK_LEVELS: RangeInclusive<u32> = 10..=15;

/// The endpoint's page size limit.
pub const MAX_PER_PAGE: usize = 500;

/// Extra results requested per wanted species, to survive filtering.
pub const OVERFETCH_FACTOR: usize = 3;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 12);

/// Upper bound on distinct queries held by the species cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;

pub fn is_allowed_license(code: &str) -> bool {
    let code = code.trim();
    ALLOWED_LICENSES.iter().any(|allowed| allowed.eq_ignore_ascii_case(code))
}

use crate::config::{MAX_PER_PAGE, OVERFETCH_FACTOR, SPECIES_COUNTS_ENDPOINT};
use bingo_types::ConfigurationError;
use std::fmt;

/// What the user typed into the place field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceQuery {
    /// An all-digit query is taken as a place id directly.
    Id(u64),
    /// Anything else needs an autocomplete lookup to become a place id.
    Name(String),
}

impl PlaceQuery {
    /// Returns `None` for a blank query.
    pub fn parse(input: &str) -> Option<PlaceQuery> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if input.bytes().all(|b| b.is_ascii_digit())
            && let Ok(id) = input.parse()
        {
            return Some(PlaceQuery::Id(id));
        }
        Some(PlaceQuery::Name(input.to_string()))
    }
}

/// Parameters of one species request: a place, how many species to keep and
/// an optional set of months.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpeciesQuery {
    pub place_id: u64,
    pub top_n: usize,
    months: Option<Vec<u8>>,
}

impl SpeciesQuery {
    pub fn new(place_id: u64, top_n: usize) -> Self {
        Self {
            place_id,
            top_n,
            months: None,
        }
    }

    /// Restricts observations to the given months (1-12).
    ///
    /// Months are sorted and deduplicated so equivalent queries compare equal.
    /// An empty list means no month filter.
    pub fn with_months(mut self, months: &[u8]) -> Result<Self, ConfigurationError> {
        if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(ConfigurationError::InvalidMonth(*bad));
        }
        let mut months = months.to_vec();
        months.sort_unstable();
        months.dedup();
        self.months = if months.is_empty() { None } else { Some(months) };
        Ok(self)
    }

    pub fn months(&self) -> Option<&[u8]> {
        self.months.as_deref()
    }

    /// How many results to ask for so filtering still leaves `top_n`.
    pub fn per_page(&self) -> usize {
        (self.top_n * OVERFETCH_FACTOR).min(MAX_PER_PAGE)
    }

    /// Query-string parameters for the species_counts endpoint.
    pub fn api_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("place_id", self.place_id.to_string()),
            ("verifiable", "true".to_string()),
            ("quality_grade", "research".to_string()),
            ("geo", "true".to_string()),
            ("per_page", self.per_page().to_string()),
        ];
        if let Some(months) = &self.months {
            let joined = months.iter().map(u8::to_string).collect::<Vec<_>>().join(",");
            params.push(("month", joined));
        }
        params
    }

    /// Full request URL for an HTTP fetcher.
    pub fn request_url(&self) -> String {
        let query = self
            .api_params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v.replace(',', "%2C")))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", SPECIES_COUNTS_ENDPOINT, query)
    }

    /// File name a saved response for this query is stored under.
    pub fn response_file_name(&self) -> String {
        match &self.months {
            Some(months) => {
                let joined = months.iter().map(u8::to_string).collect::<Vec<_>>().join("-");
                format!("species_counts_{}_months_{}.json", self.place_id, joined)
            }
            None => format!("species_counts_{}.json", self.place_id),
        }
    }
}

impl fmt::Display for SpeciesQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "place {} (top {})", self.place_id, self.top_n)?;
        if let Some(months) = &self.months {
            write!(f, " months {:?}", months)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_query_parse() {
        assert_eq!(PlaceQuery::parse(" 1234 "), Some(PlaceQuery::Id(1234)));
        assert_eq!(
            PlaceQuery::parse("Golden Gate Park"),
            Some(PlaceQuery::Name("Golden Gate Park".to_string()))
        );
        assert_eq!(PlaceQuery::parse("   "), None);
    }

    #[test]
    fn test_api_params_match_endpoint_contract() {
        let query = SpeciesQuery::new(97394, 25).with_months(&[7, 6, 6]).unwrap();
        let params = query.api_params();
        assert_eq!(
            params,
            vec![
                ("place_id", "97394".to_string()),
                ("verifiable", "true".to_string()),
                ("quality_grade", "research".to_string()),
                ("geo", "true".to_string()),
                ("per_page", "75".to_string()),
                ("month", "6,7".to_string()),
            ]
        );
    }

    #[test]
    fn test_per_page_is_capped() {
        assert_eq!(SpeciesQuery::new(1, 400).per_page(), 500);
    }

    #[test]
    fn test_invalid_month_rejected() {
        let result = SpeciesQuery::new(1, 10).with_months(&[0, 5]);
        assert_eq!(result, Err(ConfigurationError::InvalidMonth(0)));
        assert!(SpeciesQuery::new(1, 10).with_months(&[13]).is_err());
    }

    #[test]
    fn test_empty_months_means_no_filter() {
        let query = SpeciesQuery::new(1, 10).with_months(&[]).unwrap();
        assert_eq!(query.months(), None);
        assert_eq!(query, SpeciesQuery::new(1, 10));
    }

    #[test]
    fn test_request_url_and_file_name() {
        let query = SpeciesQuery::new(5, 10).with_months(&[3, 4]).unwrap();
        assert!(query.request_url().ends_with("per_page=30&month=3%2C4"));
        assert_eq!(query.response_file_name(), "species_counts_5_months_3-4.json");
        assert_eq!(SpeciesQuery::new(5, 10).response_file_name(), "species_counts_5.json");
    }
}

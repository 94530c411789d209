//! Catalog Index
//!
//! Choice lists derived once from the normalized record set:
//! - Localities: sorted unique values behind a leading "All" sentinel
//! - Cuisines: sorted union of every record's tags
//!
//! Read-only after construction.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::data::Restaurant;

/// Sentinel that matches every locality
pub const ALL_LOCALITIES: &str = "All";

/// Prefixes that turn a city name into a region rather than a locality
const REGION_PREFIXES: &[&str] = &["north", "south", "east", "west", "central"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogIndex {
    pub localities: Vec<String>,
    pub cuisines: Vec<String>,
    restaurant_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub restaurant_count: usize,
    /// Excludes the "All" sentinel
    pub locality_count: usize,
    pub cuisine_count: usize,
}

impl CatalogIndex {
    /// Derive both choice lists from `records`
    pub fn build(records: &[Restaurant], city_aliases: &[String]) -> Self {
        let mut localities = vec![ALL_LOCALITIES.to_string()];
        localities.extend(locality_choices(
            records.iter().map(|r| Some(r.locality.as_str())),
            city_aliases,
        ));

        let cuisines: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.cuisines.iter().map(String::as_str))
            .collect();

        Self {
            localities,
            cuisines: cuisines.into_iter().map(str::to_string).collect(),
            restaurant_count: records.len(),
        }
    }

    pub fn has_locality(&self, locality: &str) -> bool {
        self.localities.iter().any(|l| l == locality)
    }

    pub fn has_cuisine(&self, cuisine: &str) -> bool {
        self.cuisines.binary_search_by(|c| c.as_str().cmp(cuisine)).is_ok()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            restaurant_count: self.restaurant_count,
            locality_count: self.localities.len().saturating_sub(1),
            cuisine_count: self.cuisines.len(),
        }
    }
}

/// Sorted unique localities, excluding missing values and the city itself
///
/// A value is treated as the city when, trimmed and lower-cased, it equals one
/// of `city_aliases`, optionally behind a compass prefix ("North Bangalore").
/// Kept values are returned exactly as given.
pub fn locality_choices<'a, I>(values: I, city_aliases: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let unique: BTreeSet<&str> = values
        .into_iter()
        .flatten()
        .filter(|v| !v.trim().is_empty() && !is_city_name(v, city_aliases))
        .collect();

    unique.into_iter().map(str::to_string).collect()
}

fn is_city_name(value: &str, city_aliases: &[String]) -> bool {
    let lowered = value.trim().to_lowercase();
    let is_alias = |s: &str| city_aliases.iter().any(|alias| alias == s);

    if is_alias(&lowered) {
        return true;
    }

    match lowered.split_once(char::is_whitespace) {
        Some((prefix, rest)) => REGION_PREFIXES.contains(&prefix) && is_alias(rest.trim()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn aliases() -> Vec<String> {
        CatalogConfig::default().city_aliases
    }

    #[test]
    fn test_locality_choices_excludes_city_variants() {
        let values = vec![
            Some("Koramangala"),
            Some("Indiranagar, Bangalore"),
            Some("Bangalore"),
            Some("Banglore"),
            Some("  bangalore  "),
            None,
            Some("BTM"),
            Some("HSR Layout"),
        ];
        assert_eq!(
            locality_choices(values, &aliases()),
            vec!["BTM", "HSR Layout", "Indiranagar, Bangalore", "Koramangala"]
        );
    }

    #[test]
    fn test_locality_choices_excludes_regions() {
        let values = vec![
            Some("Central Bangalore"),
            Some("East Banglore"),
            Some("North Bangalore"),
            Some("South Banglore"),
            Some("West Bangalore"),
            Some("North Koramangala"),
            Some("A"),
            Some("A"),
        ];
        assert_eq!(locality_choices(values, &aliases()), vec!["A", "North Koramangala"]);
    }

    #[test]
    fn test_build_index() {
        let records = crate::fallback::sample_restaurants();
        let index = CatalogIndex::build(&records, &aliases());

        assert_eq!(index.localities[0], ALL_LOCALITIES);
        let rest = &index.localities[1..];
        assert!(rest.windows(2).all(|w| w[0] < w[1]));
        assert!(index.has_locality("Indiranagar"));
        assert!(!index.has_locality("Bangalore"));

        assert!(index.cuisines.windows(2).all(|w| w[0] < w[1]));
        assert!(index.has_cuisine("Bakery"));
        assert!(!index.has_cuisine("Sushi"));

        let stats = index.stats();
        assert_eq!(stats.restaurant_count, 16);
        assert_eq!(stats.locality_count, 8);
    }
}

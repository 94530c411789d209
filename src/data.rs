//! Data Loading and Normalization
//!
//! Turns raw dataset rows into canonical `Restaurant` records using Polars for
//! CSV ingestion. Every malformed field degrades to a default; only a
//! dataset that cannot be read at all (or yields no usable rows) is an error.

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;

use crate::catalog_index::CatalogIndex;
use crate::config::CatalogConfig;
use crate::fallback;
use crate::filter_state::PriceBounds;
use crate::utils::parsing::{
    emoji_for, parse_cost, parse_cuisines, parse_dish, parse_locality, parse_open, parse_rate,
    parse_votes,
};

const UNKNOWN_NAME: &str = "Unknown Restaurant";

/// Raw dataset columns
const COL_NAME: &str = "name";
const COL_LOCATION: &str = "location";
const COL_CUISINES: &str = "cuisines";
const COL_COST: &str = "approx_cost(for two people)";
const COL_RATE: &str = "rate";
const COL_VOTES: &str = "votes";
const COL_DISH: &str = "dish_liked";
const COL_ONLINE_ORDER: &str = "online_order";
const COL_ADDRESS: &str = "address";

/// Whole-dataset failure (the data-unavailable condition)
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to fetch dataset: {0}")]
    Fetch(String),

    #[error("failed to parse dataset CSV: {0}")]
    Csv(#[from] PolarsError),

    #[error("failed to open dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset contained no usable restaurants")]
    Empty,
}

/// One row of the raw dataset, every field still text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    pub name: Option<String>,
    pub location: Option<String>,
    pub cuisines: Option<String>,
    #[serde(rename = "approx_cost(for two people)")]
    pub approx_cost: Option<String>,
    pub rate: Option<String>,
    pub votes: Option<String>,
    pub dish_liked: Option<String>,
    pub online_order: Option<String>,
    pub address: Option<String>,
}

/// Canonical restaurant record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub locality: String,
    pub cuisines: Vec<String>,
    pub cost_for_two: u32,
    pub rating: f64,
    pub votes: u64,
    pub signature_dish: String,
    pub address: String,
    pub open_now: bool,
    pub image_emoji: String,
}

impl Restaurant {
    /// Cuisine tags joined for display ("North Indian, Chinese")
    pub fn cuisines_label(&self) -> String {
        self.cuisines.join(", ")
    }
}

/// Where the session's record set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Remote,
    Local,
    Fallback,
}

// ============================================================================
// Normalizer
// ============================================================================

/// Raw rows → deduplicated `Restaurant` records
pub struct Normalizer {
    config: CatalogConfig,
}

impl Normalizer {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    /// Normalize with the configured fixed seed
    ///
    /// The same input always yields the same output, including the open-now
    /// values drawn for rows without an explicit signal.
    pub fn normalize(&self, rows: &[RawRow]) -> Vec<Restaurant> {
        let mut rng = StdRng::seed_from_u64(self.config.open_seed);
        self.normalize_with_rng(rows, &mut rng)
    }

    /// Normalize drawing missing open-now values from `rng`
    pub fn normalize_with_rng<R: Rng>(&self, rows: &[RawRow], rng: &mut R) -> Vec<Restaurant> {
        let mut seen: FxHashSet<(String, String)> = FxHashSet::default();
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            // Draw before discarding so the sequence does not depend on filtering
            let record = self.normalize_row(row, rng);

            if record.name.chars().count() <= 1 {
                tracing::debug!("Discarding row with short name {:?}", record.name);
                continue;
            }
            if !seen.insert((record.name.clone(), record.locality.clone())) {
                continue;
            }
            records.push(record);
        }

        tracing::debug!("Normalized {} of {} raw rows", records.len(), rows.len());
        records
    }

    fn normalize_row<R: Rng>(&self, row: &RawRow, rng: &mut R) -> Restaurant {
        let name = match row.name.as_deref() {
            Some(s) if !s.is_empty() => s.trim().to_string(),
            _ => UNKNOWN_NAME.to_string(),
        };
        let locality = parse_locality(row.location.as_deref(), &self.config.city);
        let cuisines = parse_cuisines(row.cuisines.as_deref());
        let address = row
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| locality.clone());
        let open_now = match parse_open(row.online_order.as_deref()) {
            Some(open) => open,
            None => rng.gen::<f64>() > self.config.open_threshold,
        };

        Restaurant {
            image_emoji: emoji_for(&cuisines).to_string(),
            name,
            locality,
            cuisines,
            cost_for_two: parse_cost(row.approx_cost.as_deref()),
            rating: parse_rate(row.rate.as_deref()),
            votes: parse_votes(row.votes.as_deref()),
            signature_dish: parse_dish(row.dish_liked.as_deref()),
            address,
            open_now,
        }
    }
}

// ============================================================================
// CSV ingestion
// ============================================================================

/// Read raw rows from CSV bytes (e.g. a fetched response body)
pub fn read_raw_rows_csv(bytes: Vec<u8>) -> Result<Vec<RawRow>, DataError> {
    let df = text_csv_options()
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    Ok(raw_rows_from_frame(&df))
}

/// Read raw rows from a CSV file on disk
pub fn read_raw_rows_file(path: &str) -> Result<Vec<RawRow>, DataError> {
    let file = std::fs::File::open(path)?;
    let df = text_csv_options().into_reader_with_file_handle(file).finish()?;
    Ok(raw_rows_from_frame(&df))
}

/// Header row, every column read as text
fn text_csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Extract the known columns; absent columns read as all-missing
fn raw_rows_from_frame(df: &DataFrame) -> Vec<RawRow> {
    let text_column = |name: &str| -> Option<StringChunked> {
        let column = df.column(name).ok()?.cast(&DataType::String).ok()?;
        column.str().ok().cloned()
    };

    let name = text_column(COL_NAME);
    let location = text_column(COL_LOCATION);
    let cuisines = text_column(COL_CUISINES);
    let cost = text_column(COL_COST);
    let rate = text_column(COL_RATE);
    let votes = text_column(COL_VOTES);
    let dish = text_column(COL_DISH);
    let online_order = text_column(COL_ONLINE_ORDER);
    let address = text_column(COL_ADDRESS);

    macro_rules! get_val {
        ($col:expr, $i:expr) => {
            $col.as_ref().and_then(|c| c.get($i)).map(str::to_string)
        };
    }

    (0..df.height())
        .map(|i| RawRow {
            name: get_val!(name, i),
            location: get_val!(location, i),
            cuisines: get_val!(cuisines, i),
            approx_cost: get_val!(cost, i),
            rate: get_val!(rate, i),
            votes: get_val!(votes, i),
            dish_liked: get_val!(dish, i),
            online_order: get_val!(online_order, i),
            address: get_val!(address, i),
        })
        .collect()
}

// ============================================================================
// Catalog
// ============================================================================

/// The session-wide, read-only record set plus everything derived from it
#[derive(Debug, Clone)]
pub struct CatalogData {
    pub restaurants: Vec<Restaurant>,
    pub index: CatalogIndex,
    pub price_bounds: PriceBounds,
    pub origin: DataOrigin,
}

impl CatalogData {
    /// Derive index and price bounds from normalized records
    pub fn from_records(
        restaurants: Vec<Restaurant>,
        origin: DataOrigin,
        config: &CatalogConfig,
    ) -> Result<Self, DataError> {
        let price_bounds =
            PriceBounds::from_costs(restaurants.iter().map(|r| r.cost_for_two)).ok_or(DataError::Empty)?;
        let index = CatalogIndex::build(&restaurants, &config.city_aliases);

        tracing::info!(
            "Catalog ready ({:?}): {} restaurants, {} localities, {} cuisines, price {}..{}",
            origin,
            restaurants.len(),
            index.stats().locality_count,
            index.cuisines.len(),
            price_bounds.min(),
            price_bounds.max()
        );

        Ok(Self {
            restaurants,
            index,
            price_bounds,
            origin,
        })
    }

    /// Normalize raw rows and build the catalog
    pub fn from_raw_rows(rows: &[RawRow], origin: DataOrigin, config: &CatalogConfig) -> Result<Self, DataError> {
        let records = Normalizer::new(config.clone()).normalize(rows);
        Self::from_records(records, origin, config)
    }

    /// Built-in sample catalog
    pub fn fallback(config: &CatalogConfig) -> Self {
        let restaurants = fallback::sample_restaurants();
        let price_bounds =
            PriceBounds::from_costs(restaurants.iter().map(|r| r.cost_for_two)).unwrap_or_default();
        let index = CatalogIndex::build(&restaurants, &config.city_aliases);

        Self {
            restaurants,
            index,
            price_bounds,
            origin: DataOrigin::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(name: &str, location: &str) -> RawRow {
        RawRow {
            name: Some(name.to_string()),
            location: Some(location.to_string()),
            cuisines: Some("Cafe".to_string()),
            approx_cost: Some("400".to_string()),
            rate: Some("4.0/5".to_string()),
            votes: Some("100".to_string()),
            online_order: Some("Yes".to_string()),
            dish_liked: Some("Coffee".to_string()),
            address: None,
        }
    }

    #[test]
    fn test_address_falls_back_to_locality() {
        let records = Normalizer::new(CatalogConfig::default()).normalize(&[row("Test", "Banashankari")]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, "Banashankari");
        assert_eq!(records[0].cost_for_two, 400);
        assert_relative_eq!(records[0].rating, 4.0);
        assert!(records[0].open_now);
        assert_eq!(records[0].image_emoji, "☕");
    }

    #[test]
    fn test_short_names_and_duplicates_dropped() {
        let rows = vec![
            row("A", "Indiranagar"),
            row("Truffles", "Koramangala"),
            row("Truffles", "Koramangala, Bangalore"),
            row("Truffles", "Indiranagar"),
        ];
        let records = Normalizer::new(CatalogConfig::default()).normalize(&rows);
        let keys: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.name.as_str(), r.locality.as_str()))
            .collect();
        assert_eq!(keys, vec![("Truffles", "Koramangala"), ("Truffles", "Indiranagar")]);
    }

    #[test]
    fn test_missing_name_and_location_defaults() {
        let raw = RawRow::default();
        let records = Normalizer::new(CatalogConfig::default()).normalize(&[raw]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, UNKNOWN_NAME);
        assert_eq!(records[0].locality, "Bangalore");
        assert_eq!(records[0].cuisines, vec!["Multi-cuisine"]);
        assert_eq!(records[0].cost_for_two, 500);
        assert_eq!(records[0].votes, 0);
    }

    #[test]
    fn test_open_now_draw_is_reproducible() {
        let rows: Vec<RawRow> = (0..50)
            .map(|i| RawRow {
                name: Some(format!("Place {}", i)),
                ..RawRow::default()
            })
            .collect();

        let normalizer = Normalizer::new(CatalogConfig::default());
        let first = normalizer.normalize(&rows);
        let second = normalizer.normalize(&rows);
        assert_eq!(first, second);

        // Both outcomes occur with a 0.35 threshold over 50 draws
        assert!(first.iter().any(|r| r.open_now));
        assert!(first.iter().any(|r| !r.open_now));
    }

    #[test]
    fn test_input_not_mutated() {
        let rows = vec![row("Truffles", "Koramangala, Bangalore")];
        let before = format!("{:?}", rows);
        let _ = Normalizer::new(CatalogConfig::default()).normalize(&rows);
        assert_eq!(format!("{:?}", rows), before);
    }

    #[test]
    fn test_read_raw_rows_csv() {
        let csv = "name,location,cuisines,approx_cost(for two people),rate,votes,online_order\n\
                   Jalsa,\"Banashankari, Bangalore\",\"North Indian, Chinese\",\"1,200\",4.1/5,775,Yes\n\
                   Onesta,Banashankari,,600,NEW,12,No\n";
        let rows = read_raw_rows_csv(csv.as_bytes().to_vec()).expect("CSV parses");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].approx_cost.as_deref(), Some("1,200"));
        assert_eq!(rows[0].votes.as_deref(), Some("775"));
        assert!(rows[0].address.is_none());

        let records = Normalizer::new(CatalogConfig::default()).normalize(&rows);
        assert_eq!(records[0].locality, "Banashankari");
        assert_eq!(records[0].cost_for_two, 1200);
        assert_eq!(records[1].cuisines, vec!["Multi-cuisine"]);
        assert_eq!(records[1].rating, 0.0);
        assert!(!records[1].open_now);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_raw_rows_file("/nonexistent/restaurant_catalog/zomato.csv");
        assert!(matches!(result, Err(DataError::Io(_))));
    }

    #[test]
    fn test_catalog_from_empty_records_is_unavailable() {
        let result = CatalogData::from_records(Vec::new(), DataOrigin::Local, &CatalogConfig::default());
        assert!(matches!(result, Err(DataError::Empty)));
    }

    #[test]
    fn test_fallback_catalog() {
        let catalog = CatalogData::fallback(&CatalogConfig::default());
        assert_eq!(catalog.origin, DataOrigin::Fallback);
        assert_eq!(catalog.restaurants.len(), 16);
        assert_eq!(catalog.price_bounds.min(), 100);
        assert_eq!(catalog.price_bounds.max(), 2500);
        assert_eq!(catalog.index.localities[0], "All");
    }
}

//! Filter State
//!
//! Typed record of the current filter/sort selections for one session.
//! Fields are private: the paired controls (price range and its two bounds,
//! rating slider and its numeric mirror) are only written together through
//! `SyncController`, so a reader never sees a half-updated pair.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::catalog_index::ALL_LOCALITIES;
use crate::sync::SyncError;
use crate::utils::parsing::DEFAULT_COST_FOR_TWO;

// ============================================================================
// Price bounds
// ============================================================================

/// Global price extent of the catalog, always `min < max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBounds {
    min: u32,
    max: u32,
}

impl PriceBounds {
    /// Span used when every record costs the same
    pub const DEGENERATE_SPAN: u32 = 500;

    pub fn new(min: u32, max: u32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        if max > min {
            return Self { min, max };
        }
        match min.checked_add(Self::DEGENERATE_SPAN) {
            Some(max) => Self { min, max },
            None => Self {
                min: u32::MAX - Self::DEGENERATE_SPAN,
                max: u32::MAX,
            },
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Bounds of a cost column; `None` when there are no costs
    pub fn from_costs<I: IntoIterator<Item = u32>>(costs: I) -> Option<Self> {
        let mut iter = costs.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c)));
        Some(Self::new(min, max))
    }
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self::new(0, DEFAULT_COST_FOR_TWO)
    }
}

// ============================================================================
// Sort keys
// ============================================================================

/// Fixed set of result orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "Rating (High→Low)", alias = "Rating (High → Low)")]
    RatingDesc,
    #[serde(rename = "Rating (Low→High)", alias = "Rating (Low → High)")]
    RatingAsc,
    #[serde(rename = "Price (Low→High)", alias = "Price (Low → High)")]
    PriceAsc,
    #[serde(rename = "Price (High→Low)", alias = "Price (High → Low)")]
    PriceDesc,
    #[serde(rename = "Votes (Most Popular)")]
    VotesDesc,
    #[serde(rename = "Name (A→Z)", alias = "Name (A → Z)")]
    NameAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::RatingDesc,
        SortKey::RatingAsc,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::VotesDesc,
        SortKey::NameAsc,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::RatingDesc => "Rating (High→Low)",
            SortKey::RatingAsc => "Rating (Low→High)",
            SortKey::PriceAsc => "Price (Low→High)",
            SortKey::PriceDesc => "Price (High→Low)",
            SortKey::VotesDesc => "Votes (Most Popular)",
            SortKey::NameAsc => "Name (A→Z)",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = SyncError;

    /// Matches labels ignoring whitespace, so "Price (Low → High)" works too
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squeeze = |v: &str| v.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        let wanted = squeeze(s);
        SortKey::ALL
            .into_iter()
            .find(|key| squeeze(key.label()) == wanted)
            .ok_or_else(|| SyncError::UnknownSortKey(s.to_string()))
    }
}

// ============================================================================
// Filter state
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterState {
    bounds: PriceBounds,
    price_range: (u32, u32),
    price_lo: u32,
    price_hi: u32,
    rating_slider: f64,
    rating_number: f64,
    locality: String,
    cuisines: BTreeSet<String>,
    open_only: bool,
    sort_key: SortKey,
}

impl FilterState {
    /// Full price range, no rating floor, every locality and cuisine
    pub fn defaults(bounds: PriceBounds) -> Self {
        Self {
            bounds,
            price_range: (bounds.min, bounds.max),
            price_lo: bounds.min,
            price_hi: bounds.max,
            rating_slider: 0.0,
            rating_number: 0.0,
            locality: ALL_LOCALITIES.to_string(),
            cuisines: BTreeSet::new(),
            open_only: false,
            sort_key: SortKey::default(),
        }
    }

    /// Fresh defaults for the same price bounds
    ///
    /// Returns a whole new value; callers swap it in with a single assignment,
    /// so no partially reset state is observable.
    pub fn reset(&self) -> FilterState {
        Self::defaults(self.bounds)
    }

    pub fn bounds(&self) -> PriceBounds {
        self.bounds
    }

    pub fn price_range(&self) -> (u32, u32) {
        self.price_range
    }

    pub fn price_lo(&self) -> u32 {
        self.price_lo
    }

    pub fn price_hi(&self) -> u32 {
        self.price_hi
    }

    pub fn rating_slider(&self) -> f64 {
        self.rating_slider
    }

    pub fn rating_number(&self) -> f64 {
        self.rating_number
    }

    pub fn min_rating(&self) -> f64 {
        self.rating_slider
    }

    pub fn locality(&self) -> &str {
        &self.locality
    }

    pub fn cuisines(&self) -> &BTreeSet<String> {
        &self.cuisines
    }

    pub fn open_only(&self) -> bool {
        self.open_only
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    // Writers for SyncController; callers guarantee the invariants.

    pub(crate) fn write_price(&mut self, lo: u32, hi: u32) {
        debug_assert!(self.bounds.min <= lo && lo < hi && hi <= self.bounds.max);
        self.price_lo = lo;
        self.price_hi = hi;
        self.price_range = (lo, hi);
    }

    pub(crate) fn write_rating(&mut self, value: f64) {
        self.rating_slider = value;
        self.rating_number = value;
    }

    pub(crate) fn write_locality(&mut self, locality: String) {
        self.locality = locality;
    }

    pub(crate) fn write_cuisines(&mut self, cuisines: BTreeSet<String>) {
        self.cuisines = cuisines;
    }

    pub(crate) fn write_open_only(&mut self, open_only: bool) {
        self.open_only = open_only;
    }

    pub(crate) fn write_sort_key(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
    }
}

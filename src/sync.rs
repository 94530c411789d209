//! Sync Controller
//!
//! Applies one user edit to a `FilterState`, keeping paired controls
//! consistent:
//! - Price: combined range ↔ low bound ↔ high bound,
//!   `bounds.min <= price_lo < price_hi <= bounds.max` at all times
//! - Rating: slider ↔ number, always the same one-decimal value in [0, 5]
//!
//! Out-of-range numbers are clamped before writing. Values naming things the
//! catalog does not have (unknown locality, cuisine, sort label) are rejected
//! without touching the state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::catalog_index::CatalogIndex;
use crate::filter_state::{FilterState, SortKey};
use crate::utils::parsing::MAX_RATING;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("unknown locality: {0}")]
    UnknownLocality(String),

    #[error("unknown cuisine: {0}")]
    UnknownCuisine(String),

    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
}

/// One edit to one control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum FilterEvent {
    PriceRange { lo: i64, hi: i64 },
    PriceLow { value: i64 },
    PriceHigh { value: i64 },
    RatingSlider { value: f64 },
    RatingNumber { value: f64 },
    Locality { value: String },
    Cuisines { value: Vec<String> },
    OpenOnly { value: bool },
    SortKey { value: SortKey },
}

// ============================================================================
// One-shot signals
// ============================================================================

/// Flag that is raised, then observed and cleared exactly once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShot {
    raised: bool,
}

impl OneShot {
    pub fn raise(&mut self) {
        self.raised = true;
    }

    pub fn is_raised(&self) -> bool {
        self.raised
    }

    /// Observe and clear
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.raised)
    }
}

/// Independent notifications for the presentation layer; no ordering
/// between them is implied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub filters_changed: OneShot,
    /// Rating floor moved onto the maximum
    pub perfect_match: OneShot,
}

// ============================================================================
// Controller
// ============================================================================

pub struct SyncController<'a> {
    index: &'a CatalogIndex,
}

impl<'a> SyncController<'a> {
    pub fn new(index: &'a CatalogIndex) -> Self {
        Self { index }
    }

    /// Apply `event`, then raise `filters_changed`
    ///
    /// `perfect_match` is raised only when the rating floor moves from below
    /// the maximum onto it.
    pub fn apply(
        &self,
        state: &mut FilterState,
        signals: &mut Signals,
        event: FilterEvent,
    ) -> Result<(), SyncError> {
        let rating_before = state.min_rating();

        match event {
            FilterEvent::PriceRange { lo, hi } => {
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                let (min, max) = price_limits(state);
                let lo = lo.clamp(min, max - 1);
                let hi = hi.clamp(lo + 1, max);
                state.write_price(lo as u32, hi as u32);
            }
            FilterEvent::PriceLow { value } => {
                let (min, _) = price_limits(state);
                let hi = i64::from(state.price_hi());
                let lo = value.clamp(min, hi - 1);
                state.write_price(lo as u32, hi as u32);
            }
            FilterEvent::PriceHigh { value } => {
                let (_, max) = price_limits(state);
                let lo = i64::from(state.price_lo());
                let hi = value.clamp(lo + 1, max);
                state.write_price(lo as u32, hi as u32);
            }
            FilterEvent::RatingSlider { value } | FilterEvent::RatingNumber { value } => {
                state.write_rating(round_rating(value));
            }
            FilterEvent::Locality { value } => {
                if !self.index.has_locality(&value) {
                    return Err(SyncError::UnknownLocality(value));
                }
                state.write_locality(value);
            }
            FilterEvent::Cuisines { value } => {
                if let Some(unknown) = value.iter().find(|c| !self.index.has_cuisine(c)) {
                    return Err(SyncError::UnknownCuisine(unknown.clone()));
                }
                state.write_cuisines(value.into_iter().collect::<BTreeSet<_>>());
            }
            FilterEvent::OpenOnly { value } => state.write_open_only(value),
            FilterEvent::SortKey { value } => state.write_sort_key(value),
        }

        signals.filters_changed.raise();
        if rating_before < MAX_RATING && state.min_rating() >= MAX_RATING {
            signals.perfect_match.raise();
        }

        Ok(())
    }
}

fn price_limits(state: &FilterState) -> (i64, i64) {
    let bounds = state.bounds();
    (i64::from(bounds.min()), i64::from(bounds.max()))
}

/// One decimal, clamped to [0, 5]; non-finite input counts as 0
///
/// Halves round to even (4.25 -> 4.2, 4.75 -> 4.8).
pub fn round_rating(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    // `+ 0.0` folds -0.0 into 0.0
    ((value * 10.0).round_ties_even() / 10.0).clamp(0.0, MAX_RATING) + 0.0
}

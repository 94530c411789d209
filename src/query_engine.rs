//! Query Engine
//!
//! Filters and sorts the in-memory record set for a `FilterState`.
//! Purpose: one synchronous pass per interaction over a read-only slice.
//!
//! Filter (all must hold):
//!   cost in [price_lo, price_hi], rating >= floor, locality matches or "All",
//!   open when open-only, cuisine overlap when any cuisine is selected.
//! Sort: stable, single key; ties keep input order.

use serde::Serialize;
use std::cmp::Ordering;

use crate::catalog_index::ALL_LOCALITIES;
use crate::data::Restaurant;
use crate::filter_state::{FilterState, SortKey};

/// Number of restaurants in the welcome preview
pub const TOP_PICKS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregates {
    /// Mean cost, rounded to the nearest unit
    pub avg_cost_for_two: u32,
    /// Mean rating, rounded to 2 decimals
    pub avg_rating: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResult<'a> {
    pub count: usize,
    pub restaurants: Vec<&'a Restaurant>,
    /// `None` for an empty result
    pub aggregates: Option<Aggregates>,
}

impl<'a> QueryResult<'a> {
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// First result, the one featured with an insight
    pub fn featured(&self) -> Option<&'a Restaurant> {
        self.restaurants.first().copied()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    records: &'a [Restaurant],
}

impl<'a> QueryEngine<'a> {
    pub fn new(records: &'a [Restaurant]) -> Self {
        Self { records }
    }

    /// Filtered, sorted records plus aggregates
    pub fn query(&self, state: &FilterState) -> QueryResult<'a> {
        let mut restaurants: Vec<&'a Restaurant> =
            self.records.iter().filter(|r| matches(r, state)).collect();
        sort_restaurants(&mut restaurants, state.sort_key());

        tracing::debug!(
            "Query matched {} of {} restaurants",
            restaurants.len(),
            self.records.len()
        );

        QueryResult {
            count: restaurants.len(),
            aggregates: aggregates(&restaurants),
            restaurants,
        }
    }

    /// Highest-rated restaurants, ignoring filters
    pub fn top_rated(&self, limit: usize) -> Vec<&'a Restaurant> {
        let mut all: Vec<&'a Restaurant> = self.records.iter().collect();
        sort_restaurants(&mut all, SortKey::RatingDesc);
        all.truncate(limit);
        all
    }
}

fn matches(r: &Restaurant, state: &FilterState) -> bool {
    let (lo, hi) = state.price_range();
    let locality = state.locality();
    let selected = state.cuisines();

    (lo..=hi).contains(&r.cost_for_two)
        && r.rating >= state.min_rating()
        && (locality == ALL_LOCALITIES || r.locality == locality)
        && (r.open_now || !state.open_only())
        && (selected.is_empty() || r.cuisines.iter().any(|c| selected.contains(c)))
}

/// Stable sort on the single field named by `key`
pub fn sort_restaurants(restaurants: &mut [&Restaurant], key: SortKey) {
    let compare: fn(&Restaurant, &Restaurant) -> Ordering = match key {
        SortKey::RatingDesc => |a, b| b.rating.total_cmp(&a.rating),
        SortKey::RatingAsc => |a, b| a.rating.total_cmp(&b.rating),
        SortKey::PriceAsc => |a, b| a.cost_for_two.cmp(&b.cost_for_two),
        SortKey::PriceDesc => |a, b| b.cost_for_two.cmp(&a.cost_for_two),
        SortKey::VotesDesc => |a, b| b.votes.cmp(&a.votes),
        SortKey::NameAsc => |a, b| a.name.cmp(&b.name),
    };
    restaurants.sort_by(|a, b| compare(a, b));
}

fn aggregates(restaurants: &[&Restaurant]) -> Option<Aggregates> {
    if restaurants.is_empty() {
        return None;
    }

    let n = restaurants.len() as f64;
    let total_cost: u64 = restaurants.iter().map(|r| u64::from(r.cost_for_two)).sum();
    let total_rating: f64 = restaurants.iter().map(|r| r.rating).sum();

    Some(Aggregates {
        avg_cost_for_two: (total_cost as f64 / n).round() as u32,
        avg_rating: (total_rating / n * 100.0).round() / 100.0,
    })
}

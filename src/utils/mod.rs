//! Utility modules
//!
//! - Parsing: total field parsers with documented defaults

pub mod parsing;

// Re-export commonly used functions
pub use parsing::{parse_cost, parse_cuisines, parse_locality, parse_rate, parse_votes};

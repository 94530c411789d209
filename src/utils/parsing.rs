//! Field Parsers
//!
//! Converts noisy raw dataset fields into canonical values.
//! Every parser is total: malformed input degrades to a documented default
//! and never returns an error.

use once_cell::sync::Lazy;
use regex::Regex;

/// Cost used when the raw cost field has no digits
pub const DEFAULT_COST_FOR_TWO: u32 = 500;

/// Tag used when the raw cuisine field is absent
pub const DEFAULT_CUISINE: &str = "Multi-cuisine";

/// Dish used when the liked-dish field is absent or empty
pub const DEFAULT_SIGNATURE_DISH: &str = "Chef's Special";

/// Emoji used when no cuisine tag has a mapping
pub const DEFAULT_EMOJI: &str = "🍽️";

/// Highest rating on the source scale
pub const MAX_RATING: f64 = 5.0;

static RATING_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.\d+)").expect("rating pattern is valid"));

const CUISINE_EMOJI: &[(&str, &str)] = &[
    ("Pizza", "🍕"),
    ("Burger", "🍔"),
    ("Chinese", "🥢"),
    ("Indian", "🍛"),
    ("North Indian", "🫓"),
    ("South Indian", "🥥"),
    ("Cafe", "☕"),
    ("Desserts", "🍰"),
    ("Beverages", "🍹"),
    ("Bakery", "🥐"),
    ("Italian", "🍝"),
    ("Mexican", "🌮"),
    ("Thai", "🍜"),
    ("Biryani", "🍗"),
];

/// Treat missing and whitespace-only fields the same way
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse approximate cost for two
///
/// Format examples: "1,200", "₹800 for two", "500"
/// All non-digit characters are stripped before parsing.
pub fn parse_cost(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_COST_FOR_TWO;
    };

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<u32>() {
        Ok(cost) => cost,
        Err(_) => {
            tracing::debug!("Unparseable cost {:?}, using default", raw);
            DEFAULT_COST_FOR_TWO
        }
    }
}

/// Parse rating from strings like "4.1/5", "3.9", "NEW" or "-"
///
/// Takes the first `digits.digits` substring and clamps it to [0.0, 5.0].
pub fn parse_rate(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };

    RATING_PATTERN
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|rating| rating.clamp(0.0, MAX_RATING))
        .unwrap_or(0.0)
}

/// Parse vote count; anything but a plain non-negative integer is 0
pub fn parse_votes(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0)
}

/// Split a comma-joined cuisine list into trimmed, non-empty tags
pub fn parse_cuisines(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = present(raw) else {
        return vec![DEFAULT_CUISINE.to_string()];
    };

    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim a locality and drop a trailing ", <city>" segment
///
/// Matching of the city name is case-insensitive ("Indiranagar, bangalore").
/// Missing locality falls back to the city itself.
pub fn parse_locality(raw: Option<&str>, city: &str) -> String {
    let Some(locality) = present(raw) else {
        return city.to_string();
    };

    if let Some(comma) = locality.rfind(',') {
        let suffix = locality[comma + 1..].trim_start();
        if suffix.eq_ignore_ascii_case(city) {
            return locality[..comma].trim_end().to_string();
        }
    }

    locality.to_string()
}

/// First dish of the liked-dish list
pub fn parse_dish(raw: Option<&str>) -> String {
    raw.and_then(|s| s.split(',').map(str::trim).find(|d| !d.is_empty()))
        .unwrap_or(DEFAULT_SIGNATURE_DISH)
        .to_string()
}

/// Explicit yes/no signal; `None` when the source is silent
pub fn parse_open(raw: Option<&str>) -> Option<bool> {
    present(raw).map(|s| s.eq_ignore_ascii_case("yes"))
}

/// Emoji for the first cuisine tag that has one
pub fn emoji_for(cuisines: &[String]) -> &'static str {
    cuisines
        .iter()
        .find_map(|tag| {
            CUISINE_EMOJI
                .iter()
                .find(|(name, _)| name == tag)
                .map(|(_, emoji)| *emoji)
        })
        .unwrap_or(DEFAULT_EMOJI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_cost() {
        assert_eq!(parse_cost(Some("₹800 for two")), 800);
        assert_eq!(parse_cost(Some("500")), 500);
        assert_eq!(parse_cost(Some("1,200")), 1200);
        assert_eq!(parse_cost(Some("")), DEFAULT_COST_FOR_TWO);
        assert_eq!(parse_cost(Some("free")), DEFAULT_COST_FOR_TWO);
        assert_eq!(parse_cost(None), DEFAULT_COST_FOR_TWO);
        // Overflow is unparseable
        assert_eq!(parse_cost(Some("99999999999999")), DEFAULT_COST_FOR_TWO);
    }

    #[test]
    fn test_parse_rate() {
        assert_relative_eq!(parse_rate(Some("4.1/5")), 4.1);
        assert_relative_eq!(parse_rate(Some("3.9")), 3.9);
        assert_relative_eq!(parse_rate(Some("3.9 /5")), 3.9);
        assert_eq!(parse_rate(Some("NEW")), 0.0);
        assert_eq!(parse_rate(Some("-")), 0.0);
        assert_eq!(parse_rate(Some("4")), 0.0);
        assert_eq!(parse_rate(None), 0.0);
        assert_relative_eq!(parse_rate(Some("7.5/5")), 5.0);
    }

    #[test]
    fn test_parse_votes() {
        assert_eq!(parse_votes(Some("775")), 775);
        assert_eq!(parse_votes(Some(" 12 ")), 12);
        assert_eq!(parse_votes(Some("1,200")), 0);
        assert_eq!(parse_votes(Some("-3")), 0);
        assert_eq!(parse_votes(None), 0);
    }

    #[test]
    fn test_parse_cuisines() {
        assert_eq!(
            parse_cuisines(Some("North Indian, Mughlai,, Chinese ")),
            vec!["North Indian", "Mughlai", "Chinese"]
        );
        assert_eq!(parse_cuisines(None), vec![DEFAULT_CUISINE]);
        assert_eq!(parse_cuisines(Some("  ")), vec![DEFAULT_CUISINE]);
    }

    #[test]
    fn test_parse_locality() {
        assert_eq!(parse_locality(Some(" Indiranagar, Bangalore "), "Bangalore"), "Indiranagar");
        assert_eq!(parse_locality(Some("Indiranagar,BANGALORE"), "Bangalore"), "Indiranagar");
        assert_eq!(parse_locality(Some("Church Street, MG Road"), "Bangalore"), "Church Street, MG Road");
        assert_eq!(parse_locality(Some("Bangalore"), "Bangalore"), "Bangalore");
        assert_eq!(parse_locality(None, "Bangalore"), "Bangalore");
    }

    #[test]
    fn test_parse_dish_and_open() {
        assert_eq!(parse_dish(Some("Coffee, Waffles")), "Coffee");
        assert_eq!(parse_dish(Some(" , ")), DEFAULT_SIGNATURE_DISH);
        assert_eq!(parse_dish(None), DEFAULT_SIGNATURE_DISH);

        assert_eq!(parse_open(Some("Yes")), Some(true));
        assert_eq!(parse_open(Some("No")), Some(false));
        assert_eq!(parse_open(Some("")), None);
        assert_eq!(parse_open(None), None);
    }

    #[test]
    fn test_emoji_for() {
        let tags = vec!["Mughlai".to_string(), "Bakery".to_string(), "Pizza".to_string()];
        assert_eq!(emoji_for(&tags), "🥐");
        assert_eq!(emoji_for(&["Rajasthani".to_string()]), DEFAULT_EMOJI);
    }
}

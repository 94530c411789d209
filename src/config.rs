//! Configuration
//!
//! `CatalogConfig` carries the normalization knobs (city, aliases, seed).
//! `AppConfig` adds the collaborator endpoints and is read from environment
//! variables, with a default for every value.

use std::time::Duration;

/// Public Zomato Bangalore dataset
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/anishmahapatra/Zomato-Data-Visualization/main/data/zomato.csv";

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama3-8b-8192";

/// Normalization and catalog-derivation settings
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// City whose name is stripped as a locality suffix
    pub city: String,
    /// Lower-case spellings of the city that are not real localities
    pub city_aliases: Vec<String>,
    /// Seed for the open-now draw when the source is silent
    pub open_seed: u64,
    /// A draw strictly above this value means open
    pub open_threshold: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            city: "Bangalore".to_string(),
            city_aliases: vec![
                "bangalore".to_string(),
                "banglore".to_string(),
                "bengaluru".to_string(),
            ],
            open_seed: 42,
            open_threshold: 0.35,
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub data_url: String,
    /// Local CSV, tried before `data_url` when set
    pub data_path: Option<String>,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_base_url: String,
    pub fetch_timeout: Duration,
    pub insight_timeout: Duration,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            data_url: DEFAULT_DATA_URL.to_string(),
            data_path: None,
            groq_api_key: None,
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            groq_base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            fetch_timeout: Duration::from_secs(20),
            insight_timeout: Duration::from_secs(10),
            port: 3000,
        }
    }
}

impl AppConfig {
    /// Read configuration from environment variables
    ///
    /// DATA_URL, DATA_PATH, CITY, GROQ_API_KEY, GROQ_MODEL, GROQ_BASE_URL,
    /// FETCH_TIMEOUT_SECS, INSIGHT_TIMEOUT_SECS, PORT
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, test maps)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let secs = |key: &str, fallback: Duration| {
            non_empty(key)
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(fallback)
        };

        let mut catalog = defaults.catalog;
        if let Some(city) = non_empty("CITY") {
            let alias = city.to_lowercase();
            if !catalog.city_aliases.contains(&alias) {
                catalog.city_aliases.push(alias);
            }
            catalog.city = city;
        }

        Self {
            catalog,
            data_url: non_empty("DATA_URL").unwrap_or(defaults.data_url),
            data_path: non_empty("DATA_PATH"),
            groq_api_key: non_empty("GROQ_API_KEY"),
            groq_model: non_empty("GROQ_MODEL").unwrap_or(defaults.groq_model),
            groq_base_url: non_empty("GROQ_BASE_URL").unwrap_or(defaults.groq_base_url),
            fetch_timeout: secs("FETCH_TIMEOUT_SECS", defaults.fetch_timeout),
            insight_timeout: secs("INSIGHT_TIMEOUT_SECS", defaults.insight_timeout),
            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}

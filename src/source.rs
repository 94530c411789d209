//! Dataset Source
//!
//! Loads the raw dataset (local file first when configured, then the remote
//! URL), normalizes it and builds the catalog. Any whole-dataset failure is
//! logged and replaced with the built-in sample catalog, so `load_catalog`
//! always returns data.

use reqwest::Client;
use std::time::Duration;

use crate::config::AppConfig;
use crate::data::{read_raw_rows_csv, read_raw_rows_file, CatalogData, DataError, DataOrigin};

/// Download the raw CSV body
pub async fn fetch_csv(url: &str, timeout: Duration) -> Result<Vec<u8>, DataError> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DataError::Fetch(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| DataError::Fetch(e.to_string()))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| DataError::Fetch(e.to_string()))?;

    Ok(bytes.to_vec())
}

/// Remote (or local) catalog, without fallback
pub async fn try_load_catalog(config: &AppConfig) -> Result<CatalogData, DataError> {
    if let Some(path) = config.data_path.as_deref() {
        tracing::info!("Loading dataset from {}", path);
        match read_raw_rows_file(path)
            .and_then(|rows| CatalogData::from_raw_rows(&rows, DataOrigin::Local, &config.catalog))
        {
            Ok(catalog) => return Ok(catalog),
            Err(e) => tracing::warn!("Local dataset unusable ({}), trying remote", e),
        }
    }

    tracing::info!("Fetching dataset from {}", config.data_url);
    let bytes = fetch_csv(&config.data_url, config.fetch_timeout).await?;
    let rows = read_raw_rows_csv(bytes)?;
    tracing::info!("Fetched {} raw rows", rows.len());
    CatalogData::from_raw_rows(&rows, DataOrigin::Remote, &config.catalog)
}

/// Catalog for the session; the sample catalog when the dataset is unavailable
pub async fn load_catalog(config: &AppConfig) -> CatalogData {
    match try_load_catalog(config).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!("Dataset unavailable ({}), using built-in sample catalog", e);
            CatalogData::fallback(&config.catalog)
        }
    }
}

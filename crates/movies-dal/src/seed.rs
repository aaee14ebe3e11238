use std::{collections::HashSet, path::Path};

use tracing::debug;

use crate::{Error, Movie, error::Result};

/// Dataset compiled into the binary, used when no seed file is configured.
pub const DEFAULT_DATASET: &str = include_str!("../../../data/movies.json");

pub fn parse_dataset(json: &str) -> Result<Vec<Movie>> {
    let records: Vec<Movie> = serde_json::from_str(json)?;
    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.id.as_str()) {
            return Err(Error::DuplicateId(record.id.clone()));
        }
    }
    Ok(records)
}

pub fn default_dataset() -> Result<Vec<Movie>> {
    parse_dataset(DEFAULT_DATASET)
}

pub async fn load_dataset(path: &Path) -> Result<Vec<Movie>> {
    let json = tokio::fs::read_to_string(path).await?;
    let records = parse_dataset(&json)?;
    debug!("Loaded {} movies from {}", records.len(), path.display());
    Ok(records)
}

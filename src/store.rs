use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("catalog I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One tracked city: fixed coordinates plus the weather from the most recent
/// successful refresh. `weather` stays empty until the first refresh lands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedLocation {
    pub coordinates: [f64; 2],
    #[serde(default)]
    pub weather: HashMap<String, f64>,
}

impl TrackedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinates: [latitude, longitude],
            weather: HashMap::new(),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// The full set of tracked cities, keyed by name. Registration order is
/// preserved both in memory and in the persisted document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub cities: IndexMap<String, TrackedLocation>,
}

/// Whole-document JSON persistence for the city catalog.
///
/// Every `load`/`save` round-trips the backing file; there is no in-process
/// cache and no locking. Interleaved load-mutate-save sequences from
/// concurrent callers resolve last-writer-wins at document granularity.
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the catalog. A missing file is an empty catalog, not an error.
    pub async fn load(&self) -> Result<Catalog, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Catalog::default()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Rewrite the full catalog document. The JSON goes to a sibling temp
    /// file first and is renamed into place, so a concurrent `load` never
    /// observes a half-written document.
    pub async fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(catalog)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json.as_bytes()).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

use super::{DataStore, StoreCodec};
use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct NamedStore {
    pub name: String,
    pub store: Box<dyn DataStore>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoresFile {
    #[serde(default)]
    stores: Vec<StoredEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    name: String,
    store: Value,
}

/// Reads and writes the user's configured stores through the codec's tags.
pub struct StoreConfigManager {
    path: PathBuf,
}

impl StoreConfigManager {
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: paths::stores_path()?,
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_stores(&self, codec: &StoreCodec) -> Result<Vec<NamedStore>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path).context("Failed to read stores.json")?;
        let file: StoresFile = serde_json::from_str(&content).context("Failed to parse stores.json")?;

        let stores = file
            .stores
            .into_iter()
            .filter_map(|entry| match codec.decode(entry.store) {
                Ok(store) => Some(NamedStore {
                    name: entry.name,
                    store,
                }),
                Err(e) => {
                    log::warn!("Skipping store {}: {}", entry.name, e);
                    None
                }
            })
            .collect();

        Ok(stores)
    }

    pub fn save_stores(&self, codec: &StoreCodec, stores: &[NamedStore]) -> Result<()> {
        let entries = stores
            .iter()
            .map(|s| {
                let store = codec
                    .encode(s.store.as_ref())
                    .with_context(|| format!("Failed to encode store {}", s.name))?;
                Ok(StoredEntry {
                    name: s.name.clone(),
                    store,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        ensure_parent_dir(&self.path)?;
        let content = serde_json::to_string_pretty(&StoresFile { stores: entries })?;
        std::fs::write(&self.path, content)?;
        log::info!("Saved {} store(s) to {:?}", stores.len(), self.path);
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

//! JSON persistence for the lookup table.
//!
//! The table is rewritten in full on every successful replace or clear and
//! reloaded at startup. A missing file is a normal first-run condition, not
//! an error.

use super::LookupTable;
use crate::error::TableError;
use std::fs;
use std::path::{Path, PathBuf};

pub struct TableStore {
    path: PathBuf,
}

impl TableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default store location under the platform data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("presage")
            .join("table.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted table. Missing file yields an empty table.
    pub fn load(&self) -> Result<LookupTable, TableError> {
        if !self.path.exists() {
            tracing::info!("no table store at {:?}, starting empty", self.path);
            return Ok(LookupTable::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| TableError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        let table: LookupTable =
            serde_json::from_str(&contents).map_err(|e| TableError::Decode {
                path: self.path.clone(),
                source: e,
            })?;

        tracing::info!("loaded {} table entries from {:?}", table.len(), self.path);
        Ok(table)
    }

    /// Write the table out in full.
    pub fn save(&self, table: &LookupTable) -> Result<(), TableError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| TableError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let contents = serde_json::to_string_pretty(table).map_err(TableError::Encode)?;
        fs::write(&self.path, contents).map_err(|e| TableError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::info!("saved {} table entries to {:?}", table.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suit::Suit;

    fn temp_store(tag: &str) -> TableStore {
        let path = std::env::temp_dir()
            .join(format!("presage-store-test-{}-{tag}", std::process::id()))
            .join("table.json");
        TableStore::new(path)
    }

    #[test]
    fn missing_file_loads_empty() {
        let store = temp_store("missing");
        let table = store.load().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = temp_store("roundtrip");
        let mut table = LookupTable::new();
        table.insert(6, Suit::Hearts);
        table.insert(12, Suit::Clubs);

        store.save(&table).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, table);

        let _ = fs::remove_file(store.path());
    }
}

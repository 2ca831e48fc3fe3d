use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// KVStore backed by redb, a pure-Rust embedded database.
///
/// Every write is its own committed transaction, so a record written
/// before a crash is visible on the next `open`.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(KVError::storage)?;
            }
        }
        let db = Database::create(path).map_err(KVError::storage)?;

        // Make sure the table exists so read transactions never fail on a fresh file.
        let write_txn = db.begin_write().map_err(KVError::storage)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(KVError::storage)?;
        }
        write_txn.commit().map_err(KVError::storage)?;

        tracing::debug!(path = %path.display(), "opened redb store");
        Ok(Self { db: Arc::new(db) })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = read_txn.open_table(TABLE).map_err(KVError::storage)?;
        let value = table.get(key).map_err(KVError::storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn apply(&self, upserts: &[(&str, &[u8])], removals: &[&str]) -> Result<(), KVError> {
        let write_txn = self.db.begin_write().map_err(KVError::storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(KVError::storage)?;
            for key in removals {
                table.remove(*key).map_err(KVError::storage)?;
            }
            for (key, value) in upserts {
                table.insert(*key, *value).map_err(KVError::storage)?;
            }
        }
        write_txn.commit().map_err(KVError::storage)
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let read_txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = read_txn.open_table(TABLE).map_err(KVError::storage)?;

        let mut results = Vec::new();
        for entry in table.range(prefix..).map_err(KVError::storage)? {
            let (key, value) = entry.map_err(KVError::storage)?;
            let key = key.value().to_string();
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key, value.value().to_vec()));
        }
        Ok(results)
    }
}

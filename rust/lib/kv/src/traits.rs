use crate::error::KVError;

/// Byte-oriented key-value storage.
///
/// Keys are namespaced by convention (`auth:token`); see [`crate::Namespace`]
/// for a typed view over one prefix. `apply` is atomic: either every
/// upsert and removal lands or none does.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Write `upserts` and delete `removals` in one transaction.
    /// Removing a missing key is not an error.
    fn apply(&self, upserts: &[(&str, &[u8])], removals: &[&str]) -> Result<(), KVError>;

    /// Scan all keys starting with `prefix`. Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.apply(&[(key, value)], &[])
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.apply(&[], &[key])
    }

    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError> {
        self.apply(entries, &[])
    }

    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError> {
        self.apply(&[], keys)
    }
}

use std::sync::Arc;

use crate::error::KVError;
use crate::traits::KVStore;

/// A typed view over every key under `{name}:`.
///
/// `put` replaces the whole record atomically: fields not named in the
/// new record are deleted in the same logical update, so a reader never
/// sees fields from two different writes.
#[derive(Clone)]
pub struct Namespace {
    store: Arc<dyn KVStore>,
    prefix: String,
}

impl Namespace {
    pub fn new(store: Arc<dyn KVStore>, name: &str) -> Self {
        Self {
            store,
            prefix: format!("{}:", name),
        }
    }

    fn key(&self, field: &str) -> String {
        format!("{}{}", self.prefix, field)
    }

    /// Read one field as UTF-8 text.
    pub fn get_str(&self, field: &str) -> Result<Option<String>, KVError> {
        let key = self.key(field);
        match self.store.get(&key)? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| KVError::Encoding { key, reason: e.to_string() }),
        }
    }

    /// Read one field as a decimal integer.
    pub fn get_i64(&self, field: &str) -> Result<Option<i64>, KVError> {
        match self.get_str(field)? {
            None => Ok(None),
            Some(text) => text.trim().parse::<i64>().map(Some).map_err(|e| KVError::Encoding {
                key: self.key(field),
                reason: e.to_string(),
            }),
        }
    }

    /// Replace the record with `fields` in one transaction.
    pub fn put(&self, fields: &[(&str, String)]) -> Result<(), KVError> {
        let keys: Vec<String> = fields.iter().map(|(f, _)| self.key(f)).collect();
        let stale: Vec<String> = self
            .store
            .scan(&self.prefix)?
            .into_iter()
            .map(|(k, _)| k)
            .filter(|k| !keys.contains(k))
            .collect();

        let upserts: Vec<(&str, &[u8])> = keys
            .iter()
            .zip(fields)
            .map(|(k, (_, v))| (k.as_str(), v.as_bytes()))
            .collect();
        let removals: Vec<&str> = stale.iter().map(String::as_str).collect();
        self.store.apply(&upserts, &removals)
    }

    /// Delete every field of the record.
    pub fn clear(&self) -> Result<(), KVError> {
        let keys: Vec<String> = self.store.scan(&self.prefix)?.into_iter().map(|(k, _)| k).collect();
        if keys.is_empty() {
            return Ok(());
        }
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.store.batch_delete(&keys)
    }

    pub fn is_empty(&self) -> Result<bool, KVError> {
        Ok(self.store.scan(&self.prefix)?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn auth() -> (Arc<MemoryStore>, Namespace) {
        let store = Arc::new(MemoryStore::new());
        let ns = Namespace::new(store.clone(), "auth");
        (store, ns)
    }

    #[test]
    fn put_and_read_fields() {
        let (_, ns) = auth();
        ns.put(&[("id", "7".to_string()), ("token", "secret".to_string())]).unwrap();

        assert_eq!(ns.get_i64("id").unwrap(), Some(7));
        assert_eq!(ns.get_str("token").unwrap().as_deref(), Some("secret"));
        assert_eq!(ns.get_str("avatar").unwrap(), None);
    }

    #[test]
    fn put_drops_fields_of_previous_record() {
        let (_, ns) = auth();
        ns.put(&[
            ("id", "7".to_string()),
            ("token", "a".to_string()),
            ("avatar", "http://img/7.png".to_string()),
        ])
        .unwrap();
        ns.put(&[("id", "8".to_string()), ("token", "b".to_string())]).unwrap();

        assert_eq!(ns.get_i64("id").unwrap(), Some(8));
        assert_eq!(ns.get_str("avatar").unwrap(), None);
    }

    #[test]
    fn clear_only_touches_own_prefix() {
        let (store, ns) = auth();
        store.set("settings:theme", b"dark").unwrap();
        ns.put(&[("id", "1".to_string())]).unwrap();

        ns.clear().unwrap();
        assert!(ns.is_empty().unwrap());
        assert_eq!(store.get("settings:theme").unwrap(), Some(b"dark".to_vec()));
    }

    #[test]
    fn non_numeric_id_is_an_encoding_error() {
        let (store, ns) = auth();
        store.set("auth:id", b"seven").unwrap();
        assert!(matches!(ns.get_i64("id"), Err(KVError::Encoding { .. })));
    }
}

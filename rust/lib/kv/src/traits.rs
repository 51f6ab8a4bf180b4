use crate::error::KVError;

/// Callback for [`KVStore::update`].
///
/// Receives the current value (None if the key is absent). Returning
/// `Ok(Some(bytes))` stores `bytes`; `Ok(None)` leaves the key untouched.
/// Returning `Err` aborts the transaction.
pub type UpdateFn<'a> = dyn FnMut(Option<&[u8]>) -> Result<Option<Vec<u8>>, KVError> + 'a;

/// KVStore provides a key-value storage interface.
///
/// Keys follow a namespaced convention: `wordmap:user:<id>`, `wordmap:code:<code>`.
/// Every method is a single transaction.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. No-op if the key does not exist.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Insert all entries, but only if none of the keys exists yet.
    /// Returns false (and writes nothing) when any key is already present.
    fn insert_new(&self, entries: &[(&str, &[u8])]) -> Result<bool, KVError>;

    /// Delete several keys in one transaction.
    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError>;

    /// Atomic read-modify-write of a single key.
    ///
    /// Concurrent updates are serialized; none of them can observe a value
    /// that another update is about to replace. Returns the value written,
    /// or None if the callback chose not to write.
    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<Option<Vec<u8>>, KVError>;

    /// Scan all keys matching a prefix. Returns (key, value) pairs sorted by key.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}

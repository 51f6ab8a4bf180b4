use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};

use crate::error::KVError;
use crate::traits::{KVStore, UpdateFn};

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// RedbStore is a KVStore implementation backed by redb, a pure-Rust embedded
/// key-value database.
///
/// redb allows a single write transaction at a time, which is what makes
/// `update` and `insert_new` atomic.
pub struct RedbStore {
    db: Arc<Database>,
}

fn storage_err(e: impl std::fmt::Display) -> KVError {
    KVError::Storage(e.to_string())
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(storage_err)?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db.begin_write().map_err(storage_err)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;

        tracing::debug!("opened redb store at {}", path.display());
        Ok(Self { db: Arc::new(db) })
    }

    fn begin_write(&self) -> Result<WriteTransaction, KVError> {
        self.db.begin_write().map_err(storage_err)
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(TABLE).map_err(storage_err)?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(storage_err(e)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
            table.insert(key, value).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.batch_delete(&[key])
    }

    fn insert_new(&self, entries: &[(&str, &[u8])]) -> Result<bool, KVError> {
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
            for (key, _) in entries {
                if table.get(*key).map_err(storage_err)?.is_some() {
                    drop(table);
                    write_txn.abort().map_err(storage_err)?;
                    return Ok(false);
                }
            }
            for (key, value) in entries {
                table.insert(*key, *value).map_err(storage_err)?;
            }
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(true)
    }

    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError> {
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
            for key in keys {
                table.remove(*key).map_err(storage_err)?;
            }
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(())
    }

    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<Option<Vec<u8>>, KVError> {
        let write_txn = self.begin_write()?;
        let written = {
            let mut table = write_txn.open_table(TABLE).map_err(storage_err)?;
            let current = table
                .get(key)
                .map_err(storage_err)?
                .map(|v| v.value().to_vec());

            let next = match f(current.as_deref()) {
                Ok(next) => next,
                Err(e) => {
                    drop(table);
                    write_txn.abort().map_err(storage_err)?;
                    return Err(e);
                }
            };
            if let Some(ref bytes) = next {
                table.insert(key, bytes.as_slice()).map_err(storage_err)?;
            }
            next
        };
        write_txn.commit().map_err(storage_err)?;
        Ok(written)
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(TABLE).map_err(storage_err)?;

        let mut results = Vec::new();
        let iter = table.range(prefix..).map_err(storage_err)?;

        for entry in iter {
            let entry = entry.map_err(storage_err)?;
            let key = entry.0.value().to_string();
            if !key.starts_with(prefix) {
                break;
            }
            let value = entry.1.value().to_vec();
            results.push((key, value));
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (store, dir)
    }

    #[test]
    fn test_get_set_delete() {
        let (store, _dir) = open_store();

        assert!(store.get("a").unwrap().is_none());
        store.set("a", b"1").unwrap();
        assert_eq!(store.get("a").unwrap().unwrap(), b"1");

        store.delete("a").unwrap();
        assert!(store.get("a").unwrap().is_none());

        // Deleting a missing key is fine.
        store.delete("a").unwrap();
    }

    #[test]
    fn test_scan_prefix() {
        let (store, _dir) = open_store();
        store.set("wordmap:user:b", b"2").unwrap();
        store.set("wordmap:user:a", b"1").unwrap();
        store.set("wordmap:code:x", b"a").unwrap();
        store.set("wordmap:userz", b"?").unwrap();

        let rows = store.scan("wordmap:user:").unwrap();
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["wordmap:user:a", "wordmap:user:b"]);
    }

    #[test]
    fn test_insert_new_is_all_or_nothing() {
        let (store, _dir) = open_store();

        assert!(store.insert_new(&[("k1", b"a"), ("k2", b"b")]).unwrap());
        assert_eq!(store.get("k1").unwrap().unwrap(), b"a");

        // k2 exists, so k3 must not be written either.
        assert!(!store.insert_new(&[("k3", b"c"), ("k2", b"z")]).unwrap());
        assert!(store.get("k3").unwrap().is_none());
        assert_eq!(store.get("k2").unwrap().unwrap(), b"b");
    }

    #[test]
    fn test_batch_delete() {
        let (store, _dir) = open_store();
        store.set("a", b"1").unwrap();
        store.set("b", b"2").unwrap();
        store.set("c", b"3").unwrap();

        store.batch_delete(&["a", "b", "missing"]).unwrap();
        assert!(store.get("a").unwrap().is_none());
        assert!(store.get("b").unwrap().is_none());
        assert!(store.get("c").unwrap().is_some());
    }

    #[test]
    fn test_update_writes_and_skips() {
        let (store, _dir) = open_store();
        store.set("n", b"1").unwrap();

        let written = store
            .update("n", &mut |cur| {
                let mut v = cur.unwrap().to_vec();
                v.push(b'2');
                Ok(Some(v))
            })
            .unwrap();
        assert_eq!(written.unwrap(), b"12");
        assert_eq!(store.get("n").unwrap().unwrap(), b"12");

        let written = store
            .update("missing", &mut |cur| {
                assert!(cur.is_none());
                Ok(None)
            })
            .unwrap();
        assert!(written.is_none());
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_update_error_aborts() {
        let (store, _dir) = open_store();
        store.set("n", b"1").unwrap();

        let result = store.update("n", &mut |_| Err(KVError::Serialization("bad".into())));
        assert!(result.is_err());
        assert_eq!(store.get("n").unwrap().unwrap(), b"1");
    }

    #[test]
    fn test_concurrent_updates_are_serialized() {
        let (store, _dir) = open_store();
        let store = Arc::new(store);
        store.set("list", b"").unwrap();

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .update("list", &mut |cur| {
                            let mut v = cur.unwrap_or_default().to_vec();
                            v.push(b'a' + i);
                            Ok(Some(v))
                        })
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut v = store.get("list").unwrap().unwrap();
        v.sort();
        assert_eq!(v, b"abcdefgh");
    }
}

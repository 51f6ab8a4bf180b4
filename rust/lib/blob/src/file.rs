use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::BlobError;
use crate::traits::BlobStore;

/// FileStore is a BlobStore implementation backed by the local filesystem.
///
/// Names are mapped to files directly under `base_dir`:
///   name "1718000000000.png" → `{base_dir}/1718000000000.png`
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a new FileStore rooted at `base_dir`.
    /// The directory is created if it doesn't exist.
    pub fn open(base_dir: &Path) -> Result<Self, BlobError> {
        fs::create_dir_all(base_dir).map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    /// Resolve a name to a filesystem path. Rejects anything that is not a
    /// plain file name, so a name can never escape base_dir.
    fn resolve(&self, name: &str) -> Result<PathBuf, BlobError> {
        let plain = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && !name.contains("..");
        if !plain {
            return Err(BlobError::InvalidName(name.to_string()));
        }
        Ok(self.base_dir.join(name))
    }
}

impl BlobStore for FileStore {
    fn put(&self, name: &str, data: &[u8]) -> Result<(), BlobError> {
        let path = self.resolve(name)?;
        fs::write(&path, data).map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(())
    }

    fn put_new(&self, name: &str, data: &[u8]) -> Result<bool, BlobError> {
        let path = self.resolve(name)?;
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(BlobError::Io(e.to_string())),
        };
        if let Err(e) = file.write_all(data) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(BlobError::Io(e.to_string()));
        }
        Ok(true)
    }

    fn get(&self, name: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Ok(None);
        }
        let data = fs::read(&path).map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(Some(data))
    }

    fn delete(&self, name: &str) -> Result<(), BlobError> {
        let path = self.resolve(name)?;
        if path.is_file() {
            fs::remove_file(&path).map_err(|e| BlobError::Io(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(&dir.path().join("uploads")).unwrap();

        store.put("1.png", b"\x89PNG").unwrap();
        assert_eq!(store.get("1.png").unwrap().unwrap(), b"\x89PNG");
        assert!(dir.path().join("uploads/1.png").is_file());

        store.delete("1.png").unwrap();
        assert!(store.get("1.png").unwrap().is_none());
        store.delete("1.png").unwrap();
    }

    #[test]
    fn test_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.put("a.jpg", b"one").unwrap();
        store.put("a.jpg", b"two").unwrap();
        assert_eq!(store.get("a.jpg").unwrap().unwrap(), b"two");
    }

    #[test]
    fn test_put_new_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(store.put_new("a.png", b"first").unwrap());
        assert!(!store.put_new("a.png", b"second").unwrap());
        assert_eq!(store.get("a.png").unwrap().unwrap(), b"first");
        assert!(matches!(
            store.put_new("../a.png", b"x"),
            Err(BlobError::InvalidName(_))
        ));
    }

    #[test]
    fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        for name in ["", "../etc/passwd", "a/b.png", "..", ".hidden", "a\\b"] {
            assert!(
                matches!(store.get(name), Err(BlobError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }
}

use std::path::PathBuf;

/// Storage layout shared by the server binary and its modules.
///
/// The binary builds this from its config file, then passes it to
/// storage layer initialization.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Root directory for all persisted data.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/data.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Directory for uploaded files.
    /// Defaults to `{data_dir}/uploads/` if not specified.
    pub blob_dir: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            blob_dir: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the redb database path, falling back to `{data_dir}/data.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("data.redb"))
    }

    /// Resolve the upload directory.
    pub fn resolve_blob_dir(&self) -> PathBuf {
        self.blob_dir
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("uploads"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/data")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/data/data.redb"));
        assert_eq!(config.resolve_blob_dir(), PathBuf::from("/data/uploads"));
        assert_eq!(config.listen, "0.0.0.0:8080");
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/data")),
            db_path: Some(PathBuf::from("/fast/wordmap.redb")),
            blob_dir: Some(PathBuf::from("/srv/pictures")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/fast/wordmap.redb"));
        assert_eq!(config.resolve_blob_dir(), PathBuf::from("/srv/pictures"));
    }

    #[test]
    fn test_no_data_dir_is_relative() {
        let config = ServiceConfig::default();
        assert_eq!(config.resolve_db_path(), PathBuf::from("data.redb"));
    }
}

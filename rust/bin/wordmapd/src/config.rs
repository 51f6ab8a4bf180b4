//! Server-side configuration.
//!
//! Reads `/etc/wordmap/<name>.toml`, or an explicit path.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory searched for bare context names.
const CONFIG_DIR: &str = "/etc/wordmap";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of the redb file and the uploads directory.
    pub data_dir: String,
    /// Database file, if not `{data_dir}/data.redb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
    /// Picture directory, if not `{data_dir}/uploads`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HMAC signing secret.
    pub secret: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_expire_secs")]
    pub expire_secs: i64,
}

/// Admin account created on first start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub name: String,
    pub access_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Initial value of the map feature flag.
    #[serde(default = "default_true")]
    pub map_enabled: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self { map_enabled: true }
    }
}

/// Complete `wordmapd` configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminConfig>,
    #[serde(default)]
    pub feature: FeatureConfig,
}

fn default_expire_secs() -> i64 {
    86400
}

fn default_true() -> bool {
    true
}

impl ServerConfig {
    /// Resolve `-c` to a file: names map into `/etc/wordmap/`, anything
    /// containing `/` or `.` is taken as a path.
    pub fn resolve_path(arg: &str) -> PathBuf {
        if arg.contains('/') || arg.contains('.') {
            PathBuf::from(arg)
        } else {
            Path::new(CONFIG_DIR).join(format!("{}.toml", arg))
        }
    }

    /// Load and parse a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

//! `wordmapd`, the word map server binary.
//!
//! Usage:
//!   wordmapd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/wordmap/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use config::ServerConfig;
use wordmap::service::WordMapConfig;
use wordmap::WordMapModule;

/// Word map server.
#[derive(Parser, Debug)]
#[command(name = "wordmapd", about = "Word map server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = storage_layout(&server_config, data_dir, &cli.listen);
    info!(
        "Opening store at {}, uploads in {}",
        core_config.resolve_db_path().display(),
        core_config.resolve_blob_dir().display()
    );

    let kv: Arc<dyn wordmap_kv::KVStore> = Arc::new(
        wordmap_kv::RedbStore::open(&core_config.resolve_db_path())
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );
    let blob: Arc<dyn wordmap_blob::BlobStore> = Arc::new(
        wordmap_blob::FileStore::open(&core_config.resolve_blob_dir())
            .map_err(|e| anyhow::anyhow!("failed to open upload store: {}", e))?,
    );

    let module = WordMapModule::new(
        kv,
        blob,
        WordMapConfig {
            jwt_secret: server_config.jwt.secret.clone(),
            token_ttl: server_config.jwt.expire_secs,
            map_feature_enabled: server_config.feature.map_enabled,
        },
    );

    bootstrap::ensure_admin(module.service(), &server_config)?;
    info!(
        users = module.service().count_users()?,
        map_enabled = module.service().map_feature_enabled(),
        "Word map module initialized"
    );

    let app = routes::build_router(&module);

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("wordmapd listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Storage layout for the core crates, honoring explicit path overrides.
fn storage_layout(
    config: &ServerConfig,
    data_dir: std::path::PathBuf,
    listen: &str,
) -> wordmap_core::ServiceConfig {
    wordmap_core::ServiceConfig {
        data_dir: Some(data_dir),
        db_path: config.storage.db_path.as_ref().map(Into::into),
        blob_dir: config.storage.upload_dir.as_ref().map(Into::into),
        listen: listen.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_storage_layout_overrides() {
        let mut config: ServerConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "/data"

            [jwt]
            secret = "s"
            "#,
        )
        .unwrap();

        let layout = storage_layout(&config, PathBuf::from("/data"), "127.0.0.1:9000");
        assert_eq!(layout.resolve_db_path(), PathBuf::from("/data/data.redb"));
        assert_eq!(layout.resolve_blob_dir(), PathBuf::from("/data/uploads"));
        assert_eq!(layout.listen, "127.0.0.1:9000");

        config.storage.db_path = Some("/fast/wordmap.redb".into());
        config.storage.upload_dir = Some("/srv/pictures".into());
        let layout = storage_layout(&config, PathBuf::from("/data"), "0.0.0.0:8080");
        assert_eq!(layout.resolve_db_path(), PathBuf::from("/fast/wordmap.redb"));
        assert_eq!(layout.resolve_blob_dir(), PathBuf::from("/srv/pictures"));
    }
}

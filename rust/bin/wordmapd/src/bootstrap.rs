//! First-start checks and admin seeding.
//!
//! When wordmapd starts:
//! 1. Verify the config is usable; refuse to start otherwise.
//! 2. Ensure the configured admin account exists.

use tracing::info;

use wordmap::model::CreateUser;
use wordmap::service::WordMapService;

use crate::config::ServerConfig;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.jwt.expire_secs <= 0 {
        anyhow::bail!("jwt.expire_secs must be positive.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if let Some(admin) = &config.admin {
        if admin.name.trim().is_empty() || admin.access_code.trim().is_empty() {
            anyhow::bail!("[admin] needs a non-empty name and access_code.");
        }
    }
    Ok(())
}

/// Ensure the configured admin exists. Returns true if it was created.
pub fn ensure_admin(svc: &WordMapService, config: &ServerConfig) -> anyhow::Result<bool> {
    let Some(admin) = &config.admin else {
        return Ok(false);
    };

    if svc.find_user_by_access_code(admin.access_code.trim())?.is_some() {
        info!("Admin user already exists");
        return Ok(false);
    }

    let user = svc.create_admin(CreateUser {
        name: admin.name.clone(),
        access_code: admin.access_code.clone(),
    })?;
    info!(user_id = %user.id, "Admin user created");
    Ok(true)
}

pub mod feature;
pub mod picture;
pub mod roster;
pub mod session;
pub mod user;
pub mod word_input;

use std::sync::Arc;

use thiserror::Error;

use wordmap_blob::BlobStore;
use wordmap_kv::{KVError, KVStore};

use crate::model::User;
use crate::service::feature::FeatureFlag;

/// Key prefix of user documents.
pub(crate) const USER_PREFIX: &str = "wordmap:user:";
/// Key prefix of the access-code index (`code -> user id`).
pub(crate) const CODE_PREFIX: &str = "wordmap:code:";

/// Word map service error type.
#[derive(Debug, Error)]
pub enum WordMapError {
    #[error("Invalid access code")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Target user not found")]
    TargetNotFound,

    #[error("Access code already in use")]
    DuplicateAccessCode,

    #[error("{0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<KVError> for WordMapError {
    fn from(e: KVError) -> Self {
        WordMapError::Storage(e.to_string())
    }
}

impl From<wordmap_blob::BlobError> for WordMapError {
    fn from(e: wordmap_blob::BlobError) -> Self {
        match e {
            wordmap_blob::BlobError::InvalidName(name) => {
                WordMapError::Validation(format!("invalid file name: {}", name))
            }
            other => WordMapError::Storage(other.to_string()),
        }
    }
}

impl From<WordMapError> for wordmap_core::ServiceError {
    fn from(e: WordMapError) -> Self {
        use wordmap_core::ServiceError;
        match e {
            WordMapError::InvalidCredentials => ServiceError::Unauthorized(e.to_string()),
            WordMapError::Unauthenticated(m) => ServiceError::Unauthorized(m),
            WordMapError::Forbidden(m) => ServiceError::PermissionDenied(m),
            WordMapError::NotFound(m) => ServiceError::NotFound(m),
            WordMapError::TargetNotFound => ServiceError::NotFound(e.to_string()),
            WordMapError::DuplicateAccessCode => ServiceError::Conflict(e.to_string()),
            WordMapError::Validation(m) => ServiceError::Validation(m),
            WordMapError::Storage(m) => ServiceError::Storage(m),
            WordMapError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

/// Configuration for the word map service.
#[derive(Debug, Clone)]
pub struct WordMapConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 24h).
    pub token_ttl: i64,
    /// Initial value of the map feature flag.
    pub map_feature_enabled: bool,
}

impl Default for WordMapConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "wordmap-dev-secret-change-me".to_string(),
            token_ttl: 86400, // 24h
            map_feature_enabled: true,
        }
    }
}

/// The word map service. Holds storage backends, configuration and the
/// process-wide feature flag.
pub struct WordMapService {
    pub(crate) kv: Arc<dyn KVStore>,
    pub(crate) blob: Arc<dyn BlobStore>,
    pub(crate) config: WordMapConfig,
    pub(crate) feature: FeatureFlag,
}

impl WordMapService {
    pub fn new(
        kv: Arc<dyn KVStore>,
        blob: Arc<dyn BlobStore>,
        config: WordMapConfig,
    ) -> Arc<Self> {
        let feature = FeatureFlag::new(config.map_feature_enabled);
        Arc::new(Self {
            kv,
            blob,
            config,
            feature,
        })
    }

    // ── Document store helpers ──

    pub(crate) fn user_key(id: &str) -> String {
        format!("{}{}", USER_PREFIX, id)
    }

    pub(crate) fn code_key(access_code: &str) -> String {
        format!("{}{}", CODE_PREFIX, access_code)
    }

    /// Point lookup of a user document.
    pub(crate) fn find_user(&self, id: &str) -> Result<Option<User>, WordMapError> {
        if id.is_empty() {
            return Ok(None);
        }
        match self.kv.get(&Self::user_key(id))? {
            Some(bytes) => {
                let user = serde_json::from_slice(&bytes)
                    .map_err(|e| WordMapError::Internal(format!("deserialize: {}", e)))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// All user documents, in store order.
    pub(crate) fn scan_users(&self) -> Result<Vec<User>, WordMapError> {
        let entries = self.kv.scan(USER_PREFIX)?;
        let mut users = Vec::with_capacity(entries.len());
        for (_key, bytes) in entries {
            let user: User = serde_json::from_slice(&bytes)
                .map_err(|e| WordMapError::Internal(format!("deserialize: {}", e)))?;
            users.push(user);
        }
        Ok(users)
    }

    /// Atomically apply `f` to the stored user `id` and write it back.
    ///
    /// Returns `Ok(None)` if the user does not exist. When `f` fails the
    /// document is left untouched and its error is returned.
    pub(crate) fn update_user<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut User) -> Result<R, WordMapError>,
    ) -> Result<Option<(User, R)>, WordMapError> {
        let mut f = Some(f);
        let mut outcome: Option<Result<(User, R), WordMapError>> = None;

        self.kv.update(&Self::user_key(id), &mut |current| {
            let Some(bytes) = current else {
                return Ok(None);
            };
            let Some(f) = f.take() else {
                return Ok(None);
            };
            let mut user: User = serde_json::from_slice(bytes)
                .map_err(|e| KVError::Serialization(e.to_string()))?;

            match f(&mut user) {
                Ok(r) => {
                    user.updated_at = wordmap_core::now_rfc3339();
                    let bytes = serde_json::to_vec(&user)
                        .map_err(|e| KVError::Serialization(e.to_string()))?;
                    outcome = Some(Ok((user, r)));
                    Ok(Some(bytes))
                }
                Err(e) => {
                    outcome = Some(Err(e));
                    Ok(None)
                }
            }
        })?;

        outcome.transpose()
    }
}

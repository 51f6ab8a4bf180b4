//! Word map module: access-code login, a user roster, and the words users
//! write about each other.
//!
//! # Resources
//!
//! - **User** - roster member; holds the words it wrote about other users
//! - **Word input** - one word per (author, target) pair
//! - **Word map** - every word written about one user
//! - **Map feature flag** - process-wide switch, admin controlled
//!
//! # Usage
//!
//! ```ignore
//! use wordmap::{WordMapModule, service::WordMapConfig};
//!
//! let module = WordMapModule::new(kv, blob, WordMapConfig::default());
//! let router = module.routes();
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use wordmap_core::Module;

use crate::service::{WordMapConfig, WordMapService};

/// Word map module implementing the Module trait.
pub struct WordMapModule {
    service: Arc<WordMapService>,
}

impl WordMapModule {
    pub fn new(
        kv: Arc<dyn wordmap_kv::KVStore>,
        blob: Arc<dyn wordmap_blob::BlobStore>,
        config: WordMapConfig,
    ) -> Self {
        Self {
            service: WordMapService::new(kv, blob, config),
        }
    }

    /// Get a reference to the underlying service.
    pub fn service(&self) -> &Arc<WordMapService> {
        &self.service
    }
}

impl Module for WordMapModule {
    fn name(&self) -> &str {
        "wordmap"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}

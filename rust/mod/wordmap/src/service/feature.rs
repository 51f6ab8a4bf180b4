use std::sync::atomic::{AtomicBool, Ordering};

use crate::service::WordMapService;

/// Process-wide on/off switch for the word map feature.
///
/// In memory only: it resets on restart and is not shared between
/// server instances.
#[derive(Debug)]
pub struct FeatureFlag {
    enabled: AtomicBool,
}

impl FeatureFlag {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::SeqCst)
    }
}

impl WordMapService {
    pub fn map_feature_enabled(&self) -> bool {
        self.feature.is_enabled()
    }

    /// Flip the map feature flag and return the new value.
    pub fn toggle_map_feature(&self) -> bool {
        let enabled = self.feature.toggle();
        tracing::info!(enabled, "map feature toggled");
        enabled
    }
}

use serde::Deserialize;

use crate::filter::LocationMatch;

pub const DEFAULT_STORAGE_KEY: &str = "admin_dashboard_saved_views";

/// Engine configuration supplied by the host.
///
/// Missing keys fall back to their defaults, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Key the saved-view list is stored under.
    pub storage_key: String,
    pub location_match: LocationMatch,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            location_match: LocationMatch::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_location_match(mut self, mode: LocationMatch) -> Self {
        self.location_match = mode;
        self
    }
}

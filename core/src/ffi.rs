//! Host-facing surface exported through UniFFI (see `waterwatch.udl`).
//!
//! Values cross the boundary by value, so these wrappers take owned
//! arguments and delegate to the borrowing functions of the core modules.
//! Timestamps cross as Unix milliseconds.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use chrono::{DateTime, Utc};

use crate::active;
use crate::config::EngineConfig;
use crate::describe::describe;
use crate::error::{StoreError, ViewError};
use crate::filter::{self, LocationMatch};
use crate::location::{self, LocationHierarchy};
use crate::metrics::ReadingStats;
use crate::models::{
    DateRange, FilterState, FilterUpdate, LocationFilter, Reading, SavedView, SavedViewId,
    UtcDateTime, WaterQualityFilter,
};
use crate::storage::KeyValueStore;
use crate::views::{SavedViewManager, SystemClock};

uniffi::custom_type!(UtcDateTime, i64, {
    remote,
    lower: |dt: UtcDateTime| dt.timestamp_millis(),
    try_lift: |millis: i64| DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| anyhow::anyhow!("timestamp out of range: {millis}")),
});

uniffi::custom_newtype!(SavedViewId, String);

impl From<uniffi::UnexpectedUniFFICallbackError> for StoreError {
    fn from(err: uniffi::UnexpectedUniFFICallbackError) -> Self {
        StoreError::Backend { reason: err.reason }
    }
}

pub fn default_filters() -> FilterState {
    FilterState::default()
}

pub fn merge_filters(
    current: FilterState,
    date_range: Option<DateRange>,
    location: Option<LocationFilter>,
    water_quality: Option<WaterQualityFilter>,
) -> FilterState {
    current.merge(FilterUpdate {
        date_range,
        location,
        water_quality,
    })
}

pub fn validate_filters(filters: FilterState) -> Result<(), ViewError> {
    filters.validate()
}

pub fn has_active_filters(filters: FilterState) -> bool {
    active::has_active_filters(&filters)
}

pub fn active_filter_count(filters: FilterState) -> u32 {
    active::active_filter_count(&filters) as u32
}

pub fn describe_filters(filters: FilterState) -> String {
    describe(&filters)
}

pub fn apply_filters(
    filters: FilterState,
    readings: Vec<Reading>,
    mode: LocationMatch,
) -> Vec<Reading> {
    filter::filter_records(&filters, mode, readings).collect()
}

pub fn summarize_readings(
    filters: FilterState,
    readings: Vec<Reading>,
    mode: LocationMatch,
) -> ReadingStats {
    ReadingStats::compute(filter::filter_records(&filters, mode, &readings))
}

fn sample_hierarchy() -> &'static LocationHierarchy {
    static HIERARCHY: OnceLock<LocationHierarchy> = OnceLock::new();
    HIERARCHY.get_or_init(LocationHierarchy::sample)
}

pub fn available_states() -> Vec<String> {
    sample_hierarchy().states().to_vec()
}

pub fn available_districts(location: LocationFilter) -> Vec<String> {
    sample_hierarchy().available_districts(&location).to_vec()
}

pub fn available_villages(location: LocationFilter) -> Vec<String> {
    sample_hierarchy().available_villages(&location).to_vec()
}

pub fn select_state(state: String) -> LocationFilter {
    location::set_state(&state)
}

pub fn select_district(location: LocationFilter, district: String) -> LocationFilter {
    location::set_district(&location, &district)
}

pub fn select_village(location: LocationFilter, village: String) -> LocationFilter {
    location::set_village(&location, &village)
}

/// Durable storage implemented by the host app.
pub trait HostStore: Send + Sync {
    fn get(&self, key: String) -> Result<Option<String>, StoreError>;
    fn set(&self, key: String, value: String) -> Result<(), StoreError>;
    fn remove(&self, key: String) -> Result<(), StoreError>;
}

struct HostStoreAdapter(Box<dyn HostStore>);

impl KeyValueStore for HostStoreAdapter {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.get(key.to_string())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.set(key.to_string(), value.to_string())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.0.remove(key.to_string())
    }
}

/// Thread-safe saved-view manager handed to the host.
pub struct SavedViews {
    inner: Mutex<SavedViewManager<HostStoreAdapter>>,
}

impl SavedViews {
    pub fn new(store: Box<dyn HostStore>) -> Self {
        Self {
            inner: Mutex::new(SavedViewManager::open(HostStoreAdapter(store))),
        }
    }

    /// Build from a JSON `EngineConfig`, e.g. `{"storageKey": "views_v2"}`.
    pub fn with_config(store: Box<dyn HostStore>, config_json: String) -> Result<Self, ViewError> {
        let config = EngineConfig::from_json(&config_json)
            .map_err(|e| ViewError::validation(format!("invalid config: {e}")))?;
        let manager = SavedViewManager::with_config(HostStoreAdapter(store), SystemClock, config);
        Ok(Self {
            inner: Mutex::new(manager),
        })
    }

    fn manager(&self) -> MutexGuard<'_, SavedViewManager<HostStoreAdapter>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_view(&self, name: String, filters: FilterState) -> Result<SavedView, ViewError> {
        self.manager().create(&name, &filters)
    }

    pub fn list_views(&self) -> Vec<SavedView> {
        self.manager().list().to_vec()
    }

    pub fn load_view(&self, id: SavedViewId) -> Result<FilterState, ViewError> {
        self.manager().load(&id)
    }

    pub fn delete_view(&self, id: SavedViewId) -> bool {
        self.manager().delete(&id)
    }

    pub fn rename_view(&self, id: SavedViewId, name: String) -> Result<SavedView, ViewError> {
        self.manager().rename(&id, &name)
    }

    /// Filter with the location mode from this manager's config.
    pub fn apply_filters(&self, filters: FilterState, readings: Vec<Reading>) -> Vec<Reading> {
        self.manager().apply_filters(&filters, &readings)
    }

    pub fn flush(&self) -> Result<(), ViewError> {
        self.manager().flush()
    }
}

pub mod active;
pub mod config;
pub mod describe;
pub mod error;
pub mod ffi;
pub mod filter;
pub mod location;
pub mod metrics;
pub mod models;
pub mod record;
pub mod storage;
pub mod views;

uniffi::include_scaffolding!("waterwatch");

pub use active::Facet;
pub use config::EngineConfig;
pub use error::{StoreError, ViewError};
pub use ffi::{
    active_filter_count, apply_filters, available_districts, available_states,
    available_villages, default_filters, describe_filters, has_active_filters, merge_filters,
    select_district, select_state, select_village, summarize_readings, validate_filters,
    HostStore, SavedViews,
};
pub use filter::LocationMatch;
pub use location::LocationHierarchy;
pub use metrics::{ParameterStats, ReadingStats};
pub use models::{
    DateRange, FilterState, FilterUpdate, LocationFilter, NumericRange, Reading, SavedView,
    SavedViewId, UtcDateTime, WaterQualityFilter,
};
pub use record::DataRecord;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use views::{Clock, SavedViewManager, SystemClock};

//! Named, persisted snapshots of a `FilterState`.
//!
//! The full list is kept in memory and written through to a single key of a
//! [`KeyValueStore`] on every mutation. The in-memory list is authoritative:
//! an unreadable or corrupt store starts the manager empty, and a failed
//! write is logged and remembered but does not fail the operation.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::active::has_active_filters;
use crate::config::EngineConfig;
use crate::describe::describe;
use crate::error::{StoreError, ViewError};
use crate::filter::apply_filters_with;
use crate::models::{FilterState, SavedView, SavedViewId, UtcDateTime};
use crate::record::DataRecord;
use crate::storage::KeyValueStore;

/// Source of the current time for `created_at` stamps.
pub trait Clock {
    fn now(&self) -> UtcDateTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UtcDateTime {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> UtcDateTime,
{
    fn now(&self) -> UtcDateTime {
        self()
    }
}

impl SavedView {
    /// Summary of this view's active facets for list display.
    pub fn description(&self) -> String {
        describe(&self.filters)
    }
}

pub struct SavedViewManager<S, C = SystemClock> {
    store: S,
    clock: C,
    config: EngineConfig,
    views: Vec<SavedView>,
    last_persist_error: Option<StoreError>,
}

impl<S: KeyValueStore> SavedViewManager<S, SystemClock> {
    /// Open with the default config and the system clock.
    pub fn open(store: S) -> Self {
        Self::with_config(store, SystemClock, EngineConfig::default())
    }
}

impl<S: KeyValueStore, C: Clock> SavedViewManager<S, C> {
    pub fn with_config(store: S, clock: C, config: EngineConfig) -> Self {
        let views = read_views(&store, &config.storage_key);
        info!(
            key = %config.storage_key,
            count = views.len(),
            "loaded saved views"
        );
        Self {
            store,
            clock,
            config,
            views,
            last_persist_error: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Save a snapshot of `filters` under `name`.
    ///
    /// The name is trimmed. Fails with `Validation` when the name is blank,
    /// when no filter is active, or when a range is inverted or not finite.
    pub fn create(&mut self, name: &str, filters: &FilterState) -> Result<SavedView, ViewError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ViewError::validation("name must not be blank"));
        }
        if !has_active_filters(filters) {
            return Err(ViewError::validation("no active filters to save"));
        }
        filters.validate()?;

        let view = SavedView {
            id: self.next_id(),
            name: name.to_string(),
            filters: filters.clone(),
            created_at: self.clock.now(),
        };
        self.views.push(view.clone());
        self.persist();
        debug!(id = %view.id, name = %view.name, "created saved view");
        Ok(view)
    }

    /// All saved views, oldest first.
    pub fn list(&self) -> &[SavedView] {
        &self.views
    }

    pub fn get(&self, id: &SavedViewId) -> Option<&SavedView> {
        self.views.iter().find(|v| &v.id == id)
    }

    /// A copy of the stored filters, for installing as the working state.
    pub fn load(&self, id: &SavedViewId) -> Result<FilterState, ViewError> {
        self.get(id)
            .map(|v| v.filters.clone())
            .ok_or_else(|| ViewError::NotFound {
                id: id.to_string(),
            })
    }

    /// Remove a view. Deleting an unknown id is a no-op; returns whether
    /// anything was removed.
    pub fn delete(&mut self, id: &SavedViewId) -> bool {
        let before = self.views.len();
        self.views.retain(|v| &v.id != id);
        if self.views.len() == before {
            return false;
        }
        self.persist();
        debug!(%id, "deleted saved view");
        true
    }

    /// Replace a view's name. Filters and creation time are untouched.
    pub fn rename(&mut self, id: &SavedViewId, name: &str) -> Result<SavedView, ViewError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ViewError::validation("name must not be blank"));
        }
        let view = self
            .views
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| ViewError::NotFound {
                id: id.to_string(),
            })?;
        view.name = name.to_string();
        let renamed = view.clone();
        self.persist();
        Ok(renamed)
    }

    /// Evaluate `filters` over `records` with the configured location mode.
    pub fn apply_filters<R: DataRecord + Clone>(
        &self,
        filters: &FilterState,
        records: &[R],
    ) -> Vec<R> {
        apply_filters_with(filters, records, self.config.location_match)
    }

    pub fn describe(&self, filters: &FilterState) -> String {
        describe(filters)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// The error from the most recent failed write, cleared by the next
    /// successful one.
    pub fn last_persist_error(&self) -> Option<&StoreError> {
        self.last_persist_error.as_ref()
    }

    /// Write the current list again, reporting failure to the caller.
    pub fn flush(&mut self) -> Result<(), ViewError> {
        self.persist();
        match &self.last_persist_error {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn next_id(&self) -> SavedViewId {
        loop {
            let id = SavedViewId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.views)
            .map_err(|e| StoreError::Backend {
                reason: e.to_string(),
            })
            .and_then(|json| self.store.set(&self.config.storage_key, &json));

        match result {
            Ok(()) => self.last_persist_error = None,
            Err(err) => {
                warn!(
                    key = %self.config.storage_key,
                    error = %err,
                    "failed to persist saved views; keeping in-memory state"
                );
                self.last_persist_error = Some(err);
            }
        }
    }
}

fn read_views<S: KeyValueStore>(store: &S, key: &str) -> Vec<SavedView> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(key, error = %err, "failed to read saved views; starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(views) => views,
        Err(err) => {
            warn!(key, error = %err, "corrupt saved views; starting empty");
            Vec::new()
        }
    }
}

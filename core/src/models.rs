use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ViewError;

pub type UtcDateTime = DateTime<Utc>;

pub const DEFAULT_PH_RANGE: NumericRange = NumericRange::new(0.0, 14.0);
pub const DEFAULT_TURBIDITY_RANGE: NumericRange = NumericRange::new(0.0, 10.0);
pub const DEFAULT_TEMPERATURE_RANGE: NumericRange = NumericRange::new(0.0, 50.0);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedViewId(pub String);

impl SavedViewId {
    pub fn generate() -> Self {
        SavedViewId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SavedViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SavedViewId {
    fn from(value: &str) -> Self {
        SavedViewId(value.to_string())
    }
}

/// Closed numeric interval `[min, max]`.
///
/// Persisted as a two-element array so stored views keep the
/// `phRange: [min, max]` layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// Reject non-finite endpoints and `min > max`.
    pub fn validate(&self, label: &str) -> Result<(), ViewError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ViewError::validation(format!(
                "{label} range must have finite bounds"
            )));
        }
        if self.is_inverted() {
            return Err(ViewError::validation(format!(
                "{label} range is inverted: {} > {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl From<[f64; 2]> for NumericRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<NumericRange> for [f64; 2] {
    fn from(range: NumericRange) -> Self {
        [range.min, range.max]
    }
}

/// Date bounds; `None` on either side means unbounded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<UtcDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<UtcDateTime>,
}

impl DateRange {
    pub fn is_bounded(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn contains(&self, date: &UtcDateTime) -> bool {
        if let Some(from) = &self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = &self.to {
            if date > to {
                return false;
            }
        }
        true
    }
}

/// Hierarchical location selection. An empty string is a wildcard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationFilter {
    pub state: String,
    pub district: String,
    pub village: String,
}

impl LocationFilter {
    pub fn is_empty(&self) -> bool {
        self.state.is_empty() && self.district.is_empty() && self.village.is_empty()
    }

    /// Non-empty levels in state, district, village order.
    pub fn levels(&self) -> impl Iterator<Item = &str> {
        [
            self.state.as_str(),
            self.district.as_str(),
            self.village.as_str(),
        ]
        .into_iter()
        .filter(|level| !level.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaterQualityFilter {
    pub ph_range: NumericRange,
    pub turbidity_range: NumericRange,
    pub temperature_range: NumericRange,
}

impl Default for WaterQualityFilter {
    fn default() -> Self {
        Self {
            ph_range: DEFAULT_PH_RANGE,
            turbidity_range: DEFAULT_TURBIDITY_RANGE,
            temperature_range: DEFAULT_TEMPERATURE_RANGE,
        }
    }
}

/// Complete filter configuration. `FilterState::default()` is the
/// "no filter" identity value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    pub date_range: DateRange,
    pub location: LocationFilter,
    pub water_quality: WaterQualityFilter,
}

impl FilterState {
    pub fn with_date_range(self, date_range: DateRange) -> Self {
        Self { date_range, ..self }
    }

    pub fn with_location(self, location: LocationFilter) -> Self {
        Self { location, ..self }
    }

    pub fn with_water_quality(self, water_quality: WaterQualityFilter) -> Self {
        Self {
            water_quality,
            ..self
        }
    }

    /// Replace each section present in `update` wholesale.
    pub fn merge(&self, update: FilterUpdate) -> Self {
        Self {
            date_range: update
                .date_range
                .unwrap_or_else(|| self.date_range.clone()),
            location: update.location.unwrap_or_else(|| self.location.clone()),
            water_quality: update
                .water_quality
                .unwrap_or_else(|| self.water_quality.clone()),
        }
    }

    pub fn validate(&self) -> Result<(), ViewError> {
        self.water_quality.ph_range.validate("pH")?;
        self.water_quality.turbidity_range.validate("turbidity")?;
        self.water_quality.temperature_range.validate("temperature")?;
        if let (Some(from), Some(to)) = (&self.date_range.from, &self.date_range.to) {
            if from > to {
                return Err(ViewError::validation("date range starts after it ends"));
            }
        }
        Ok(())
    }
}

/// Partial update: sections left `None` are kept from the current state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterUpdate {
    pub date_range: Option<DateRange>,
    pub location: Option<LocationFilter>,
    pub water_quality: Option<WaterQualityFilter>,
}

impl FilterUpdate {
    pub fn date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = Some(date_range);
        self
    }

    pub fn location(mut self, location: LocationFilter) -> Self {
        self.location = Some(location);
        self
    }

    pub fn water_quality(mut self, water_quality: WaterQualityFilter) -> Self {
        self.water_quality = Some(water_quality);
        self
    }
}

pub fn update_filters(current: &FilterState, update: FilterUpdate) -> FilterState {
    current.merge(update)
}

pub fn clear_filters() -> FilterState {
    FilterState::default()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedView {
    pub id: SavedViewId,
    pub name: String,
    pub filters: FilterState,
    pub created_at: UtcDateTime,
}

/// A single water-quality sample as the dashboard receives it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reading {
    pub date: Option<UtcDateTime>,
    pub location: Option<String>,
    pub ph: Option<f64>,
    pub turbidity: Option<f64>,
    pub temperature: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_filter_state() {
        let filters = FilterState::default();
        assert_eq!(filters.date_range, DateRange::default());
        assert!(filters.location.is_empty());
        assert_eq!(filters.water_quality.ph_range, NumericRange::new(0.0, 14.0));
        assert_eq!(
            filters.water_quality.turbidity_range,
            NumericRange::new(0.0, 10.0)
        );
        assert_eq!(
            filters.water_quality.temperature_range,
            NumericRange::new(0.0, 50.0)
        );
        assert_eq!(clear_filters(), filters);
    }

    #[test]
    fn test_merge_replaces_sections_wholesale() {
        let current = FilterState::default().with_location(LocationFilter {
            state: "Maharashtra".to_string(),
            district: "Pune".to_string(),
            village: String::new(),
        });

        let update = FilterUpdate::default().water_quality(WaterQualityFilter {
            ph_range: NumericRange::new(6.5, 8.5),
            ..WaterQualityFilter::default()
        });
        let merged = update_filters(&current, update);
        assert_eq!(merged.location, current.location);
        assert_eq!(merged.water_quality.ph_range, NumericRange::new(6.5, 8.5));

        let update = FilterUpdate::default().location(LocationFilter {
            state: "Gujarat".to_string(),
            ..LocationFilter::default()
        });
        let merged = update_filters(&merged, update);
        assert_eq!(merged.location.state, "Gujarat");
        assert_eq!(merged.location.district, "");
        assert_eq!(merged.water_quality.ph_range, NumericRange::new(6.5, 8.5));
    }

    #[test]
    fn test_merge_accepts_inverted_ranges() {
        let update = FilterUpdate::default().water_quality(WaterQualityFilter {
            ph_range: NumericRange::new(9.0, 3.0),
            ..WaterQualityFilter::default()
        });
        let merged = FilterState::default().merge(update);
        assert!(merged.water_quality.ph_range.is_inverted());
        assert!(matches!(
            merged.validate(),
            Err(ViewError::Validation { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nan_and_backwards_dates() {
        let filters = FilterState::default().with_water_quality(WaterQualityFilter {
            temperature_range: NumericRange::new(f64::NAN, 20.0),
            ..WaterQualityFilter::default()
        });
        assert!(filters.validate().is_err());

        let filters = FilterState::default().with_date_range(DateRange {
            from: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            to: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        });
        assert!(filters.validate().is_err());
        assert!(FilterState::default().validate().is_ok());
    }

    #[test]
    fn test_date_range_contains() {
        let range = DateRange {
            from: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            to: None,
        };
        assert!(range.is_bounded());
        assert!(range.contains(&Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert!(range.contains(&Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap()));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()));
        assert!(!DateRange::default().is_bounded());
    }

    #[test]
    fn test_filter_state_json_layout() {
        let filters = FilterState::default()
            .with_date_range(DateRange {
                from: Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
                to: None,
            })
            .with_water_quality(WaterQualityFilter {
                ph_range: NumericRange::new(7.0, 7.6),
                ..WaterQualityFilter::default()
            });

        let json = serde_json::to_value(&filters).unwrap();
        assert!(json["dateRange"]["from"]
            .as_str()
            .unwrap()
            .starts_with("2024-01-15T00:00:00"));
        assert!(json["dateRange"].get("to").is_none());
        assert_eq!(json["location"]["state"], "");
        assert_eq!(json["waterQuality"]["phRange"], serde_json::json!([7.0, 7.6]));
        assert_eq!(
            json["waterQuality"]["temperatureRange"],
            serde_json::json!([0.0, 50.0])
        );

        let decoded: FilterState = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, filters);
    }

    #[test]
    fn test_filter_state_parses_browser_dates() {
        let json = r#"{
            "dateRange": { "from": "2024-01-15T10:30:00.000Z" },
            "location": { "state": "Karnataka", "district": "", "village": "" },
            "waterQuality": { "phRange": [0, 14], "turbidityRange": [0, 10], "temperatureRange": [0, 50] }
        }"#;
        let filters: FilterState = serde_json::from_str(json).unwrap();
        assert_eq!(
            filters.date_range.from,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
        assert_eq!(filters.date_range.to, None);
        assert_eq!(filters.location.state, "Karnataka");
    }

    #[test]
    fn test_location_levels() {
        let location = LocationFilter {
            state: "Tamil Nadu".to_string(),
            district: String::new(),
            village: "T Nagar".to_string(),
        };
        let levels: Vec<_> = location.levels().collect();
        assert_eq!(levels, vec!["Tamil Nadu", "T Nagar"]);
    }

    #[test]
    fn test_saved_view_id_generate_is_unique() {
        let a = SavedViewId::generate();
        let b = SavedViewId::generate();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), a.as_str());
    }
}

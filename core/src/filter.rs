//! Predicate evaluation over data records.
//!
//! A record is kept only when every active facet accepts it. Facets still at
//! their default value impose no constraint, and a record that cannot report
//! a field passes that field's test, so `FilterState::default()` keeps every
//! record in its original order.

use serde::Deserialize;

use crate::models::{
    FilterState, LocationFilter, NumericRange, DEFAULT_PH_RANGE, DEFAULT_TEMPERATURE_RANGE,
    DEFAULT_TURBIDITY_RANGE,
};
use crate::record::DataRecord;

/// How location levels are matched against a record's location text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationMatch {
    /// Each non-empty level must appear somewhere in the location text,
    /// case-insensitively. Levels are checked independently.
    #[default]
    Substring,
    /// Each non-empty level must appear as whole words, case-insensitively,
    /// and the levels must appear in state, district, village order.
    Structured,
}

/// Test a record against `filters` using substring location matching.
pub fn matches<R: DataRecord + ?Sized>(filters: &FilterState, record: &R) -> bool {
    matches_with(filters, record, LocationMatch::Substring)
}

pub fn matches_with<R: DataRecord + ?Sized>(
    filters: &FilterState,
    record: &R,
    mode: LocationMatch,
) -> bool {
    date_matches(filters, record)
        && location_matches(&filters.location, record.location(), mode)
        && range_matches(
            &filters.water_quality.ph_range,
            &DEFAULT_PH_RANGE,
            record.ph(),
        )
        && range_matches(
            &filters.water_quality.turbidity_range,
            &DEFAULT_TURBIDITY_RANGE,
            record.turbidity(),
        )
        && range_matches(
            &filters.water_quality.temperature_range,
            &DEFAULT_TEMPERATURE_RANGE,
            record.temperature(),
        )
}

/// Lazily filter any sequence of records.
pub fn filter_records<'a, I>(
    filters: &'a FilterState,
    mode: LocationMatch,
    records: I,
) -> FilteredRecords<'a, I::IntoIter>
where
    I: IntoIterator,
    I::Item: DataRecord,
{
    FilteredRecords {
        filters,
        mode,
        inner: records.into_iter(),
    }
}

/// Collect the records accepted by `filters`, preserving order.
pub fn apply_filters<R: DataRecord + Clone>(filters: &FilterState, records: &[R]) -> Vec<R> {
    apply_filters_with(filters, records, LocationMatch::Substring)
}

pub fn apply_filters_with<R: DataRecord + Clone>(
    filters: &FilterState,
    records: &[R],
    mode: LocationMatch,
) -> Vec<R> {
    filter_records(filters, mode, records.iter())
        .cloned()
        .collect()
}

/// Iterator returned by [`filter_records`].
pub struct FilteredRecords<'a, I> {
    filters: &'a FilterState,
    mode: LocationMatch,
    inner: I,
}

impl<I> Iterator for FilteredRecords<'_, I>
where
    I: Iterator,
    I::Item: DataRecord,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let filters = self.filters;
        let mode = self.mode;
        self.inner
            .find(|record| matches_with(filters, record, mode))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

fn date_matches<R: DataRecord + ?Sized>(filters: &FilterState, record: &R) -> bool {
    if !filters.date_range.is_bounded() {
        return true;
    }
    match record.date() {
        Some(date) => filters.date_range.contains(&date),
        None => true,
    }
}

fn range_matches(range: &NumericRange, default: &NumericRange, value: Option<f64>) -> bool {
    if range == default {
        return true;
    }
    match value {
        // NaN carries no information; treat it like a missing field.
        Some(v) if !v.is_nan() => range.contains(v),
        _ => true,
    }
}

fn location_matches(filter: &LocationFilter, location: Option<&str>, mode: LocationMatch) -> bool {
    if filter.is_empty() {
        return true;
    }
    let Some(location) = location.filter(|l| !l.trim().is_empty()) else {
        return true;
    };
    match mode {
        LocationMatch::Substring => {
            let haystack = location.to_lowercase();
            filter
                .levels()
                .all(|level| haystack.contains(&level.to_lowercase()))
        }
        LocationMatch::Structured => structured_match(filter, location),
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn structured_match(filter: &LocationFilter, location: &str) -> bool {
    let haystack = tokens(location);
    let mut cursor = 0;

    for level in filter.levels() {
        let needle = tokens(level);
        if needle.is_empty() {
            continue;
        }
        let found = haystack[cursor..]
            .windows(needle.len())
            .position(|window| window == needle.as_slice());
        match found {
            Some(offset) => cursor += offset + needle.len(),
            None => return false,
        }
    }
    true
}

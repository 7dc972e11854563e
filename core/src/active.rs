//! Active-filter detection relative to `FilterState::default()`.

use crate::models::{
    FilterState, DEFAULT_PH_RANGE, DEFAULT_TEMPERATURE_RANGE, DEFAULT_TURBIDITY_RANGE,
};

/// One independently toggled filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Date,
    State,
    District,
    Village,
    Ph,
    Turbidity,
    Temperature,
}

impl Facet {
    pub fn label(&self) -> &'static str {
        match self {
            Facet::Date => "Date",
            Facet::State => "State",
            Facet::District => "District",
            Facet::Village => "Village",
            Facet::Ph => "pH",
            Facet::Turbidity => "Turbidity",
            Facet::Temperature => "Temperature",
        }
    }
}

/// Facets that differ from the default, in display order.
pub fn active_facets(filters: &FilterState) -> Vec<Facet> {
    let water = &filters.water_quality;
    let checks = [
        (Facet::Date, filters.date_range.is_bounded()),
        (Facet::State, !filters.location.state.is_empty()),
        (Facet::District, !filters.location.district.is_empty()),
        (Facet::Village, !filters.location.village.is_empty()),
        (Facet::Ph, water.ph_range != DEFAULT_PH_RANGE),
        (Facet::Turbidity, water.turbidity_range != DEFAULT_TURBIDITY_RANGE),
        (
            Facet::Temperature,
            water.temperature_range != DEFAULT_TEMPERATURE_RANGE,
        ),
    ];
    checks
        .into_iter()
        .filter_map(|(facet, active)| active.then_some(facet))
        .collect()
}

/// True iff any field differs from the default filter state.
pub fn has_active_filters(filters: &FilterState) -> bool {
    !active_facets(filters).is_empty()
}

pub fn active_filter_count(filters: &FilterState) -> usize {
    active_facets(filters).len()
}

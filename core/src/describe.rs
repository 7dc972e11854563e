//! Short, human-readable summaries of a filter configuration.

use crate::active::{active_facets, Facet};
use crate::models::FilterState;

pub const NO_FILTERS: &str = "No filters";

/// Summarize which facets of `filters` are active, e.g.
/// `"Date filter • Maharashtra → Pune • Water quality: pH, Turbidity"`.
///
/// The location chain starts at the state; a district or village selected
/// without a state is not shown.
pub fn describe(filters: &FilterState) -> String {
    let facets = active_facets(filters);
    let mut parts = Vec::new();

    if facets.contains(&Facet::Date) {
        parts.push("Date filter".to_string());
    }

    let location = &filters.location;
    if !location.state.is_empty() {
        let mut chain = vec![location.state.as_str()];
        if !location.district.is_empty() {
            chain.push(&location.district);
        }
        if !location.village.is_empty() {
            chain.push(&location.village);
        }
        parts.push(chain.join(" → "));
    }

    let water: Vec<&str> = facets
        .iter()
        .filter(|f| matches!(f, Facet::Ph | Facet::Turbidity | Facet::Temperature))
        .map(Facet::label)
        .collect();
    if !water.is_empty() {
        parts.push(format!("Water quality: {}", water.join(", ")));
    }

    if parts.is_empty() {
        NO_FILTERS.to_string()
    } else {
        parts.join(" • ")
    }
}

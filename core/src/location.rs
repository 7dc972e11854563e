//! Cascading state → district → village selection.
//!
//! Selecting a level clears every level below it, so a `LocationFilter`
//! produced by these transforms never names a district without a state or a
//! village without a district.

use crate::models::LocationFilter;

/// Static lookup table of the location hierarchy.
///
/// States keep their insertion order, which is the order the selector lists
/// them in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationHierarchy {
    states: Vec<String>,
    districts: Vec<(String, Vec<String>)>,
    villages: Vec<(String, Vec<String>)>,
}

impl LocationHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state and its districts. Registering a state again
    /// replaces its district list.
    pub fn with_state(mut self, state: &str, districts: &[&str]) -> Self {
        if !self.states.iter().any(|s| s == state) {
            self.states.push(state.to_string());
        }
        upsert(&mut self.districts, state, districts);
        self
    }

    /// Register the villages of a district.
    pub fn with_district(mut self, district: &str, villages: &[&str]) -> Self {
        upsert(&mut self.villages, district, villages);
        self
    }

    /// The sample hierarchy the water-quality dashboard ships with.
    pub fn sample() -> Self {
        Self::new()
            .with_state("Maharashtra", &["Mumbai", "Pune", "Nagpur", "Nashik"])
            .with_state("Karnataka", &["Bangalore", "Mysore", "Hubli", "Mangalore"])
            .with_state("Tamil Nadu", &["Chennai", "Coimbatore", "Madurai", "Salem"])
            .with_state("Gujarat", &["Ahmedabad", "Surat", "Vadodara", "Rajkot"])
            .with_state("Rajasthan", &["Jaipur", "Jodhpur", "Udaipur", "Kota"])
            .with_district("Mumbai", &["Andheri", "Bandra", "Kurla", "Malad"])
            .with_district("Pune", &["Hadapsar", "Kothrud", "Viman Nagar", "Aundh"])
            .with_district(
                "Bangalore",
                &["Whitefield", "Koramangala", "Indiranagar", "Jayanagar"],
            )
            .with_district("Chennai", &["T Nagar", "Velachery", "Anna Nagar", "Adyar"])
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Districts of the selected state; empty when no state is selected or
    /// the state is unknown.
    pub fn available_districts(&self, location: &LocationFilter) -> &[String] {
        lookup(&self.districts, &location.state)
    }

    /// Villages of the selected district; empty when no district is selected
    /// or the district has no villages on record.
    pub fn available_villages(&self, location: &LocationFilter) -> &[String] {
        lookup(&self.villages, &location.district)
    }
}

fn upsert(table: &mut Vec<(String, Vec<String>)>, key: &str, children: &[&str]) {
    let children: Vec<String> = children.iter().map(|c| c.to_string()).collect();
    match table.iter_mut().find(|(k, _)| k == key) {
        Some((_, existing)) => *existing = children,
        None => table.push((key.to_string(), children)),
    }
}

fn lookup<'a>(table: &'a [(String, Vec<String>)], key: &str) -> &'a [String] {
    if key.is_empty() {
        return &[];
    }
    table
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, children)| children.as_slice())
        .unwrap_or(&[])
}

/// Select a state. Whatever was selected before, district and village
/// start out empty.
pub fn set_state(state: &str) -> LocationFilter {
    LocationFilter {
        state: state.to_string(),
        district: String::new(),
        village: String::new(),
    }
}

/// Select a district within the current state; village is cleared.
pub fn set_district(location: &LocationFilter, district: &str) -> LocationFilter {
    LocationFilter {
        state: location.state.clone(),
        district: district.to_string(),
        village: String::new(),
    }
}

pub fn set_village(location: &LocationFilter, village: &str) -> LocationFilter {
    LocationFilter {
        village: village.to_string(),
        ..location.clone()
    }
}

/// Drop levels whose parent level is empty.
pub fn normalize(location: &LocationFilter) -> LocationFilter {
    let mut normalized = location.clone();
    if normalized.state.is_empty() {
        normalized.district.clear();
    }
    if normalized.district.is_empty() {
        normalized.village.clear();
    }
    normalized
}

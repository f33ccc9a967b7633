use aerolink_shared::Flight;
use serde::{Deserialize, Serialize};

/// The four user-editable filter fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightFilters {
    pub search: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
}

impl FlightFilters {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.origin.is_empty()
            && self.destination.is_empty()
            && self.status.is_empty()
    }
}

/// Derives filtered views over an in-memory flight list.
///
/// The free-text search is double-buffered: `set_search` updates the raw
/// value immediately (so the active-filters indicator can flip right away),
/// while `filter` matches against the last *applied* value. A debouncer is
/// expected to call `apply_search` after the typing settles; the other three
/// fields apply immediately.
#[derive(Debug, Clone, Default)]
pub struct FlightSearch {
    filters: FlightFilters,
    applied_search: String,
}

impl FlightSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &FlightFilters {
        &self.filters
    }

    pub fn set_search(&mut self, value: impl Into<String>) {
        self.filters.search = value.into();
    }

    /// Promote the raw search text to the applied value.
    pub fn apply_search(&mut self) {
        self.applied_search = self.filters.search.clone();
    }

    pub fn set_origin(&mut self, value: impl Into<String>) {
        self.filters.origin = value.into();
    }

    pub fn set_destination(&mut self, value: impl Into<String>) {
        self.filters.destination = value.into();
    }

    pub fn set_status(&mut self, value: impl Into<String>) {
        self.filters.status = value.into();
    }

    pub fn clear(&mut self) {
        self.filters = FlightFilters::default();
        self.applied_search.clear();
    }

    /// True iff any field is non-empty. Uses the raw search value, so this
    /// can flip before the filtered list catches up with the debounce.
    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Derive the filtered view. Search matches case-insensitively against
    /// origin, destination, and the stringified id; origin/destination are
    /// exact-match on the full field; empty fields mean no constraint.
    pub fn filter<'a>(&self, flights: &'a [Flight]) -> Vec<&'a Flight> {
        let query = self.applied_search.to_lowercase();
        flights
            .iter()
            .filter(|flight| {
                let matches_search = query.is_empty()
                    || flight.origin.to_lowercase().contains(&query)
                    || flight.destination.to_lowercase().contains(&query)
                    || flight.id.to_string().contains(&query);

                let matches_origin =
                    self.filters.origin.is_empty() || flight.origin == self.filters.origin;

                let matches_destination = self.filters.destination.is_empty()
                    || flight.destination == self.filters.destination;

                // Flights carry no status field yet; anything other than the
                // unconstrained values matches nothing.
                let matches_status =
                    self.filters.status.is_empty() || self.filters.status == "all";

                matches_search && matches_origin && matches_destination && matches_status
            })
            .collect()
    }
}

/// Sorted, deduplicated origin values for a filter dropdown.
pub fn unique_origins(flights: &[Flight]) -> Vec<String> {
    let mut origins: Vec<String> = flights.iter().map(|f| f.origin.clone()).collect();
    origins.sort();
    origins.dedup();
    origins
}

/// Sorted, deduplicated destination values for a filter dropdown.
pub fn unique_destinations(flights: &[Flight]) -> Vec<String> {
    let mut destinations: Vec<String> = flights.iter().map(|f| f.destination.clone()).collect();
    destinations.sort();
    destinations.dedup();
    destinations
}

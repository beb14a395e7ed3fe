// Talent views over the candidate population.
// Hotspot aggregation, filter-option resolution and query predicates are pure
// functions over a candidate snapshot fetched once per request.

pub mod filters;
pub mod handlers;
pub mod hotspots;
pub mod query;

//! Timeline composition: layered filter-graph planning and duration
//! reconciliation.

pub mod plan;

//! Financial aggregation and report composition.

pub mod aggregation;
pub mod dto;
pub mod ledger;
pub mod period;
pub mod rollup;
pub mod snapshot;

pub use aggregation::{AggregationService, DEFAULT_TOP_LIMIT};
pub use period::Period;

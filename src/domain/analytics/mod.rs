//! Response analytics.
//!
//! - [`aggregator`] - [`ResponseAggregator`] and the [`AggregationResult`] it produces
//! - [`range`] - trailing reporting windows
//! - [`report`] - schema-labelled summary for charts and cards
//!
//! Day buckets are UTC calendar days.

pub mod aggregator;
pub mod range;
pub mod report;

pub use aggregator::{
    AggregationResult, DailyCount, FieldAnalytics, ResponseAggregator, ValueCount, ValueCounts,
    aggregate,
};
pub use range::DateRange;
pub use report::{FieldReport, FormReport};

//! Aggregation of difference records into summary statistics
mod daily;
mod merge;
mod samples;

pub use daily::{DailySummary, SatelliteSummary};
pub use merge::{FinalSummary, LagSummary};
pub use samples::{FilteredSamples, GroupedSamples, LagKey, Samples};

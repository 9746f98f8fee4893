#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod constellation;
pub mod correction;
pub mod differencer;
pub mod errors;
pub mod filter;
pub mod layout;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::{
        aggregate::{
            DailySummary, FinalSummary, GroupedSamples, LagKey, LagSummary, SatelliteSummary,
        },
        config::Config,
        constellation::{System, Systems},
        correction::{Channel, CorrectionRecord, CorrectionVector, DiffRecord},
        differencer::{Differencer, Step},
        errors::{ConfigError, Error, ParsingError},
        filter::{MedianPolicy, OutlierFilter},
        layout::Layout,
        pipeline::{DayReport, DayStatus, DiffReport, MergeReport, Pipeline, Report},
    };

    // pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::prelude::{Duration, Epoch, TimeScale, Unit};
}

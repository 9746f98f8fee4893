//! Processing configuration
use crate::{
    errors::ConfigError,
    filter::{MedianPolicy, OutlierFilter},
    prelude::{Epoch, Systems},
};

use std::path::{Path, PathBuf};

/// [Config] describes one processing run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the comparison files
    pub root: PathBuf,
    /// First day to process
    pub start: Epoch,
    /// Last day to process (included)
    pub end: Epoch,
    /// Sampling interval, in seconds: duration of one reference window
    pub interval: u32,
    /// Constellations to process
    pub systems: Systems,
    /// Outlier rejection
    pub filter: OutlierFilter,
}

impl Config {
    /// Creates a new [Config] processing all constellations
    /// with the default [OutlierFilter].
    pub fn new<P: AsRef<Path>>(root: P, start: Epoch, end: Epoch, interval: u32) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            start,
            end,
            interval,
            systems: Systems::default(),
            filter: OutlierFilter::default(),
        }
    }

    /// Returns a new [Config] with desired [Systems] selection.
    pub fn with_systems(&self, systems: Systems) -> Self {
        let mut s = self.clone();
        s.systems = systems;
        s
    }

    /// Returns a new [Config] with desired [MedianPolicy].
    pub fn with_median_policy(&self, policy: MedianPolicy) -> Self {
        let mut s = self.clone();
        s.filter = s.filter.with_policy(policy);
        s
    }

    /// Verifies this [Config] is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval == 0 {
            return Err(ConfigError::Interval);
        }
        if self.end < self.start {
            return Err(ConfigError::DateRange);
        }
        Ok(())
    }
}

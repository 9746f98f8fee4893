use crate::{
    filter::OutlierFilter,
    prelude::{Channel, CorrectionVector, DiffRecord, SV},
};

use log::warn;
use strum::IntoEnumIterator;

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [LagKey] groups samples of one satellite at one lag.
/// Ordered by satellite, then lag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LagKey {
    /// Satellite
    pub sv: SV,
    /// Lag (s)
    pub lag: u32,
}

impl std::fmt::Display for LagKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}({}s)", self.sv, self.lag)
    }
}

/// Four independent sample sets, one per [Channel].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Samples {
    channels: [Vec<f64>; 4],
}

impl Samples {
    /// Appends one value per [Channel].
    pub fn push(&mut self, vector: &CorrectionVector) {
        for channel in Channel::iter() {
            self.channels[channel.index()].push(vector[channel]);
        }
    }

    /// Appends values to one [Channel].
    pub fn extend(&mut self, channel: Channel, values: &[f64]) {
        self.channels[channel.index()].extend_from_slice(values);
    }

    /// Samples of this [Channel].
    pub fn channel(&self, channel: Channel) -> &[f64] {
        &self.channels[channel.index()]
    }

    /// Filters each [Channel] independently, returns the total number of rejections.
    pub fn filter(&mut self, filter: &OutlierFilter) -> usize {
        self.channels
            .iter_mut()
            .map(|samples| filter.filter(samples))
            .sum()
    }

    /// Arithmetic mean of each [Channel]. None for an empty channel.
    pub fn means(&self) -> [Option<f64>; 4] {
        let mut means = [None; 4];
        for (mean, samples) in means.iter_mut().zip(self.channels.iter()) {
            if !samples.is_empty() {
                *mean = Some(samples.iter().sum::<f64>() / samples.len() as f64);
            }
        }
        means
    }

    /// Largest value of each [Channel]. None for an empty channel.
    pub fn maxima(&self) -> [Option<f64>; 4] {
        let mut maxima = [None; 4];
        for (max, samples) in maxima.iter_mut().zip(self.channels.iter()) {
            *max = samples.iter().copied().reduce(f64::max);
        }
        maxima
    }
}

/// Returns a [CorrectionVector] when all four channels have a value.
pub(crate) fn complete(values: [Option<f64>; 4]) -> Option<CorrectionVector> {
    let mut vector = CorrectionVector::default();
    for channel in Channel::iter() {
        vector[channel] = values[channel.index()]?;
    }
    Some(vector)
}

/// [GroupedSamples] accumulates [DiffRecord]s per [LagKey]
/// over one aggregation scope (one day, or many days).
#[derive(Debug, Clone, Default)]
pub struct GroupedSamples {
    groups: BTreeMap<LagKey, Samples>,
}

impl GroupedSamples {
    /// Appends a new [DiffRecord].
    pub fn push(&mut self, record: &DiffRecord) {
        let key = LagKey {
            sv: record.sv,
            lag: record.lag,
        };
        self.groups.entry(key).or_default().push(&record.vector);
    }

    /// Number of (satellite, lag) groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if no record was accumulated.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Samples of this group, if any.
    pub fn get(&self, key: &LagKey) -> Option<&Samples> {
        self.groups.get(key)
    }

    /// Runs the [OutlierFilter] once over every channel of every group.
    pub fn filter(self, filter: &OutlierFilter) -> FilteredSamples {
        let mut groups = self.groups;
        let rejected = groups.values_mut().map(|samples| samples.filter(filter)).sum();
        FilteredSamples { groups, rejected }
    }
}

impl std::iter::FromIterator<DiffRecord> for GroupedSamples {
    fn from_iter<I: IntoIterator<Item = DiffRecord>>(iter: I) -> Self {
        let mut grouped = Self::default();
        for record in iter {
            grouped.push(&record);
        }
        grouped
    }
}

/// [GroupedSamples] after outlier rejection.
#[derive(Debug, Clone, Default)]
pub struct FilteredSamples {
    groups: BTreeMap<LagKey, Samples>,
    /// Total number of rejected samples, all channels combined
    pub rejected: usize,
}

impl FilteredSamples {
    /// Mean of every group, in (satellite, lag) order.
    /// Groups with at least one emptied channel are returned separately.
    pub fn means(&self) -> (Vec<(LagKey, CorrectionVector)>, Vec<LagKey>) {
        let mut rows = Vec::with_capacity(self.groups.len());
        let mut dropped = Vec::new();

        for (key, samples) in self.groups.iter() {
            match complete(samples.means()) {
                Some(mean) => rows.push((*key, mean)),
                None => {
                    warn!("{} - channel emptied by outlier rejection, group dropped", key);
                    dropped.push(*key);
                },
            }
        }

        (rows, dropped)
    }

    /// Pools the surviving samples of all satellites per lag.
    pub fn pool_by_lag(&self) -> BTreeMap<u32, Samples> {
        let mut pool = BTreeMap::<u32, Samples>::new();
        for (key, samples) in self.groups.iter() {
            let pooled = pool.entry(key.lag).or_default();
            for channel in Channel::iter() {
                pooled.extend(channel, samples.channel(channel));
            }
        }
        pool
    }
}

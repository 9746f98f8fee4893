//! Robust outlier rejection, based on the modified z-score
//! `0.6745 * |x - median| / MAD`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scale factor of the modified z-score
pub const MODIFIED_Z_SCALE: f64 = 0.6745;

/// Samples with a modified z-score above this value are rejected
pub const DEFAULT_THRESHOLD: f64 = 3.5;

/// How the central value of a sorted sample set is determined.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MedianPolicy {
    /// Historical formula, kept for compatibility with existing result sets:
    /// odd counts sum the two order statistics `s[(n-2)/2]` and `s[n/2]`,
    /// even counts pick `s[n/2]`.
    Legacy,
    /// Textbook median: middle element, or the average of both middle elements.
    Midpoint,
}

impl Default for MedianPolicy {
    fn default() -> Self {
        Self::Legacy
    }
}

impl MedianPolicy {
    /// Central value of `sorted` (ascending) samples. None when empty.
    pub fn median(&self, sorted: &[f64]) -> Option<f64> {
        let n = sorted.len();
        if n == 0 {
            return None;
        }

        let value = match self {
            Self::Legacy => {
                if n % 2 == 1 {
                    // signed division: n = 1 selects s[0] twice
                    let lower = ((n as isize - 2) / 2) as usize;
                    sorted[lower] + sorted[n / 2]
                } else {
                    sorted[n / 2]
                }
            },
            Self::Midpoint => {
                if n % 2 == 1 {
                    sorted[n / 2]
                } else {
                    (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
                }
            },
        };

        Some(value)
    }
}

/// [OutlierFilter] removes statistically aberrant samples using
/// the median absolute deviation.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutlierFilter {
    /// [MedianPolicy] used for both the median and the MAD
    pub policy: MedianPolicy,
    /// Rejection threshold (strictly greater is rejected)
    pub threshold: f64,
}

impl Default for OutlierFilter {
    /// Legacy median and 3.5 rejection threshold.
    fn default() -> Self {
        Self {
            policy: MedianPolicy::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl OutlierFilter {
    /// Returns a new [OutlierFilter] with desired [MedianPolicy].
    pub fn with_policy(&self, policy: MedianPolicy) -> Self {
        let mut s = *self;
        s.policy = policy;
        s
    }

    /// Returns a new [OutlierFilter] with desired rejection threshold.
    pub fn with_threshold(&self, threshold: f64) -> Self {
        let mut s = *self;
        s.threshold = threshold;
        s
    }

    /// Returns (median, MAD) of these samples. None when empty.
    pub fn median_mad(&self, samples: &[f64]) -> Option<(f64, f64)> {
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let median = self.policy.median(&sorted)?;

        for value in sorted.iter_mut() {
            *value = (*value - median).abs();
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mad = self.policy.median(&sorted)?;
        Some((median, mad))
    }

    /// Modified z-score of each sample, in encounter order.
    /// A zero MAD produces non-finite scores.
    pub fn scores(&self, samples: &[f64]) -> Vec<f64> {
        match self.median_mad(samples) {
            Some((median, mad)) => samples
                .iter()
                .map(|x| MODIFIED_Z_SCALE * (x - median).abs() / mad)
                .collect(),
            None => Vec::new(),
        }
    }

    fn is_outlier(&self, score: f64) -> bool {
        !score.is_finite() || score > self.threshold
    }

    /// Removes outliers in place. Survivors keep their encounter order.
    /// Returns the number of removed samples. Empty input is left untouched.
    pub fn filter(&self, samples: &mut Vec<f64>) -> usize {
        let (median, mad) = match self.median_mad(samples) {
            Some(stats) => stats,
            None => return 0,
        };

        let size = samples.len();
        samples.retain(|x| !self.is_outlier(MODIFIED_Z_SCALE * (x - median).abs() / mad));
        size - samples.len()
    }

    /// Returns the samples that survive this [OutlierFilter].
    pub fn filtered(&self, samples: &[f64]) -> Vec<f64> {
        let mut survivors = samples.to_vec();
        self.filter(&mut survivors);
        survivors
    }
}

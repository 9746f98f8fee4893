//! Correction vectors and the records built around them
use crate::{
    calendar::parse_epoch,
    errors::ParsingError,
    prelude::{Epoch, SV},
};

use scan_fmt::scan_fmt;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use std::{
    ops::{Index, IndexMut},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of fields in a raw comparison record
const COMPARISON_FIELDS: usize = 15;

/// Number of fields in a difference (or daily summary) record
const DIFFERENCE_FIELDS: usize = 6;

/// One scalar [Channel] of a [CorrectionVector].
/// Channels are always processed independently.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Channel {
    /// Radial
    #[strum(serialize = "dr")]
    Radial,
    /// Along track
    #[strum(serialize = "dt")]
    AlongTrack,
    /// Cross track
    #[strum(serialize = "dn")]
    CrossTrack,
    /// Clock
    #[strum(serialize = "dclk")]
    Clock,
}

impl Channel {
    /// Position of this [Channel] inside a [CorrectionVector].
    pub const fn index(&self) -> usize {
        match self {
            Self::Radial => 0,
            Self::AlongTrack => 1,
            Self::CrossTrack => 2,
            Self::Clock => 3,
        }
    }
}

/// Radial, along track, cross track and clock components.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CorrectionVector(pub [f64; 4]);

impl CorrectionVector {
    /// Componentwise absolute difference.
    pub fn abs_diff(&self, rhs: &Self) -> Self {
        let mut diff = Self::default();
        for channel in Channel::iter() {
            diff[channel] = (self[channel] - rhs[channel]).abs();
        }
        diff
    }
}

impl Index<Channel> for CorrectionVector {
    type Output = f64;
    fn index(&self, channel: Channel) -> &f64 {
        &self.0[channel.index()]
    }
}

impl IndexMut<Channel> for CorrectionVector {
    fn index_mut(&mut self, channel: Channel) -> &mut f64 {
        &mut self.0[channel.index()]
    }
}

fn parse_value(field: &str) -> Result<f64, ParsingError> {
    let value = field
        .parse::<f64>()
        .or(Err(ParsingError::Value(field.to_string())))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParsingError::Value(field.to_string()))
    }
}

fn parse_satellite(field: &str) -> Result<SV, ParsingError> {
    SV::from_str(field).or(Err(ParsingError::Satellite(field.to_string())))
}

/// [CorrectionRecord] is one satellite entry of a comparison file.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CorrectionRecord {
    /// Satellite
    pub sv: SV,
    /// Correction differences
    pub vector: CorrectionVector,
}

impl CorrectionRecord {
    /// Parses one comparison line:
    /// `Y M D h m s SV _ dr dt dn _ _ _ dclk`.
    /// Returns the sampling [Epoch] alongside the record.
    pub fn parse(line: &str) -> Result<(Epoch, Self), ParsingError> {
        let fields: Vec<&str> = line.split_ascii_whitespace().collect();
        if fields.len() < COMPARISON_FIELDS {
            return Err(ParsingError::FieldCount {
                expected: COMPARISON_FIELDS,
                found: fields.len(),
            });
        }

        let epoch = parse_epoch(&fields[..6])?;
        let sv = parse_satellite(fields[6])?;

        let mut vector = CorrectionVector::default();
        vector[Channel::Radial] = parse_value(fields[8])?;
        vector[Channel::AlongTrack] = parse_value(fields[9])?;
        vector[Channel::CrossTrack] = parse_value(fields[10])?;
        vector[Channel::Clock] = parse_value(fields[14])?;

        Ok((epoch, Self { sv, vector }))
    }
}

/// [DiffRecord] is one `(sv, lag)` entry: either an absolute difference
/// emitted by the differencer, or a per-day mean read back from a daily summary.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffRecord {
    /// Satellite
    pub sv: SV,
    /// Seconds since the reference window start
    pub lag: u32,
    /// Channel values
    pub vector: CorrectionVector,
}

impl FromStr for DiffRecord {
    type Err = ParsingError;
    /// Parses `SV lag dr dt dn dclk`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split_ascii_whitespace().collect();
        if fields.len() != DIFFERENCE_FIELDS {
            return Err(ParsingError::FieldCount {
                expected: DIFFERENCE_FIELDS,
                found: fields.len(),
            });
        }

        let (sv, lag, dr, dt, dn, dclk) =
            scan_fmt!(line.trim(), "{} {d} {} {} {} {}", String, u32, f64, f64, f64, f64);

        let sv = sv.ok_or(ParsingError::Satellite(fields[0].to_string()))?;
        let sv = parse_satellite(&sv)?;
        let lag = lag.ok_or(ParsingError::Lag(fields[1].to_string()))?;

        let mut vector = CorrectionVector::default();
        let values = [dr, dt, dn, dclk];

        for (channel, (value, field)) in Channel::iter().zip(values.iter().zip(&fields[2..])) {
            match value {
                Some(value) if value.is_finite() => vector[channel] = *value,
                _ => return Err(ParsingError::Value(field.to_string())),
            }
        }

        Ok(Self { sv, lag, vector })
    }
}

impl std::fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.sv,
            self.lag,
            self.vector[Channel::Radial],
            self.vector[Channel::AlongTrack],
            self.vector[Channel::CrossTrack],
            self.vector[Channel::Clock],
        )
    }
}

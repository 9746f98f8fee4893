//! Calendar helpers: date parsing, day iteration and day of year
use crate::{
    errors::ParsingError,
    prelude::{Epoch, Unit},
};

/// One calendar [Day] of the processed range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Day {
    /// Midnight (UTC) of that day
    pub epoch: Epoch,
    /// Gregorian year
    pub year: i32,
    /// Month (1-12)
    pub month: u8,
    /// Day of month (1-31)
    pub day: u8,
    /// Day of year, starting at 1 on January 1st
    pub doy: u16,
}

impl Day {
    /// Builds the [Day] that contains this [Epoch].
    pub fn from_epoch(t: Epoch) -> Self {
        let (year, month, day, _, _, _, _) = t.to_gregorian_utc();
        Self {
            year,
            month,
            day,
            doy: day_of_year(t),
            epoch: Epoch::from_gregorian_utc_at_midnight(year, month, day),
        }
    }

    /// Two digit year, as used in comparison file names.
    pub fn short_year(&self) -> u8 {
        self.year.rem_euclid(100) as u8
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Returns the day of year of this [Epoch], January 1st being day 1.
pub fn day_of_year(t: Epoch) -> u16 {
    let (year, _, _, _, _, _, _) = t.to_gregorian_utc();
    let jan1 = Epoch::from_gregorian_utc_at_midnight(year, 1, 1);
    (t - jan1).to_unit(Unit::Day).floor() as u16 + 1
}

/// Whole seconds elapsed from `earlier` to `later`, truncated toward zero.
pub fn seconds_between(later: Epoch, earlier: Epoch) -> i64 {
    (later - earlier).to_seconds().trunc() as i64
}

/// Iterates over every [Day] from `start` to `end`, both included.
/// Yields nothing when `end` precedes `start`.
pub fn days(start: Epoch, end: Epoch) -> impl Iterator<Item = Day> {
    let first = start.to_mjd_utc_days().floor() as i64;
    let last = end.to_mjd_utc_days().floor() as i64;
    (first..=last).map(|mjd| Day::from_epoch(Epoch::from_mjd_utc(mjd as f64)))
}

/// Parses a `YYYYMMDD` date into an [Epoch] at midnight UTC.
pub fn parse_date(s: &str) -> Result<Epoch, ParsingError> {
    let s = s.trim();
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParsingError::Date(s.to_string()));
    }

    let year = s[0..4]
        .parse::<i32>()
        .or(Err(ParsingError::Date(s.to_string())))?;
    let month = s[4..6]
        .parse::<u8>()
        .or(Err(ParsingError::Date(s.to_string())))?;
    let day = s[6..8]
        .parse::<u8>()
        .or(Err(ParsingError::Date(s.to_string())))?;

    Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0)
        .or(Err(ParsingError::Date(s.to_string())))
}

/// Builds an [Epoch] from the six leading fields of a comparison record:
/// year, month, day, hours, minutes and (possibly fractional) seconds.
pub(crate) fn parse_epoch(fields: &[&str]) -> Result<Epoch, ParsingError> {
    if fields.len() < 6 {
        return Err(ParsingError::Epoch);
    }

    let mut items = [0.0_f64; 6];
    for (item, field) in items.iter_mut().zip(fields.iter()) {
        *item = field.parse::<f64>().or(Err(ParsingError::Epoch))?;
        if !item.is_finite() || *item < 0.0 {
            return Err(ParsingError::Epoch);
        }
    }

    for item in items[..5].iter() {
        if item.fract() != 0.0 {
            return Err(ParsingError::Epoch);
        }
    }

    let total_nanos = (items[5] * 1.0E9).round() as u64;
    let seconds = total_nanos / 1_000_000_000;
    let nanos = (total_nanos % 1_000_000_000) as u32;

    if items[1] > 12.0 || items[2] > 31.0 || items[3] > 23.0 || items[4] > 59.0 || seconds > 60
    {
        return Err(ParsingError::Epoch);
    }

    Epoch::maybe_from_gregorian_utc(
        items[0] as i32,
        items[1] as u8,
        items[2] as u8,
        items[3] as u8,
        items[4] as u8,
        seconds as u8,
        nanos,
    )
    .or(Err(ParsingError::Epoch))
}

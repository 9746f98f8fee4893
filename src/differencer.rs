//! Per-day differencing against rolling reference windows
use crate::{
    calendar::seconds_between,
    prelude::{CorrectionRecord, DiffRecord, Epoch, SV},
};

use log::debug;

/// [Differencer] state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    /// No record seen yet
    AwaitingFirst,
    /// A reference window is open and its records are buffered
    WithinWindow,
}

/// Outcome of feeding one record to the [Differencer].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// First record of the stream: opened the first window.
    Seeded,
    /// Same instant as the window start: buffered as a reference.
    Buffered,
    /// Exactly one interval after the window start: opened a new window.
    NewWindow,
    /// Intermediate lag with a matching reference.
    Difference(DiffRecord),
    /// Intermediate lag without a buffered reference for that satellite.
    Unmatched { sv: SV, lag: u32 },
    /// Out of order or beyond the interval: opened a new window.
    Resync { period: i64 },
}

/// [Differencer] compares each record against the reference record of the same
/// satellite, sampled at the start of the ongoing reference window.
/// Records must be provided in chronological order.
#[derive(Debug, Clone)]
pub struct Differencer {
    /// Sampling interval (s): one reference window
    interval: u32,
    /// Start of the ongoing reference window
    window_start: Option<Epoch>,
    /// References sampled at `window_start`
    buffer: Vec<CorrectionRecord>,
}

impl Differencer {
    /// Creates a new [Differencer] for this reference window duration, in seconds.
    pub fn new(interval: u32) -> Self {
        Self {
            interval,
            window_start: None,
            buffer: Vec::with_capacity(32),
        }
    }

    /// Current [State].
    pub fn state(&self) -> State {
        if self.window_start.is_some() {
            State::WithinWindow
        } else {
            State::AwaitingFirst
        }
    }

    /// Manual reset, for example before processing another day.
    pub fn reset(&mut self) {
        self.window_start = None;
        self.buffer.clear();
    }

    fn open_window(&mut self, t: Epoch, record: CorrectionRecord) {
        self.buffer.clear();
        self.buffer.push(record);
        self.window_start = Some(t);
    }

    /// Feed a new [CorrectionRecord] sampled at `t`.
    pub fn push(&mut self, t: Epoch, record: CorrectionRecord) -> Step {
        let window_start = match self.window_start {
            Some(t0) => t0,
            None => {
                self.open_window(t, record);
                return Step::Seeded;
            },
        };

        let period = seconds_between(t, window_start);

        if period == 0 {
            self.buffer.push(record);
            Step::Buffered
        } else if period == self.interval as i64 {
            self.open_window(t, record);
            Step::NewWindow
        } else if period < 0 || period > self.interval as i64 {
            debug!("{}({}) - resync after {}s", t, record.sv, period);
            self.open_window(t, record);
            Step::Resync { period }
        } else {
            let lag = period as u32;
            match self.buffer.iter().find(|reference| reference.sv == record.sv) {
                Some(reference) => Step::Difference(DiffRecord {
                    sv: record.sv,
                    lag,
                    vector: record.vector.abs_diff(&reference.vector),
                }),
                None => {
                    debug!("{}({}) - no reference", t, record.sv);
                    Step::Unmatched { sv: record.sv, lag }
                },
            }
        }
    }
}

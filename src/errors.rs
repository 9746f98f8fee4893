use thiserror::Error;

/// Errors raised while parsing one text record (or one CLI date/system tag).
/// A record that fails to parse is never partially returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParsingError {
    #[error("expecting {expected} fields, got {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid epoch")]
    Epoch,
    #[error("invalid satellite identifier \"{0}\"")]
    Satellite(String),
    #[error("invalid lag \"{0}\"")]
    Lag(String),
    #[error("invalid correction value \"{0}\"")]
    Value(String),
    #[error("invalid date \"{0}\": expecting YYYYMMDD")]
    Date(String),
    #[error("unknown constellation \"{0}\"")]
    System(String),
}

/// Invalid [Config](crate::prelude::Config) setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sampling interval must be at least 1 second")]
    Interval,
    #[error("end date precedes start date")]
    DateRange,
}

/// Errors raised by the processing pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing error: {0}")]
    Parsing(#[from] ParsingError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

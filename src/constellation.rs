//! Constellation tags used to name files and select processing passes
use crate::{errors::ParsingError, prelude::Constellation};

use strum::IntoEnumIterator;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// GNSS [System] tag, as it appears in file names.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum System {
    /// GPS
    GPS,
    /// BeiDou
    BDS,
    /// Galileo
    GAL,
    /// Glonass
    GLO,
}

impl System {
    /// Returns the [Constellation] this tag stands for.
    pub fn constellation(&self) -> Constellation {
        match self {
            Self::GPS => Constellation::GPS,
            Self::BDS => Constellation::BeiDou,
            Self::GAL => Constellation::Galileo,
            Self::GLO => Constellation::Glonass,
        }
    }
}

/// [Systems] selects which constellations are processed.
/// Each selected [System] is an independent pass over the date range.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Systems {
    /// All supported constellations
    All,
    /// One specific constellation
    Single(System),
}

impl Default for Systems {
    fn default() -> Self {
        Self::All
    }
}

impl Systems {
    /// Returns the selected [System]s, in processing order.
    pub fn systems(&self) -> Vec<System> {
        match self {
            Self::All => System::iter().collect(),
            Self::Single(system) => vec![*system],
        }
    }
}

impl FromStr for Systems {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ALL") {
            Ok(Self::All)
        } else {
            let system = System::from_str(&s.to_ascii_uppercase())
                .or(Err(ParsingError::System(s.to_string())))?;
            Ok(Self::Single(system))
        }
    }
}

impl std::fmt::Display for Systems {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::All => fmt.write_str("ALL"),
            Self::Single(system) => write!(fmt, "{}", system),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{System, Systems};
    use crate::prelude::Constellation;
    use std::str::FromStr;

    #[test]
    fn from_str() {
        assert_eq!(Systems::from_str("ALL").unwrap(), Systems::All);
        assert_eq!(Systems::from_str("all").unwrap(), Systems::All);
        assert_eq!(
            Systems::from_str("GPS").unwrap(),
            Systems::Single(System::GPS)
        );
        assert_eq!(
            Systems::from_str("glo").unwrap(),
            Systems::Single(System::GLO)
        );
        assert!(Systems::from_str("QZS").is_err());
    }

    #[test]
    fn processing_order() {
        assert_eq!(
            Systems::All.systems(),
            vec![System::GPS, System::BDS, System::GAL, System::GLO]
        );
        assert_eq!(Systems::Single(System::GAL).systems(), vec![System::GAL]);
    }

    #[test]
    fn constellations() {
        assert_eq!(System::BDS.constellation(), Constellation::BeiDou);
        assert_eq!(System::GLO.constellation(), Constellation::Glonass);
        assert_eq!(System::GAL.to_string(), "GAL");
    }
}

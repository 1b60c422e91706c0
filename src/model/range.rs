use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Analytics window selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    /// Today only
    #[serde(rename = "1D")]
    Day,
    /// Today and the 6 days before
    #[default]
    #[serde(rename = "7D")]
    Week,
    /// Today and the 29 days before
    #[serde(rename = "30D")]
    Month,
    /// Earliest recorded completion through today
    #[serde(rename = "ALL")]
    All,
}

impl TimeRange {
    pub const ALL_RANGES: [TimeRange; 4] = [
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Day => "1D",
            TimeRange::Week => "7D",
            TimeRange::Month => "30D",
            TimeRange::All => "ALL",
        }
    }

    /// Number of days in a fixed-length window; `None` for `ALL`
    pub fn fixed_days(self) -> Option<u32> {
        match self {
            TimeRange::Day => Some(1),
            TimeRange::Week => Some(7),
            TimeRange::Month => Some(30),
            TimeRange::All => None,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown range '{0}' (expected 1D, 7D, 30D or ALL)")]
pub struct ParseRangeError(String);

impl FromStr for TimeRange {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1D" => Ok(TimeRange::Day),
            "7D" => Ok(TimeRange::Week),
            "30D" => Ok(TimeRange::Month),
            "ALL" | "ALL-TIME" => Ok(TimeRange::All),
            _ => Err(ParseRangeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("7d".parse::<TimeRange>(), Ok(TimeRange::Week));
        assert_eq!("30D".parse::<TimeRange>(), Ok(TimeRange::Month));
        assert_eq!("all".parse::<TimeRange>(), Ok(TimeRange::All));
        assert_eq!("All-Time".parse::<TimeRange>(), Ok(TimeRange::All));
        assert!("2W".parse::<TimeRange>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for range in TimeRange::ALL_RANGES {
            assert_eq!(range.to_string().parse::<TimeRange>(), Ok(range));
        }
    }

    #[test]
    fn serde_uses_labels() {
        assert_eq!(serde_json::to_string(&TimeRange::Month).unwrap(), r#""30D""#);
        let r: TimeRange = serde_json::from_str(r#""1D""#).unwrap();
        assert_eq!(r, TimeRange::Day);
    }

    #[test]
    fn default_is_week() {
        assert_eq!(TimeRange::default(), TimeRange::Week);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// OHLCV bucket size.
///
/// Spec §9 Open Questions flags that the interval whitelist is inconsistent
/// across the original configs (`1h` vs `1H`, `1d` vs `1D`). We pick the
/// casing from §6's canonical table (`5m, 30m, 1h, 4h, 1d, 1w, 1M`) and
/// validate every input against exactly this set; `1M` (month) is
/// deliberately capitalized to stay distinguishable from minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    FiveMinutes,
    ThirtyMinutes,
    OneHour,
    FourHours,
    OneDay,
    OneWeek,
    OneMonth,
}

impl Interval {
    pub const ALL: [Interval; 7] = [
        Interval::FiveMinutes,
        Interval::ThirtyMinutes,
        Interval::OneHour,
        Interval::FourHours,
        Interval::OneDay,
        Interval::OneWeek,
        Interval::OneMonth,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Interval::FiveMinutes => "5m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1w",
            Interval::OneMonth => "1M",
        }
    }

    /// Cache TTL, chosen strictly greater than the worst-case time between
    /// caching the last PE of a pair and its compute task running (§4.4).
    pub const fn cache_ttl(self) -> Duration {
        let secs = match self {
            Interval::FiveMinutes => 300,
            Interval::ThirtyMinutes => 1_800,
            Interval::OneHour => 3_600,
            Interval::FourHours => 14_400,
            Interval::OneDay => 86_400,
            Interval::OneWeek => 604_800,
            Interval::OneMonth => 604_800,
        };
        Duration::from_secs(secs)
    }

    pub const fn display_label(self) -> &'static str {
        match self {
            Interval::FiveMinutes => "5 minutes",
            Interval::ThirtyMinutes => "30 minutes",
            Interval::OneHour => "Hourly",
            Interval::FourHours => "4 Hours",
            Interval::OneDay => "Daily",
            Interval::OneWeek => "Weekly",
            Interval::OneMonth => "Monthly",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported interval `{0}`, expected one of 5m, 30m, 1h, 4h, 1d, 1w, 1M")]
pub struct UnknownInterval(pub String);

impl FromStr for Interval {
    type Err = UnknownInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| UnknownInterval(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn canonical_casing_round_trips() {
        for interval in Interval::ALL {
            assert_eq!(Interval::from_str(interval.as_str()).unwrap(), interval);
        }
    }

    // Spec §9 Open Questions: the interval whitelist was inconsistent
    // across the original configs (`1h` vs `1H`, `1d` vs `1D`). We picked
    // the §6 casing as canonical and reject every alternate spelling.
    #[test_case("1H"; "uppercase hour")]
    #[test_case("1D"; "uppercase day")]
    #[test_case("1m"; "lowercase month collides with minutes")]
    #[test_case("1W"; "uppercase week")]
    #[test_case("5M"; "five months is not a supported bucket")]
    fn rejects_alternate_casing(raw: &str) {
        assert!(Interval::from_str(raw).is_err(), "{raw} should not parse");
    }
}

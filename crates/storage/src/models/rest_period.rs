use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rest between sets, stored as whole seconds.
///
/// Serialized as `HH:MM:SS` (prefixed with `D ` once it spans days). Accepts
/// that form, ISO 8601 durations such as `PT2M`, or a bare number of seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct RestPeriod(i32);

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRestPeriodError(String);

impl fmt::Display for ParseRestPeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid rest period '{}'", self.0)
    }
}

impl std::error::Error for ParseRestPeriodError {}

impl RestPeriod {
    pub fn from_seconds(seconds: i64) -> Option<Self> {
        i32::try_from(seconds).ok().filter(|s| *s >= 0).map(Self)
    }

    pub fn seconds(&self) -> i32 {
        self.0
    }

    pub fn parse(input: &str) -> Result<Self, ParseRestPeriodError> {
        let trimmed = input.trim();
        let invalid = || ParseRestPeriodError(input.to_string());

        let seconds = if let Some(iso) = trimmed.strip_prefix('P') {
            parse_iso8601(iso).ok_or_else(invalid)?
        } else {
            parse_clock(trimmed).ok_or_else(invalid)?
        };

        Self::from_seconds(seconds).ok_or_else(invalid)
    }
}

/// `[D ][[HH:]MM:]SS[.ffffff]`; fractional seconds are truncated.
fn parse_clock(input: &str) -> Option<i64> {
    if input.is_empty() {
        return None;
    }

    let (days, clock) = match input.split_once(' ') {
        Some((days, clock)) => (days.trim().parse::<i64>().ok()?, clock.trim()),
        None => (0, input),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let last = parts.last()?;
    let whole_seconds = match last.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c.is_ascii_digit()) => whole,
        Some(_) => return None,
        None => last,
    };
    let mut total = parse_component(whole_seconds)?;
    let mut unit = SECONDS_PER_MINUTE;
    for part in parts.iter().rev().skip(1) {
        total = total.checked_add(parse_component(part)?.checked_mul(unit)?)?;
        unit *= 60;
    }

    total.checked_add(days.checked_mul(SECONDS_PER_DAY)?)
}

/// Body of an ISO 8601 duration after the leading `P`, e.g. `T1H30M` or `1DT2M`.
fn parse_iso8601(input: &str) -> Option<i64> {
    let (date_part, time_part) = match input.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (input, None),
    };

    let mut total = 0i64;
    let mut seen_component = false;

    for (value, designator) in iso_components(date_part)? {
        let unit = match designator {
            'W' => 7 * SECONDS_PER_DAY,
            'D' => SECONDS_PER_DAY,
            _ => return None,
        };
        total = total.checked_add(value.checked_mul(unit)?)?;
        seen_component = true;
    }

    if let Some(time_part) = time_part {
        let components = iso_components(time_part)?;
        if components.is_empty() {
            return None;
        }
        for (value, designator) in components {
            let unit = match designator {
                'H' => SECONDS_PER_HOUR,
                'M' => SECONDS_PER_MINUTE,
                'S' => 1,
                _ => return None,
            };
            total = total.checked_add(value.checked_mul(unit)?)?;
            seen_component = true;
        }
    }

    seen_component.then_some(total)
}

fn iso_components(input: &str) -> Option<Vec<(i64, char)>> {
    let mut components = Vec::new();
    let mut digits = String::new();

    for c in input.chars() {
        if c.is_ascii_digit() || c == '.' {
            digits.push(c);
        } else {
            let whole = digits.split('.').next().unwrap_or_default();
            components.push((parse_component(whole)?, c));
            digits.clear();
        }
    }

    digits.is_empty().then_some(components)
}

fn parse_component(part: &str) -> Option<i64> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for RestPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = i64::from(self.0);
        let days = total / SECONDS_PER_DAY;
        let hours = (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
        let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        let seconds = total % SECONDS_PER_MINUTE;

        if days > 0 {
            write!(f, "{} {:02}:{:02}:{:02}", days, hours, minutes, seconds)
        } else {
            write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
        }
    }
}

impl std::str::FromStr for RestPeriod {
    type Err = ParseRestPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RestPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RestPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RestPeriodVisitor;

        impl Visitor<'_> for RestPeriodVisitor {
            type Value = RestPeriod;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a duration such as \"00:02:00\", \"PT2M\" or a number of seconds")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RestPeriod, E> {
                RestPeriod::parse(v).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RestPeriod, E> {
                RestPeriod::from_seconds(v)
                    .ok_or_else(|| E::custom(format!("rest period out of range: {}", v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RestPeriod, E> {
                let seconds = i64::try_from(v).map_err(E::custom)?;
                self.visit_i64(seconds)
            }
        }

        deserializer.deserialize_any(RestPeriodVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso8601_minutes() {
        assert_eq!(RestPeriod::parse("PT2M").unwrap().seconds(), 120);
        assert_eq!(RestPeriod::parse("PT1H30M15S").unwrap().seconds(), 5415);
        assert_eq!(RestPeriod::parse("P1DT1S").unwrap().seconds(), 86_401);
    }

    #[test]
    fn test_parse_clock_forms() {
        assert_eq!(RestPeriod::parse("00:02:00").unwrap().seconds(), 120);
        assert_eq!(RestPeriod::parse("1:30").unwrap().seconds(), 90);
        assert_eq!(RestPeriod::parse("45").unwrap().seconds(), 45);
        assert_eq!(RestPeriod::parse("90.5").unwrap().seconds(), 90);
        assert_eq!(RestPeriod::parse("1 00:00:10").unwrap().seconds(), 86_410);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(RestPeriod::parse("").is_err());
        assert!(RestPeriod::parse("PT").is_err());
        assert!(RestPeriod::parse("P").is_err());
        assert!(RestPeriod::parse("two minutes").is_err());
        assert!(RestPeriod::parse("-5").is_err());
        assert!(RestPeriod::parse("PT5X").is_err());
        assert!(RestPeriod::parse("1:2:3:4").is_err());
    }

    #[test]
    fn test_display_matches_clock_format() {
        assert_eq!(RestPeriod::from_seconds(120).unwrap().to_string(), "00:02:00");
        assert_eq!(RestPeriod::from_seconds(3725).unwrap().to_string(), "01:02:05");
        assert_eq!(RestPeriod::from_seconds(90_000).unwrap().to_string(), "1 01:00:00");
    }

    #[test]
    fn test_serde_accepts_strings_and_numbers() {
        let from_iso: RestPeriod = serde_json::from_str("\"PT2M\"").unwrap();
        let from_number: RestPeriod = serde_json::from_str("120").unwrap();
        assert_eq!(from_iso, from_number);
        assert_eq!(serde_json::to_string(&from_iso).unwrap(), "\"00:02:00\"");
        assert!(serde_json::from_str::<RestPeriod>("-1").is_err());
    }
}

//! Distance and duration normalization.
//!
//! Distances are enumerative: a phrase may carry several independent
//! distances and each one is returned, converted to meters. Durations are
//! additive: every hour/minute/second component in the phrase is summed into
//! a single value in seconds.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{DurationParseError, UnitParseError};

const NUMBER: &str = r"(?P<value>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|\.\d+)";

lazy_static! {
    static ref DISTANCE_REGEX: Regex = Regex::new(&format!(
        r#"(?i){NUMBER}\s*(?P<unit>nautical\s+miles?|nmi|kilomet(?:er|re)s?|kms?|met(?:er|re)s?|miles?|mi|m|yards?|yds?|feet|foot|ft|inch(?:es)?|in|'|′|"|″)"#
    ))
    .unwrap();
    static ref DURATION_REGEX: Regex = Regex::new(&format!(
        r"(?i){NUMBER}\s*(?P<unit>hours?|hrs?|h|minutes?|mins?|seconds?|secs?|s)"
    ))
    .unwrap();
    static ref CLOCK_REGEX: Regex =
        Regex::new(r"\b(?P<h>\d+):(?P<m>\d{1,2})(?::(?P<s>\d{1,2}))?\b").unwrap();
    static ref BARE_NUMBER_REGEX: Regex = Regex::new(&format!(r"^\s*{NUMBER}\s*$")).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceUnit {
    Meter,
    Kilometer,
    Mile,
    NauticalMile,
    Yard,
    Foot,
    Inch,
}

impl DistanceUnit {
    /// Resolve a unit token ("km", "feet", "′", ...) to its unit family.
    pub fn from_token(token: &str) -> Option<Self> {
        let lower = token.to_lowercase();
        let normalized = lower.split_whitespace().collect::<Vec<_>>().join(" ");
        let unit = match normalized.as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => DistanceUnit::Meter,
            "km" | "kms" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
                DistanceUnit::Kilometer
            }
            "mi" | "mile" | "miles" => DistanceUnit::Mile,
            "nmi" | "nautical mile" | "nautical miles" => DistanceUnit::NauticalMile,
            "yd" | "yds" | "yard" | "yards" => DistanceUnit::Yard,
            "ft" | "foot" | "feet" | "'" | "′" => DistanceUnit::Foot,
            "in" | "inch" | "inches" | "\"" | "″" => DistanceUnit::Inch,
            _ => return None,
        };
        Some(unit)
    }

    pub fn meters_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Meter => 1.0,
            DistanceUnit::Kilometer => 1000.0,
            DistanceUnit::Mile => 1609.34,
            DistanceUnit::NauticalMile => 1852.0,
            DistanceUnit::Yard => 0.9144,
            DistanceUnit::Foot => 0.3048,
            DistanceUnit::Inch => 0.0254,
        }
    }

    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationUnit {
    Hour,
    Minute,
    Second,
}

impl DurationUnit {
    pub fn from_token(token: &str) -> Option<Self> {
        let unit = match token.to_lowercase().as_str() {
            "h" | "hr" | "hrs" | "hour" | "hours" => DurationUnit::Hour,
            "min" | "mins" | "minute" | "minutes" => DurationUnit::Minute,
            "s" | "sec" | "secs" | "second" | "seconds" => DurationUnit::Second,
            _ => return None,
        };
        Some(unit)
    }

    pub fn seconds_per_unit(self) -> f64 {
        match self {
            DurationUnit::Hour => 3600.0,
            DurationUnit::Minute => 60.0,
            DurationUnit::Second => 1.0,
        }
    }
}

/// Every distance in `text`, left to right, converted to meters.
pub fn parse_distance(text: &str) -> Result<Vec<f64>, UnitParseError> {
    let distances: Vec<f64> = unit_matches(&DISTANCE_REGEX, text)
        .filter_map(|caps| {
            let value = parse_number(&caps["value"])?;
            let unit = DistanceUnit::from_token(&caps["unit"])?;
            Some(unit.to_meters(value))
        })
        .collect();

    if distances.is_empty() {
        return Err(UnitParseError {
            input: text.to_string(),
        });
    }
    Ok(distances)
}

/// A single duration in seconds.
///
/// Unit-tagged components are summed; failing that the text is read as an
/// `H:M[:S]` clock value, and failing that as a bare number of minutes.
pub fn parse_duration(text: &str) -> Result<f64, DurationParseError> {
    let mut matched = false;
    let mut total = 0.0;
    for caps in unit_matches(&DURATION_REGEX, text) {
        let (Some(value), Some(unit)) = (
            parse_number(&caps["value"]),
            DurationUnit::from_token(&caps["unit"]),
        ) else {
            continue;
        };
        matched = true;
        total += value * unit.seconds_per_unit();
    }
    if matched {
        return Ok(total);
    }

    if let Some(seconds) = parse_clock(text) {
        return Ok(seconds);
    }

    if let Some(caps) = BARE_NUMBER_REGEX.captures(text) {
        if let Some(minutes) = parse_number(&caps["value"]) {
            return Ok(minutes * 60.0);
        }
    }

    Err(DurationParseError {
        input: text.to_string(),
    })
}

/// Matches whose unit token is not immediately followed by a letter, so that
/// "100mi" is never read as "100m" + "i".
fn unit_matches<'t>(regex: &'t Regex, text: &'t str) -> impl Iterator<Item = Captures<'t>> + 't {
    regex.captures_iter(text).filter(move |caps| {
        let end = caps.get(0).map_or(0, |m| m.end());
        text[end..]
            .chars()
            .next()
            .map_or(true, |next| !next.is_alphabetic())
    })
}

fn parse_clock(text: &str) -> Option<f64> {
    let caps = CLOCK_REGEX.captures(text)?;
    let hours: f64 = caps["h"].parse().ok()?;
    let minutes: f64 = caps["m"].parse().ok()?;
    let seconds: f64 = match caps.name("s") {
        Some(s) => s.as_str().parse().ok()?,
        None => 0.0,
    };
    if minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

fn parse_number(literal: &str) -> Option<f64> {
    literal.replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn meters_are_not_confused_with_miles() {
        assert_close(parse_distance("100m").unwrap()[0], 100.0);
        assert_close(parse_distance("100mi").unwrap()[0], 160934.0);
    }

    #[test]
    fn meter_token_inside_a_word_is_rejected() {
        assert!(parse_distance("10 minutes").is_err());
        assert!(parse_distance("5 mangoes").is_err());
    }

    #[test]
    fn nautical_miles_use_international_definition() {
        assert_close(parse_distance("2 nautical miles").unwrap()[0], 3704.0);
        assert_close(parse_distance("1nmi").unwrap()[0], 1852.0);
    }

    #[test]
    fn leading_dot_and_thousands_separators() {
        assert_close(parse_distance(".5 km").unwrap()[0], 500.0);
        assert_close(parse_distance("1,500 yards").unwrap()[0], 1371.6);
    }

    #[test]
    fn inch_and_foot_marks() {
        assert_close(parse_distance("12\"").unwrap()[0], 0.3048);
        assert_close(parse_distance("3′").unwrap()[0], 0.9144);
        assert_close(parse_distance("2″").unwrap()[0], 0.0508);
    }

    #[test]
    fn duration_abbreviations_sum() {
        assert_close(parse_duration("2h 30min").unwrap(), 9000.0);
        assert_close(parse_duration("1.5 hours").unwrap(), 5400.0);
        assert_close(parse_duration("45 secs").unwrap(), 45.0);
    }

    #[test]
    fn bare_number_is_minutes() {
        assert_close(parse_duration("15").unwrap(), 900.0);
        assert!(parse_duration("15 apples").is_err());
    }

    #[test]
    fn clock_fields_must_be_below_sixty() {
        assert!(parse_duration("1:75").is_err());
        assert!(parse_duration("0:10:60").is_err());
        assert_close(parse_duration("0:59:59").unwrap(), 3599.0);
    }

    #[test]
    fn distance_units_are_not_durations() {
        assert!(parse_duration("10 miles").is_err());
        assert!(parse_duration("5 m").is_err());
    }

    #[test]
    fn unit_tokens_resolve() {
        assert_eq!(DistanceUnit::from_token("KM"), Some(DistanceUnit::Kilometer));
        assert_eq!(
            DistanceUnit::from_token("nautical  miles"),
            Some(DistanceUnit::NauticalMile)
        );
        assert_eq!(DistanceUnit::from_token("furlong"), None);
        assert_eq!(DurationUnit::from_token("Hrs"), Some(DurationUnit::Hour));
    }
}

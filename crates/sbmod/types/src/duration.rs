//! ISO-8601 durations as used by Service Bus entity settings
//!
//! Supports `P[nY][nM][nW][nD][T[nH][nM][n[.f]S]]`. Years and months are
//! fixed-length (365 and 30 days); the provider does the same when it
//! normalizes a TimeSpan.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

const DATE_UNITS: [(char, u64); 4] = [
    ('Y', 365 * SECS_PER_DAY),
    ('M', 30 * SECS_PER_DAY),
    ('W', 7 * SECS_PER_DAY),
    ('D', SECS_PER_DAY),
];

const TIME_UNITS: [(char, u64); 3] = [('H', SECS_PER_HOUR), ('M', SECS_PER_MINUTE), ('S', 1)];

/// A parsed ISO-8601 duration that remembers its source text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IsoDuration {
    text: String,
    value: Duration,
}

impl IsoDuration {
    /// Parse an ISO-8601 duration string
    pub fn parse(input: &str) -> Result<Self, DurationParseError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(DurationParseError::Empty);
        }

        let body = text
            .strip_prefix('P')
            .ok_or(DurationParseError::MissingDesignator)?;

        let (date_part, time_part) = match body.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (body, None),
        };

        let mut total = Duration::ZERO;
        let mut components = 0usize;
        let mut date_seen = 0usize;

        for (number, unit) in split_components(date_part)? {
            let secs = unit_seconds(&DATE_UNITS, unit, &mut date_seen)?;
            components += 1;
            let count = parse_whole(number)?;
            total = add_secs(total, count, secs)?;
        }

        if let Some(time) = time_part {
            if time.is_empty() {
                return Err(DurationParseError::EmptyTimePart);
            }
            let mut time_seen = 0usize;
            for (number, unit) in split_components(time)? {
                let secs = unit_seconds(&TIME_UNITS, unit, &mut time_seen)?;
                components += 1;
                if unit == 'S' {
                    total = total
                        .checked_add(parse_seconds(number)?)
                        .ok_or(DurationParseError::Overflow)?;
                } else {
                    let count = parse_whole(number)?;
                    total = add_secs(total, count, secs)?;
                }
            }
        }

        if components == 0 {
            return Err(DurationParseError::NoComponents);
        }

        Ok(Self {
            text: text.to_string(),
            value: total,
        })
    }

    /// Build from a whole number of seconds, rendered in canonical form
    pub fn from_secs(secs: u64) -> Self {
        let value = Duration::from_secs(secs);
        Self {
            text: render(value),
            value,
        }
    }

    /// Canonical text for the parsed length; equal lengths render identically
    pub fn canonical(&self) -> String {
        render(self.value)
    }

    /// The source text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The parsed length
    pub fn as_duration(&self) -> Duration {
        self.value
    }
}

/// Days, hours, minutes and seconds, largest first, zero components omitted
fn render(value: Duration) -> String {
    let secs = value.as_secs();
    let nanos = value.subsec_nanos();
    let days = secs / SECS_PER_DAY;
    let rem = secs % SECS_PER_DAY;
    let (hours, rem) = (rem / SECS_PER_HOUR, rem % SECS_PER_HOUR);
    let (minutes, seconds) = (rem / SECS_PER_MINUTE, rem % SECS_PER_MINUTE);

    let mut text = String::from("P");
    if days > 0 {
        text.push_str(&format!("{}D", days));
    }
    if hours > 0 || minutes > 0 || seconds > 0 || nanos > 0 || days == 0 {
        text.push('T');
        if hours > 0 {
            text.push_str(&format!("{}H", hours));
        }
        if minutes > 0 {
            text.push_str(&format!("{}M", minutes));
        }
        if seconds > 0 || nanos > 0 || (hours == 0 && minutes == 0) {
            text.push_str(&seconds.to_string());
            if nanos > 0 {
                let fraction = format!("{:09}", nanos);
                text.push('.');
                text.push_str(fraction.trim_end_matches('0'));
            }
            text.push('S');
        }
    }
    text
}

fn split_components(part: &str) -> Result<Vec<(&str, char)>, DurationParseError> {
    let mut out = Vec::new();
    let mut start = 0usize;

    for (idx, ch) in part.char_indices() {
        if ch.is_ascii_digit() || ch == '.' || ch == ',' {
            continue;
        }
        if !ch.is_ascii_uppercase() {
            return Err(DurationParseError::UnexpectedChar(ch));
        }
        let number = &part[start..idx];
        if number.is_empty() {
            return Err(DurationParseError::InvalidNumber(ch.to_string()));
        }
        out.push((number, ch));
        start = idx + ch.len_utf8();
    }

    if start < part.len() {
        return Err(DurationParseError::MissingUnit(part[start..].to_string()));
    }

    Ok(out)
}

/// Look up a unit and enforce that units appear in descending order.
fn unit_seconds(
    table: &[(char, u64)],
    unit: char,
    seen: &mut usize,
) -> Result<u64, DurationParseError> {
    let position = table
        .iter()
        .position(|(u, _)| *u == unit)
        .ok_or(DurationParseError::UnexpectedChar(unit))?;

    // `seen` holds one past the index of the last unit accepted
    if position < *seen {
        return Err(DurationParseError::OutOfOrder(unit));
    }
    *seen = position + 1;

    Ok(table[position].1)
}

fn parse_whole(number: &str) -> Result<u64, DurationParseError> {
    number
        .parse::<u64>()
        .map_err(|_| DurationParseError::InvalidNumber(number.to_string()))
}

fn parse_seconds(number: &str) -> Result<Duration, DurationParseError> {
    let normalized = number.replace(',', ".");
    let (whole, fraction) = match normalized.split_once('.') {
        Some((w, f)) => (w, f),
        None => (normalized.as_str(), ""),
    };

    let secs = parse_whole(whole)?;
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(DurationParseError::InvalidNumber(number.to_string()));
    }

    // Nanosecond precision; extra digits are truncated
    let mut digits: String = fraction.chars().take(9).collect();
    while digits.len() < 9 {
        digits.push('0');
    }
    let nanos = digits
        .parse::<u32>()
        .map_err(|_| DurationParseError::InvalidNumber(number.to_string()))?;

    Ok(Duration::new(secs, nanos))
}

fn add_secs(total: Duration, count: u64, unit_secs: u64) -> Result<Duration, DurationParseError> {
    let secs = count
        .checked_mul(unit_secs)
        .ok_or(DurationParseError::Overflow)?;
    total
        .checked_add(Duration::from_secs(secs))
        .ok_or(DurationParseError::Overflow)
}

impl PartialEq for IsoDuration {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for IsoDuration {}

impl PartialOrd for IsoDuration {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IsoDuration {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for IsoDuration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for IsoDuration {
    type Error = DurationParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IsoDuration> for String {
    fn from(value: IsoDuration) -> Self {
        value.text
    }
}

/// Errors from parsing an ISO-8601 duration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationParseError {
    #[error("duration is empty")]
    Empty,

    #[error("duration must start with 'P'")]
    MissingDesignator,

    #[error("time designator 'T' must be followed by at least one component")]
    EmptyTimePart,

    #[error("duration has no components")]
    NoComponents,

    #[error("invalid number before '{0}'")]
    InvalidNumber(String),

    #[error("number '{0}' has no unit")]
    MissingUnit(String),

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unit '{0}' is out of order")]
    OutOfOrder(char),

    #[error("duration overflows")]
    Overflow,
}

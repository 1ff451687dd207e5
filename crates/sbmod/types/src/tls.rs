//! Minimum TLS version

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `major.minor` TLS protocol version, ordered numerically
///
/// Ordering compares components as integers, so `1.10 > 1.2` even though
/// the strings sort the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TlsVersion {
    major: u16,
    minor: u16,
}

impl TlsVersion {
    pub const V1_0: TlsVersion = TlsVersion::new(1, 0);
    pub const V1_1: TlsVersion = TlsVersion::new(1, 1);
    pub const V1_2: TlsVersion = TlsVersion::new(1, 2);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u16 {
        self.major
    }

    pub fn minor(&self) -> u16 {
        self.minor
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for TlsVersion {
    type Err = TlsVersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (major, minor) = trimmed
            .split_once('.')
            .ok_or_else(|| TlsVersionParseError(s.to_string()))?;

        let parse = |part: &str| {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(TlsVersionParseError(s.to_string()));
            }
            part.parse::<u16>()
                .map_err(|_| TlsVersionParseError(s.to_string()))
        };

        Ok(Self::new(parse(major)?, parse(minor)?))
    }
}

impl TryFrom<String> for TlsVersion {
    type Error = TlsVersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TlsVersion> for String {
    fn from(value: TlsVersion) -> Self {
        value.to_string()
    }
}

/// A TLS version string that is not `major.minor`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid TLS version '{0}', expected MAJOR.MINOR")]
pub struct TlsVersionParseError(pub String);

//! Timezone value object
//!
//! Chart hour labels are rendered in a timezone: either the system's local
//! time or a validated IANA zone.

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Timezone used for rendering forecast timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timezone {
    /// The host's local timezone
    #[default]
    Local,
    /// A named IANA timezone
    Named(Tz),
}

impl Timezone {
    /// The host's local timezone
    #[must_use]
    pub const fn local() -> Self {
        Self::Local
    }

    /// UTC timezone
    #[must_use]
    pub const fn utc() -> Self {
        Self::Named(Tz::UTC)
    }

    /// Create a timezone from an IANA name such as `Asia/Tokyo`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is not in the IANA database.
    pub fn named(name: &str) -> Result<Self, DomainError> {
        name.parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
    }

    /// Check if this is UTC
    #[must_use]
    pub fn is_utc(&self) -> bool {
        matches!(self, Self::Named(tz) if matches!(tz.name(), "UTC" | "Etc/UTC" | "Etc/GMT"))
    }

    /// Two-digit hour (`"00"`..`"23"`) of the instant in this timezone
    #[must_use]
    pub fn hour_label(&self, instant: &DateTime<Utc>) -> String {
        match self {
            Self::Local => instant.with_timezone(&Local).format("%H").to_string(),
            Self::Named(tz) => instant.with_timezone(tz).format("%H").to_string(),
        }
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

impl FromStr for Timezone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("local") {
            Ok(Self::Local)
        } else {
            Self::named(s)
        }
    }
}

impl TryFrom<String> for Timezone {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Timezone> for String {
    fn from(tz: Timezone) -> Self {
        tz.to_string()
    }
}

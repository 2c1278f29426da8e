//! Timezone utilities for timestamp handling
//!
//! Rating periods arrive as naive `YYYY-MM-DDTHH:MM` strings. This module
//! decides which zone those wall-clock times belong to and converts them to
//! epoch seconds.

use crate::error::{CkrateError, Result};
use chrono::{Duration, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// Format of the significant prefix of a `begin` timestamp
pub const BEGIN_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Number of leading characters of a `begin` timestamp that are parsed
pub const BEGIN_PREFIX_LEN: usize = 16;

/// Configuration for timezone handling
#[derive(Debug, Clone)]
pub struct TimezoneConfig {
    /// The timezone naive timestamps are interpreted in
    pub tz: Tz,
    /// Whether the timezone is UTC
    pub is_utc: bool,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        let tz = get_local_timezone();
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }
}

impl TimezoneConfig {
    /// Create a configuration for an explicit zone
    pub fn new(tz: Tz) -> Self {
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }

    /// UTC configuration
    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// Create a new timezone configuration from CLI arguments
    pub fn from_cli(timezone_str: Option<&str>, use_utc: bool) -> Result<Self> {
        if use_utc {
            return Ok(Self::utc());
        }

        if let Some(tz_str) = timezone_str {
            let tz = Tz::from_str(tz_str).map_err(|_| {
                CkrateError::InvalidTimezone(format!(
                    "'{}'. Use format like 'Europe/Paris', 'Asia/Tokyo', or 'UTC'",
                    tz_str
                ))
            })?;
            Ok(Self::new(tz))
        } else {
            Ok(Self::default())
        }
    }

    /// Get the display name for the configured timezone
    pub fn display_name(&self) -> &str {
        if self.is_utc { "UTC" } else { self.tz.name() }
    }

    /// Convert a `begin` timestamp to epoch seconds
    ///
    /// Only the first 16 characters (minute precision) are read; seconds and
    /// any offset suffix are ignored and the wall-clock time is taken in the
    /// configured zone. Ambiguous local times resolve to the earlier instant,
    /// and times skipped by a DST jump are pushed forward by one hour.
    pub fn begin_to_epoch(&self, begin: &str) -> std::result::Result<i64, String> {
        let prefix = begin
            .get(..BEGIN_PREFIX_LEN)
            .ok_or_else(|| {
                format!("timestamp '{begin}' has no {BEGIN_PREFIX_LEN}-byte ASCII prefix (too short or non-ASCII)")
            })?;

        let naive = NaiveDateTime::parse_from_str(prefix, BEGIN_FORMAT)
            .map_err(|e| format!("timestamp '{begin}' does not match {BEGIN_FORMAT}: {e}"))?;

        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                self.tz
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
            })
            .map(|dt| dt.timestamp())
            .ok_or_else(|| format!("timestamp '{begin}' does not exist in {}", self.tz.name()))
    }
}

/// Detect the system's local timezone
///
/// This function attempts to detect the local timezone from the system.
/// If detection fails, it falls back to UTC.
pub fn get_local_timezone() -> Tz {
    #[allow(clippy::collapsible_if)]
    if let Ok(tz_str) = std::env::var("TZ") {
        if let Ok(tz) = Tz::from_str(&tz_str) {
            debug!("Using timezone from TZ environment variable: {}", tz_str);
            return tz;
        }
    }

    match iana_time_zone::get_timezone() {
        Ok(tz_str) => match Tz::from_str(&tz_str) {
            Ok(tz) => {
                debug!("Using system timezone from iana-time-zone: {}", tz_str);
                tz
            }
            Err(_) => {
                debug!(
                    "Could not parse timezone from iana-time-zone: '{}', falling back to UTC",
                    tz_str
                );
                Tz::UTC
            }
        },
        Err(e) => {
            debug!(
                "Could not detect local timezone via iana-time-zone: {:?}, falling back to UTC",
                e
            );
            Tz::UTC
        }
    }
}

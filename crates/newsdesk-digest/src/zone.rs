//! Civil timezone for the digest schedule.
//!
//! The schedule is configured as HH:MM in a civil zone: either an IANA
//! name (`"Europe/Moscow"`, DST-aware via `chrono-tz`) or a fixed offset
//! (`"+03:00"`, no DST adjustment; this is the default).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// A named IANA zone or a fixed UTC offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigestZone {
    /// IANA zone, e.g. `Europe/Moscow`.
    Named(Tz),
    /// Fixed offset, e.g. `+03:00`.
    Fixed(FixedOffset),
}

impl DigestZone {
    /// The built-in default: fixed `+03:00`.
    #[must_use]
    pub fn default_offset() -> Self {
        // 3 * 3600 is within FixedOffset bounds.
        Self::Fixed(FixedOffset::east_opt(3 * 3600).expect("valid offset"))
    }

    /// Project a UTC instant into this zone's local clock.
    #[must_use]
    pub fn to_local(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Named(tz) => utc.with_timezone(tz).naive_local(),
            Self::Fixed(offset) => utc.with_timezone(offset).naive_local(),
        }
    }

    /// Resolve a local wall-clock time to a UTC instant.
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier
    /// instant; nonexistent local times (DST spring-forward gap) return
    /// `None` and the caller decides.
    #[must_use]
    pub fn from_local(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Named(tz) => tz
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Self::Fixed(offset) => offset
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl Default for DigestZone {
    fn default() -> Self {
        Self::default_offset()
    }
}

impl fmt::Display for DigestZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => write!(f, "{tz}"),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// Failed to interpret a timezone string.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized timezone {input:?} (expected an IANA name or \"+HH:MM\")")]
pub struct ZoneParseError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for DigestZone {
    type Err = ZoneParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(tz) = s.parse::<Tz>() {
            return Ok(Self::Named(tz));
        }
        if let Some(offset) = parse_fixed_offset(s) {
            return Ok(Self::Fixed(offset));
        }
        Err(ZoneParseError {
            input: s.to_string(),
        })
    }
}

/// Parse `+HH:MM` / `-HH:MM`.
fn parse_fixed_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    // Unsigned components: the sign lives only in the leading byte, so a
    // doubled sign like "+-3:00" fails instead of flipping direction.
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60) as i32)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

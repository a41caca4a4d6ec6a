//! Fire-time and window arithmetic.
//!
//! Two pure functions: when does the scheduler fire next, and which UTC
//! range covers "yesterday" on the configured local calendar. Both are
//! deliberately free of clocks so tests can pin `now`.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::zone::DigestZone;

/// Arithmetic failure while resolving local times (DST gaps).
#[derive(Debug, thiserror::Error)]
#[error("could not resolve local time in zone {zone}: {reason}")]
pub struct ScheduleError {
    /// Relevant zone.
    pub zone: String,
    /// What failed.
    pub reason: String,
}

/// The UTC range covering one local calendar day, bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DigestWindow {
    /// The local calendar day being summarized.
    pub date: NaiveDate,
    /// Window start (local 00:00:00.000000) in UTC.
    pub start_utc: DateTime<Utc>,
    /// Window end (local 23:59:59.999999) in UTC.
    pub end_utc: DateTime<Utc>,
}

/// Compute the next fire instant strictly after `now`.
///
/// "Today at HH:MM local" when that is still in the future, otherwise
/// tomorrow at HH:MM. The strict inequality guarantees a restart at
/// exactly HH:MM does not double-fire.
pub fn next_fire(
    now: DateTime<Utc>,
    zone: &DigestZone,
    hour: u32,
    minute: u32,
) -> Result<DateTime<Utc>, ScheduleError> {
    let local_now = zone.to_local(now);
    let target = local_now
        .date()
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| ScheduleError {
            zone: zone.to_string(),
            reason: format!("invalid fire time {hour:02}:{minute:02}"),
        })?;

    let target = if local_now < target {
        target
    } else {
        target + Duration::days(1)
    };

    zone.from_local(target).ok_or_else(|| ScheduleError {
        zone: zone.to_string(),
        reason: format!("fire time {target} does not exist locally (DST gap)"),
    })
}

/// The prior local calendar day as an inclusive UTC window.
pub fn yesterday_window(
    now: DateTime<Utc>,
    zone: &DigestZone,
) -> Result<DigestWindow, ScheduleError> {
    let date = zone.to_local(now).date() - Duration::days(1);
    let resolve = |local, which: &str| {
        zone.from_local(local).ok_or_else(|| ScheduleError {
            zone: zone.to_string(),
            reason: format!("window {which} does not exist locally (DST gap)"),
        })
    };

    // Inclusive bounds: 00:00:00.000000 through 23:59:59.999999 local.
    let start_utc = resolve(
        date.and_hms_micro_opt(0, 0, 0, 0).expect("valid midnight"),
        "start",
    )?;
    let end_utc = resolve(
        date.and_hms_micro_opt(23, 59, 59, 999_999)
            .expect("valid end of day"),
        "end",
    )?;

    Ok(DigestWindow {
        date,
        start_utc,
        end_utc,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn fire_later_today_when_target_ahead() {
        let zone = DigestZone::default_offset();
        // 07:00 local = 04:00 UTC; target 07:30 local.
        let next = next_fire(utc(2024, 1, 1, 4, 0), &zone, 7, 30).unwrap();
        assert_eq!(next, utc(2024, 1, 1, 4, 30));
    }

    #[test]
    fn fire_tomorrow_when_one_minute_past() {
        let zone = DigestZone::default_offset();
        // 07:31 local = 04:31 UTC; target 07:30 → tomorrow.
        let next = next_fire(utc(2024, 1, 1, 4, 31), &zone, 7, 30).unwrap();
        assert_eq!(next, utc(2024, 1, 2, 4, 30));
    }

    #[test]
    fn fire_tomorrow_when_exactly_at_target() {
        let zone = DigestZone::default_offset();
        // Restart at exactly 07:30 local must not re-fire today.
        let next = next_fire(utc(2024, 1, 1, 4, 30), &zone, 7, 30).unwrap();
        assert_eq!(next, utc(2024, 1, 2, 4, 30));
    }

    #[test]
    fn next_fire_is_always_in_the_future() {
        let zone = DigestZone::default_offset();
        for h in 0..24 {
            let now = utc(2024, 3, 10, h, 15);
            let next = next_fire(now, &zone, 7, 30).unwrap();
            assert!(next > now, "H={h}: {next} not after {now}");
        }
    }

    #[test]
    fn yesterday_window_converts_to_utc() {
        let zone = DigestZone::default_offset();
        // Local 2024-01-02 09:00 (+03:00) → yesterday is local 2024-01-01.
        let window = yesterday_window(utc(2024, 1, 2, 6, 0), &zone).unwrap();
        assert_eq!(window.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(window.start_utc, utc(2023, 12, 31, 21, 0));
        assert_eq!(
            window.end_utc,
            Utc.with_ymd_and_hms(2024, 1, 1, 20, 59, 59).unwrap()
                + Duration::microseconds(999_999)
        );
    }

    #[test]
    fn window_membership_around_local_midnight() {
        // Items at 2024-01-01T10:00Z, 2024-01-01T23:59Z, 2024-01-02T00:01Z
        // against the UTC+3 local day 2024-01-01.
        let zone = DigestZone::default_offset();
        let window = yesterday_window(utc(2024, 1, 2, 6, 0), &zone).unwrap();

        let in_window = |t: DateTime<Utc>| t >= window.start_utc && t <= window.end_utc;
        assert!(in_window(utc(2024, 1, 1, 10, 0)), "10:00Z is 13:00 local");
        assert!(
            !in_window(utc(2024, 1, 1, 23, 59)),
            "23:59Z is 02:59 local on Jan 2"
        );
        assert!(!in_window(utc(2024, 1, 2, 0, 1)));
    }

    #[test]
    fn named_zone_schedules_like_fixed_offset_in_winter() {
        let moscow: DigestZone = "Europe/Moscow".parse().unwrap();
        let fixed = DigestZone::default_offset();
        let now = utc(2024, 1, 1, 4, 0);
        assert_eq!(
            next_fire(now, &moscow, 7, 30).unwrap(),
            next_fire(now, &fixed, 7, 30).unwrap()
        );
    }

    #[test]
    fn invalid_fire_time_is_rejected() {
        let zone = DigestZone::default_offset();
        assert!(next_fire(utc(2024, 1, 1, 0, 0), &zone, 24, 0).is_err());
    }
}

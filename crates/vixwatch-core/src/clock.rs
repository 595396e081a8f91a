//! Time source abstraction
//!
//! The check reads the current time through [`Clock`] so tests can pin it.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Render `ts` in a fixed UTC offset using the `ja-JP` short date shape,
/// e.g. `2024/8/5 9:03:07`
pub fn localized(ts: DateTime<Utc>, utc_offset_hours: i32) -> String {
    let offset = utc_offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix());
    ts.with_timezone(&offset)
        .format("%Y/%-m/%-d %-H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_localized_tokyo() {
        let ts = Utc.with_ymd_and_hms(2024, 8, 5, 0, 3, 7).unwrap();
        assert_eq!(localized(ts, 9), "2024/8/5 9:03:07");
    }

    #[test]
    fn test_localized_crosses_date_line() {
        let ts = Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap();
        assert_eq!(localized(ts, 9), "2025/1/1 5:00:00");
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(localized(ts, 48), "2024/3/1 12:30:00");
    }

    #[test]
    fn test_fixed_clock() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(FixedClock(ts).now(), ts);
    }
}

//! Clock abstraction
//!
//! All time-dependent logic receives a [`Clock`] instead of reading the host
//! clock directly. Business time is UTC+5:30 regardless of host timezone.
//!
//! - [`TrustedClock`]: boot wall time + monotonic elapsed, immune to host clock
//!   adjustments after start. Drives slot and weekday eligibility.
//! - [`SystemClock`]: plain wall clock, used to stamp persisted records.
//! - [`FixedClock`]: settable clock for tests.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use parking_lot::RwLock;
use std::time::Instant;

/// UTC+5:30 in seconds
pub const BUSINESS_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Business timezone offset (UTC+5:30)
pub fn business_offset() -> FixedOffset {
    FixedOffset::east_opt(BUSINESS_OFFSET_SECS).expect("UTC+5:30 is a valid offset")
}

/// Current-time source
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// Current time in the business timezone
    fn local_now(&self) -> DateTime<FixedOffset> {
        self.now().with_timezone(&business_offset())
    }

    /// Current calendar date in the business timezone
    fn today(&self) -> NaiveDate {
        self.local_now().date_naive()
    }
}

/// Tamper-resistant clock seeded once at process start
#[derive(Debug)]
pub struct TrustedClock {
    boot_wall: DateTime<Utc>,
    boot_instant: Instant,
}

impl TrustedClock {
    pub fn new() -> Self {
        Self {
            boot_wall: Utc::now(),
            boot_instant: Instant::now(),
        }
    }
}

impl Default for TrustedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TrustedClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed =
            Duration::from_std(self.boot_instant.elapsed()).unwrap_or_else(|_| Duration::zero());
        self.boot_wall + elapsed
    }
}

/// Host wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Clock pinned to a wall time in the business timezone
    pub fn at_local(local: NaiveDateTime) -> Self {
        Self::new(local_to_utc(local))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    pub fn set_local(&self, local: NaiveDateTime) {
        self.set(local_to_utc(local));
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

/// Interpret a naive business-timezone wall time as a UTC instant
pub fn local_to_utc(local: NaiveDateTime) -> DateTime<Utc> {
    (local - Duration::seconds(BUSINESS_OFFSET_SECS as i64)).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_local_now_uses_business_offset() {
        // 2026-03-02 00:00 UTC == 05:30 local
        let clock = FixedClock::new(local(2026, 3, 2, 0, 0).and_utc());
        let now = clock.local_now();
        assert_eq!((now.hour(), now.minute()), (5, 30));
        assert_eq!(now.offset().local_minus_utc(), BUSINESS_OFFSET_SECS);
    }

    #[test]
    fn test_today_rolls_over_before_utc_midnight() {
        // 2026-03-02 19:00 UTC is already 2026-03-03 00:30 local
        let clock = FixedClock::new(local(2026, 3, 2, 19, 0).and_utc());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    }

    #[test]
    fn test_fixed_clock_at_local_roundtrip() {
        let clock = FixedClock::at_local(local(2026, 3, 2, 11, 0));
        let now = clock.local_now();
        assert_eq!(now.day(), 2);
        assert_eq!((now.hour(), now.minute()), (11, 0));

        clock.advance(Duration::minutes(90));
        assert_eq!(clock.local_now().hour(), 12);
        assert_eq!(clock.local_now().minute(), 30);
    }

    #[test]
    fn test_trusted_clock_is_monotonic() {
        let clock = TrustedClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!((Utc::now() - a).num_seconds().abs() < 5);
    }
}

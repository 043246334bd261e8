//! Clock abstraction
//!
//! Time source seam for the time-query endpoint. Production code reads the
//! system clock; tests pin the instant with [`FixedClock`].

use chrono::{ DateTime, Local };

/// Display pattern for the time-query endpoint: 24-hour clock, zero-padded
/// fields, `/`-separated US date order (`HH:mm:ss MM/dd/yyyy`).
///
/// The pattern is locale-independent; the US numeral and separator
/// conventions are encoded in the pattern itself.
pub const TIME_FORMAT: &str = "%H:%M:%S %m/%d/%Y";

/// Abstraction over wall-clock time.
pub trait Clock: Send + Sync {
    /// Returns the current local time.
    fn now(&self) -> DateTime<Local>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{ NaiveDate, TimeZone };

    #[test]
    fn format_pattern_fields() {
        let naive = NaiveDate::from_ymd_opt(2024, 7, 9)
            .unwrap()
            .and_hms_opt(13, 5, 7)
            .unwrap();

        assert_eq!(naive.format(TIME_FORMAT).to_string(), "13:05:07 07/09/2024");
    }

    #[test]
    fn fixed_clock_returns_pinned_instant() {
        let instant = Local.with_ymd_and_hms(2021, 3, 9, 5, 4, 3).unwrap();
        let clock = FixedClock(instant);

        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }
}

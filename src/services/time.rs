//! Time service
//!
//! The shipped endpoint: one synchronous operation answering the current
//! wall-clock time as a string with the fixed pattern
//! `HH:mm:ss MM/dd/yyyy`.

use std::sync::Arc;

use tracing::debug;

use crate::clock::{ Clock, SystemClock, TIME_FORMAT };
use crate::service::Service;

/// Service endpoint answering the current time as a formatted string
pub struct TimeService {
    clock: Arc<dyn Clock>,
}

impl TimeService {
    /// Conventional registry name for the endpoint
    pub const NAME: &'static str = "time";

    /// Create a time service over the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a time service over a custom clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Returns the current time as `HH:mm:ss MM/dd/yyyy`.
    ///
    /// No inputs, no failure conditions, no side effects.
    pub fn current_time(&self) -> String {
        self.clock.now().format(TIME_FORMAT).to_string()
    }
}

impl Service for TimeService {
    fn on_create(&self) {
        debug!("Time service created");
    }

    fn on_destroy(&self) {
        debug!("Time service destroyed");
    }
}

impl Default for TimeService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{ Local, TimeZone };

    fn assert_time_shape(value: &str) {
        assert_eq!(value.len(), 19, "unexpected length for {:?}", value);
        for (index, byte) in value.bytes().enumerate() {
            match index {
                2 | 5 => assert_eq!(byte, b':', "at index {} of {:?}", index, value),
                8 => assert_eq!(byte, b' ', "at index {} of {:?}", index, value),
                11 | 14 => assert_eq!(byte, b'/', "at index {} of {:?}", index, value),
                _ => assert!(byte.is_ascii_digit(), "at index {} of {:?}", index, value),
            }
        }
    }

    #[test]
    fn formats_a_fixed_instant_exactly() {
        let instant = Local.with_ymd_and_hms(2021, 3, 9, 5, 4, 3).unwrap();
        let service = TimeService::with_clock(Arc::new(FixedClock(instant)));

        assert_eq!(service.current_time(), "05:04:03 03/09/2021");
    }

    #[test]
    fn system_clock_output_matches_the_shape() {
        let service = TimeService::new();

        let value = service.current_time();
        assert!(!value.is_empty());
        assert_time_shape(&value);
    }

    #[test]
    fn repeated_queries_keep_the_shape() {
        let instant = Local.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
        let service = TimeService::with_clock(Arc::new(FixedClock(instant)));

        assert_time_shape(&service.current_time());
        assert_eq!(service.current_time(), "23:59:59 12/31/1999");
    }
}

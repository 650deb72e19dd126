//! Wall-clock sources.
//!
//! The engine only ever asks "what time is it locally". Production code reads
//! the system clock; tests drive a [`ManualClock`] forward by hand.

use std::cell::Cell;

use chrono::{Duration, Local, NaiveDateTime, Timelike};

/// Supplies the current local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn current_hour(&self) -> u8 {
        self.now().hour() as u8
    }
}

/// Reads `chrono::Local`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn manual_clock_advances() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 59, 30)
            .unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.current_hour(), 9);

        clock.advance(Duration::seconds(30));
        assert_eq!(clock.current_hour(), 10);
    }
}

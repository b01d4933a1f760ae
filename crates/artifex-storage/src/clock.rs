//! Calendar source for date partitions.
//!
//! Both the relative path of a new artifact and every remote key embed the
//! current date. The store asks a `Clock` for it so tests can pin the day.

use chrono::{Local, NaiveDate};

pub trait Clock: Send + Sync {
    /// Today's date in the clock's calendar.
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen on a single day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    /// Returns `None` for an impossible calendar date.
    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

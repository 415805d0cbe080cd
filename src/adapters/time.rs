//! System time adapter.
//!
//! - monotonic time from `std::time::Instant` (liveness timeouts)
//! - local wall-clock from `chrono::Local` (weekly time windows)

use std::time::Instant;

use chrono::{Datelike, Local, NaiveDateTime, Timelike};

use crate::access::MinuteOfWeek;
use crate::app::ports::TimePort;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl TimePort for SystemClock {
    fn monotonic(&self) -> Instant {
        Instant::now()
    }

    fn minute_of_week(&self) -> MinuteOfWeek {
        minute_of_week(&Local::now().naive_local())
    }
}

/// Monday 00:00 = 0.
pub fn minute_of_week(t: &NaiveDateTime) -> MinuteOfWeek {
    let day = t.weekday().num_days_from_monday();
    MinuteOfWeek::wrapping(day * 1440 + t.hour() * 60 + t.minute())
}

//! Access-control filters.
//!
//! A filter either opens a weekly time window (anyone may call in) or
//! names one caller number.  Time windows are expressed in minutes since
//! Monday 00:00 local time and repeat every week.

use core::fmt;

/// Minutes in one week; every [`MinuteOfWeek`] is below this.
pub const MINUTES_PER_WEEK: u16 = 7 * 24 * 60;

/// A point in the weekly cycle, `0..10080`, Monday 00:00 = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteOfWeek(u16);

impl MinuteOfWeek {
    /// `None` unless `minute < 10080`.
    pub const fn new(minute: u16) -> Option<Self> {
        if minute < MINUTES_PER_WEEK {
            Some(Self(minute))
        } else {
            None
        }
    }

    /// Reduce any minute count modulo one week.
    pub const fn wrapping(minute: u32) -> Self {
        Self((minute % MINUTES_PER_WEEK as u32) as u16)
    }

    /// `weekday` 0 = Monday.  `None` when any field is out of range.
    pub fn from_parts(weekday: u8, hour: u8, minute: u8) -> Option<Self> {
        if weekday > 6 || hour > 23 || minute > 59 {
            return None;
        }
        Self::new(u16::from(weekday) * 1440 + u16::from(hour) * 60 + u16::from(minute))
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for MinuteOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        let day = DAYS[usize::from(self.0 / 1440)];
        let rem = self.0 % 1440;
        write!(f, "{} {:02}:{:02}", day, rem / 60, rem % 60)
    }
}

/// Inclusive weekly window.  `start > end` wraps across Sunday → Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: MinuteOfWeek,
    pub end: MinuteOfWeek,
}

impl TimeWindow {
    pub fn contains(&self, now: MinuteOfWeek) -> bool {
        if self.start > self.end {
            now >= self.start || now <= self.end
        } else {
            now >= self.start && now <= self.end
        }
    }
}

/// One known caller.  The number is stored without the leading `+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerNumber {
    pub number: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    TimeWindow(TimeWindow),
    CallerNumber(CallerNumber),
}

impl Filter {
    pub fn matches(&self, now: MinuteOfWeek, caller: &str) -> bool {
        match self {
            Self::TimeWindow(w) => w.contains(now),
            Self::CallerNumber(c) => c.number == caller,
        }
    }

    /// Name to report on a grant.  Time windows are anonymous.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::TimeWindow(_) => None,
            Self::CallerNumber(c) => c.label.as_deref().filter(|l| !l.is_empty()),
        }
    }
}

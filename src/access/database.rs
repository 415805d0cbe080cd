//! Authorization database: text grammar, evaluation, and file store.
//!
//! ```text
//! # comment                     blank lines and #-comments are ignored
//! * 0 08:00 18:00               weekday (0 = Monday), start, end
//! +15551234567 Alice Smith      caller number, optional label words
//! ```
//!
//! Parsing is total: a line that fits neither form is logged and skipped,
//! the rest of the file still loads.  Only an unreadable file is an error.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::filter::{CallerNumber, Filter, MinuteOfWeek, TimeWindow};
use crate::app::ports::FilterStore;
use crate::error::DatabaseError;

/// Ordered filter list, file order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    filters: Vec<Filter>,
    skipped: usize,
}

/// Outcome of evaluating one caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept { label: Option<String> },
    Reject,
}

impl Decision {
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept { .. })
    }
}

impl Database {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters, skipped: 0 }
    }

    pub fn parse(text: &str) -> Self {
        let mut db = Self::default();
        for (idx, raw) in text.lines().enumerate() {
            match parse_line(raw) {
                Ok(Some(filter)) => db.filters.push(filter),
                Ok(None) => {}
                Err(reason) => {
                    warn!("DB: line {}: {} in {:?}, skipped", idx + 1, reason, raw);
                    db.skipped += 1;
                }
            }
        }
        db
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Lines rejected by the last parse.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Any match accepts; the first match carrying a label names the grant.
    pub fn evaluate(&self, now: MinuteOfWeek, caller: &str) -> Decision {
        let mut accept = false;
        let mut label = None;
        for filter in self.filters.iter().filter(|f| f.matches(now, caller)) {
            accept = true;
            if label.is_none() {
                label = filter.label();
            }
        }
        if accept {
            Decision::Accept {
                label: label.map(str::to_owned),
            }
        } else {
            Decision::Reject
        }
    }
}

/// `Ok(None)` for blank/comment lines, `Err(reason)` for malformed ones.
fn parse_line(raw: &str) -> Result<Option<Filter>, &'static str> {
    let content = raw.split('#').next().unwrap_or_default();
    let mut tokens = content.split_whitespace();
    let Some(head) = tokens.next() else {
        return Ok(None);
    };

    if head == "*" {
        let weekday = tokens
            .next()
            .and_then(|t| t.parse::<u8>().ok())
            .filter(|d| *d <= 6)
            .ok_or("bad weekday")?;
        let start = tokens.next().and_then(|t| parse_hhmm(weekday, t)).ok_or("bad start time")?;
        let end = tokens.next().and_then(|t| parse_hhmm(weekday, t)).ok_or("bad end time")?;
        return Ok(Some(Filter::TimeWindow(TimeWindow { start, end })));
    }

    if let Some(number) = head.strip_prefix('+') {
        if number.is_empty() {
            return Err("empty caller number");
        }
        let words: Vec<&str> = tokens.collect();
        let label = (!words.is_empty()).then(|| words.join(" "));
        return Ok(Some(Filter::CallerNumber(CallerNumber {
            number: number.to_string(),
            label,
        })));
    }

    Err("unknown line")
}

fn parse_hhmm(weekday: u8, token: &str) -> Option<MinuteOfWeek> {
    let (h, m) = token.split_once(':')?;
    let digits = |s: &str| !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(h) || !digits(m) {
        return None;
    }
    MinuteOfWeek::from_parts(weekday, h.parse().ok()?, m.parse().ok()?)
}

/// Database backed by a text file, re-read on every load.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FilterStore for FileStore {
    fn load(&self) -> Result<Database, DatabaseError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| DatabaseError::Io {
            path: self.path.clone(),
            source,
        })?;
        let db = Database::parse(&text);
        debug!(
            "DB: loaded {} filters from {} ({} skipped)",
            db.filters.len(),
            self.path.display(),
            db.skipped
        );
        Ok(db)
    }
}

//! Caller authorization: filter types and the database they live in.

pub mod database;
pub mod filter;

pub use database::{Database, Decision, FileStore};
pub use filter::{CallerNumber, Filter, MINUTES_PER_WEEK, MinuteOfWeek, TimeWindow};

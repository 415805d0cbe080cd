//! Port traits: the boundary between the dispatch loop and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GateService (domain)
//! ```
//!
//! Driven adapters (opener relay, database file, clocks, event sinks)
//! implement these traits.  The [`GateService`](super::service::GateService)
//! consumes them via generics, so the dispatch logic never touches
//! hardware or the filesystem directly.

use std::time::Instant;

use crate::access::{Database, MinuteOfWeek};
use crate::error::DatabaseError;

// ───────────────────────────────────────────────────────────────
// Opener port (domain → gate relay)
// ───────────────────────────────────────────────────────────────

/// Queue one full-length gate pulse.  Must not block.
pub trait OpenerPort {
    fn request_open(&self);
}

// ───────────────────────────────────────────────────────────────
// Filter store (domain ← authorization database)
// ───────────────────────────────────────────────────────────────

/// Produces a fresh [`Database`] on every call.
pub trait FilterStore {
    fn load(&self) -> Result<Database, DatabaseError>;
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

pub trait TimePort {
    /// Monotonic clock for liveness timeouts.
    fn monotonic(&self) -> Instant;

    /// Local wall-clock position in the week, for time-window filters.
    fn minute_of_week(&self) -> MinuteOfWeek;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / message bus)
// ───────────────────────────────────────────────────────────────

/// The service emits [`AppEvent`](super::events::AppEvent)s through this
/// port.  Adapters decide where they go (log, MQTT).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

//! Worker → dispatch loop event queue.
//!
//! Events are produced by:
//! - the modem link (liveness, registration, incoming calls, faults)
//! - the ticker (indicator tick)
//!
//! Events are consumed by the dispatch loop, which handles them one at a
//! time in arrival order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Modem link  │────▶│  Event Queue │────▶│ Dispatch loop │
//! │ Ticker      │────▶│  (unbounded) │     │  (consumer)   │
//! └─────────────┘     └──────────────┘     └───────────────┘
//! ```
//!
//! The opener has its own request channel and is not fed from here.

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Everything the dispatch loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The modem answered `OK`.
    ModemAlive,
    /// `+CREG: <code>` network registration status.
    RegistrationChanged(u32),
    /// `+CLIP:` caller ID, raw bytes as sent by the modem.
    IncomingCall(Vec<u8>),
    /// Indicator tick from the ticker.
    Tick,
    /// The modem worker stopped; carries the reason.
    ModemFault(String),
}

pub type EventSender = Sender<Event>;
pub type EventReceiver = Receiver<Event>;

/// Create the shared queue.  Clone the sender once per producer.
pub fn event_queue() -> (EventSender, EventReceiver) {
    unbounded()
}

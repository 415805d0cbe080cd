//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the `log`
//! facade (stderr or journald in production).  This is the one place a
//! call outcome is logged at info; the service itself only adds debug
//! detail.  The MQTT bridge implements the same trait.

use log::{Level, log};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// Level and text of the log line for one event.
pub fn describe(event: &AppEvent) -> (Level, String) {
    match event {
        AppEvent::Ring { caller } => (Level::Info, format!("RING  | caller={}", caller)),
        AppEvent::Granted { caller, label } => (
            Level::Info,
            format!(
                "GRANT | caller={} label={}",
                caller,
                AppEvent::label_or_anon(label.as_deref())
            ),
        ),
        AppEvent::Denied { caller } => (Level::Info, format!("DENY  | caller={}", caller)),
        AppEvent::ModemFault { reason } => (Level::Warn, format!("FAULT | modem: {}", reason)),
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let (level, line) = describe(event);
        log!(level, "{}", line);
    }
}

//! Outbound application events.
//!
//! The [`GateService`](super::service::GateService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them: log them, publish them over MQTT.

/// Marker published in place of a label when the grant matched no named caller.
pub const ANONYMOUS: &str = "anon";

/// Structured events emitted by the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A call came in; emitted before the caller is evaluated.
    Ring { caller: String },

    /// The gate was opened for this caller.
    Granted { caller: String, label: Option<String> },

    /// The caller matched no filter.
    Denied { caller: String },

    /// The modem worker stopped.
    ModemFault { reason: String },
}

impl AppEvent {
    /// Label as published on the bus.
    pub fn label_or_anon(label: Option<&str>) -> &str {
        label.unwrap_or(ANONYMOUS)
    }

    /// Topic leaf and payload to publish on the bus, if any.
    /// Denials and faults stay local.
    pub fn bus_message(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::Ring { .. } => Some(("ring", "1")),
            Self::Granted { label, .. } => Some(("open", Self::label_or_anon(label.as_deref()))),
            Self::Denied { .. } | Self::ModemFault { .. } => None,
        }
    }
}

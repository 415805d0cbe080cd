//! Inbound commands from the message bus.
//!
//! The bus listener hands raw payloads to [`BusCommand::parse`]; anything
//! it does not recognise is ignored.

/// Commands that external adapters can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusCommand {
    /// Pulse the gate, same as an authorized call.
    Open,
}

impl BusCommand {
    /// `open` in any case, surrounding whitespace ignored.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(payload).ok()?.trim();
        text.eq_ignore_ascii_case("open").then_some(Self::Open)
    }
}

//! SIM800 modem link state machine.
//!
//! ```text
//!  Resetting ──▶ Probing ──OK──▶ SyncEstablished ──init──▶ Initialized
//!  (CPOWD,       (AT every      (settle delay,            (read lines
//!   drain)        timeout)       long timeout)             forever)
//! ```
//!
//! Progress is forward-only.  In the listening state each line is turned
//! into at most one [`Event`]; silence re-sends the probe so the modem
//! keeps answering `OK`.  Any transport error ends the worker and is
//! reported to the dispatch loop as [`Event::ModemFault`].
//!
//! Probing has no upper bound.  A supervisor can stop it (or any later
//! state) with the link's [`CancelToken`] and watch progress through
//! [`StateWatch`].

pub mod parser;
pub mod transport;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::thread;
use std::time::Duration;

use log::{debug, error, info, trace};

use crate::error::ModemError;
use crate::events::{Event, EventSender};
use parser::{Response, parse_line};
use transport::LineTransport;

pub const CMD_POWER_DOWN: &[u8] = b"AT+CPOWD=1\n";
pub const CMD_PROBE: &[u8] = b"AT\n";
/// Result codes on, verbose, echo on, `+CREG` and `+CLIP` unsolicited reports.
pub const CMD_INIT: &[u8] = b"ATQ0V1E1+CREG=1;+CLIP=1\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ModemState {
    Resetting = 0,
    Probing = 1,
    SyncEstablished = 2,
    Initialized = 3,
}

impl ModemState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Resetting,
            1 => Self::Probing,
            2 => Self::SyncEstablished,
            _ => Self::Initialized,
        }
    }
}

/// Read-only view of the link's current state, for supervisors.
#[derive(Debug, Clone)]
pub struct StateWatch(Arc<AtomicU8>);

impl StateWatch {
    pub fn get(&self) -> ModemState {
        ModemState::from_u8(self.0.load(Ordering::Acquire))
    }
}

/// Cooperative stop signal, checked between reads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Link timing.  Defaults match the SIM800 on the reference board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTiming {
    pub probe_timeout: Duration,
    pub listen_timeout: Duration,
    pub settle: Duration,
}

impl Default for LinkTiming {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(1),
            listen_timeout: Duration::from_secs(10),
            settle: Duration::from_secs(5),
        }
    }
}

impl From<&crate::config::GatekeeperConfig> for LinkTiming {
    fn from(c: &crate::config::GatekeeperConfig) -> Self {
        Self {
            probe_timeout: Duration::from_millis(c.probe_timeout_ms),
            listen_timeout: Duration::from_millis(c.listen_timeout_ms),
            settle: Duration::from_millis(c.settle_ms),
        }
    }
}

pub struct ModemLink<T> {
    transport: T,
    events: EventSender,
    timing: LinkTiming,
    cancel: CancelToken,
    state: Arc<AtomicU8>,
}

impl<T: LineTransport> ModemLink<T> {
    /// The transport should already use `timing.probe_timeout`.
    pub fn new(transport: T, events: EventSender, timing: LinkTiming) -> Self {
        Self {
            transport,
            events,
            timing,
            cancel: CancelToken::new(),
            state: Arc::new(AtomicU8::new(ModemState::Resetting as u8)),
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state_watch(&self) -> StateWatch {
        StateWatch(Arc::clone(&self.state))
    }

    pub fn state(&self) -> ModemState {
        ModemState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn enter(&self, state: ModemState) {
        self.state.store(state as u8, Ordering::Release);
        debug!("modem: state {:?}", state);
    }

    fn check_cancel(&self) -> Result<(), ModemError> {
        if self.cancel.is_cancelled() {
            Err(ModemError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn read(&mut self) -> Result<Vec<u8>, ModemError> {
        let line = self.transport.read_line()?;
        if !line.is_empty() {
            debug!("GSM: {}", line.escape_ascii());
        }
        Ok(line)
    }

    /// Power the module down and discard everything until it goes quiet.
    pub fn reset(&mut self) -> Result<(), ModemError> {
        self.enter(ModemState::Resetting);
        self.transport.write_command(CMD_POWER_DOWN)?;
        while !self.read()?.is_empty() {
            self.check_cancel()?;
        }
        info!("GSM halted");
        Ok(())
    }

    /// Probe until the modem answers `OK`.  Unbounded unless cancelled.
    pub fn synchronize(&mut self) -> Result<(), ModemError> {
        self.enter(ModemState::Probing);
        loop {
            self.check_cancel()?;
            self.transport.write_command(CMD_PROBE)?;
            loop {
                let line = self.read()?;
                if line.is_empty() {
                    break;
                }
                if parse_line(&line) == Some(Response::Ok) {
                    self.enter(ModemState::SyncEstablished);
                    info!("GSM active");
                    return Ok(());
                }
            }
        }
    }

    /// Wait for boot to finish, then enable registration and caller-ID reports.
    pub fn initialize(&mut self) -> Result<(), ModemError> {
        thread::sleep(self.timing.settle);
        self.check_cancel()?;
        self.transport.set_read_timeout(self.timing.listen_timeout)?;
        self.transport.write_command(CMD_INIT)?;
        self.enter(ModemState::Initialized);
        info!("GSM initialized");
        Ok(())
    }

    /// Translate modem lines into events.  Only returns on error or cancel.
    pub fn listen(&mut self) -> Result<(), ModemError> {
        loop {
            self.check_cancel()?;
            let line = self.read()?;
            if line.is_empty() {
                self.transport.write_command(CMD_PROBE)?;
                continue;
            }
            let event = match parse_line(&line) {
                Some(Response::Ok) => Event::ModemAlive,
                Some(Response::Registration(code)) => Event::RegistrationChanged(code),
                Some(Response::CallerId(number)) => Event::IncomingCall(number),
                None => {
                    trace!("modem: ignoring {}", line.escape_ascii());
                    continue;
                }
            };
            if self.events.send(event).is_err() {
                debug!("modem: event queue closed, stopping");
                return Ok(());
            }
        }
    }

    /// Probe, initialize and listen.  Call [`reset`](Self::reset) first.
    pub fn run(&mut self) -> Result<(), ModemError> {
        self.synchronize()?;
        self.initialize()?;
        self.listen()
    }

    /// Worker entry point: [`run`](Self::run), reporting any failure as
    /// [`Event::ModemFault`] so the dispatch loop can show it.
    pub fn serve(mut self) -> Result<(), ModemError> {
        let result = self.run();
        if let Err(e) = &result {
            error!("GSM ended: {} (state {:?})", e, self.state());
            // The dispatch loop may already be gone; nothing left to tell.
            let _ = self.events.send(Event::ModemFault(e.to_string()));
        }
        result
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}

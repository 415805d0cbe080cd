//! Gate service: the dispatch loop.
//!
//! [`GateService`] is the single owner of control state: modem liveness,
//! registration status, the cached authorization database and both status
//! indicators.  It consumes [`Event`]s one at a time on one thread, so none
//! of that state needs a lock.  All I/O flows through port traits.
//!
//! ```text
//!  Event queue ──▶ ┌─────────────────────────┐ ──▶ OpenerPort
//!                  │       GateService        │ ──▶ EventSink(s)
//!  FilterStore ──▶ │ liveness · CREG · cache  │ ──▶ StatusLed × 2
//!    TimePort  ──▶ └─────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use embedded_hal::digital::OutputPin;
use log::{debug, error, info};

use crate::access::{Database, Decision};
use crate::config::GatekeeperConfig;
use crate::drivers::led_patterns::{FAST, FAULT, HEARTBEAT, OFF, Pattern, SLOW, SOS, VERY_SLOW};
use crate::drivers::status_led::StatusLed;
use crate::error::Error;
use crate::events::{Event, EventReceiver};

use super::events::AppEvent;
use super::ports::{EventSink, FilterStore, OpenerPort, TimePort};

/// Knobs the dispatch loop reads from [`GatekeeperConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// No `OK` for longer than this and the modem LED goes dark.
    pub modem_silence: Duration,
    pub exit_on_modem_fault: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            modem_silence: Duration::from_secs(30),
            exit_on_modem_fault: false,
        }
    }
}

impl From<&GatekeeperConfig> for ServiceSettings {
    fn from(c: &GatekeeperConfig) -> Self {
        Self {
            modem_silence: c.modem_silence(),
            exit_on_modem_fault: c.exit_on_modem_fault,
        }
    }
}

/// The two front-panel LEDs.
pub struct Indicators<L> {
    pub modem: StatusLed<L>,
    pub system: StatusLed<L>,
}

/// Pick the modem LED pattern.  First matching rule wins.
pub fn modem_status_pattern(since_alive: Duration, silence: Duration, registration: u32) -> &'static Pattern {
    if since_alive > silence {
        // Modem is out to lunch
        return &OFF;
    }
    match registration {
        1 => &SLOW,      // registered, home network
        2 => &FAST,      // not registered, searching
        3 => &SOS,       // registration denied
        5 => &VERY_SLOW, // registered, roaming
        _ => &OFF,       // 0 = idle, anything else unknown
    }
}

fn registration_name(code: u32) -> &'static str {
    match code {
        0 => "not registered",
        1 => "registered (home)",
        2 => "searching",
        3 => "denied",
        5 => "registered (roaming)",
        _ => "unknown",
    }
}

// ───────────────────────────────────────────────────────────────
// GateService
// ───────────────────────────────────────────────────────────────

pub struct GateService<L, O, S, T> {
    settings: ServiceSettings,
    leds: Indicators<L>,
    opener: O,
    store: S,
    clock: T,
    sinks: Vec<Box<dyn EventSink>>,
    db: Database,
    last_alive: Instant,
    registration: u32,
    fault: Option<String>,
}

impl<L, O, S, T> GateService<L, O, S, T>
where
    L: OutputPin,
    O: OpenerPort,
    S: FilterStore,
    T: TimePort,
{
    /// `db` is the cache used until the first successful reload.
    pub fn new(
        settings: ServiceSettings,
        mut leds: Indicators<L>,
        opener: O,
        store: S,
        clock: T,
        db: Database,
    ) -> Self {
        leds.system.set_mode(&HEARTBEAT);
        leds.modem.set_mode(&OFF);
        let last_alive = clock.monotonic();
        Self {
            settings,
            leds,
            opener,
            store,
            clock,
            sinks: Vec::new(),
            db,
            last_alive,
            registration: 0,
            fault: None,
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    // ── Loop ──────────────────────────────────────────────────

    /// Handle events until every producer is gone.
    pub fn run(&mut self, events: &EventReceiver) -> Result<(), Error> {
        info!("Dispatch loop running");
        for event in events {
            self.handle(event)?;
        }
        info!("Event queue closed, dispatch loop exiting");
        Ok(())
    }

    /// Apply one event.  Only a modem fault with `exit_on_modem_fault`
    /// set returns an error.
    pub fn handle(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::ModemAlive => {
                self.last_alive = self.clock.monotonic();
            }
            Event::RegistrationChanged(code) => {
                info!("Registration state: {} ({})", code, registration_name(code));
                self.registration = code;
            }
            Event::IncomingCall(number) => self.handle_ring(&number),
            Event::Tick => self.tick(),
            Event::ModemFault(reason) => return self.modem_fault(reason),
        }
        Ok(())
    }

    fn tick(&mut self) {
        if self.fault.is_none() {
            let since = self.clock.monotonic().saturating_duration_since(self.last_alive);
            let pattern = modem_status_pattern(since, self.settings.modem_silence, self.registration);
            self.leds.modem.set_mode(pattern);
        }
        self.leds.modem.pulse();
        self.leds.system.pulse();
    }

    fn modem_fault(&mut self, reason: String) -> Result<(), Error> {
        error!("Modem worker stopped: {}", reason);
        self.leds.modem.set_mode(&FAULT);
        self.leds.system.set_mode(&FAULT);
        self.emit(&AppEvent::ModemFault {
            reason: reason.clone(),
        });
        self.fault = Some(reason.clone());
        if self.settings.exit_on_modem_fault {
            return Err(Error::ModemStopped(reason));
        }
        Ok(())
    }

    // ── Ring handling ─────────────────────────────────────────

    fn handle_ring(&mut self, raw: &[u8]) {
        let shown = raw.escape_ascii().to_string();
        self.emit(&AppEvent::Ring {
            caller: shown.clone(),
        });

        let number = match std::str::from_utf8(raw) {
            Ok(s) if s.is_ascii() => s,
            _ => {
                debug!("Caller ID {} is not ASCII, ignoring call", shown);
                return;
            }
        };

        match self.store.load() {
            Ok(db) => self.db = db,
            Err(e) => error!("Failed to load database, using cached copy: {}", e),
        }

        let now = self.clock.minute_of_week();
        match self.db.evaluate(now, number) {
            Decision::Accept { label } => {
                self.opener.request_open();
                self.emit(&AppEvent::Granted {
                    caller: number.to_string(),
                    label,
                });
            }
            Decision::Reject => {
                debug!("No filter matches {} at {}", number, now);
                self.emit(&AppEvent::Denied {
                    caller: number.to_string(),
                });
            }
        }
    }

    fn emit(&mut self, event: &AppEvent) {
        for sink in &mut self.sinks {
            sink.emit(event);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn registration(&self) -> u32 {
        self.registration
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    pub fn indicators(&self) -> &Indicators<L> {
        &self.leds
    }
}

//! Mock hardware and port adapters for integration tests.
//!
//! Every mock shares its state behind an `Arc` so a test can keep a probe
//! handle after moving the mock into the service or a worker thread.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, OutputPin};

use gatekeeper::access::{Database, MinuteOfWeek};
use gatekeeper::app::events::AppEvent;
use gatekeeper::app::ports::{EventSink, FilterStore, OpenerPort, TimePort};
use gatekeeper::error::DatabaseError;
use gatekeeper::modem::transport::LineTransport;

// ── Output pin ────────────────────────────────────────────────

/// Records every level written, with the time it was written.
#[derive(Clone, Default)]
pub struct MockPin {
    writes: Arc<Mutex<Vec<(bool, Instant)>>>,
}

#[allow(dead_code)]
impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> Vec<bool> {
        self.writes.lock().unwrap().iter().map(|(l, _)| *l).collect()
    }

    pub fn timed(&self) -> Vec<(bool, Instant)> {
        self.writes.lock().unwrap().clone()
    }

    /// Last written level; `false` if never written.
    pub fn is_high(&self) -> bool {
        self.writes.lock().unwrap().last().is_some_and(|(l, _)| *l)
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.writes.lock().unwrap().push((false, Instant::now()));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.writes.lock().unwrap().push((true, Instant::now()));
        Ok(())
    }
}

// ── Opener ────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOpener {
    count: Arc<AtomicUsize>,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl OpenerPort for MockOpener {
    fn request_open(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Filter store ──────────────────────────────────────────────

/// Serves database text from memory; can be switched to fail.
#[derive(Clone)]
pub struct MockStore {
    text: Arc<Mutex<String>>,
    failing: Arc<AtomicBool>,
    loads: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new(text: &str) -> Self {
        Self {
            text: Arc::new(Mutex::new(text.to_string())),
            failing: Arc::new(AtomicBool::new(false)),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_text(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl FilterStore for MockStore {
    fn load(&self) -> Result<Database, DatabaseError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::Io {
                path: "mock.db".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "gone"),
            });
        }
        Ok(Database::parse(&self.text.lock().unwrap()))
    }
}

// ── Clock ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct FakeClock {
    state: Arc<Mutex<(Instant, MinuteOfWeek)>>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn new(minute: u16) -> Self {
        Self {
            state: Arc::new(Mutex::new((Instant::now(), MinuteOfWeek::new(minute).unwrap()))),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.state.lock().unwrap().0 += by;
    }

    pub fn set_minute(&self, minute: u16) {
        self.state.lock().unwrap().1 = MinuteOfWeek::new(minute).unwrap();
    }
}

impl TimePort for FakeClock {
    fn monotonic(&self) -> Instant {
        self.state.lock().unwrap().0
    }

    fn minute_of_week(&self) -> MinuteOfWeek {
        self.state.lock().unwrap().1
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<AppEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ── Modem transport ───────────────────────────────────────────

/// One scripted read result.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Read {
    Line(&'static [u8]),
    Timeout,
}

/// Plays back a read script and records writes.  Running out of script
/// is reported as a broken pipe so the link under test stops.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    reads: Arc<Mutex<VecDeque<Read>>>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    timeouts: Arc<Mutex<Vec<Duration>>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = Read>) -> Self {
        Self {
            reads: Arc::new(Mutex::new(script.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.reads.lock().unwrap().len()
    }
}

impl LineTransport for ScriptedTransport {
    fn write_command(&mut self, command: &[u8]) -> io::Result<()> {
        self.writes.lock().unwrap().push(command.to_vec());
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Vec<u8>> {
        match self.reads.lock().unwrap().pop_front() {
            Some(Read::Line(bytes)) => Ok(bytes.to_vec()),
            Some(Read::Timeout) => Ok(Vec::new()),
            None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "script exhausted")),
        }
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.timeouts.lock().unwrap().push(timeout);
        Ok(())
    }
}

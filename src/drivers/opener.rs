//! Gate opener relay driver.
//!
//! A dedicated worker owns the relay pin and services open requests one at
//! a time: assert, hold for the configured pulse, deassert.  Requests that
//! arrive mid-pulse queue up behind it in FIFO order and each one yields
//! its own full pulse, so a burst of calls can never shorten or merge a
//! pulse.
//!
//! ## Safety contract
//!
//! Only the worker touches the pin.  Callers hold an [`OpenerHandle`],
//! which is cheap to clone and never blocks.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use embedded_hal::digital::OutputPin;
use log::{error, info};

use crate::app::ports::OpenerPort;
use crate::error::Error;

/// Where an open request came from, for the log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenSource {
    Call,
    Bus,
}

/// Cloneable, non-blocking request side of the opener.
#[derive(Debug, Clone)]
pub struct OpenerHandle {
    tx: Sender<OpenSource>,
}

impl OpenerHandle {
    pub fn request(&self, source: OpenSource) {
        if self.tx.send(source).is_err() {
            error!("opener worker is gone, {:?} request dropped", source);
        }
    }

    /// Requests queued but not yet started.
    pub fn pending(&self) -> usize {
        self.tx.len()
    }
}

impl OpenerPort for OpenerHandle {
    fn request_open(&self) {
        self.request(OpenSource::Call);
    }
}

/// Owns the relay pin; run on its own thread.
pub struct Opener<P> {
    pin: P,
    hold: Duration,
    rx: Receiver<OpenSource>,
}

impl<P: OutputPin> Opener<P> {
    pub fn new(pin: P, hold: Duration) -> (Self, OpenerHandle) {
        let (tx, rx) = unbounded();
        (Self { pin, hold, rx }, OpenerHandle { tx })
    }

    /// Service requests until every handle has been dropped.
    pub fn run(self) {
        let Self { mut pin, hold, rx } = self;
        release(&mut pin);
        for source in rx {
            info!("Opening ({:?})", source);
            if let Err(e) = pin.set_high() {
                error!("opener relay: assert failed: {:?}", e);
            }
            thread::sleep(hold);
            release(&mut pin);
        }
    }
}

fn release<P: OutputPin>(pin: &mut P) {
    if let Err(e) = pin.set_low() {
        error!("opener relay: release failed: {:?}", e);
    }
}

impl<P: OutputPin + Send + 'static> Opener<P> {
    /// Start the worker thread and return the request handle.
    pub fn spawn(pin: P, hold: Duration) -> Result<(OpenerHandle, JoinHandle<()>), Error> {
        let (opener, handle) = Self::new(pin, hold);
        let join = crate::drivers::task::spawn_worker("opener", move || opener.run())?;
        Ok((handle, join))
    }
}

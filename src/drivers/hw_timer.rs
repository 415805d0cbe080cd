//! Indicator tick timer.
//!
//! A worker thread that sleeps for the tick interval and pushes
//! [`Event::Tick`] into the event queue.  It stops on its own once the
//! dispatch loop has dropped the receiver.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::Error;
use crate::events::{Event, EventSender};

/// Push one `Tick` per `interval` until the queue is closed.
pub fn run_ticker(interval: Duration, tx: &EventSender) {
    loop {
        thread::sleep(interval);
        if tx.send(Event::Tick).is_err() {
            log::debug!("ticker: event queue closed, stopping");
            return;
        }
    }
}

/// Start the ticker on its own thread.
pub fn start_ticker(interval: Duration, tx: EventSender) -> Result<JoinHandle<()>, Error> {
    crate::drivers::task::spawn_worker("tick", move || run_ticker(interval, &tx))
}

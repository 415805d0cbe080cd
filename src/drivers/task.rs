//! Named worker thread spawning.
//!
//! Every long-lived worker (modem link, ticker, opener, bus listener) runs
//! on its own OS thread.  Threads are named so they show up in `top -H`
//! and in panic messages.

use std::thread::{self, JoinHandle};

use crate::error::Error;

/// Workers only hold a few buffers; keep stacks small on the Pi Zero.
const WORKER_STACK_KB: usize = 256;

/// Spawn a named worker thread.
pub fn spawn_worker<T, F>(name: &'static str, f: F) -> Result<JoinHandle<T>, Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    log::info!("Spawning '{}' (stack={}KB)", name, WORKER_STACK_KB);
    thread::Builder::new()
        .name(name.into())
        .stack_size(WORKER_STACK_KB * 1024)
        .spawn(f)
        .map_err(Error::Spawn)
}

//! Gatekeeper: GSM-controlled gate opener.
//!
//! Exposes the hardware-independent modules for integration testing.  The
//! GPIO character device wiring is behind the `rpi` feature and the bus
//! bridge behind `mqtt`; everything else builds and tests on any host.

#![deny(unused_must_use)]

pub mod access;
pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod logging;
pub mod modem;
pub mod pins;

//! Application core: dispatch logic, zero direct I/O.
//!
//! This module contains the business rules for the gatekeeper: modem
//! status tracking, ring handling and the bus command vocabulary.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;

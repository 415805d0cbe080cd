//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises one subsystem against
//! mock adapters.  Everything runs on the host with no GPIO or serial
//! hardware.

mod mock_hw;
mod modem_tests;
mod opener_tests;

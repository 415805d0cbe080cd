//! GPIO pin assignments for the gatekeeper HAT on a Raspberry Pi.
//!
//! Default values for [`PinMap`](crate::config::PinMap).  Numbers are BCM
//! line offsets on `/dev/gpiochip0`, not header pin numbers.

// ---------------------------------------------------------------------------
// Status indicators
// ---------------------------------------------------------------------------

/// Green LED: system-alive heartbeat.
pub const SYSTEM_OK_GPIO: u32 = 22;
/// Yellow LED: modem registration status.
pub const MODEM_OK_GPIO: u32 = 23;

// ---------------------------------------------------------------------------
// Gate actuator
// ---------------------------------------------------------------------------

/// Relay driving the gate opener input (active HIGH).
pub const OPENER_GPIO: u32 = 27;

// ---------------------------------------------------------------------------
// SIM800 modem board
// ---------------------------------------------------------------------------

/// Modem PWRKEY: a 1.5 s high pulse toggles the module's power state.
pub const MODEM_POWER_GPIO: u32 = 17;

// ---------------------------------------------------------------------------
// UART
// ---------------------------------------------------------------------------

/// PL011 UART wired to the modem.
pub const MODEM_UART: &str = "/dev/ttyAMA0";
/// SIM800 autobaud is locked to this rate on the board.
pub const MODEM_BAUD: u32 = 115_200;

/// GPIO character device exposing the BCM lines.
pub const GPIO_CHIP: &str = "/dev/gpiochip0";

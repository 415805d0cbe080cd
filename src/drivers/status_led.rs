//! Single-colour status indicator driver.
//!
//! Binds a [`PatternEngine`] to an `embedded-hal` output pin.  The pin is
//! only written when the engine crosses a step boundary.  Write failures
//! are logged and otherwise ignored: a dead LED must not stop the
//! dispatch loop.
//!
//! ## Dual-target design
//!
//! On the Pi: `P` is a GPIO character-device line.
//! On host/test: `P` is a recording mock.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use super::led_patterns::{OFF, Pattern, PatternEngine};

pub struct StatusLed<P> {
    name: &'static str,
    pin: P,
    active_low: bool,
    engine: PatternEngine,
}

impl<P: OutputPin> StatusLed<P> {
    /// Starts dark, running [`OFF`].
    pub fn new(name: &'static str, pin: P, active_low: bool) -> Self {
        Self {
            name,
            pin,
            active_low,
            engine: PatternEngine::new(&OFF),
        }
    }

    pub fn set_mode(&mut self, pattern: &'static Pattern) {
        self.engine.set_mode(pattern);
    }

    pub fn pulse(&mut self) {
        if let Some(level) = self.engine.pulse() {
            self.write(level);
        }
    }

    pub fn pattern(&self) -> &'static Pattern {
        self.engine.pattern()
    }

    /// Logical level (true = lit) regardless of wiring polarity.
    pub fn is_lit(&self) -> bool {
        self.engine.level()
    }

    pub fn engine(&self) -> &PatternEngine {
        &self.engine
    }

    fn write(&mut self, level: bool) {
        let state = PinState::from(level ^ self.active_low);
        if let Err(e) = self.pin.set_state(state) {
            warn!("{} LED: write failed: {:?}", self.name, e);
        }
    }
}

//! Indicator pattern engine.
//!
//! Drives one on/off output from a cyclic table of `(ticks, level)` steps.
//! The dispatch loop calls [`PatternEngine::pulse`] once per tick (10 Hz by
//! default); the engine reports a new level only when a step boundary is
//! crossed, so the GPIO is written once per step rather than once per tick.
//!
//! ## Pattern table (ticks at 10 Hz)
//!
//! | Pattern     | Steps                                   | Meaning              |
//! |-------------|-----------------------------------------|----------------------|
//! | HEARTBEAT   | 1 on, 1 off, 1 on, 7 off                | daemon alive         |
//! | SLOW        | 5 on, 5 off                             | registered, home     |
//! | FAST        | 2 on, 2 off                             | searching            |
//! | VERY_SLOW   | 8 on, 2 off                             | roaming              |
//! | SOS         | ··· ––– ··· then 6 off                  | registration denied  |
//! | FAULT       | 1 on, 1 off                             | modem link dead      |
//! | OFF / ON    | constant                                | forced level         |
//!
//! Patterns are `static` items and are compared by address: asking for the
//! pattern that is already running keeps its phase, asking for any other
//! pattern (even one with identical steps) restarts at the first step.

/// One segment of a pattern: hold `level` for `ticks` pulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub ticks: u16,
    pub level: bool,
}

const fn on(ticks: u16) -> Step {
    Step { ticks, level: true }
}

const fn off(ticks: u16) -> Step {
    Step { ticks, level: false }
}

/// A named, immutable, cyclically repeating waveform.
#[derive(Debug, PartialEq, Eq)]
pub struct Pattern {
    pub name: &'static str,
    pub steps: &'static [Step],
}

impl Pattern {
    /// Length of one full cycle in ticks.
    pub fn period(&self) -> u32 {
        self.steps.iter().map(|s| u32::from(s.ticks)).sum()
    }
}

pub static HEARTBEAT: Pattern = Pattern {
    name: "heartbeat",
    steps: &[on(1), off(1), on(1), off(7)],
};

pub static SLOW: Pattern = Pattern {
    name: "slow",
    steps: &[on(5), off(5)],
};

pub static FAST: Pattern = Pattern {
    name: "fast",
    steps: &[on(2), off(2)],
};

pub static VERY_SLOW: Pattern = Pattern {
    name: "very-slow",
    steps: &[on(8), off(2)],
};

pub static OFF: Pattern = Pattern {
    name: "off",
    steps: &[off(1)],
};

pub static ON: Pattern = Pattern {
    name: "on",
    steps: &[on(1)],
};

pub static SOS: Pattern = Pattern {
    name: "sos",
    steps: &[
        on(2), off(2), on(2), off(2), on(2), off(2),
        on(6), off(2), on(6), off(2), on(6), off(2),
        on(2), off(2), on(2), off(2), on(2), off(2),
        off(6),
    ],
};

pub static FAULT: Pattern = Pattern {
    name: "fault",
    steps: &[on(1), off(1)],
};

/// Per-indicator engine state.  Stack-allocated, no heap.
#[derive(Debug)]
pub struct PatternEngine {
    pattern: &'static Pattern,
    /// `None` until the first pulse after a pattern switch.
    position: Option<usize>,
    remaining: i32,
    level: bool,
}

impl PatternEngine {
    pub fn new(pattern: &'static Pattern) -> Self {
        Self {
            pattern,
            position: None,
            remaining: 0,
            level: false,
        }
    }

    /// Switch pattern.  A no-op when `pattern` is the active one.
    pub fn set_mode(&mut self, pattern: &'static Pattern) {
        if core::ptr::eq(self.pattern, pattern) {
            return;
        }
        log::trace!("pattern {} -> {}", self.pattern.name, pattern.name);
        self.pattern = pattern;
        self.position = None;
        self.remaining = 0;
    }

    /// Advance one tick.  Returns `Some(level)` when a new step begins.
    pub fn pulse(&mut self) -> Option<bool> {
        self.remaining -= 1;
        if self.remaining >= 0 {
            return None;
        }
        let steps = self.pattern.steps;
        if steps.is_empty() {
            self.remaining = 0;
            return None;
        }
        let next = self.position.map_or(0, |p| (p + 1) % steps.len());
        let step = steps[next];
        self.position = Some(next);
        // The tick that starts a step counts towards its duration.
        self.remaining = i32::from(step.ticks.max(1)) - 1;
        self.level = step.level;
        Some(step.level)
    }

    pub fn pattern(&self) -> &'static Pattern {
        self.pattern
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn remaining_ticks(&self) -> i32 {
        self.remaining
    }

    /// Logical level of the current step (before any polarity inversion).
    pub fn level(&self) -> bool {
        self.level
    }
}

//! Actuator drivers, hardware initialisation, and worker helpers.

pub mod hw_init;
pub mod hw_timer;
pub mod led_patterns;
pub mod opener;
pub mod status_led;
pub mod task;

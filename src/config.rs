//! System configuration parameters
//!
//! All tunable parameters for the gatekeeper daemon.  Every field has a
//! default matching the reference hardware; a TOML file passed with
//! `--config` only needs to list what differs.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

/// Default MQTT broker port when `--mqtt` omits one.
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatekeeperConfig {
    // --- Modem link ---
    /// Serial device the modem is attached to
    pub serial_device: String,
    /// UART baud rate
    pub baud_rate: u32,
    /// Read timeout while resetting and probing (milliseconds)
    pub probe_timeout_ms: u64,
    /// Read timeout once the modem is initialised (milliseconds)
    pub listen_timeout_ms: u64,
    /// Boot settle delay after the first `OK` (milliseconds)
    pub settle_ms: u64,
    /// Cancel the modem link if it has not synced within this many seconds
    pub startup_timeout_secs: Option<u64>,

    // --- Dispatch loop ---
    /// Indicator tick period (milliseconds)
    pub tick_interval_ms: u64,
    /// Seconds without an `OK` before the modem is considered gone
    pub modem_silence_secs: u64,
    /// Return from the dispatch loop on a modem fault instead of showing FAULT
    pub exit_on_modem_fault: bool,

    // --- Actuators ---
    /// Opener relay hold time (milliseconds)
    pub open_pulse_ms: u64,
    /// Modem PWRKEY pulse at startup (milliseconds)
    pub power_key_pulse_ms: u64,

    // --- Hardware ---
    /// GPIO character device
    pub gpio_chip: String,
    pub pins: PinMap,
    /// Invert indicator outputs (LEDs wired to 3V3)
    pub indicators_active_low: bool,

    // --- Message bus ---
    pub mqtt: Option<MqttConfig>,
}

/// BCM line offsets for every output the daemon drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinMap {
    pub system_ok: u32,
    pub modem_ok: u32,
    pub opener: u32,
    pub modem_power: u32,
}

/// Broker endpoint and topic layout for the bus bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    /// Topics are `<prefix>/ring`, `<prefix>/open` and `<prefix>/cmd`
    pub topic_prefix: String,
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            // Modem link
            serial_device: pins::MODEM_UART.to_string(),
            baud_rate: pins::MODEM_BAUD,
            probe_timeout_ms: 1000,
            listen_timeout_ms: 10_000,
            settle_ms: 5000,
            startup_timeout_secs: None,

            // Dispatch loop
            tick_interval_ms: 100, // 10 Hz
            modem_silence_secs: 30,
            exit_on_modem_fault: false,

            // Actuators
            open_pulse_ms: 1000,
            power_key_pulse_ms: 1500,

            // Hardware
            gpio_chip: pins::GPIO_CHIP.to_string(),
            pins: PinMap::default(),
            indicators_active_low: false,

            mqtt: None,
        }
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            system_ok: pins::SYSTEM_OK_GPIO,
            modem_ok: pins::MODEM_OK_GPIO,
            opener: pins::OPENER_GPIO,
            modem_power: pins::MODEM_POWER_GPIO,
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_MQTT_PORT,
            client_id: "gatekeeper".to_string(),
            topic_prefix: "gatekeeper".to_string(),
        }
    }
}

impl GatekeeperConfig {
    /// Load from a TOML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the daemon misbehave silently.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be non-zero"));
        }
        if self.open_pulse_ms == 0 {
            return Err(ConfigError::Invalid("open_pulse_ms must be non-zero"));
        }
        if self.probe_timeout_ms == 0 || self.listen_timeout_ms == 0 {
            return Err(ConfigError::Invalid("modem read timeouts must be non-zero"));
        }
        let p = self.pins;
        let lines = [p.system_ok, p.modem_ok, p.opener, p.modem_power];
        for (i, a) in lines.iter().enumerate() {
            if lines[i + 1..].contains(a) {
                return Err(ConfigError::Invalid("pin map assigns one GPIO line twice"));
            }
        }
        if let Some(mqtt) = &self.mqtt {
            if mqtt.topic_prefix.trim_matches('/').is_empty() {
                return Err(ConfigError::Invalid("mqtt.topic_prefix must not be empty"));
            }
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn modem_silence(&self) -> Duration {
        Duration::from_secs(self.modem_silence_secs)
    }

    pub fn open_pulse(&self) -> Duration {
        Duration::from_millis(self.open_pulse_ms)
    }
}

impl MqttConfig {
    /// Parse a `host[:port]` endpoint as given on the command line.
    pub fn from_endpoint(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        let (host, port) = match raw.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| ConfigError::Endpoint(raw.to_string()))?;
                (host, port)
            }
            None => (raw, DEFAULT_MQTT_PORT),
        };
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(ConfigError::Endpoint(raw.to_string()));
        }
        Ok(Self {
            host: host.to_string(),
            port,
            ..Self::default()
        })
    }

    pub fn topic(&self, leaf: &str) -> String {
        format!("{}/{leaf}", self.topic_prefix.trim_end_matches('/'))
    }
}

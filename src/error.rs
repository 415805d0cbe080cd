//! Unified error types for the gatekeeper daemon.
//!
//! `Error` covers worker spawning, GPIO and the dispatch loop.  Database,
//! modem link and config failures keep their own types; `main()` wraps
//! whichever it meets in `anyhow` context.

use core::fmt;
use std::io;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Failures of the runtime pieces: workers, GPIO and the dispatch loop.
/// Startup steps return their subsystem error directly.
#[derive(Debug)]
pub enum Error {
    /// The dispatch loop saw the modem worker stop (carries its reason).
    ModemStopped(String),
    /// A GPIO line could not be requested or driven.
    Gpio(String),
    /// A worker thread could not be spawned.
    Spawn(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModemStopped(reason) => write!(f, "modem worker stopped: {reason}"),
            Self::Gpio(msg) => write!(f, "gpio: {msg}"),
            Self::Spawn(e) => write!(f, "thread spawn: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            Self::Gpio(_) | Self::ModemStopped(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Database errors
// ---------------------------------------------------------------------------

/// Only whole-file failures are errors; bad lines are skipped with a warning.
#[derive(Debug)]
pub enum DatabaseError {
    /// The file is missing or unreadable.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for DatabaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Modem errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ModemError {
    /// Read or write on the serial link failed.  Fatal to the modem worker.
    Transport(io::Error),
    /// The link was cancelled through its [`CancelToken`](crate::modem::CancelToken).
    Cancelled,
}

impl fmt::Display for ModemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport fault: {e}"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for ModemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Cancelled => None,
        }
    }
}

impl From<io::Error> for ModemError {
    fn from(e: io::Error) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The config file is not valid TOML for [`GatekeeperConfig`](crate::config::GatekeeperConfig).
    Parse(toml::de::Error),
    /// A value is out of range.
    Invalid(&'static str),
    /// The `--mqtt` endpoint is not `host[:port]`.
    Endpoint(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse(e) => write!(f, "parse error: {e}"),
            Self::Invalid(msg) => write!(f, "invalid value: {msg}"),
            Self::Endpoint(raw) => write!(f, "bad broker endpoint {raw:?}, expected host[:port]"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) | Self::Endpoint(_) => None,
        }
    }
}

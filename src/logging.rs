//! Process-wide logger setup.
//!
//! Default output goes to stderr with a millisecond timestamp.  Under
//! systemd (`--journald`) each line instead carries an sd-daemon
//! `<N>` priority prefix and no timestamp, since the journal stamps
//! records itself.  `RUST_LOG` overrides the verbosity-derived level.

use std::io::Write;

use log::{Level, LevelFilter};

/// `-v` count to level: none = warn, one = info, more = debug.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// syslog priority for a log level, as read by journald from `<N>` prefixes.
pub fn journald_priority(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 6,
        Level::Debug | Level::Trace => 7,
    }
}

/// Install the global logger.  Calling it twice is harmless; the second
/// call leaves the first logger in place.
pub fn init_logging(verbosity: u8, journald: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_for_verbosity(verbosity));
    builder.parse_default_env();

    if journald {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "<{}>{}: {}",
                journald_priority(record.level()),
                record.target(),
                record.args()
            )
        });
    } else {
        builder.format_timestamp_millis();
    }

    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}

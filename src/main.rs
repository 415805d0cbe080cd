//! Gatekeeper daemon: main entry point.
//!
//! Hexagonal layout with one dispatch thread and a few single-purpose
//! workers feeding it through a channel.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                    │
//! │                                                               │
//! │  SerialLines     FileStore     SystemClock    LogEventSink    │
//! │  (modem UART)    (FilterStore) (TimePort)     (EventSink)     │
//! │  CdevPin × 4     OpenerHandle  MqttAnnouncer / bus listener   │
//! │                                                               │
//! │  ──────────────── Port Trait Boundary ───────────────────     │
//! │                                                               │
//! │  ┌───────────────────────────────────────────────────────┐    │
//! │  │           GateService (dispatch loop)                 │    │
//! │  │  liveness · registration · ring · database cache      │    │
//! │  └───────────────────────────────────────────────────────┘    │
//! │                                                               │
//! │  Workers: modem link · ticker · opener relay · bus listener   │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, warn};

use gatekeeper::access::FileStore;
use gatekeeper::adapters::log_sink::LogEventSink;
use gatekeeper::adapters::time::SystemClock;
use gatekeeper::app::ports::FilterStore;
use gatekeeper::app::service::{GateService, Indicators, ServiceSettings};
use gatekeeper::config::{GatekeeperConfig, MqttConfig};
use gatekeeper::drivers::hw_init::{init_outputs, pulse_power_key};
use gatekeeper::drivers::hw_timer::start_ticker;
use gatekeeper::drivers::opener::Opener;
use gatekeeper::drivers::status_led::StatusLed;
use gatekeeper::drivers::task::spawn_worker;
use gatekeeper::events::event_queue;
use gatekeeper::logging::init_logging;
use gatekeeper::modem::transport::SerialLines;
use gatekeeper::modem::{CancelToken, LinkTiming, ModemLink, ModemState, StateWatch};

/// Open the gate for authorized callers.
#[derive(Debug, Parser)]
#[command(name = "gatekeeper", version, about)]
struct Cli {
    /// More output; repeat for debug.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Prefix lines with journald priorities instead of timestamps.
    #[arg(long)]
    journald: bool,

    /// Authorization database, re-read on every call.
    #[arg(short, long, value_name = "FILE")]
    database: PathBuf,

    /// MQTT broker to announce calls on and take commands from.
    #[arg(short, long, value_name = "HOST[:PORT]")]
    mqtt: Option<String>,

    /// Optional TOML settings file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Logging + config ───────────────────────────────────
    init_logging(cli.verbose, cli.journald);
    info!("gatekeeper v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => GatekeeperConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GatekeeperConfig::default(),
    };
    if let Some(endpoint) = &cli.mqtt {
        let base = config.mqtt.take().unwrap_or_default();
        let parsed = MqttConfig::from_endpoint(endpoint).context("parsing --mqtt")?;
        config.mqtt = Some(MqttConfig {
            host: parsed.host,
            port: parsed.port,
            ..base
        });
    }
    config.validate().context("validating config")?;

    // ── 2. Authorization database ─────────────────────────────
    let store = FileStore::new(&cli.database);
    let db = store
        .load()
        .with_context(|| format!("loading database {}", cli.database.display()))?;
    info!("Database loaded: {} filters, {} lines skipped", db.filters().len(), db.skipped());

    // ── 3. Hardware ───────────────────────────────────────────
    let outputs = init_outputs(&config).context("initialising GPIO")?;
    let mut modem_power = outputs.modem_power;
    let active_low = config.indicators_active_low;
    let leds = Indicators {
        modem: StatusLed::new("modem", outputs.modem_ok, active_low),
        system: StatusLed::new("system", outputs.system_ok, active_low),
    };
    let (opener, _opener_join) =
        Opener::spawn(outputs.opener, config.open_pulse()).context("starting opener")?;

    let (tx, rx) = event_queue();

    // ── 4. Bus bridge ─────────────────────────────────────────
    #[cfg(feature = "mqtt")]
    let announcer = match &config.mqtt {
        Some(mqtt) => {
            let (announcer, _join) = gatekeeper::adapters::mqtt::start_bridge(mqtt, opener.clone())
                .context("starting MQTT bridge")?;
            Some(announcer)
        }
        None => None,
    };
    #[cfg(not(feature = "mqtt"))]
    if config.mqtt.is_some() {
        warn!("Built without MQTT support, ignoring broker settings");
    }

    // ── 5. Modem link ─────────────────────────────────────────
    let timing = LinkTiming::from(&config);
    let serial = SerialLines::open(&config.serial_device, config.baud_rate, timing.probe_timeout)
        .with_context(|| format!("opening {}", config.serial_device))?;
    let mut link = ModemLink::new(serial, tx.clone(), timing);
    link.reset().context("halting modem")?;

    if let Some(secs) = config.startup_timeout_secs {
        let watch = link.state_watch();
        let cancel = link.cancel_token();
        spawn_worker("supervisor", move || {
            supervise_startup(&watch, &cancel, Duration::from_secs(secs))
        })?;
    }
    spawn_worker("modem", move || link.serve())?;

    pulse_power_key(&mut modem_power, Duration::from_millis(config.power_key_pulse_ms))
        .context("powering modem")?;

    // ── 6. Ticker + dispatch loop ─────────────────────────────
    start_ticker(config.tick_interval(), tx)?;

    let mut service = GateService::new(
        ServiceSettings::from(&config),
        leds,
        opener,
        store,
        SystemClock::new(),
        db,
    );
    service.add_sink(Box::new(LogEventSink::new()));
    #[cfg(feature = "mqtt")]
    if let Some(announcer) = announcer {
        service.add_sink(Box::new(announcer));
    }

    service.run(&rx)?;
    Ok(())
}

/// Cancel the link if it has not answered a probe within `limit`.
fn supervise_startup(watch: &StateWatch, cancel: &CancelToken, limit: Duration) {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if watch.get() >= ModemState::SyncEstablished {
            return;
        }
        thread::sleep(Duration::from_millis(100));
    }
    warn!("Modem did not answer within {} s, giving up", limit.as_secs());
    cancel.cancel();
}

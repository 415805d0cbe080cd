//! MQTT bus bridge.
//!
//! Two halves sharing one `rumqttc` client:
//!
//! - [`MqttAnnouncer`] is an [`EventSink`] owned by the dispatch loop.  It
//!   publishes `<prefix>/ring` on every call and `<prefix>/open` with the
//!   label (or `anon`) on every grant.  Publishing never blocks the loop.
//! - The listener thread drives the connection, re-subscribes to
//!   `<prefix>/cmd` after every (re)connect, and turns `open` commands into
//!   opener requests without going through the event queue.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};
use rumqttc::{Client, Connection, Event as MqttEvent, Incoming, MqttOptions, QoS};

use crate::app::commands::BusCommand;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::config::MqttConfig;
use crate::drivers::opener::{OpenSource, OpenerHandle};
use crate::error::Error;

const REQUEST_QUEUE_CAP: usize = 16;
const RECONNECT_PAUSE: Duration = Duration::from_secs(1);

pub struct MqttAnnouncer {
    client: Client,
    config: MqttConfig,
}

impl EventSink for MqttAnnouncer {
    fn emit(&mut self, event: &AppEvent) {
        let Some((leaf, payload)) = event.bus_message() else {
            return;
        };
        let topic = self.config.topic(leaf);
        if let Err(e) = self
            .client
            .try_publish(topic.as_str(), QoS::AtMostOnce, false, payload.as_bytes().to_vec())
        {
            warn!("MQTT: publish to {} failed: {}", topic, e);
        }
    }
}

struct BusListener {
    client: Client,
    cmd_topic: String,
    opener: OpenerHandle,
    /// Set on ConnAck, cleared once the subscribe request is queued.
    needs_subscribe: bool,
}

impl BusListener {
    fn run(mut self, mut connection: Connection) {
        for notification in connection.iter() {
            match notification {
                Ok(MqttEvent::Incoming(Incoming::ConnAck(_))) => {
                    info!("Connected to MQTT server");
                    self.needs_subscribe = true;
                }
                Ok(MqttEvent::Incoming(Incoming::Publish(msg))) => {
                    info!(
                        "Received MQTT command {:?} on topic '{}'",
                        String::from_utf8_lossy(&msg.payload),
                        msg.topic
                    );
                    if msg.topic == self.cmd_topic && BusCommand::parse(&msg.payload) == Some(BusCommand::Open) {
                        info!("Opening gate from MQTT command");
                        self.opener.request(OpenSource::Bus);
                    }
                }
                Ok(other) => debug!("MQTT: {:?}", other),
                Err(e) => {
                    warn!("MQTT: connection error: {}, retrying", e);
                    thread::sleep(RECONNECT_PAUSE);
                }
            }
            if self.needs_subscribe {
                self.subscribe();
            }
        }
    }

    /// Never blocks: this thread is the one draining the request queue.
    /// A full queue is retried after the next notification.
    fn subscribe(&mut self) {
        match self.client.try_subscribe(self.cmd_topic.as_str(), QoS::AtMostOnce) {
            Ok(()) => self.needs_subscribe = false,
            Err(e) => warn!("MQTT: subscribe to {} deferred: {}", self.cmd_topic, e),
        }
    }
}

/// Connect (lazily) to the broker and start the listener thread.
pub fn start_bridge(
    config: &MqttConfig,
    opener: OpenerHandle,
) -> Result<(MqttAnnouncer, JoinHandle<()>), Error> {
    let mut options = MqttOptions::new(config.client_id.as_str(), config.host.as_str(), config.port);
    options.set_keep_alive(Duration::from_secs(30));
    let (client, connection) = Client::new(options, REQUEST_QUEUE_CAP);

    let listener = BusListener {
        client: client.clone(),
        cmd_topic: config.topic("cmd"),
        opener,
        needs_subscribe: false,
    };
    let join = crate::drivers::task::spawn_worker("mqtt", move || listener.run(connection))?;

    info!("MQTT bridge to {}:{} (prefix {})", config.host, config.port, config.topic_prefix);
    Ok((
        MqttAnnouncer {
            client,
            config: config.clone(),
        },
        join,
    ))
}

//! Modem link state machine against a scripted transport.

use std::time::Duration;

use gatekeeper::error::ModemError;
use gatekeeper::events::{Event, EventReceiver, event_queue};
use gatekeeper::modem::{CMD_INIT, CMD_POWER_DOWN, CMD_PROBE, LinkTiming, ModemLink, ModemState};

use super::mock_hw::Read::{Line, Timeout};
use super::mock_hw::{Read, ScriptedTransport};

const CLIP: &[u8] = b"+CLIP: \"15551234567\",145,\"\",0,\"\",0\r\n";

fn timing() -> LinkTiming {
    LinkTiming {
        probe_timeout: Duration::from_millis(10),
        listen_timeout: Duration::from_millis(50),
        settle: Duration::ZERO,
    }
}

fn link(script: Vec<Read>) -> (ModemLink<ScriptedTransport>, ScriptedTransport, EventReceiver) {
    let transport = ScriptedTransport::new(script);
    let (tx, rx) = event_queue();
    (ModemLink::new(transport.clone(), tx, timing()), transport, rx)
}

#[test]
fn reset_powers_down_and_drains_until_quiet() {
    let (mut link, transport, _rx) = link(vec![
        Line(b"AT+CPOWD=1\r\n"),
        Line(b"NORMAL POWER DOWN\r\n"),
        Timeout,
        Line(b"OK\r\n"),
    ]);
    link.reset().unwrap();

    assert_eq!(transport.writes(), vec![CMD_POWER_DOWN.to_vec()]);
    assert_eq!(link.state(), ModemState::Resetting);
    // The drain stops at the first silence.
    assert_eq!(transport.remaining(), 1);
}

#[test]
fn synchronize_probes_until_ok() {
    let (mut link, transport, _rx) = link(vec![
        Timeout,
        Line(b"AT\r\n"),
        Timeout,
        Line(b"AT\r\n"),
        Line(b"OK\r\n"),
    ]);
    link.synchronize().unwrap();

    assert_eq!(transport.writes(), vec![CMD_PROBE.to_vec(); 3]);
    assert_eq!(link.state(), ModemState::SyncEstablished);
}

#[test]
fn ok_without_terminator_does_not_sync() {
    let (mut link, _transport, _rx) = link(vec![Line(b"OK"), Timeout]);
    assert!(matches!(link.synchronize(), Err(ModemError::Transport(_))));
    assert_eq!(link.state(), ModemState::Probing);
}

#[test]
fn initialize_switches_to_long_timeout_and_enables_reports() {
    let (mut link, transport, _rx) = link(vec![]);
    link.initialize().unwrap();

    assert_eq!(transport.timeouts(), vec![Duration::from_millis(50)]);
    assert_eq!(transport.writes(), vec![CMD_INIT.to_vec()]);
    assert_eq!(link.state(), ModemState::Initialized);
}

#[test]
fn listen_translates_lines_into_events() {
    let (mut link, transport, rx) = link(vec![
        Line(b"OK\r\n"),
        Line(b"ATQ0V1E1+CREG=1;+CLIP=1\r\n"),
        Line(b"OK\r\n"),
        Line(b"+CREG: 1\r\n"),
        Line(b"RING\r\n"),
        Line(CLIP),
        Line(b"+CREG: 0,1\r\n"),
        Timeout,
        Line(b"OK\r\n"),
    ]);
    let watch = link.state_watch();

    let result = link.run();
    assert!(matches!(result, Err(ModemError::Transport(_))));
    assert_eq!(watch.get(), ModemState::Initialized);

    let events: Vec<Event> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            Event::ModemAlive,
            Event::RegistrationChanged(1),
            Event::IncomingCall(b"15551234567".to_vec()),
            Event::ModemAlive,
        ]
    );
    // Sync probe, init, then one keepalive probe after the silence.
    assert_eq!(
        transport.writes(),
        vec![CMD_PROBE.to_vec(), CMD_INIT.to_vec(), CMD_PROBE.to_vec()]
    );
}

#[test]
fn serve_reports_transport_failure_as_fault_event() {
    let (link, _transport, rx) = link(vec![]);
    assert!(link.serve().is_err());

    match rx.try_recv() {
        Ok(Event::ModemFault(reason)) => assert!(reason.contains("script exhausted")),
        other => panic!("expected ModemFault, got {other:?}"),
    }
}

#[test]
fn cancel_stops_probing() {
    let (link, _transport, rx) = link(vec![Timeout; 100]);
    let cancel = link.cancel_token();
    let watch = link.state_watch();
    cancel.cancel();

    assert!(matches!(link.serve(), Err(ModemError::Cancelled)));
    assert_eq!(watch.get(), ModemState::Probing);
    assert_eq!(rx.try_recv().ok(), Some(Event::ModemFault("cancelled".into())));
}

#[test]
fn listen_stops_quietly_when_queue_is_closed() {
    let (mut link, transport, rx) = link(vec![Line(b"OK\r\n"), Line(b"OK\r\n"), Line(b"OK\r\n")]);
    drop(rx);

    link.run().unwrap();
    assert_eq!(transport.remaining(), 1);
}

#[test]
fn transport_survives_the_link() {
    let (mut link, _transport, _rx) = link(vec![Line(b"OK\r\n")]);
    link.synchronize().unwrap();
    let transport = link.into_transport();
    assert_eq!(transport.remaining(), 0);
}

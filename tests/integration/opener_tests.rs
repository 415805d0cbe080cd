//! Gate opener relay worker: pulse shape and request ordering.

use std::time::Duration;

use gatekeeper::app::ports::OpenerPort;
use gatekeeper::drivers::opener::{OpenSource, Opener};

use super::mock_hw::MockPin;

const HOLD: Duration = Duration::from_millis(30);

#[test]
fn every_request_gets_a_full_pulse() {
    let pin = MockPin::new();
    let (handle, join) = Opener::spawn(pin.clone(), HOLD).unwrap();

    handle.request_open();
    handle.request(OpenSource::Bus);
    handle.request_open();
    drop(handle);
    join.join().unwrap();

    assert_eq!(pin.levels(), vec![false, true, false, true, false, true, false]);

    let writes = pin.timed();
    for pair in writes[1..].chunks(2) {
        let (high, low) = (pair[0], pair[1]);
        assert!(high.0 && !low.0);
        assert!(low.1.duration_since(high.1) >= HOLD);
    }
}

#[test]
fn requests_queue_while_a_pulse_is_running() {
    let pin = MockPin::new();
    let (opener, handle) = Opener::new(pin.clone(), HOLD);

    handle.request_open();
    handle.request_open();
    assert_eq!(handle.pending(), 2);
    assert!(pin.levels().is_empty());

    drop(handle);
    opener.run();
    assert_eq!(pin.levels().iter().filter(|l| **l).count(), 2);
    assert!(!pin.is_high());
}

#[test]
fn cloned_handles_feed_the_same_worker() {
    let pin = MockPin::new();
    let (handle, join) = Opener::spawn(pin.clone(), Duration::from_millis(1)).unwrap();
    let other = handle.clone();

    other.request(OpenSource::Bus);
    handle.request(OpenSource::Call);
    drop(other);
    drop(handle);
    join.join().unwrap();

    assert_eq!(pin.levels().iter().filter(|l| **l).count(), 2);
}

#[test]
fn relay_rests_low_with_no_requests() {
    let pin = MockPin::new();
    let (handle, join) = Opener::spawn(pin.clone(), HOLD).unwrap();
    drop(handle);
    join.join().unwrap();
    assert_eq!(pin.levels(), vec![false]);
}

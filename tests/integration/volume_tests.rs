//! Integration tests for volume persistence, indicator lamps and input
//! fault tolerance.

use crate::mock_hw::{Frame, MockStore, Rig};

use oilstation::app::events::AppEvent;
use oilstation::app::ports::{InputLine, OutputLine};
use oilstation::config::StationConfig;

fn engage(rig: &mut Rig) {
    rig.hw.low = true;
    rig.hw.button = true;
    rig.step(10);
    rig.hw.button = false;
}

#[test]
fn failed_write_is_retried_on_the_next_tick() {
    let mut rig = Rig::new(StationConfig::default(), MockStore::new());
    engage(&mut rig);
    rig.store.fail_writes = true;

    rig.pulse(250, 10);
    assert_eq!(rig.app.volume(), 1);
    assert!(rig.app.volume_unsaved());
    assert!(rig.sink.events.contains(&AppEvent::PersistFailed { volume: 1 }));
    assert_eq!(rig.store.text("oil", "volume"), None);

    rig.store.fail_writes = false;
    rig.step(10);
    assert!(!rig.app.volume_unsaved());
    assert_eq!(rig.store.text("oil", "volume").as_deref(), Some("1"));
    assert!(rig.sink.events.contains(&AppEvent::PersistRecovered { volume: 1 }));
}

#[test]
fn storage_outage_is_reported_once() {
    let mut rig = Rig::new(StationConfig::default(), MockStore::new());
    engage(&mut rig);
    rig.store.fail_writes = true;

    // Three pulses and a few hundred retry ticks inside one outage.
    for _ in 0..3 {
        rig.pulse(250, 1_000);
    }
    assert_eq!(rig.app.volume(), 3);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::PersistFailed { .. })),
        1
    );

    rig.store.fail_writes = false;
    rig.run(1_000, 10);
    assert_eq!(rig.store.text("oil", "volume").as_deref(), Some("3"));
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::PersistRecovered { .. })),
        1
    );

    // A second outage is a new episode.
    rig.store.fail_writes = true;
    rig.pulse(250, 100);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::PersistFailed { .. })),
        2
    );
}

#[test]
fn corrupt_record_loads_as_zero() {
    let overlong = [&b"0000000000000000042"[..], b"1234567890123456789"];
    for bad in [&b"12ab"[..], b"-5", b"", b"4294967296"].into_iter().chain(overlong) {
        let rig = Rig::new(
            StationConfig::default(),
            MockStore::with_record("oil", "volume", bad),
        );
        assert_eq!(rig.app.volume(), 0, "record {:?}", bad);
        assert_eq!(rig.hw.last_frame(), Some(Frame::Number(0)));
        assert!(rig.sink.events.contains(&AppEvent::Started { volume: 0 }));
    }
}

#[test]
fn start_parks_outputs_and_shows_the_volume() {
    let rig = Rig::new(
        StationConfig::default(),
        MockStore::with_record("oil", "volume", b"1234"),
    );
    assert_eq!(rig.app.volume(), 1234);
    assert_eq!(rig.hw.frames, vec![Frame::Number(1234)]);
    for line in OutputLine::ALL {
        assert!(rig.hw.was_written(line), "{:?} not parked", line);
        assert!(!rig.hw.level(line));
    }
}

#[test]
fn under_hood_lamp_tracks_full_switch() {
    let mut rig = Rig::new(StationConfig::default(), MockStore::new());
    rig.hw.full = true;
    rig.step(100);
    assert!(rig.hw.level(OutputLine::UnderHoodFull));

    rig.hw.full = false;
    rig.step(100);
    assert!(!rig.hw.level(OutputLine::UnderHoodFull));
}

#[test]
fn disabled_under_hood_lamp_is_left_alone() {
    let config = StationConfig {
        under_hood_indicator: false,
        ..StationConfig::default()
    };
    let mut rig = Rig::new(config, MockStore::new());
    rig.hw.writes.clear();
    rig.hw.full = true;
    rig.run(500, 100);

    assert!(!rig.hw.was_written(OutputLine::UnderHoodFull));
}

#[test]
fn low_oil_event_fires_once_per_episode() {
    let mut rig = Rig::new(StationConfig::default(), MockStore::new());
    rig.hw.low = true;
    rig.run(1_000, 100);
    rig.hw.low = false;
    rig.run(300, 100);
    rig.hw.low = true;
    rig.run(300, 100);

    assert_eq!(rig.sink.count(|e| *e == AppEvent::LowOil), 2);
    assert!(rig.hw.level(OutputLine::LowIndicator));
}

#[test]
fn failed_read_keeps_the_last_known_value() {
    let mut rig = Rig::new(StationConfig::default(), MockStore::new());
    rig.hw.low = true;
    rig.step(100);
    assert!(rig.hw.level(OutputLine::LowIndicator));

    rig.hw.failing = Some(InputLine::LowLevel);
    rig.hw.low = false;
    rig.run(300, 100);
    assert!(rig.hw.level(OutputLine::LowIndicator));
    assert!(rig.app.inputs().oil_low);

    rig.hw.failing = None;
    rig.step(100);
    assert!(!rig.hw.level(OutputLine::LowIndicator));
}

#[test]
fn counter_survives_a_restart() {
    let mut rig = Rig::new(StationConfig::default(), MockStore::new());
    engage(&mut rig);
    rig.pulse(250, 50);
    rig.pulse(250, 50);
    assert_eq!(rig.app.volume(), 2);

    let store = rig.store;
    let rebooted = Rig::new(StationConfig::default(), store);
    assert_eq!(rebooted.app.volume(), 2);
}

//! Integration tests for the press-and-hold volume reset gesture.

use crate::mock_hw::{Frame, MockStore, Rig};

use oilstation::app::events::AppEvent;
use oilstation::app::ports::{SEGMENTS_ALL_ZERO, SEGMENTS_BLANK};
use oilstation::config::StationConfig;
use oilstation::fsm::StateId;

fn rig_with_volume(volume: &[u8]) -> Rig {
    Rig::new(
        StationConfig::default(),
        MockStore::with_record("oil", "volume", volume),
    )
}

#[test]
fn five_second_hold_resets_and_flashes() {
    let mut rig = rig_with_volume(b"42");
    rig.hw.button = true;

    // Ticks at 0, 100, ..., 8000.
    rig.run(8_100, 100);
    rig.hw.button = false;
    rig.step(100);

    let zeros = Frame::Segments(SEGMENTS_ALL_ZERO);
    let blank = Frame::Segments(SEGMENTS_BLANK);
    assert_eq!(
        rig.hw.frames,
        vec![
            Frame::Number(42),
            Frame::Number(5),
            Frame::Number(4),
            Frame::Number(3),
            Frame::Number(2),
            Frame::Number(1),
            Frame::Number(0),
            zeros,
            blank,
            zeros,
            blank,
            zeros,
            blank,
            Frame::Number(0),
        ]
    );
    assert_eq!(rig.app.volume(), 0);
    assert_eq!(rig.store.text("oil", "volume").as_deref(), Some("0"));
    assert!(rig.sink.events.contains(&AppEvent::VolumeReset { hold_secs: 5 }));
    assert!(rig.sink.events.contains(&AppEvent::FlashFinished));
}

#[test]
fn releasing_early_keeps_the_volume() {
    let mut rig = rig_with_volume(b"42");
    rig.hw.button = true;
    rig.run(2_500, 100);
    rig.hw.button = false;
    rig.step(100);

    assert_eq!(rig.app.volume(), 42);
    assert_eq!(rig.store.write_count, 0);
    assert_eq!(rig.hw.last_frame(), Some(Frame::Number(42)));
    assert!(
        rig.sink
            .events
            .contains(&AppEvent::CountdownCancelled { volume: 42 })
    );
}

#[test]
fn reset_expires_at_exactly_the_hold_time() {
    let mut rig = rig_with_volume(b"7");
    rig.hw.button = true;

    // Ticks at 0, 100, ..., 4900: one whole second is still owed.
    rig.run(5_000, 100);
    assert_eq!(rig.app.volume(), 7);
    assert_eq!(rig.hw.last_frame(), Some(Frame::Number(1)));

    rig.step(100);
    assert_eq!(rig.app.volume(), 0);
}

#[test]
fn low_oil_cancels_a_countdown() {
    let mut rig = rig_with_volume(b"42");
    rig.hw.button = true;
    rig.run(1_500, 100);

    // Low oil turns the held button into a fill request.
    rig.hw.low = true;
    rig.step(10);

    assert_eq!(rig.app.volume(), 42);
    assert_eq!(rig.app.state(), StateId::PumpA);
    assert!(
        rig.sink
            .events
            .contains(&AppEvent::CountdownCancelled { volume: 42 })
    );
}

#[test]
fn no_fill_starts_during_the_flash() {
    let mut rig = rig_with_volume(b"42");
    rig.hw.button = true;
    rig.run(5_100, 100);
    assert_eq!(rig.app.volume(), 0);

    rig.hw.low = true;
    rig.run(2_900, 100);
    assert_eq!(rig.app.state(), StateId::Stopped);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::PumpEngaged), 0);

    // The flash ends on this tick and the held button starts a fill.
    rig.step(10);
    assert!(rig.sink.events.contains(&AppEvent::FlashFinished));
    assert_eq!(rig.app.state(), StateId::PumpA);
}

#[test]
fn shorter_hold_from_config() {
    let config = StationConfig {
        reset_hold_secs: 2,
        flash_cycles: 1,
        ..StationConfig::default()
    };
    let mut rig = Rig::new(config, MockStore::with_record("oil", "volume", b"9"));
    rig.hw.button = true;
    rig.run(2_100, 100);

    assert_eq!(rig.app.volume(), 0);
    assert!(rig.sink.events.contains(&AppEvent::VolumeReset { hold_secs: 2 }));
}

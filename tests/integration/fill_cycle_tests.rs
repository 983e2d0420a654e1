//! Integration tests for the fill cycle: start condition, pulse counting,
//! the no-flow pump swap and the full-tank stop.

use crate::mock_hw::{Frame, MockStore, Rig};

use oilstation::app::events::AppEvent;
use oilstation::app::ports::{InputLine, OutputLine};
use oilstation::config::StationConfig;
use oilstation::fsm::StateId;

fn engaged_rig(store: MockStore) -> Rig {
    let mut rig = Rig::new(StationConfig::default(), store);
    rig.hw.low = true;
    rig.hw.button = true;
    rig.step(10);
    rig.hw.button = false;
    rig
}

#[test]
fn low_oil_and_button_engage_pump_a() {
    let rig = engaged_rig(MockStore::new());

    assert_eq!(rig.app.state(), StateId::PumpA);
    assert!(rig.hw.level(OutputLine::PumpRelayA));
    assert!(rig.hw.level(OutputLine::PumpLedA));
    assert!(!rig.hw.level(OutputLine::PumpRelayB));
    assert!(rig.hw.level(OutputLine::LowIndicator));
    assert!(rig.sink.events.contains(&AppEvent::LowOil));
    assert!(rig.sink.events.contains(&AppEvent::PumpEngaged));
}

#[test]
fn button_alone_does_not_pump() {
    let mut rig = Rig::new(StationConfig::default(), MockStore::new());
    rig.hw.button = true;
    rig.run(500, 100);

    assert_eq!(rig.app.state(), StateId::Stopped);
    assert!(!rig.hw.level(OutputLine::PumpRelayA));
    assert_eq!(rig.sink.count(|e| *e == AppEvent::PumpEngaged), 0);
}

#[test]
fn confirmed_pulse_counts_and_persists() {
    let mut rig = engaged_rig(MockStore::with_record("oil", "volume", b"42"));
    assert_eq!(rig.app.volume(), 42);

    rig.pulse(250, 100);

    assert_eq!(rig.app.volume(), 43);
    assert_eq!(rig.store.text("oil", "volume").as_deref(), Some("43"));
    assert_eq!(rig.hw.last_frame(), Some(Frame::Number(43)));
    assert!(rig.sink.events.contains(&AppEvent::PulseCounted(43)));
}

#[test]
fn short_spike_is_rejected() {
    let mut rig = engaged_rig(MockStore::with_record("oil", "volume", b"42"));

    rig.pulse(100, 100);

    assert_eq!(rig.app.volume(), 42);
    assert_eq!(rig.store.write_count, 0);
}

#[test]
fn tank_full_stops_the_cycle() {
    let mut rig = engaged_rig(MockStore::new());
    rig.pulse(250, 50);

    rig.hw.low = false;
    rig.hw.full = true;
    rig.step(10);

    assert_eq!(rig.app.state(), StateId::Stopped);
    assert!(!rig.hw.level(OutputLine::PumpRelayA));
    assert!(!rig.hw.level(OutputLine::PumpLedA));
    assert!(rig.hw.level(OutputLine::UnderHoodFull));
    assert!(rig.sink.events.contains(&AppEvent::OilFull { volume: 1 }));
    assert_eq!(rig.hw.last_frame(), Some(Frame::Number(1)));
    assert_eq!(rig.app.fault_flags(), 0);
}

#[test]
fn no_flow_swaps_pumps_once_per_timeout() {
    let mut rig = engaged_rig(MockStore::new());

    rig.run(59_980, 10);
    assert_eq!(rig.app.state(), StateId::PumpA);

    rig.run(1_020, 10);
    assert_eq!(rig.app.state(), StateId::PumpB);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::PumpSwitched { .. })),
        1
    );
    assert!(rig.sink.events.contains(&AppEvent::PumpSwitched {
        from: StateId::PumpA,
        to: StateId::PumpB,
    }));
    assert!(rig.hw.level(OutputLine::PumpRelayB));
    assert!(!rig.hw.level(OutputLine::PumpRelayA));
    assert!(!rig.hw.overlap_seen);
}

#[test]
fn pulses_keep_the_active_pump() {
    let mut rig = engaged_rig(MockStore::new());

    // One confirmed pulse every 40 s keeps the swap timer from expiring.
    for _ in 0..3 {
        rig.run(40_000, 10);
        rig.pulse(250, 10);
    }

    assert_eq!(rig.app.state(), StateId::PumpA);
    assert_eq!(rig.app.volume(), 3);
}

#[test]
fn broken_full_wire_never_starts_a_cycle() {
    let mut rig = Rig::new(StationConfig::default(), MockStore::new());
    rig.hw.low = true;
    rig.hw.full = true;
    rig.hw.button = true;
    rig.run(1_000, 100);

    assert_eq!(rig.app.state(), StateId::Stopped);
    assert!(!rig.hw.was_written_on(OutputLine::PumpRelayA));
}

#[test]
fn unreadable_full_switch_from_boot_never_starts_a_cycle() {
    let mut rig = Rig::new(StationConfig::default(), MockStore::new());
    rig.hw.failing = Some(InputLine::FullLevel);
    rig.hw.low = true;
    rig.hw.button = true;
    rig.hw.full = true;
    rig.run(1_000, 100);

    assert_eq!(rig.app.state(), StateId::Stopped);
    assert!(rig.app.inputs().tank_full);
    assert!(!rig.hw.was_written_on(OutputLine::PumpRelayA));
    assert!(!rig.hw.was_written_on(OutputLine::PumpRelayB));

    // Once the switch reads and says there is room, the button works.
    rig.hw.failing = None;
    rig.hw.full = false;
    rig.step(100);
    assert_eq!(rig.app.state(), StateId::PumpA);
}

#[test]
fn tick_interval_follows_state() {
    let mut rig = Rig::new(StationConfig::default(), MockStore::new());
    let idle = rig
        .app
        .tick(rig.now, &mut rig.hw, &mut rig.store, &mut rig.sink);
    assert_eq!(idle, 100);

    rig.hw.low = true;
    rig.hw.button = true;
    let filling = rig
        .app
        .tick(rig.now, &mut rig.hw, &mut rig.store, &mut rig.sink);
    assert_eq!(filling, 10);
}

#[test]
fn clock_wraparound_mid_cycle() {
    let mut rig = Rig::starting_at(StationConfig::default(), MockStore::new(), u32::MAX - 99);
    rig.hw.low = true;
    rig.hw.button = true;
    rig.step(10);
    rig.hw.button = false;

    // The pulse straddles the u32 rollover.
    rig.pulse(250, 50);
    assert_eq!(rig.app.volume(), 1);

    rig.run(59_000, 10);
    assert_eq!(rig.app.state(), StateId::PumpA);
    rig.run(2_000, 10);
    assert_eq!(rig.app.state(), StateId::PumpB);
    assert!(!rig.hw.overlap_seen);
}

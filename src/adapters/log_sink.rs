//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (which goes to UART / USB-CDC in production). The wording of the
//! status lines matches what operators already watch for on the console.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { volume } => {
                info!("START | oil volume={}", volume);
            }
            AppEvent::LowOil => info!("Low Oil"),
            AppEvent::PumpEngaged => info!("Pump Engaged"),
            AppEvent::PumpSwitched { from, to } => {
                info!("PUMP | no flow, switching {:?} -> {:?}", from, to);
            }
            AppEvent::PulseCounted(volume) => {
                log::debug!("FLOW | pulse, volume={}", volume);
            }
            AppEvent::OilFull { volume } => {
                info!("Oil Full");
                info!("FILL | complete, volume={}", volume);
            }
            AppEvent::CountdownStarted { hold_secs } => {
                info!("RESET | hold button {}s to reset", hold_secs);
            }
            AppEvent::CountdownCancelled { volume } => {
                info!("RESET | cancelled, volume={}", volume);
            }
            AppEvent::VolumeReset { hold_secs } => {
                info!(
                    "Button held for {} seconds. Resetting oil volume.",
                    hold_secs
                );
            }
            AppEvent::FlashFinished => info!("RESET | done"),
            AppEvent::PersistFailed { volume } => {
                warn!("STORE | volume {} not saved, will retry", volume);
            }
            AppEvent::PersistRecovered { volume } => {
                info!("STORE | volume {} saved", volume);
            }
            AppEvent::SafetyFault(flags) => {
                error!("FAULT | interlock tripped, flags=0b{:08b}", flags);
            }
        }
    }
}

//! GPIO pin assignments for the oil station controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//! The display pins are also claimed as typed `esp_idf_hal` pins in `main`;
//! keep both in step.

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Flow meter pulse output. HIGH while a pulse is present.
pub const FLOW_PULSE_GPIO: i32 = 4;
/// Fill button (external switch to 3V3). HIGH = pressed.
pub const FILL_BUTTON_GPIO: i32 = 5;
/// Low-level float switch. HIGH = oil low.
pub const LOW_LEVEL_GPIO: i32 = 6;
/// Full-level float switch. LOW = tank full, so a broken wire reads full.
pub const FULL_LEVEL_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Pump relays (active-low relay board)
// ---------------------------------------------------------------------------

pub const PUMP_RELAY_A_GPIO: i32 = 15;
pub const PUMP_RELAY_B_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Pump A running LED.
pub const PUMP_LED_A_GPIO: i32 = 9;
/// Pump B running LED.
pub const PUMP_LED_B_GPIO: i32 = 8;
/// Dashboard "low oil" lamp.
pub const LOW_INDICATOR_GPIO: i32 = 13;
/// Under-hood "tank full" lamp (optional, see `StationConfig`).
pub const UNDER_HOOD_FULL_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// 4-digit display (TM1637 two-wire bus)
// ---------------------------------------------------------------------------

pub const DISPLAY_CLK_GPIO: i32 = 17;
pub const DISPLAY_DIO_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Groupings used by hw_init
// ---------------------------------------------------------------------------

/// Every digital input line.
pub const INPUT_GPIOS: [i32; 4] = [
    FLOW_PULSE_GPIO,
    FILL_BUTTON_GPIO,
    LOW_LEVEL_GPIO,
    FULL_LEVEL_GPIO,
];

/// Relay outputs, parked HIGH (de-energised) at boot.
pub const RELAY_GPIOS: [i32; 2] = [PUMP_RELAY_A_GPIO, PUMP_RELAY_B_GPIO];

/// Plain active-high lamp outputs, parked LOW at boot.
pub const LAMP_GPIOS: [i32; 4] = [
    PUMP_LED_A_GPIO,
    PUMP_LED_B_GPIO,
    LOW_INDICATOR_GPIO,
    UNDER_HOOD_FULL_GPIO,
];

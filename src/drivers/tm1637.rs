//! TM1637 4-digit LED display driver.
//!
//! Bit-banged two-wire bus over any `embedded-hal` 1.0 output pins plus a
//! microsecond delay. The chip's ACK bit is clocked but not sampled, so DIO
//! only needs to be an output. On the board it is open-drain: a `set_high`
//! releases the line to its pull-up and the chip can pull it low to ACK.
//!
//! ## Frame sequence
//!
//! ```text
//!  START 0x40 STOP              data command, auto-increment address
//!  START 0xC0 d0 d1 d2 d3 STOP  write four digits from address 0
//!  START 0x88|b STOP            display on, brightness b (0..=7)
//! ```
//!
//! Bytes go out LSB first, DIO changing only while CLK is low.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::adapters::display::SegmentWriter;
use crate::error::DisplayError;

const CMD_DATA_AUTO_INCREMENT: u8 = 0x40;
const CMD_ADDRESS_ZERO: u8 = 0xC0;
const CMD_DISPLAY_ON: u8 = 0x88;

/// Highest brightness step the chip supports.
pub const MAX_BRIGHTNESS: u8 = 7;

/// Half bit period. The chip tolerates up to ~250 kHz.
const BIT_DELAY_US: u32 = 5;

pub struct Tm1637<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    brightness: u8,
}

impl<CLK, DIO, D> Tm1637<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: OutputPin,
    D: DelayNs,
{
    pub fn new(clk: CLK, dio: DIO, delay: D, brightness: u8) -> Self {
        Self {
            clk,
            dio,
            delay,
            brightness: brightness.min(MAX_BRIGHTNESS),
        }
    }

    /// Write four raw segment bytes, left digit first.
    pub fn write_frame(&mut self, segments: [u8; 4]) -> Result<(), DisplayError> {
        self.command(CMD_DATA_AUTO_INCREMENT)?;

        self.start()?;
        self.write_byte(CMD_ADDRESS_ZERO)?;
        for byte in segments {
            self.write_byte(byte)?;
        }
        self.stop()?;

        self.command(CMD_DISPLAY_ON | self.brightness)
    }

    // ── Bus primitives ────────────────────────────────────────

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.start()?;
        self.write_byte(cmd)?;
        self.stop()
    }

    fn start(&mut self) -> Result<(), DisplayError> {
        self.dio_high()?;
        self.clk_high()?;
        self.pause();
        self.dio_low()?;
        self.pause();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DisplayError> {
        self.clk_low()?;
        self.pause();
        self.dio_low()?;
        self.pause();
        self.clk_high()?;
        self.pause();
        self.dio_high()?;
        self.pause();
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        for bit in 0..8 {
            self.clk_low()?;
            if byte & (1 << bit) != 0 {
                self.dio_high()?;
            } else {
                self.dio_low()?;
            }
            self.pause();
            self.clk_high()?;
            self.pause();
        }

        // ACK slot: release DIO and clock once.
        self.clk_low()?;
        self.dio_high()?;
        self.pause();
        self.clk_high()?;
        self.pause();
        self.clk_low()?;
        Ok(())
    }

    fn pause(&mut self) {
        self.delay.delay_us(BIT_DELAY_US);
    }

    fn clk_high(&mut self) -> Result<(), DisplayError> {
        self.clk.set_high().map_err(|_| DisplayError::Bus)
    }

    fn clk_low(&mut self) -> Result<(), DisplayError> {
        self.clk.set_low().map_err(|_| DisplayError::Bus)
    }

    fn dio_high(&mut self) -> Result<(), DisplayError> {
        self.dio.set_high().map_err(|_| DisplayError::Bus)
    }

    fn dio_low(&mut self) -> Result<(), DisplayError> {
        self.dio.set_low().map_err(|_| DisplayError::Bus)
    }
}

impl<CLK, DIO, D> SegmentWriter for Tm1637<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: OutputPin,
    D: DelayNs,
{
    fn write_segments(&mut self, segments: [u8; 4]) -> Result<(), DisplayError> {
        self.write_frame(segments)
    }
}

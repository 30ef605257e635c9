//! UC8179 command definitions
//!
//! Opcodes understood by the panel controller. Commands are sent with the DC
//! pin low, their payload bytes with DC high.
//!
//! ## Example
//!
//! ```rust,no_run
//! use uc8179::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! let _ = interface.send_command(command::PANEL_SETTING);
//! let _ = interface.send_data(&[0x0F]);
//! ```

// Power and panel setup

/// Panel setting (0x00)
///
/// 1 byte. Selects LUT source, colour mode and scan direction.
/// `0x0F` = normal scan, `0x03` = mirrored (180 degrees), `0x1F` = partial LUT.
pub const PANEL_SETTING: u8 = 0x00;

/// Power setting (0x01)
///
/// 4 bytes: `[VGH/VGL, VGH/VGL, VDH, VDL]`.
pub const POWER_SETTING: u8 = 0x01;

/// Power off (0x02)
///
/// BUSY is asserted until the charge pumps have discharged.
pub const POWER_OFF: u8 = 0x02;

/// Power on (0x04)
///
/// BUSY is asserted until the charge pumps are up.
pub const POWER_ON: u8 = 0x04;

/// Booster soft-start (0x06)
///
/// 4 bytes of phase timing.
pub const BOOSTER_SOFT_START: u8 = 0x06;

/// Deep sleep (0x07)
///
/// Requires [`DEEP_SLEEP_CHECK`] as its only payload byte. Only a hardware
/// reset leaves deep sleep.
pub const DEEP_SLEEP: u8 = 0x07;

/// Check code that must follow [`DEEP_SLEEP`]
pub const DEEP_SLEEP_CHECK: u8 = 0xA5;

// Image data

/// Transfer old/base data (0x10)
///
/// Followed by one full plane (or one window) of previous-image bytes.
pub const TRANSFER_OLD_DATA: u8 = 0x10;

/// Display refresh (0x12)
///
/// Starts the waveform. BUSY is asserted for the duration of the refresh.
pub const DISPLAY_REFRESH: u8 = 0x12;

/// Transfer new data (0x13)
pub const TRANSFER_NEW_DATA: u8 = 0x13;

/// Dual SPI / reserved setting (0x15)
///
/// Written as `0x00` during full init.
pub const DUAL_SPI: u8 = 0x15;

// Timing

/// VCOM and data interval setting (0x50)
///
/// 2 bytes during init (border/data polarity, interval). 1 byte before deep
/// sleep to float the border.
pub const VCOM_DATA_INTERVAL: u8 = 0x50;

/// TCON setting (0x60)
pub const TCON_SETTING: u8 = 0x60;

/// Resolution setting (0x61)
///
/// 4 bytes: `[width_hi, width_lo, height_hi, height_lo]`.
pub const RESOLUTION_SETTING: u8 = 0x61;

// Partial update

/// Partial window (0x90)
///
/// 9 bytes: 8 coordinate bytes (see [`crate::window::encode_window`]) and a
/// trailing scan mode byte, [`PARTIAL_SCAN_INSIDE`].
pub const PARTIAL_WINDOW: u8 = 0x90;

/// Enter partial mode (0x91)
pub const PARTIAL_IN: u8 = 0x91;

/// Exit partial mode (0x92)
pub const PARTIAL_OUT: u8 = 0x92;

/// Trailing byte of [`PARTIAL_WINDOW`]: gates scan inside the window only
pub const PARTIAL_SCAN_INSIDE: u8 = 0x01;

// Vendor extension

/// Cascade setting (0xE0)
///
/// `0x02` enables the forced temperature value written with [`FORCE_TEMPERATURE`].
pub const CASCADE_SETTING: u8 = 0xE0;

/// Force temperature (0xE5)
///
/// Selects a faster waveform by pretending a given panel temperature.
pub const FORCE_TEMPERATURE: u8 = 0xE5;

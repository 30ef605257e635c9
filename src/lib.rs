//! UC8179 E-Paper Display Driver
//!
//! A driver for UC8179-class e-paper controllers driving monochrome panels up
//! to 800x600 pixels, such as the 7.5" 800x480 modules.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Full, fast, partial and 180 degree init sequences
//! - Partial window updates, including multi-glyph windows
//! - Bounded busy waits with a configurable poll budget
//! - Counter overlay for the bottom-right corner
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use uc8179::{Builder, Dimensions, Display, Interface, PartialWindow};
//!
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
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst, busy);
//! let dims = match Dimensions::new(800, 480) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().dimensions(dims).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config);
//! let _ = display.init_full(&mut delay);
//! let _ = display.fill_white(&mut delay);
//!
//! let _ = display.init_part(&mut delay);
//! let window = PartialWindow::new(0, 0, 16, 32);
//! let _ = display.write_window(&window, &[0xFF; 64], &mut delay);
//!
//! let _ = display.deep_sleep(&mut delay);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// Bounded wait on the BUSY line
pub mod busy;
/// Pixel colors for monochrome panels
pub mod color;
/// UC8179 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;
/// Counter overlay rendering
pub mod overlay;
/// Partial window geometry and encoding
pub mod window;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

#[cfg(test)]
mod mock;

pub use busy::BusyGate;
pub use color::Color;
pub use config::{
    BoardPins, Builder, Config, DEFAULT_BUSY_MAX_POLLS, Dimensions, MAX_HEIGHT, MAX_WIDTH,
};
pub use display::{Display, MAX_MULTIPLEX_SOURCES, PanelState};
pub use error::{BoundaryWrapWarning, BuilderError, Error};
pub use interface::{DisplayInterface, Interface, InterfaceError};
pub use overlay::{OverlayRenderer, Unit};
pub use window::{EncodedWindow, PartialWindow, encode_window};

#[cfg(feature = "graphics")]
pub use graphics::GraphicDisplay;

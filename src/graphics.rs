//! Graphics support via embedded-graphics
//!
//! This module provides the [`GraphicDisplay`] struct which wraps [`Display`]
//! and implements the [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) trait from
//! the embedded-graphics ecosystem. Drawing only touches the caller's frame
//! buffer; nothing reaches the panel until an update method is called.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     prelude::*,
//!     primitives::{Rectangle, PrimitiveStyle},
//!     text::Text,
//! };
//! use uc8179::{Color, GraphicDisplay};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
//! # use uc8179::{Builder, Dimensions, Display, Interface};
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
//! # let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! # let dims = match Dimensions::new(800, 480) {
//! #     Ok(dims) => dims,
//! #     Err(_) => return,
//! # };
//! # let config = match Builder::new().dimensions(dims).build() {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! # let mut driver = Display::new(interface, config);
//! # let mut delay = MockDelay;
//! let _ = driver.init_full(&mut delay);
//! let mut display = GraphicDisplay::new(driver, vec![0u8; dims.plane_byte_count()]);
//!
//! display.clear(Color::White);
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Color::Black))
//!     .draw(&mut display);
//! let _ = Text::new(
//!     "Hello, E-Paper!",
//!     Point::new(10, 100),
//!     MonoTextStyle::new(&FONT_6X10, Color::Black),
//! )
//! .draw(&mut display);
//!
//! let _ = display.update_base_map(&mut delay);
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};
use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::display::Display;
use crate::error::Error;
use crate::interface::DisplayInterface;

/// Display with a frame buffer for the new-data plane
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `B` - Buffer type implementing `AsMut<[u8]>`, exactly one plane long
pub struct GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsMut<[u8]>,
{
    /// The underlying display driver
    display: Display<I>,
    /// Packed frame, one bit per pixel
    buffer: B,
}

type GraphicsResult<I> = core::result::Result<(), Error<I>>;
type GraphicsNewResult<I, T> = core::result::Result<T, Error<I>>;

impl<I, B> GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsMut<[u8]>,
{
    /// Create a new GraphicDisplay
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is not exactly `dimensions.plane_byte_count()` bytes.
    pub fn new(display: Display<I>, mut buffer: B) -> Self {
        let required = display.config().plane_byte_count();
        assert!(
            buffer.as_mut().len() == required,
            "frame buffer size mismatch: required {} bytes, got {}",
            required,
            buffer.as_mut().len()
        );
        Self { display, buffer }
    }

    /// Try to create a new GraphicDisplay
    ///
    /// This is the fallible version of [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if `buffer` is not exactly one
    /// plane long.
    pub fn try_new(display: Display<I>, mut buffer: B) -> GraphicsNewResult<I, Self> {
        let expected = display.config().plane_byte_count();
        let provided = buffer.as_mut().len();
        if provided != expected {
            return Err(Error::BufferSizeMismatch { expected, provided });
        }
        Ok(Self { display, buffer })
    }

    /// Fill the frame buffer with one color
    pub fn clear(&mut self, color: Color) {
        self.buffer.as_mut().fill(color.plane_byte());
    }

    /// Push the frame with the fast full refresh
    ///
    /// See [`Display::write_full_frame_fast`].
    pub fn update_fast<D: DelayNs>(&mut self, delay: &mut D) -> GraphicsResult<I> {
        self.display.write_full_frame_fast(self.buffer.as_mut(), delay)
    }

    /// Push the frame as the base image for later partial updates
    ///
    /// The frame is sent as both planes. See [`Display::set_base_map`].
    pub fn update_base_map<D: DelayNs>(&mut self, delay: &mut D) -> GraphicsResult<I> {
        let frame: &[u8] = self.buffer.as_mut();
        self.display.set_base_map(frame, frame, delay)
    }

    /// Get a reference to the underlying display
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Get a mutable reference to the underlying display
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// Release the driver and the frame buffer
    pub fn release(self) -> (Display<I>, B) {
        (self.display, self.buffer)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let width = u32::from(self.display.dimensions().width);
        let index = (y * (width / 8) + x / 8) as usize;
        let bit = 0x80u8 >> (x % 8);

        let Some(byte) = self.buffer.as_mut().get_mut(index) else {
            return;
        };
        if color.is_ink() {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
    }
}

impl<I, B> DrawTarget for GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let sz = self.size();

        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }

            let x = x as u32;
            let y = y as u32;

            if x >= sz.width || y >= sz.height {
                continue;
            }

            self.set_pixel(x, y, color);
        }

        Ok(())
    }
}

impl<I, B> OriginDimensions for GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsMut<[u8]>,
{
    fn size(&self) -> Size {
        let dims = self.display.dimensions();
        Size::new(u32::from(dims.width), u32::from(dims.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{TRANSFER_NEW_DATA, TRANSFER_OLD_DATA};
    use crate::mock::{MockDelay, MockInterface, test_config};
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    fn graphic(width: u16, height: u16) -> GraphicDisplay<MockInterface, Vec<u8>> {
        let mut display = Display::new(MockInterface::new(), test_config(width, height));
        display.init_full(&mut MockDelay::default()).unwrap();
        let len = display.config().plane_byte_count();
        GraphicDisplay::new(display, vec![0u8; len])
    }

    #[test]
    fn test_size_matches_dimensions() {
        let gd = graphic(800, 480);
        assert_eq!(gd.size(), Size::new(800, 480));
    }

    #[test]
    fn test_try_new_rejects_wrong_buffer() {
        let display = Display::new(MockInterface::new(), test_config(16, 4));
        let result = GraphicDisplay::try_new(display, vec![0u8; 7]);
        assert!(matches!(
            result,
            Err(Error::BufferSizeMismatch {
                expected: 8,
                provided: 7
            })
        ));

        let display = Display::new(MockInterface::new(), test_config(16, 4));
        assert!(GraphicDisplay::try_new(display, vec![0u8; 8]).is_ok());
    }

    #[test]
    #[should_panic(expected = "frame buffer size mismatch")]
    fn test_new_panics_on_wrong_buffer() {
        let display = Display::new(MockInterface::new(), test_config(16, 4));
        let _ = GraphicDisplay::new(display, vec![0u8; 9]);
    }

    #[test]
    fn test_pixels_pack_msb_first() {
        let mut gd = graphic(16, 4);
        Pixel(Point::new(0, 0), Color::Black).draw(&mut gd).unwrap();
        Pixel(Point::new(9, 1), Color::Black).draw(&mut gd).unwrap();
        Pixel(Point::new(16, 0), Color::Black).draw(&mut gd).unwrap();
        Pixel(Point::new(-1, 0), Color::Black).draw(&mut gd).unwrap();

        let (_, buffer) = gd.release();
        assert_eq!(buffer, vec![0x80, 0x00, 0x00, 0x40, 0, 0, 0, 0]);
    }

    #[test]
    fn test_white_clears_ink() {
        let mut gd = graphic(16, 4);
        gd.clear(Color::Black);
        Rectangle::new(Point::new(0, 0), Size::new(8, 1))
            .into_styled(PrimitiveStyle::with_fill(Color::White))
            .draw(&mut gd)
            .unwrap();

        let (_, buffer) = gd.release();
        assert_eq!(buffer, vec![0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_update_fast_sends_frame() {
        let mut gd = graphic(16, 4);
        gd.clear(Color::Black);
        gd.display_mut().init_fast(&mut MockDelay::default()).unwrap();
        gd.update_fast(&mut MockDelay::default()).unwrap();

        let (display, _) = gd.release();
        let interface = display.release();
        assert_eq!(interface.data_after(TRANSFER_OLD_DATA, 0), vec![0u8; 8]);
        assert_eq!(interface.data_after(TRANSFER_NEW_DATA, 0), vec![0xFFu8; 8]);
    }

    #[test]
    fn test_update_base_map_sends_frame_as_both_planes() {
        let mut gd = graphic(16, 4);
        Rectangle::new(Point::new(0, 0), Size::new(16, 2))
            .into_styled(PrimitiveStyle::with_fill(Color::Black))
            .draw(&mut gd)
            .unwrap();
        gd.update_base_map(&mut MockDelay::default()).unwrap();

        let (display, _) = gd.release();
        let interface = display.release();
        assert_eq!(
            interface.data_after(TRANSFER_OLD_DATA, 0),
            vec![0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(
            interface.data_after(TRANSFER_NEW_DATA, 0),
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00]
        );
    }
}

//! Counter overlay in the bottom-right corner
//!
//! Draws a small right-aligned number with an optional unit suffix (`42s`,
//! `7m`) into a fixed window and pushes it through a partial update, without
//! touching the rest of the image.
//!
//! ## Example
//!
//! ```
//! use uc8179::overlay::{OVERLAY_BUFFER_SIZE, OverlayRenderer, Unit};
//!
//! let mut buffer = [0u8; OVERLAY_BUFFER_SIZE];
//! OverlayRenderer::render_into(&mut buffer, 42, Some(Unit::Seconds));
//! assert!(buffer.iter().any(|byte| *byte != 0));
//! ```

use embedded_hal::delay::DelayNs;
use log::trace;

use crate::config::Dimensions;
use crate::display::Display;
use crate::error::{BoundaryWrapWarning, Error};
use crate::interface::DisplayInterface;
use crate::window::PartialWindow;

/// Overlay extent along the packed x axis
pub const OVERLAY_WIDTH: u16 = 152;
/// Overlay extent along y
pub const OVERLAY_HEIGHT: u16 = 30;
/// Bytes in one overlay buffer
pub const OVERLAY_BUFFER_SIZE: usize = OVERLAY_WIDTH as usize / 8 * OVERLAY_HEIGHT as usize;

/// Largest value the overlay shows; larger values are clamped
pub const MAX_COUNT: u32 = 999;

const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;
const GLYPH_ADVANCE: usize = 8;
const RIGHT_MARGIN: usize = 5;
const ROW_BYTES: usize = OVERLAY_WIDTH as usize / 8;

type Glyph = [u8; GLYPH_WIDTH];

// 5x7, one byte per column, bit 0 is the top row
const DIGITS: [Glyph; 10] = [
    [0x3E, 0x51, 0x49, 0x45, 0x3E],
    [0x00, 0x42, 0x7F, 0x40, 0x00],
    [0x42, 0x61, 0x51, 0x49, 0x46],
    [0x21, 0x41, 0x45, 0x4B, 0x31],
    [0x18, 0x14, 0x12, 0x7F, 0x10],
    [0x27, 0x45, 0x45, 0x45, 0x39],
    [0x3C, 0x4A, 0x49, 0x49, 0x30],
    [0x01, 0x71, 0x09, 0x05, 0x03],
    [0x36, 0x49, 0x49, 0x49, 0x36],
    [0x06, 0x49, 0x49, 0x29, 0x1E],
];

/// Unit suffix drawn after the number
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    /// `s`
    Seconds,
    /// `m`
    Minutes,
    /// `h`
    Hours,
}

impl Unit {
    fn glyph(self) -> &'static Glyph {
        match self {
            Self::Seconds => &[0x48, 0x54, 0x54, 0x54, 0x20],
            Self::Minutes => &[0x7C, 0x04, 0x18, 0x04, 0x78],
            Self::Hours => &[0x7F, 0x08, 0x04, 0x04, 0x78],
        }
    }
}

/// Renders counters into the overlay window
///
/// Pixel data lives on the stack for the duration of one call.
pub struct OverlayRenderer {
    window: PartialWindow,
}

impl OverlayRenderer {
    /// Overlay anchored to the bottom-right corner of a panel
    ///
    /// Panels smaller than the overlay are rejected by the window write with
    /// [`Error::InvalidGeometry`].
    pub fn new(dims: &Dimensions) -> Self {
        Self {
            window: PartialWindow::new(
                dims.width.saturating_sub(OVERLAY_WIDTH),
                dims.height.saturating_sub(OVERLAY_HEIGHT),
                OVERLAY_HEIGHT,
                OVERLAY_WIDTH,
            ),
        }
    }

    /// Window the overlay occupies
    pub fn window(&self) -> &PartialWindow {
        &self.window
    }

    /// Blank the overlay region
    pub fn clear<I, D>(
        &self,
        display: &mut Display<I>,
        delay: &mut D,
    ) -> Result<Option<BoundaryWrapWarning>, Error<I>>
    where
        I: DisplayInterface,
        D: DelayNs,
    {
        let blank = [0u8; OVERLAY_BUFFER_SIZE];
        display.write_window(&self.window, &blank, delay)
    }

    /// Draw `value` with an optional unit and refresh the overlay region
    pub fn render_count<I, D>(
        &self,
        display: &mut Display<I>,
        value: u32,
        unit: Option<Unit>,
        delay: &mut D,
    ) -> Result<Option<BoundaryWrapWarning>, Error<I>>
    where
        I: DisplayInterface,
        D: DelayNs,
    {
        let mut buffer = [0u8; OVERLAY_BUFFER_SIZE];
        Self::render_into(&mut buffer, value, unit);
        trace!("overlay count {value} {unit:?}");
        display.write_window(&self.window, &buffer, delay)
    }

    /// Rasterise `value` and `unit` into `buf` without touching the panel
    ///
    /// The buffer is cleared first. Values above [`MAX_COUNT`] are clamped
    /// and leading zeros are dropped. Text is right-aligned with a 5 pixel
    /// margin and centred vertically. Set bits are ink.
    pub fn render_into(buf: &mut [u8; OVERLAY_BUFFER_SIZE], value: u32, unit: Option<Unit>) {
        buf.fill(0);

        let value = value.min(MAX_COUNT) as usize;
        let mut glyphs: [&Glyph; 4] = [&DIGITS[0]; 4];
        let mut count = 0;
        if value >= 100 {
            glyphs[count] = &DIGITS[value / 100];
            count += 1;
        }
        if value >= 10 {
            glyphs[count] = &DIGITS[value / 10 % 10];
            count += 1;
        }
        glyphs[count] = &DIGITS[value % 10];
        count += 1;
        if let Some(unit) = unit {
            glyphs[count] = unit.glyph();
            count += 1;
        }

        let start_x = OVERLAY_WIDTH as usize - GLYPH_ADVANCE * count - RIGHT_MARGIN;
        let start_y = (OVERLAY_HEIGHT as usize - GLYPH_HEIGHT) / 2;
        for (slot, glyph) in glyphs[..count].iter().enumerate() {
            blit(buf, glyph, start_x + slot * GLYPH_ADVANCE, start_y);
        }
    }
}

fn blit(buf: &mut [u8; OVERLAY_BUFFER_SIZE], glyph: &Glyph, x: usize, y: usize) {
    for (col, bits) in glyph.iter().enumerate() {
        for row in 0..GLYPH_HEIGHT {
            if (bits >> row) & 1 != 0 {
                let px = x + col;
                buf[(y + row) * ROW_BYTES + px / 8] |= 0x80 >> (px % 8);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{PARTIAL_WINDOW, TRANSFER_NEW_DATA};
    use crate::display::PanelState;
    use crate::mock::{MockDelay, MockInterface, test_config};
    use alloc::vec;

    fn pixel(buf: &[u8; OVERLAY_BUFFER_SIZE], x: usize, y: usize) -> bool {
        buf[y * ROW_BYTES + x / 8] & (0x80 >> (x % 8)) != 0
    }

    fn ink_columns(buf: &[u8; OVERLAY_BUFFER_SIZE]) -> (usize, usize) {
        let columns = (0..OVERLAY_WIDTH as usize)
            .filter(|x| (0..OVERLAY_HEIGHT as usize).any(|y| pixel(buf, *x, y)));
        let first = columns.clone().min().unwrap();
        let last = columns.max().unwrap();
        (first, last)
    }

    fn render(value: u32, unit: Option<Unit>) -> [u8; OVERLAY_BUFFER_SIZE] {
        let mut buf = [0xAA; OVERLAY_BUFFER_SIZE];
        OverlayRenderer::render_into(&mut buf, value, unit);
        buf
    }

    #[test]
    fn test_single_digit_is_right_aligned() {
        let buf = render(0, None);
        // One glyph: 152 - 8 - 5 = 139
        let (first, last) = ink_columns(&buf);
        assert_eq!(first, 139);
        assert_eq!(last, 143);
        // Column 0 of '0' is 0x3E: rows 1..=5
        assert!(!pixel(&buf, 139, 11));
        assert!(pixel(&buf, 139, 12));
        assert!(pixel(&buf, 139, 16));
        assert!(!pixel(&buf, 139, 17));
    }

    #[test]
    fn test_leading_zeros_suppressed() {
        let (first, _) = ink_columns(&render(7, Some(Unit::Seconds)));
        assert_eq!(first, 152 - 16 - 5);

        let (first, _) = ink_columns(&render(42, Some(Unit::Seconds)));
        // '4' column 0 is 0x18, so ink starts on the first column of the cell
        assert_eq!(first, 152 - 24 - 5);

        let (first, _) = ink_columns(&render(100, None));
        assert_eq!(first, 152 - 24 - 5 + 1);
    }

    #[test]
    fn test_inner_zero_is_drawn() {
        let buf = render(105, None);
        let zero_x = 152 - 24 - 5 + 8;
        assert!(pixel(&buf, zero_x, 12));
    }

    #[test]
    fn test_values_clamp_to_999() {
        assert_eq!(render(5000, Some(Unit::Hours)), render(999, Some(Unit::Hours)));
        assert_eq!(render(u32::MAX, None), render(999, None));
    }

    #[test]
    fn test_ink_count_matches_font() {
        let buf = render(8, None);
        let ink: u32 = buf.iter().map(|byte| byte.count_ones()).sum();
        assert_eq!(ink, 17);
    }

    #[test]
    fn test_unit_suffix_drawn_last() {
        let plain = render(3, None);
        let minutes = render(3, Some(Unit::Minutes));
        assert_ne!(plain, minutes);
        let (_, last) = ink_columns(&minutes);
        assert_eq!(last, 152 - 5 - 8 + 4);
        // Text sits in rows 11..18
        assert!((0..11).all(|y| (0..152).all(|x| !pixel(&minutes, x, y))));
        assert!((18..30).all(|y| (0..152).all(|x| !pixel(&minutes, x, y))));
    }

    #[test]
    fn test_window_anchored_bottom_right() {
        let renderer = OverlayRenderer::new(&Dimensions::new(800, 480).unwrap());
        assert_eq!(*renderer.window(), PartialWindow::new(648, 450, 30, 152));
        assert_eq!(renderer.window().buffer_size(), OVERLAY_BUFFER_SIZE);
    }

    #[test]
    fn test_render_count_writes_window() {
        let mut display = Display::new(MockInterface::new(), test_config(800, 480));
        let mut delay = MockDelay::default();
        display.init_full(&mut delay).unwrap();
        display.init_part(&mut delay).unwrap();

        let renderer = OverlayRenderer::new(display.dimensions());
        renderer
            .render_count(&mut display, 42, Some(Unit::Seconds), &mut delay)
            .unwrap();

        assert_eq!(display.state(), PanelState::PartialModeActive);
        let interface = display.release();
        assert_eq!(
            interface.data_after(PARTIAL_WINDOW, 0),
            vec![2, 136, 3, 30, 1, 194, 1, 222, 0x01]
        );
        assert_eq!(
            interface.data_after(TRANSFER_NEW_DATA, 0),
            render(42, Some(Unit::Seconds)).to_vec()
        );
    }

    #[test]
    fn test_clear_sends_blank_window() {
        let mut display = Display::new(MockInterface::new(), test_config(800, 480));
        let mut delay = MockDelay::default();
        display.init_full(&mut delay).unwrap();
        display.init_part(&mut delay).unwrap();

        let renderer = OverlayRenderer::new(display.dimensions());
        renderer
            .render_count(&mut display, 9, None, &mut delay)
            .unwrap();
        renderer.clear(&mut display, &mut delay).unwrap();

        let interface = display.release();
        assert!(interface.data_after(TRANSFER_NEW_DATA, 0).iter().any(|byte| *byte != 0));
        assert_eq!(interface.data_after(TRANSFER_NEW_DATA, 1), vec![0u8; 570]);
    }

    #[test]
    fn test_overlay_on_small_panel_is_rejected() {
        let mut display = Display::new(MockInterface::new(), test_config(128, 296));
        let mut delay = MockDelay::default();
        display.init_full(&mut delay).unwrap();

        let renderer = OverlayRenderer::new(display.dimensions());
        let result = renderer.render_count(&mut display, 1, None, &mut delay);
        assert!(matches!(result, Err(Error::InvalidGeometry { .. })));
    }
}

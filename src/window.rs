//! Partial window geometry and coordinate encoding
//!
//! A [`PartialWindow`] is addressed in panel-native units: `lines` runs along
//! the packed x axis (8 pixels per byte) and `columns` along y. Window data is
//! laid out row by row, `columns` rows of `lines / 8` bytes.
//!
//! ## Example
//!
//! ```
//! use uc8179::window::{encode_window, PartialWindow};
//!
//! let window = PartialWindow::new(650, 450, 30, 150);
//! let encoded = encode_window(&window);
//! assert_eq!(encoded.bytes, [2, 138, 3, 30, 1, 194, 1, 222]);
//! assert!(encoded.warning.is_none());
//! ```

use crate::config::Dimensions;
use crate::error::BoundaryWrapWarning;

/// Rectangular region for a partial update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartialWindow {
    /// First pixel along the packed (x) axis
    pub x_start: u16,
    /// First line along the y axis
    pub y_start: u16,
    /// Extent along y
    pub columns: u16,
    /// Extent along the packed x axis, a multiple of 8
    pub lines: u16,
}

impl PartialWindow {
    /// Create a new window
    pub fn new(x_start: u16, y_start: u16, columns: u16, lines: u16) -> Self {
        Self {
            x_start,
            y_start,
            columns,
            lines,
        }
    }

    /// Bytes in one row of window data
    pub fn row_bytes(&self) -> usize {
        self.lines as usize / 8
    }

    /// Bytes of window data the controller expects
    pub fn buffer_size(&self) -> usize {
        self.columns as usize * self.lines as usize / 8
    }

    /// Last pixel along x, inclusive
    pub fn x_end(&self) -> u16 {
        self.x_start.wrapping_add(self.lines).wrapping_sub(1)
    }

    /// Last line along y, inclusive
    pub fn y_end(&self) -> u16 {
        self.y_start.wrapping_add(self.columns).wrapping_sub(1)
    }

    /// Whether the window is byte aligned, non-empty and inside the panel
    pub fn fits(&self, dims: &Dimensions) -> bool {
        self.lines != 0
            && self.columns != 0
            && self.lines.is_multiple_of(8)
            && u32::from(self.x_start) + u32::from(self.lines) <= u32::from(dims.width)
            && u32::from(self.y_start) + u32::from(self.columns) <= u32::from(dims.height)
    }

    /// The window widened along x to hold `count` side-by-side copies
    pub(crate) fn repeated(&self, count: u16) -> Option<Self> {
        Some(Self {
            lines: self.lines.checked_mul(count)?,
            ..*self
        })
    }
}

/// Payload bytes for the partial window command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedWindow {
    /// `[x_start hi, x_start lo, x_end hi, x_end lo - 1, y_start hi, y_start lo, y_end hi, y_end lo - 1]`
    pub bytes: [u8; 8],
    /// Set when an end low byte wrapped from 0 to 255
    pub warning: Option<BoundaryWrapWarning>,
}

/// Encode a window into the controller's coordinate bytes
///
/// Every coordinate is split into `(value / 256, value % 256)`. The low byte
/// of each end coordinate is then decremented once more, wrapping in 8 bits:
/// an end whose low byte is 0 is sent as 255. The controller expects exactly
/// this encoding, so the wrapped byte is kept and reported through
/// [`EncodedWindow::warning`].
pub fn encode_window(window: &PartialWindow) -> EncodedWindow {
    let x_start = window.x_start;
    let y_start = window.y_start;
    let x_end = window.x_end();
    let y_end = window.y_end();

    let x_end_lo = (x_end % 256) as u8;
    let y_end_lo = (y_end % 256) as u8;

    let warning = BoundaryWrapWarning {
        x_end: x_end_lo == 0,
        y_end: y_end_lo == 0,
    };

    EncodedWindow {
        bytes: [
            (x_start / 256) as u8,
            (x_start % 256) as u8,
            (x_end / 256) as u8,
            x_end_lo.wrapping_sub(1),
            (y_start / 256) as u8,
            (y_start % 256) as u8,
            (y_end / 256) as u8,
            y_end_lo.wrapping_sub(1),
        ],
        warning: (warning.x_end || warning.y_end).then_some(warning),
    }
}

//! Error types for the driver
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`BoundaryWrapWarning`] - Non-fatal report from partial window encoding
//!
//! ## Example
//!
//! ```
//! use uc8179::{Builder, Dimensions, BuilderError};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Width must be byte aligned
//! let result = Dimensions::new(801, 480);
//! assert!(result.is_err());
//! ```

use crate::display::PanelState;
use crate::interface::DisplayInterface;

/// Largest width (source outputs) the controller can drive
pub const MAX_WIDTH: u16 = 800;

/// Largest height (gate outputs) the controller can drive
pub const MAX_HEIGHT: u16 = 600;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// A failure after bytes have already reached the controller leaves the panel
/// in an unknown state; the driver then reports [`PanelState::Uninitialized`]
/// and the caller has to run an init sequence again.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    Interface(I::Error),
    /// BUSY stayed asserted for the whole configured poll budget
    HardwareTimeout {
        /// Number of polls that observed BUSY
        polls: u32,
    },
    /// Panel geometry has not been programmed by a full init
    ///
    /// Returned by `init_fast`/`init_part` before `init_full`, and by transfers
    /// issued before any init or after deep sleep.
    NotInitialized,
    /// The operation is not allowed in the current panel state
    InvalidState(PanelState),
    /// A plane or window buffer does not have the required length
    BufferSizeMismatch {
        /// Required buffer size in bytes
        expected: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Partial window is not byte aligned, empty, or exceeds the panel
    InvalidGeometry {
        /// Window start along the packed axis
        x: u16,
        /// Window start along the line axis
        y: u16,
        /// Window extent along the line axis
        columns: u16,
        /// Window extent along the packed axis
        lines: u16,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::HardwareTimeout { polls } => {
                write!(f, "Display still busy after {polls} polls")
            }
            Self::NotInitialized => write!(f, "Panel geometry not programmed, run a full init"),
            Self::InvalidState(state) => write!(f, "Operation not allowed in state {state:?}"),
            Self::BufferSizeMismatch { expected, provided } => {
                write!(
                    f,
                    "Buffer size mismatch: expected {expected} bytes, provided {provided}"
                )
            }
            Self::InvalidGeometry {
                x,
                y,
                columns,
                lines,
            } => {
                write!(
                    f,
                    "Invalid partial window: x={x}, y={y}, columns={columns}, lines={lines}"
                )
            }
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// An end coordinate's low byte wrapped from 0 to 255 during encoding
///
/// The wrapped byte is still sent because the controller expects this exact
/// encoding, but the refreshed area will not be what the window describes.
/// Avoid windows whose last line or column is a multiple of 256.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryWrapWarning {
    /// The x end low byte wrapped
    pub x_end: bool,
    /// The y end low byte wrapped
    pub y_end: bool,
}

impl core::fmt::Display for BoundaryWrapWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match (self.x_end, self.y_end) {
            (true, true) => write!(f, "x and y end coordinates wrap to 255"),
            (true, false) => write!(f, "x end coordinate wraps to 255"),
            (false, true) => write!(f, "y end coordinate wraps to 255"),
            (false, false) => write!(f, "no wrap"),
        }
    }
}

/// Errors that can occur when building configuration
#[derive(Debug)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (max {MAX_WIDTH}x{MAX_HEIGHT}, width must be multiple of 8)"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

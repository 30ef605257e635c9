//! Core display operations
//!
//! [`Display`] owns the command channel and the panel lifecycle. A typical
//! session:
//!
//! 1. [`Display::init_full`] programs power, geometry and timing.
//! 2. [`Display::set_base_map`] seeds the image partial updates diff against.
//! 3. [`Display::init_part`] switches to the partial waveform.
//! 4. [`Display::write_window`] refreshes small regions.
//! 5. [`Display::deep_sleep`] cuts panel power.

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::busy::BusyGate;
use crate::command::{
    BOOSTER_SOFT_START, CASCADE_SETTING, DEEP_SLEEP, DEEP_SLEEP_CHECK, DISPLAY_REFRESH, DUAL_SPI,
    FORCE_TEMPERATURE, PANEL_SETTING, PARTIAL_IN, PARTIAL_OUT, PARTIAL_SCAN_INSIDE,
    PARTIAL_WINDOW, POWER_OFF, POWER_ON, POWER_SETTING, RESOLUTION_SETTING, TCON_SETTING,
    TRANSFER_NEW_DATA, TRANSFER_OLD_DATA, VCOM_DATA_INTERVAL,
};
use crate::config::{Config, Dimensions, MIN_REFRESH_SETTLE_US};
use crate::error::{BoundaryWrapWarning, Error};
use crate::interface::DisplayInterface;
use crate::window::{EncodedWindow, PartialWindow, encode_window};

type DisplayResult<I> = core::result::Result<(), Error<I>>;
type WindowResult<I> = core::result::Result<Option<BoundaryWrapWarning>, Error<I>>;

/// Most glyph buffers one multiplexed window write accepts
pub const MAX_MULTIPLEX_SOURCES: usize = 5;

/// Bytes staged on the stack when streaming generated plane data
const STREAM_CHUNK: usize = 64;

/// Lifecycle state of the panel controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelState {
    /// No init since construction, or the last operation failed mid-sequence
    #[default]
    Uninitialized,
    /// Full waveform, normal scan
    ReadyFull,
    /// Fast waveform
    ReadyFast,
    /// Partial waveform
    ReadyPartial,
    /// Full waveform, scan mirrored by 180 degrees
    ReadyRotated180,
    /// Controller is in partial mode after a window write
    PartialModeActive,
    /// Deep sleep; only a full init (with its reset pulse) leaves it
    Sleeping,
}

impl PanelState {
    /// One of the `Ready*` states
    pub fn is_ready(self) -> bool {
        matches!(
            self,
            Self::ReadyFull | Self::ReadyFast | Self::ReadyPartial | Self::ReadyRotated180
        )
    }
}

/// Core display driver for UC8179
///
/// Every operation takes `&mut self`; one operation runs to completion
/// before the next can start, matching the single physical bus.
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Busy line poll budget
    busy: BusyGate,
    /// Current lifecycle state
    state: PanelState,
    /// Ready state to return to when partial mode is left
    resume_state: PanelState,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// No bytes are sent until an init method is called.
    pub fn new(interface: I, config: Config) -> Self {
        let busy = BusyGate::from_config(&config);
        Self {
            interface,
            config,
            busy,
            state: PanelState::Uninitialized,
            resume_state: PanelState::Uninitialized,
        }
    }

    /// Current panel state
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Get panel dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Release the interface
    pub fn release(self) -> I {
        self.interface
    }

    // Power state machine

    /// Full init: power, booster, panel setting, resolution and timing
    ///
    /// Allowed from any state. Its reset pulse also wakes the controller from
    /// deep sleep.
    pub fn init_full<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let panel_setting = self.config.panel_setting;
        let result = self.full_init_script(panel_setting, delay);
        self.finish_init(result, PanelState::ReadyFull)
    }

    /// Full init with the scan direction mirrored by 180 degrees
    pub fn init_rotated_180<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let panel_setting = self.config.panel_setting_rotated;
        let result = self.full_init_script(panel_setting, delay);
        self.finish_init(result, PanelState::ReadyRotated180)
    }

    /// Fast init: tighter booster and forced-temperature timing
    ///
    /// Does not touch the resolution register.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] without sending anything while the panel is
    /// `Uninitialized` or `Sleeping`: before the first full init, after deep
    /// sleep, and after any sequence that failed part way.
    pub fn init_fast<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.require_programmed()?;
        let result = self.fast_init_script(delay);
        self.finish_init(result, PanelState::ReadyFast)
    }

    /// Partial init: partial LUT and VCOM timing for window updates
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] under the same conditions as [`Self::init_fast`].
    pub fn init_part<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.require_programmed()?;
        let result = self.partial_init_script(delay);
        self.finish_init(result, PanelState::ReadyPartial)
    }

    /// Power off and enter deep sleep
    ///
    /// The controller forgets its registers; a full init is required
    /// afterwards. Calling this while already asleep does nothing.
    pub fn deep_sleep<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        match self.state {
            PanelState::Sleeping => return Ok(()),
            PanelState::Uninitialized => return Err(Error::NotInitialized),
            _ => {}
        }
        let result = self.deep_sleep_script(delay);
        self.settle(result)?;
        self.transition(PanelState::Sleeping);
        Ok(())
    }

    fn full_init_script<D: DelayNs>(&mut self, panel_setting: u8, delay: &mut D) -> DisplayResult<I> {
        let power = self.config.power_setting;
        let booster = self.config.booster_soft_start;
        let resolution = self.config.dimensions.resolution_bytes();
        let vcom = self.config.vcom_data_interval;
        let tcon = self.config.tcon;

        self.hardware_reset(delay)?;
        self.wait_busy(delay)?;

        self.command_data(POWER_SETTING, &power)?;
        self.command_data(BOOSTER_SOFT_START, &booster)?;
        self.send_command(POWER_ON)?;
        self.wait_busy(delay)?;

        self.command_data(PANEL_SETTING, &[panel_setting])?;
        self.command_data(RESOLUTION_SETTING, &resolution)?;
        self.command_data(DUAL_SPI, &[0x00])?;
        self.command_data(VCOM_DATA_INTERVAL, &vcom)?;
        self.command_data(TCON_SETTING, &[tcon])?;
        Ok(())
    }

    fn fast_init_script<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let panel_setting = self.config.panel_setting;
        let booster = self.config.booster_soft_start_fast;
        let cascade = self.config.cascade;
        let temperature = self.config.force_temperature_fast;
        let vcom = self.config.vcom_data_interval;

        self.hardware_reset(delay)?;
        self.command_data(PANEL_SETTING, &[panel_setting])?;
        self.power_on_settled(delay)?;

        self.command_data(BOOSTER_SOFT_START, &booster)?;
        self.command_data(CASCADE_SETTING, &[cascade])?;
        self.command_data(FORCE_TEMPERATURE, &[temperature])?;
        self.command_data(VCOM_DATA_INTERVAL, &vcom)?;
        Ok(())
    }

    fn partial_init_script<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let panel_setting = self.config.panel_setting_partial;
        let cascade = self.config.cascade;
        let temperature = self.config.force_temperature_partial;
        let vcom = self.config.vcom_data_interval_partial;

        self.hardware_reset(delay)?;
        self.command_data(PANEL_SETTING, &[panel_setting])?;
        self.power_on_settled(delay)?;

        self.command_data(CASCADE_SETTING, &[cascade])?;
        self.command_data(FORCE_TEMPERATURE, &[temperature])?;
        self.command_data(VCOM_DATA_INTERVAL, &vcom)?;
        Ok(())
    }

    fn deep_sleep_script<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let border_float = self.config.vcom_data_interval_sleep;

        self.command_data(VCOM_DATA_INTERVAL, &[border_float])?;
        self.send_command(POWER_OFF)?;
        self.wait_busy(delay)?;
        delay.delay_ms(self.config.power_off_delay_ms);
        self.command_data(DEEP_SLEEP, &[DEEP_SLEEP_CHECK])?;
        Ok(())
    }

    fn power_on_settled<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(POWER_ON)?;
        delay.delay_ms(self.config.power_on_delay_ms);
        self.wait_busy(delay)
    }

    fn finish_init(&mut self, result: DisplayResult<I>, target: PanelState) -> DisplayResult<I> {
        self.settle(result)?;
        self.transition(target);
        Ok(())
    }

    /// Fast and partial init rely on the resolution a full init programmed
    fn require_programmed(&self) -> DisplayResult<I> {
        match self.state {
            PanelState::Uninitialized | PanelState::Sleeping => Err(Error::NotInitialized),
            _ => Ok(()),
        }
    }

    // Full frame transfer

    /// Write both planes and refresh
    ///
    /// The old plane is sent bitwise complemented, the controller's polarity
    /// for the previous image; the new plane is sent verbatim.
    ///
    /// # Errors
    ///
    /// [`Error::BufferSizeMismatch`] if either plane is not exactly one plane
    /// long, before anything is sent.
    pub fn write_full_frame<D: DelayNs>(
        &mut self,
        old_plane: &[u8],
        new_plane: &[u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.require_frame_ready()?;
        self.check_plane(old_plane)?;
        self.check_plane(new_plane)?;

        let result = self.transfer_planes(old_plane.iter().map(|byte| !byte), new_plane, delay);
        self.settle(result)
    }

    /// Seed the base image partial updates are compared against
    ///
    /// Same bytes on the wire as [`Self::write_full_frame`].
    pub fn set_base_map<D: DelayNs>(
        &mut self,
        old_plane: &[u8],
        new_plane: &[u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        debug!("seeding base map");
        self.write_full_frame(old_plane, new_plane, delay)
    }

    /// Write only the new plane and refresh
    ///
    /// The old plane is filled with zeros, so nothing of the previous image
    /// is kept for comparison.
    pub fn write_full_frame_fast<D: DelayNs>(
        &mut self,
        new_plane: &[u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.require_frame_ready()?;
        self.check_plane(new_plane)?;

        let count = self.config.plane_byte_count();
        let result = self.transfer_planes(core::iter::repeat_n(0x00, count), new_plane, delay);
        self.settle(result)
    }

    /// Clear the panel to white
    pub fn fill_white<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.fill(0xFF, delay)
    }

    /// Clear the panel to black
    pub fn fill_black<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.fill(0x00, delay)
    }

    fn fill<D: DelayNs>(&mut self, old_fill: u8, delay: &mut D) -> DisplayResult<I> {
        self.require_frame_ready()?;
        let count = self.config.plane_byte_count();

        let result = self.fill_planes(old_fill, count, delay);
        self.settle(result)
    }

    fn fill_planes<D: DelayNs>(&mut self, old_fill: u8, count: usize, delay: &mut D) -> DisplayResult<I> {
        self.send_command(TRANSFER_OLD_DATA)?;
        self.stream(core::iter::repeat_n(old_fill, count))?;
        self.send_command(TRANSFER_NEW_DATA)?;
        self.stream(core::iter::repeat_n(0x00, count))?;
        self.trigger_refresh(delay)
    }

    fn transfer_planes<D: DelayNs>(
        &mut self,
        old_stream: impl Iterator<Item = u8>,
        new_plane: &[u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.send_command(TRANSFER_OLD_DATA)?;
        self.stream(old_stream)?;
        self.send_command(TRANSFER_NEW_DATA)?;
        self.send_data(new_plane)?;
        self.trigger_refresh(delay)
    }

    /// Trigger a display refresh and wait for it to finish
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before any init or while asleep,
    /// [`Error::HardwareTimeout`] if BUSY never clears.
    pub fn refresh<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if matches!(self.state, PanelState::Uninitialized | PanelState::Sleeping) {
            return Err(Error::NotInitialized);
        }
        let result = self.trigger_refresh(delay);
        self.settle(result)
    }

    fn trigger_refresh<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(DISPLAY_REFRESH)?;
        // BUSY is not valid until the controller has latched the command
        delay.delay_us(self.config.refresh_settle_us.max(MIN_REFRESH_SETTLE_US));
        self.wait_busy(delay)
    }

    fn require_frame_ready(&self) -> DisplayResult<I> {
        match self.state {
            PanelState::ReadyFull | PanelState::ReadyFast | PanelState::ReadyRotated180 => Ok(()),
            PanelState::Uninitialized | PanelState::Sleeping => Err(Error::NotInitialized),
            other => Err(Error::InvalidState(other)),
        }
    }

    fn check_plane(&self, plane: &[u8]) -> DisplayResult<I> {
        let expected = self.config.plane_byte_count();
        if plane.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                provided: plane.len(),
            });
        }
        Ok(())
    }

    // Partial windows

    /// Refresh one window of the panel
    ///
    /// Enters partial mode, programs the window, writes `data` as new data
    /// and refreshes. The controller stays in partial mode afterwards, so
    /// consecutive window writes skip re-entering it; call
    /// [`Self::exit_partial_mode`] or an init to leave it.
    ///
    /// Returns a [`BoundaryWrapWarning`] when an end coordinate's low byte
    /// wrapped during encoding. The write still happens.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidGeometry`] or [`Error::BufferSizeMismatch`] before
    /// anything is sent.
    pub fn write_window<D: DelayNs>(
        &mut self,
        window: &PartialWindow,
        data: &[u8],
        delay: &mut D,
    ) -> WindowResult<I> {
        self.require_window_ready()?;
        self.check_window(window)?;
        let expected = window.buffer_size();
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                provided: data.len(),
            });
        }

        let encoded = self.encode_checked(window);
        let result = self.window_transfer(&encoded, data, delay);
        self.settle(result)?;
        Ok(encoded.warning)
    }

    fn window_transfer<D: DelayNs>(
        &mut self,
        encoded: &EncodedWindow,
        data: &[u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.open_window(encoded)?;
        self.send_data(data)?;
        self.trigger_refresh(delay)
    }

    /// Refresh a window built from side-by-side glyph buffers
    ///
    /// `window` describes one glyph cell and `sources.len()` is the glyph
    /// count `n` (1 to [`MAX_MULTIPLEX_SOURCES`]). The refreshed area is `n`
    /// cells wide along x, so the encoded end is
    /// `x_end = x_start + window.lines * n - 1`. Each source holds
    /// `window.buffer_size()` bytes. For every row the matching
    /// `window.row_bytes()` bytes of each source are sent in order, so the
    /// controller receives whole rows across all glyphs.
    ///
    /// Unlike [`Self::write_window`], partial mode is left afterwards and the
    /// panel returns to the ready state it was in before partial mode.
    pub fn write_window_multiplexed<D: DelayNs>(
        &mut self,
        window: &PartialWindow,
        sources: &[&[u8]],
        delay: &mut D,
    ) -> WindowResult<I> {
        self.require_window_ready()?;
        let invalid = Error::InvalidGeometry {
            x: window.x_start,
            y: window.y_start,
            columns: window.columns,
            lines: window.lines,
        };
        if sources.is_empty() || sources.len() > MAX_MULTIPLEX_SOURCES {
            return Err(invalid);
        }
        let Some(span) = window.repeated(sources.len() as u16) else {
            return Err(invalid);
        };
        self.check_window(window)?;
        self.check_window(&span)?;
        let expected = window.buffer_size();
        if let Some(short) = sources.iter().find(|source| source.len() != expected) {
            return Err(Error::BufferSizeMismatch {
                expected,
                provided: short.len(),
            });
        }

        let encoded = self.encode_checked(&span);
        let result = self.multiplexed_transfer(window, &encoded, sources, delay);
        self.settle(result)?;
        self.transition(self.resume_state);
        Ok(encoded.warning)
    }

    fn multiplexed_transfer<D: DelayNs>(
        &mut self,
        window: &PartialWindow,
        encoded: &EncodedWindow,
        sources: &[&[u8]],
        delay: &mut D,
    ) -> DisplayResult<I> {
        let row_bytes = window.row_bytes();
        self.open_window(encoded)?;
        for row in 0..window.columns as usize {
            let range = row * row_bytes..(row + 1) * row_bytes;
            for source in sources {
                self.send_data(&source[range.clone()])?;
            }
        }
        self.trigger_refresh(delay)?;
        self.send_command(PARTIAL_OUT)
    }

    /// Leave partial mode and return to the previous ready state
    ///
    /// Does nothing unless the panel is in partial mode.
    pub fn exit_partial_mode(&mut self) -> DisplayResult<I> {
        if self.state != PanelState::PartialModeActive {
            return Ok(());
        }
        let result = self.send_command(PARTIAL_OUT);
        self.settle(result)?;
        self.transition(self.resume_state);
        Ok(())
    }

    fn open_window(&mut self, encoded: &EncodedWindow) -> DisplayResult<I> {
        if self.state != PanelState::PartialModeActive {
            self.resume_state = self.state;
        }
        self.send_command(PARTIAL_IN)?;
        self.transition(PanelState::PartialModeActive);
        self.send_command(PARTIAL_WINDOW)?;
        self.send_data(&encoded.bytes)?;
        self.send_data(&[PARTIAL_SCAN_INSIDE])?;
        self.send_command(TRANSFER_NEW_DATA)
    }

    fn encode_checked(&self, window: &PartialWindow) -> EncodedWindow {
        let encoded = encode_window(window);
        if let Some(warning) = encoded.warning {
            warn!("partial window {window:?}: {warning}");
        }
        encoded
    }

    fn require_window_ready(&self) -> DisplayResult<I> {
        match self.state {
            PanelState::Uninitialized | PanelState::Sleeping => Err(Error::NotInitialized),
            _ => Ok(()),
        }
    }

    fn check_window(&self, window: &PartialWindow) -> DisplayResult<I> {
        if window.fits(&self.config.dimensions) {
            Ok(())
        } else {
            Err(Error::InvalidGeometry {
                x: window.x_start,
                y: window.y_start,
                columns: window.columns,
                lines: window.lines,
            })
        }
    }

    // Channel helpers

    fn hardware_reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface.reset(delay).map_err(Error::Interface)
    }

    fn wait_busy<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.busy.wait(&mut self.interface, delay).map(|_| ())
    }

    fn command_data(&mut self, cmd: u8, data: &[u8]) -> DisplayResult<I> {
        self.send_command(cmd)?;
        self.send_data(data)
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    /// Send data to the display controller
    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }

    /// Send generated bytes without materialising a whole plane
    fn stream(&mut self, bytes: impl Iterator<Item = u8>) -> DisplayResult<I> {
        let mut chunk = [0u8; STREAM_CHUNK];
        let mut len = 0;
        for byte in bytes {
            chunk[len] = byte;
            len += 1;
            if len == STREAM_CHUNK {
                self.send_data(&chunk)?;
                len = 0;
            }
        }
        if len > 0 {
            self.send_data(&chunk[..len])?;
        }
        Ok(())
    }

    fn transition(&mut self, next: PanelState) {
        if self.state != next {
            debug!("panel state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Drop to `Uninitialized` when a sequence fails part way
    fn settle<T>(&mut self, result: Result<T, Error<I>>) -> Result<T, Error<I>> {
        if result.is_err() {
            warn!("sequence failed in state {:?}, re-init required", self.state);
            self.state = PanelState::Uninitialized;
        }
        result
    }
}

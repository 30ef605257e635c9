//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_HEIGHT, MAX_WIDTH};

/// Default number of busy polls before [`Error::HardwareTimeout`](crate::Error::HardwareTimeout)
pub const DEFAULT_BUSY_MAX_POLLS: u32 = 30_000;

/// Shortest settle time the controller needs between the refresh command and
/// the first busy poll
pub const MIN_REFRESH_SETTLE_US: u32 = 200;

/// Panel dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    /// Width in pixels (source outputs, packed 8 pixels per byte)
    pub width: u16,
    /// Height in pixels (gate outputs)
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - width is 0, larger than MAX_WIDTH, or not a multiple of 8
    /// - height is 0 or larger than MAX_HEIGHT
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_WIDTH || !width.is_multiple_of(8) {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        if height == 0 || height > MAX_HEIGHT {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Bytes in one full-screen plane
    pub fn plane_byte_count(&self) -> usize {
        (self.width as usize * self.height as usize) / 8
    }

    /// Resolution register payload: width and height as hi/lo byte pairs
    pub fn resolution_bytes(&self) -> [u8; 4] {
        [
            (self.width / 256) as u8,
            (self.width % 256) as u8,
            (self.height / 256) as u8,
            (self.height % 256) as u8,
        ]
    }
}

/// GPIO numbers a board wires to the panel
///
/// The driver itself only sees pin objects through [`Interface`](crate::Interface);
/// board bring-up code uses these numbers to claim the right GPIOs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardPins {
    /// Reset, active low
    pub reset: u8,
    /// Data/command select
    pub dc: u8,
    /// SPI chip select
    pub cs: u8,
    /// Busy input
    pub busy: u8,
    /// Panel power enable
    pub power: u8,
    /// SPI MOSI
    pub mosi: u8,
    /// SPI clock
    pub sck: u8,
}

impl BoardPins {
    /// ESP32 DevKit V1 wiring
    pub const ESP32_DEVKIT_V1: Self = Self {
        reset: 25,
        dc: 26,
        cs: 5,
        busy: 27,
        power: 33,
        mosi: 23,
        sck: 18,
    };

    /// ESP32-S3 N8R8 wiring, kept clear of the flash/PSRAM pins
    pub const ESP32_S3_N8R8: Self = Self {
        reset: 4,
        dc: 5,
        cs: 6,
        busy: 7,
        power: 15,
        mosi: 11,
        sck: 12,
    };
}

/// Display configuration
///
/// Holds the panel geometry, the register values written by the init
/// scripts, and the timing contract. Use [`Builder`] to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Panel dimensions
    pub dimensions: Dimensions,
    /// Power setting payload (command 0x01)
    pub power_setting: [u8; 4],
    /// Booster soft-start payload for full init (command 0x06)
    pub booster_soft_start: [u8; 4],
    /// Booster soft-start payload for fast init
    pub booster_soft_start_fast: [u8; 4],
    /// Panel setting for normal scan
    pub panel_setting: u8,
    /// Panel setting for 180 degree scan
    pub panel_setting_rotated: u8,
    /// Panel setting for partial init
    pub panel_setting_partial: u8,
    /// VCOM and data interval payload for full and fast init
    pub vcom_data_interval: [u8; 2],
    /// VCOM and data interval payload for partial init
    pub vcom_data_interval_partial: [u8; 2],
    /// VCOM and data interval byte written before deep sleep (border floating)
    pub vcom_data_interval_sleep: u8,
    /// TCON setting
    pub tcon: u8,
    /// Cascade setting enabling the forced temperature
    pub cascade: u8,
    /// Forced temperature for fast init
    pub force_temperature_fast: u8,
    /// Forced temperature for partial init
    pub force_temperature_partial: u8,
    /// Maximum busy polls before giving up (at least 1)
    pub busy_max_polls: u32,
    /// Delay between busy polls in milliseconds
    pub busy_poll_interval_ms: u32,
    /// Delay between the refresh command and the first busy poll
    pub refresh_settle_us: u32,
    /// Delay after power on in fast/partial init
    pub power_on_delay_ms: u32,
    /// Delay between power off and deep sleep
    pub power_off_delay_ms: u32,
}

impl Config {
    /// Bytes in one full-screen plane
    pub fn plane_byte_count(&self) -> usize {
        self.dimensions.plane_byte_count()
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use uc8179::{Builder, Dimensions};
///
/// let dims = match Dimensions::new(800, 480) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).busy_max_polls(5_000).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    dimensions: Option<Dimensions>,
    power_setting: [u8; 4],
    booster_soft_start: [u8; 4],
    booster_soft_start_fast: [u8; 4],
    panel_setting: u8,
    panel_setting_rotated: u8,
    panel_setting_partial: u8,
    vcom_data_interval: [u8; 2],
    vcom_data_interval_partial: [u8; 2],
    vcom_data_interval_sleep: u8,
    tcon: u8,
    cascade: u8,
    force_temperature_fast: u8,
    force_temperature_partial: u8,
    busy_max_polls: u32,
    busy_poll_interval_ms: u32,
    refresh_settle_us: u32,
    power_on_delay_ms: u32,
    power_off_delay_ms: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            // VGH=20V, VGL=-20V, VDH=15V, VDL=-15V
            power_setting: [0x07, 0x07, 0x3F, 0x3F],
            // Enhanced drive (panel-specific, override as needed)
            booster_soft_start: [0x17, 0x17, 0x28, 0x17],
            booster_soft_start_fast: [0x27, 0x27, 0x18, 0x17],
            // KW mode, LUT from OTP
            panel_setting: 0x0F,
            panel_setting_rotated: 0x03,
            panel_setting_partial: 0x1F,
            vcom_data_interval: [0x11, 0x07],
            vcom_data_interval_partial: [0xA9, 0x07],
            vcom_data_interval_sleep: 0xF7,
            tcon: 0x22,
            cascade: 0x02,
            force_temperature_fast: 0x5A,
            force_temperature_partial: 0x6E,
            busy_max_polls: DEFAULT_BUSY_MAX_POLLS,
            busy_poll_interval_ms: 1,
            // The reference firmware waits a whole millisecond here
            refresh_settle_us: 1_000,
            power_on_delay_ms: 100,
            power_off_delay_ms: 100,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set panel dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the power setting payload
    pub fn power_setting(mut self, values: [u8; 4]) -> Self {
        self.power_setting = values;
        self
    }

    /// Set booster soft-start parameters for full init
    pub fn booster_soft_start(mut self, values: [u8; 4]) -> Self {
        self.booster_soft_start = values;
        self
    }

    /// Set booster soft-start parameters for fast init
    pub fn booster_soft_start_fast(mut self, values: [u8; 4]) -> Self {
        self.booster_soft_start_fast = values;
        self
    }

    /// Set the panel setting byte for normal scan
    pub fn panel_setting(mut self, value: u8) -> Self {
        self.panel_setting = value;
        self
    }

    /// Set the panel setting byte for 180 degree scan
    pub fn panel_setting_rotated(mut self, value: u8) -> Self {
        self.panel_setting_rotated = value;
        self
    }

    /// Set the panel setting byte for partial init
    pub fn panel_setting_partial(mut self, value: u8) -> Self {
        self.panel_setting_partial = value;
        self
    }

    /// Set the VCOM and data interval payload for full and fast init
    pub fn vcom_data_interval(mut self, values: [u8; 2]) -> Self {
        self.vcom_data_interval = values;
        self
    }

    /// Set the VCOM and data interval payload for partial init
    pub fn vcom_data_interval_partial(mut self, values: [u8; 2]) -> Self {
        self.vcom_data_interval_partial = values;
        self
    }

    /// Set the VCOM and data interval byte written before deep sleep
    pub fn vcom_data_interval_sleep(mut self, value: u8) -> Self {
        self.vcom_data_interval_sleep = value;
        self
    }

    /// Set TCON
    pub fn tcon(mut self, value: u8) -> Self {
        self.tcon = value;
        self
    }

    /// Set the cascade setting
    pub fn cascade(mut self, value: u8) -> Self {
        self.cascade = value;
        self
    }

    /// Set the forced temperature for fast init
    pub fn force_temperature_fast(mut self, value: u8) -> Self {
        self.force_temperature_fast = value;
        self
    }

    /// Set the forced temperature for partial init
    pub fn force_temperature_partial(mut self, value: u8) -> Self {
        self.force_temperature_partial = value;
        self
    }

    /// Set the busy poll budget
    ///
    /// Default is 30,000 polls. The budget is always at least one poll.
    pub fn busy_max_polls(mut self, polls: u32) -> Self {
        self.busy_max_polls = polls.max(1);
        self
    }

    /// Set the delay between busy polls in milliseconds
    pub fn busy_poll_interval_ms(mut self, ms: u32) -> Self {
        self.busy_poll_interval_ms = ms;
        self
    }

    /// Set the settle delay after the refresh command
    ///
    /// Values below [`MIN_REFRESH_SETTLE_US`] are raised to it.
    pub fn refresh_settle_us(mut self, us: u32) -> Self {
        self.refresh_settle_us = us.max(MIN_REFRESH_SETTLE_US);
        self
    }

    /// Set the delay after power on in fast/partial init
    pub fn power_on_delay_ms(mut self, ms: u32) -> Self {
        self.power_on_delay_ms = ms;
        self
    }

    /// Set the delay between power off and deep sleep
    pub fn power_off_delay_ms(mut self, ms: u32) -> Self {
        self.power_off_delay_ms = ms;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            dimensions: self.dimensions.ok_or(BuilderError::MissingDimensions)?,
            power_setting: self.power_setting,
            booster_soft_start: self.booster_soft_start,
            booster_soft_start_fast: self.booster_soft_start_fast,
            panel_setting: self.panel_setting,
            panel_setting_rotated: self.panel_setting_rotated,
            panel_setting_partial: self.panel_setting_partial,
            vcom_data_interval: self.vcom_data_interval,
            vcom_data_interval_partial: self.vcom_data_interval_partial,
            vcom_data_interval_sleep: self.vcom_data_interval_sleep,
            tcon: self.tcon,
            cascade: self.cascade,
            force_temperature_fast: self.force_temperature_fast,
            force_temperature_partial: self.force_temperature_partial,
            busy_max_polls: self.busy_max_polls,
            busy_poll_interval_ms: self.busy_poll_interval_ms,
            refresh_settle_us: self.refresh_settle_us,
            power_on_delay_ms: self.power_on_delay_ms,
            power_off_delay_ms: self.power_off_delay_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_byte_count() {
        let dims = Dimensions::new(800, 480).unwrap();
        assert_eq!(dims.plane_byte_count(), 48_000);

        let dims = Dimensions::new(8, 1).unwrap();
        assert_eq!(dims.plane_byte_count(), 1);
    }

    #[test]
    fn test_resolution_bytes_split_hi_lo() {
        let dims = Dimensions::new(800, 480).unwrap();
        assert_eq!(dims.resolution_bytes(), [3, 32, 1, 224]);

        let dims = Dimensions::new(200, 600).unwrap();
        assert_eq!(dims.resolution_bytes(), [0, 200, 2, 88]);
    }

    #[test]
    fn test_dimensions_reject_unaligned_width() {
        assert!(matches!(
            Dimensions::new(804, 480),
            Err(BuilderError::InvalidDimensions { width: 804, .. })
        ));
        assert!(Dimensions::new(150, 30).is_err());
    }

    #[test]
    fn test_dimensions_reject_zero_and_oversize() {
        assert!(Dimensions::new(0, 480).is_err());
        assert!(Dimensions::new(800, 0).is_err());
        assert!(Dimensions::new(808, 480).is_err());
        assert!(Dimensions::new(800, 601).is_err());
    }

    #[test]
    fn test_builder_requires_dimensions() {
        assert!(matches!(
            Builder::new().build(),
            Err(BuilderError::MissingDimensions)
        ));
    }

    #[test]
    fn test_builder_keeps_busy_budget_bounded() {
        let config = Builder::new()
            .dimensions(Dimensions::new(800, 480).unwrap())
            .busy_max_polls(0)
            .build()
            .unwrap();
        assert_eq!(config.busy_max_polls, 1);
    }

    #[test]
    fn test_builder_raises_refresh_settle_to_minimum() {
        let config = Builder::new()
            .dimensions(Dimensions::new(800, 480).unwrap())
            .refresh_settle_us(50)
            .build()
            .unwrap();
        assert_eq!(config.refresh_settle_us, MIN_REFRESH_SETTLE_US);
    }

    #[test]
    fn test_board_presets_differ_only_in_pins() {
        assert_ne!(BoardPins::ESP32_DEVKIT_V1, BoardPins::ESP32_S3_N8R8);
        assert_eq!(BoardPins::ESP32_S3_N8R8.busy, 7);
        assert_eq!(BoardPins::ESP32_DEVKIT_V1.reset, 25);
    }
}

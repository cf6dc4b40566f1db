//! Hardware configuration and the TOML-backed application config.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout::StripLayout;

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# ledmatrix configuration: strip length and wiring for ledmatrix-cli.\n\n";

/// Number of PWM sub-channels in the driver's hardware model.
pub const SUB_CHANNELS: usize = 2;

/// Lowest signal frequency the WS281x family accepts.
pub const MIN_FREQUENCY_HZ: u32 = 400_000;

/// Highest signal frequency the WS281x family accepts.
pub const MAX_FREQUENCY_HZ: u32 = 800_000;

/// Highest DMA channel the driver can claim.
pub const MAX_DMA_CHANNEL: i32 = 14;

/// Channel wiring and signal parameters for one strip.
///
/// Pure data: read once by the controller when it builds the driver
/// descriptor, never normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareConfig {
    /// GPIO pin with a PWM alternate function, 0 if unused.
    #[serde(default = "default_pin")]
    pub pin: i32,

    /// Signal frequency in hertz, can go as low as 400 000.
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: u32,

    /// DMA channel to use.
    #[serde(default = "default_dma_channel")]
    pub dma_channel: i32,

    /// Invert the signal line (for inverting level shifters).
    #[serde(default)]
    pub invert: bool,

    /// PWM sub-channel the strip is wired to (0 or 1).
    #[serde(default)]
    pub pwm_channel: usize,

    /// Global brightness applied by the driver.
    #[serde(default = "default_brightness")]
    pub brightness: u8,

    /// Sub-pixel order of the strip.
    #[serde(default)]
    pub strip_layout: StripLayout,
}

fn default_pin() -> i32 {
    18
}
fn default_frequency_hz() -> u32 {
    800_000
}
fn default_dma_channel() -> i32 {
    10
}
fn default_brightness() -> u8 {
    30
}

impl Default for HardwareConfig {
    fn default() -> Self {
        HardwareConfig {
            pin: default_pin(),
            frequency_hz: default_frequency_hz(),
            dma_channel: default_dma_channel(),
            invert: false,
            pwm_channel: 0,
            brightness: default_brightness(),
            strip_layout: StripLayout::Grb,
        }
    }
}

/// Persisted application config: strip length plus its wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Number of LEDs on the strip.
    #[serde(default = "default_size")]
    pub size: usize,

    #[serde(default)]
    pub hardware: HardwareConfig,
}

fn default_size() -> usize {
    8
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size: default_size(),
            hardware: HardwareConfig::default(),
        }
    }
}

/// Problems that [`Config::validate`] can report.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `pwm_channel` does not name one of the driver's sub-channels.
    InvalidPwmChannel(usize),
    /// `frequency_hz` is zero.
    ZeroFrequency,
    /// `frequency_hz` is outside the range WS281x LEDs accept.
    FrequencyOutOfRange(u32),
    /// `dma_channel` is outside `0..=14`.
    InvalidDmaChannel(i32),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidPwmChannel(ch) => write!(
                f,
                "Invalid pwm_channel: {ch} (driver has {SUB_CHANNELS} sub-channels)"
            ),
            ValidationError::ZeroFrequency => write!(f, "frequency_hz cannot be zero"),
            ValidationError::FrequencyOutOfRange(hz) => write!(
                f,
                "frequency_hz {hz} is outside {MIN_FREQUENCY_HZ}..={MAX_FREQUENCY_HZ}"
            ),
            ValidationError::InvalidDmaChannel(dma) => {
                write!(f, "Invalid dma_channel: {dma} (expected 0..={MAX_DMA_CHANNEL})")
            }
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ledmatrix"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Write the config to `path`, creating parent directories.
    ///
    /// The file is written next to `path` and renamed into place, so a
    /// reader never sees a half-written config.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let body = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let staged = path.with_extension("toml.tmp");
        std::fs::write(&staged, format!("{CONFIG_HEADER}{body}"))?;
        std::fs::rename(&staged, path).inspect_err(|_| {
            let _ = std::fs::remove_file(&staged);
        })
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Check the hardware section, collecting every problem.
    ///
    /// Advisory only: the controller hands whatever it is given to the
    /// driver, which has the final say at `initialize`.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let hw = &self.hardware;
        let mut errors = Vec::new();

        if hw.pwm_channel >= SUB_CHANNELS {
            errors.push(ValidationError::InvalidPwmChannel(hw.pwm_channel));
        }

        if hw.frequency_hz == 0 {
            errors.push(ValidationError::ZeroFrequency);
        } else if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&hw.frequency_hz) {
            errors.push(ValidationError::FrequencyOutOfRange(hw.frequency_hz));
        }

        if !(0..=MAX_DMA_CHANNEL).contains(&hw.dma_channel) {
            errors.push(ValidationError::InvalidDmaChannel(hw.dma_channel));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

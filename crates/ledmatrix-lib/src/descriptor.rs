//! Driver descriptor — the flat field set the native driver consumes.
//!
//! Built from a [`HardwareConfig`] by a single pure function so the mapping
//! can be tested without any driver in the loop.

use serde::Serialize;

use crate::config::{HardwareConfig, SUB_CHANNELS};
use crate::layout::StripLayout;

/// Most LEDs one sub-channel can address (the driver counts in a C `int`).
pub const MAX_LEDS: usize = i32::MAX as usize;

/// Per-sub-channel fields of the native descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelDescriptor {
    /// Number of LEDs driven on this sub-channel (0 = unused).
    pub count: usize,
    pub gpio_pin: i32,
    pub brightness: u8,
    pub invert: bool,
    pub strip_layout: StripLayout,
}

impl Default for ChannelDescriptor {
    /// An idle sub-channel: no pixels, no pin, 3-channel RGB layout.
    fn default() -> Self {
        ChannelDescriptor {
            count: 0,
            gpio_pin: 0,
            brightness: 0,
            invert: false,
            strip_layout: StripLayout::Rgb,
        }
    }
}

/// Controller-wide fields plus both sub-channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Descriptor {
    pub frequency_hz: u32,
    pub dma_channel: i32,
    pub channels: [ChannelDescriptor; SUB_CHANNELS],
}

impl Descriptor {
    /// Map a strip length and its config onto a descriptor.
    ///
    /// Both sub-channels start idle; only `config.pwm_channel` is filled in.
    /// Fails when that index does not name a sub-channel, or when `size`
    /// is more than the driver can address.
    pub fn from_config(size: usize, config: &HardwareConfig) -> crate::error::Result<Self> {
        if size > MAX_LEDS {
            return Err(crate::MatrixError::Config(format!(
                "size {size} exceeds the driver limit of {MAX_LEDS} LEDs"
            )));
        }

        let mut descriptor = Descriptor {
            frequency_hz: config.frequency_hz,
            dma_channel: config.dma_channel,
            channels: [ChannelDescriptor::default(); SUB_CHANNELS],
        };

        let active = descriptor
            .channels
            .get_mut(config.pwm_channel)
            .ok_or_else(|| {
                crate::MatrixError::Config(format!(
                    "pwm_channel {} out of range (driver has {SUB_CHANNELS} sub-channels)",
                    config.pwm_channel
                ))
            })?;
        *active = ChannelDescriptor {
            count: size,
            gpio_pin: config.pin,
            brightness: config.brightness,
            invert: config.invert,
            strip_layout: config.strip_layout,
        };

        Ok(descriptor)
    }
}

//! Matrix controller — owns the driver handle and enforces the lifecycle.
//!
//! ```text
//! Created --initialize()--> Ready --close()--> Closed
//!    \_____________________close()___________/
//! ```
//!
//! `set`/`at` go straight through the codec into the driver's buffer;
//! only `render` performs the timed hardware write. `close` is idempotent
//! and also runs on drop, so native resources are released exactly once.

use crate::color::{self, Color, Rgba8};
use crate::config::HardwareConfig;
use crate::descriptor::Descriptor;
use crate::driver::{DriverError, NativeDriver};
use crate::error::Result;

/// Lifecycle state of a [`MatrixController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Descriptor loaded, driver not yet initialized.
    Created,
    /// Driver initialized; render and buffer access are meaningful.
    Ready,
    /// Native resources released. Terminal.
    Closed,
}

/// A pixel buffer addressed by index, backed by some output device.
///
/// Client code (animations, effects) can be written against this trait
/// instead of a concrete controller.
pub trait Matrix {
    fn initialize(&mut self) -> Result<()>;
    fn render(&mut self) -> Result<()>;
    fn at(&self, position: usize) -> Rgba8;
    fn set(&mut self, position: usize, color: &dyn Color);
    fn close(&mut self) -> Result<()>;
    /// Number of addressable pixels.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Controller for one strip on one PWM sub-channel.
pub struct MatrixController<D: NativeDriver> {
    config: HardwareConfig,
    size: usize,
    driver: D,
    state: State,
}

impl<D: NativeDriver + Default> MatrixController<D> {
    /// Create a controller on a fresh driver handle.
    pub fn new(size: usize, config: HardwareConfig) -> Result<Self> {
        Self::with_driver(D::default(), size, config)
    }
}

impl<D: NativeDriver> MatrixController<D> {
    /// Create a controller on the given driver handle.
    ///
    /// Builds the descriptor and loads it into the driver; does not contact
    /// hardware. Fails if the sub-channel is out of range or the native
    /// descriptor cannot be allocated.
    pub fn with_driver(mut driver: D, size: usize, config: HardwareConfig) -> Result<Self> {
        let descriptor = Descriptor::from_config(size, &config)?;
        driver.load(&descriptor)?;
        log::debug!(
            "matrix created: {size} LEDs on sub-channel {} (pin {}, {} layout)",
            config.pwm_channel,
            config.pin,
            config.strip_layout
        );
        Ok(MatrixController {
            config,
            size,
            driver,
            state: State::Created,
        })
    }

    /// Hand the descriptor to the native driver.
    ///
    /// Repeat calls go to the driver as-is; it decides what they mean.
    pub fn initialize(&mut self) -> Result<()> {
        if self.is_closed() {
            log::warn!("initialize() on a closed matrix ignored");
            return Ok(());
        }
        match self.driver.init() {
            0 => {
                self.state = State::Ready;
                log::debug!("matrix initialized");
                Ok(())
            }
            code => Err(DriverError::Init(code).into()),
        }
    }

    /// Flush the pixel buffer to the strip. Blocks for the transmission.
    pub fn render(&mut self) -> Result<()> {
        if self.is_closed() {
            log::warn!("render() on a closed matrix ignored");
            return Ok(());
        }
        match self.driver.render() {
            0 => Ok(()),
            code => Err(DriverError::Render(code).into()),
        }
    }

    /// Read back the color at `position` (8-bit channels).
    ///
    /// Positions past the end read as black on the bundled drivers.
    pub fn at(&self, position: usize) -> Rgba8 {
        if self.is_closed() {
            return Rgba8::BLACK;
        }
        color::decode(self.driver.get_led(self.config.pwm_channel, position))
    }

    /// Write `color` at `position`. Visible on the strip after the next render.
    pub fn set(&mut self, position: usize, color: &impl Color) {
        if self.is_closed() {
            return;
        }
        let packed = color::encode(color);
        self.driver
            .set_led(self.config.pwm_channel, position, packed);
    }

    /// Release native resources. Every call after the first is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.state = State::Closed;
        self.driver.finalize();
        log::debug!("matrix closed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }
}

impl<D: NativeDriver> Matrix for MatrixController<D> {
    fn initialize(&mut self) -> Result<()> {
        MatrixController::initialize(self)
    }

    fn render(&mut self) -> Result<()> {
        MatrixController::render(self)
    }

    fn at(&self, position: usize) -> Rgba8 {
        MatrixController::at(self, position)
    }

    fn set(&mut self, position: usize, color: &dyn Color) {
        MatrixController::set(self, position, &color)
    }

    fn close(&mut self) -> Result<()> {
        MatrixController::close(self)
    }

    fn len(&self) -> usize {
        self.size
    }
}

impl<D: NativeDriver> Drop for MatrixController<D> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

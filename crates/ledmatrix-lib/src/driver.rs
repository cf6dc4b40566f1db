//! Native driver boundary — trait + Raspberry Pi backend + mock.
//!
//! The driver owns signal generation. This side only hands it a
//! [`Descriptor`], asks it to init/render/finalize, and reads and writes
//! packed words in its LED buffer.

use std::fmt;

use crate::color::PackedColor;
use crate::descriptor::Descriptor;

// ── Error type ──

/// Native driver errors.
///
/// Status codes are the driver's raw return values; nothing here
/// interprets them beyond "zero is success".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The native descriptor could not be allocated.
    Alloc,
    /// `init` returned a non-zero status.
    Init(i32),
    /// `render` returned a non-zero status.
    Render(i32),
    /// A sub-channel asks for more LEDs than the driver can address.
    Count(usize),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Alloc => write!(f, "unable to allocate memory"),
            DriverError::Init(code) => write!(f, "driver initialization failed: code {code}"),
            DriverError::Render(code) => write!(f, "driver render failed: code {code}"),
            DriverError::Count(n) => write!(
                f,
                "LED count {n} exceeds the driver limit of {}",
                crate::descriptor::MAX_LEDS
            ),
        }
    }
}

impl std::error::Error for DriverError {}

pub type Result<T> = std::result::Result<T, DriverError>;

/// Reject descriptors whose LED counts the driver cannot represent.
fn check_counts(descriptor: &Descriptor) -> Result<()> {
    match descriptor
        .channels
        .iter()
        .find(|ch| ch.count > crate::descriptor::MAX_LEDS)
    {
        Some(ch) => Err(DriverError::Count(ch.count)),
        None => Ok(()),
    }
}

/// Whether the driver is up after an `init` returning `status`.
///
/// A failed re-init does not undo an earlier successful one, so the
/// driver still needs its finalize.
fn brought_up(was_up: bool, status: i32) -> bool {
    was_up || status == 0
}

/// Status returned by `init`/`render` on a driver that was never loaded.
/// Same value as the native driver's generic failure.
pub const STATUS_NOT_LOADED: i32 = -1;

// ── Trait ──

/// The five native entry points plus descriptor allocation.
pub trait NativeDriver {
    /// Allocate a zeroed native descriptor and write `descriptor` into it.
    /// Does not touch hardware.
    fn load(&mut self, descriptor: &Descriptor) -> Result<()>;

    /// Hand the descriptor to the driver. Returns the raw status (0 = ok).
    fn init(&mut self) -> i32;

    /// Push the LED buffer out to the strip. Blocks for the transmission.
    fn render(&mut self) -> i32;

    fn set_led(&mut self, channel: usize, index: usize, color: PackedColor);

    fn get_led(&self, channel: usize, index: usize) -> PackedColor;

    /// Release every native resource. Called at most once per load.
    fn finalize(&mut self);
}

// ── Raspberry Pi implementation ──

#[cfg(all(feature = "rpi", target_os = "linux"))]
mod rpi_impl {
    use super::*;
    use std::alloc::{self, Layout};
    use std::os::raw::c_int;
    use std::ptr::NonNull;

    use rs_ws281x::bindings::{ws2811_fini, ws2811_init, ws2811_render, ws2811_t};

    /// `ws2811_t` held on the heap, owned by exactly one controller.
    pub struct Ws2811Driver {
        raw: Option<NonNull<ws2811_t>>,
        /// Set once `ws2811_init` succeeded; only then does `ws2811_fini` apply.
        initialized: bool,
    }

    // The raw pointer is never shared; access is serialized by `&mut self`.
    unsafe impl Send for Ws2811Driver {}

    impl Default for Ws2811Driver {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Ws2811Driver {
        pub fn new() -> Self {
            Ws2811Driver {
                raw: None,
                initialized: false,
            }
        }

        fn layout() -> Layout {
            Layout::new::<ws2811_t>()
        }

        /// Pointer to one LED slot, or `None` when the channel is unknown,
        /// the driver has not allocated its buffer yet, or `index` is past
        /// the configured count.
        fn led_slot(&self, channel: usize, index: usize) -> Option<*mut u32> {
            let raw = self.raw?;
            // SAFETY: `raw` came from `alloc_zeroed` in `load` and is only
            // freed in `release`, which clears `self.raw`.
            let ws = unsafe { raw.as_ref() };
            let ch = ws.channel.get(channel)?;
            let count = usize::try_from(ch.count).ok()?;
            if ch.leds.is_null() || index >= count {
                return None;
            }
            // SAFETY: the driver allocates `count` LEDs at `leds`; index < count.
            Some(unsafe { ch.leds.add(index) } as *mut u32)
        }

        fn release(&mut self) {
            if let Some(raw) = self.raw.take() {
                // SAFETY: `raw` is a live allocation of `Self::layout()`.
                // `ws2811_fini` is only valid after a successful init; a
                // failed init already cleaned up after itself.
                unsafe {
                    if self.initialized {
                        ws2811_fini(raw.as_ptr());
                    }
                    alloc::dealloc(raw.as_ptr() as *mut u8, Self::layout());
                }
                self.initialized = false;
            }
        }
    }

    impl NativeDriver for Ws2811Driver {
        fn load(&mut self, descriptor: &Descriptor) -> Result<()> {
            check_counts(descriptor)?;
            self.release();

            // SAFETY: `ws2811_t` has non-zero size; all-zero is the state the
            // driver expects before its fields are filled in.
            let ptr = unsafe { alloc::alloc_zeroed(Self::layout()) } as *mut ws2811_t;
            let raw = NonNull::new(ptr).ok_or(DriverError::Alloc)?;

            // SAFETY: freshly allocated, zeroed and exclusively owned.
            let ws = unsafe { &mut *raw.as_ptr() };
            ws.freq = descriptor.frequency_hz;
            ws.dmanum = descriptor.dma_channel;
            for (native, ch) in ws.channel.iter_mut().zip(descriptor.channels.iter()) {
                // Bounded by `check_counts`.
                native.count = ch.count as c_int;
                native.gpionum = ch.gpio_pin;
                native.brightness = ch.brightness;
                native.invert = c_int::from(ch.invert);
                native.strip_type = ch.strip_layout.code() as c_int;
            }

            self.raw = Some(raw);
            Ok(())
        }

        fn init(&mut self) -> i32 {
            let Some(raw) = self.raw else {
                return STATUS_NOT_LOADED;
            };
            // SAFETY: `raw` points to a loaded descriptor.
            let status = unsafe { ws2811_init(raw.as_ptr()) } as i32;
            self.initialized = brought_up(self.initialized, status);
            status
        }

        fn render(&mut self) -> i32 {
            let Some(raw) = self.raw else {
                return STATUS_NOT_LOADED;
            };
            // SAFETY: `raw` points to a loaded descriptor; the driver
            // reports its own error if init has not run.
            unsafe { ws2811_render(raw.as_ptr()) as i32 }
        }

        fn set_led(&mut self, channel: usize, index: usize, color: PackedColor) {
            if let Some(slot) = self.led_slot(channel, index) {
                // SAFETY: `led_slot` bounds-checked the slot.
                unsafe { *slot = color.raw() };
            }
        }

        fn get_led(&self, channel: usize, index: usize) -> PackedColor {
            match self.led_slot(channel, index) {
                // SAFETY: `led_slot` bounds-checked the slot.
                Some(slot) => PackedColor(unsafe { *slot }),
                None => PackedColor::default(),
            }
        }

        fn finalize(&mut self) {
            self.release();
        }
    }

    impl Drop for Ws2811Driver {
        fn drop(&mut self) {
            self.release();
        }
    }
}

#[cfg(all(feature = "rpi", target_os = "linux"))]
pub use rpi_impl::Ws2811Driver;

// ── Mock driver for testing ──

/// In-memory mock driver for unit and integration tests and dry runs.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::config::SUB_CHANNELS;

    #[derive(Default)]
    struct MockState {
        descriptor: RefCell<Option<Descriptor>>,
        leds: RefCell<[Vec<PackedColor>; SUB_CHANNELS]>,
        /// Active LED buffers captured at each successful render.
        frames: RefCell<Vec<[Vec<PackedColor>; SUB_CHANNELS]>>,
        load_calls: Cell<usize>,
        init_calls: Cell<usize>,
        render_calls: Cell<usize>,
        finalize_calls: Cell<usize>,
        fail_alloc: Cell<bool>,
        initialized: Cell<bool>,
        init_status: Cell<i32>,
        render_status: Cell<i32>,
    }

    /// Records every call and keeps LED buffers in memory.
    ///
    /// Clones share state, so a test can keep one clone while a controller
    /// owns the other.
    #[derive(Clone, Default)]
    pub struct MockDriver {
        state: Rc<MockState>,
    }

    impl MockDriver {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make the next `load` fail with [`DriverError::Alloc`].
        pub fn fail_alloc(&self, fail: bool) {
            self.state.fail_alloc.set(fail);
        }

        /// Status returned by subsequent `init` calls.
        pub fn set_init_status(&self, status: i32) {
            self.state.init_status.set(status);
        }

        /// Status returned by subsequent `render` calls.
        pub fn set_render_status(&self, status: i32) {
            self.state.render_status.set(status);
        }

        /// The descriptor written by the last `load`, if any.
        pub fn descriptor(&self) -> Option<Descriptor> {
            *self.state.descriptor.borrow()
        }

        /// Current buffer contents of one sub-channel.
        pub fn leds(&self, channel: usize) -> Vec<PackedColor> {
            self.state
                .leds
                .borrow()
                .get(channel)
                .cloned()
                .unwrap_or_default()
        }

        /// Buffer of `channel` at each successful render, oldest first.
        pub fn frames(&self, channel: usize) -> Vec<Vec<PackedColor>> {
            self.state
                .frames
                .borrow()
                .iter()
                .filter_map(|frame| frame.get(channel).cloned())
                .collect()
        }

        pub fn load_calls(&self) -> usize {
            self.state.load_calls.get()
        }

        pub fn init_calls(&self) -> usize {
            self.state.init_calls.get()
        }

        pub fn render_calls(&self) -> usize {
            self.state.render_calls.get()
        }

        pub fn finalize_calls(&self) -> usize {
            self.state.finalize_calls.get()
        }

        /// Whether some `init` since the last `load` succeeded.
        pub fn is_initialized(&self) -> bool {
            self.state.initialized.get()
        }
    }

    impl NativeDriver for MockDriver {
        fn load(&mut self, descriptor: &Descriptor) -> Result<()> {
            let s = &self.state;
            s.load_calls.set(s.load_calls.get() + 1);
            if s.fail_alloc.get() {
                return Err(DriverError::Alloc);
            }
            check_counts(descriptor)?;
            s.initialized.set(false);
            *s.descriptor.borrow_mut() = Some(*descriptor);
            let mut leds = s.leds.borrow_mut();
            for (buf, ch) in leds.iter_mut().zip(descriptor.channels.iter()) {
                *buf = vec![PackedColor::default(); ch.count];
            }
            Ok(())
        }

        fn init(&mut self) -> i32 {
            let s = &self.state;
            s.init_calls.set(s.init_calls.get() + 1);
            if s.descriptor.borrow().is_none() {
                return STATUS_NOT_LOADED;
            }
            let status = s.init_status.get();
            s.initialized.set(brought_up(s.initialized.get(), status));
            status
        }

        fn render(&mut self) -> i32 {
            let s = &self.state;
            s.render_calls.set(s.render_calls.get() + 1);
            let status = s.render_status.get();
            if status == 0 {
                s.frames.borrow_mut().push(s.leds.borrow().clone());
            }
            status
        }

        fn set_led(&mut self, channel: usize, index: usize, color: PackedColor) {
            if let Some(slot) = self
                .state
                .leds
                .borrow_mut()
                .get_mut(channel)
                .and_then(|buf| buf.get_mut(index))
            {
                *slot = color;
            }
        }

        fn get_led(&self, channel: usize, index: usize) -> PackedColor {
            self.state
                .leds
                .borrow()
                .get(channel)
                .and_then(|buf| buf.get(index))
                .copied()
                .unwrap_or_default()
        }

        fn finalize(&mut self) {
            let s = &self.state;
            s.finalize_calls.set(s.finalize_calls.get() + 1);
            s.initialized.set(false);
            *s.descriptor.borrow_mut() = None;
            for buf in s.leds.borrow_mut().iter_mut() {
                buf.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockDriver;
    use super::*;
    use crate::config::HardwareConfig;

    fn loaded_mock(size: usize) -> MockDriver {
        let mut drv = MockDriver::new();
        let d = Descriptor::from_config(size, &HardwareConfig::default()).unwrap();
        drv.load(&d).unwrap();
        drv
    }

    #[test]
    fn display_messages() {
        assert_eq!(DriverError::Alloc.to_string(), "unable to allocate memory");
        assert_eq!(
            DriverError::Init(-5).to_string(),
            "driver initialization failed: code -5"
        );
        assert_eq!(
            DriverError::Render(-9).to_string(),
            "driver render failed: code -9"
        );
    }

    #[test]
    fn mock_load_sizes_buffers_per_channel() {
        let drv = loaded_mock(4);
        assert_eq!(drv.leds(0).len(), 4);
        assert!(drv.leds(1).is_empty());
        assert!(drv.leds(2).is_empty());
    }

    #[test]
    fn mock_fail_alloc() {
        let mut drv = MockDriver::new();
        drv.fail_alloc(true);
        let d = Descriptor::default();
        assert_eq!(drv.load(&d), Err(DriverError::Alloc));
        assert!(drv.descriptor().is_none());
    }

    #[test]
    fn failed_reinit_keeps_driver_up() {
        assert!(brought_up(false, 0));
        assert!(!brought_up(false, -2));
        assert!(brought_up(true, -2));

        let mut drv = loaded_mock(1);
        assert_eq!(drv.init(), 0);
        drv.set_init_status(-2);
        assert_eq!(drv.init(), -2);
        assert!(drv.is_initialized());
        drv.finalize();
        assert!(!drv.is_initialized());
    }

    #[test]
    fn load_rejects_unaddressable_count() {
        let mut drv = MockDriver::new();
        let mut d = Descriptor::default();
        d.channels[1].count = crate::descriptor::MAX_LEDS + 1;
        assert_eq!(drv.load(&d), Err(DriverError::Count(crate::descriptor::MAX_LEDS + 1)));
        assert!(drv.descriptor().is_none());
        assert!(
            DriverError::Count(7)
                .to_string()
                .starts_with("LED count 7 exceeds the driver limit")
        );
    }

    #[test]
    fn mock_init_before_load_reports_not_loaded() {
        let mut drv = MockDriver::new();
        assert_eq!(drv.init(), STATUS_NOT_LOADED);
    }

    #[test]
    fn mock_set_get_and_out_of_range() {
        let mut drv = loaded_mock(2);
        drv.set_led(0, 1, PackedColor(0x00AB_CDEF));
        assert_eq!(drv.get_led(0, 1), PackedColor(0x00AB_CDEF));
        drv.set_led(0, 5, PackedColor(1));
        drv.set_led(7, 0, PackedColor(1));
        assert_eq!(drv.get_led(0, 5), PackedColor::default());
        assert_eq!(drv.get_led(7, 0), PackedColor::default());
    }

    #[test]
    fn mock_render_snapshots_frame() {
        let mut drv = loaded_mock(1);
        drv.set_led(0, 0, PackedColor(1));
        assert_eq!(drv.render(), 0);
        drv.set_led(0, 0, PackedColor(2));
        assert_eq!(drv.render(), 0);
        assert_eq!(
            drv.frames(0),
            vec![vec![PackedColor(1)], vec![PackedColor(2)]]
        );
    }

    #[test]
    fn mock_failed_render_keeps_no_frame() {
        let mut drv = loaded_mock(1);
        drv.set_render_status(-7);
        assert_eq!(drv.render(), -7);
        assert!(drv.frames(0).is_empty());
        assert_eq!(drv.render_calls(), 1);
    }

    #[test]
    fn mock_clones_share_state() {
        let drv = loaded_mock(1);
        let mut other = drv.clone();
        other.set_led(0, 0, PackedColor(9));
        other.finalize();
        assert_eq!(drv.finalize_calls(), 1);
        assert!(drv.leds(0).is_empty());
    }
}

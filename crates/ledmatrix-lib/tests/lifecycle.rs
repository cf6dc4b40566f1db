//! Integration tests: end-to-end matrix lifecycles using MockDriver.
//!
//! These tests drive the full new → initialize → set/at/render → close
//! cycle through the public API, checking what reaches the driver and
//! in which order.

use ledmatrix_lib::color::{self, PackedColor};
use ledmatrix_lib::driver::DriverError;
use ledmatrix_lib::driver::mock::MockDriver;
use ledmatrix_lib::{
    HardwareConfig, Matrix, MatrixController, MatrixError, Rgba8, Rgba16, State, StripLayout,
};

/// Helper: the reference 3-LED GRB strip on sub-channel 0.
fn grb_config() -> HardwareConfig {
    HardwareConfig {
        frequency_hz: 800_000,
        dma_channel: 10,
        pwm_channel: 0,
        brightness: 30,
        strip_layout: StripLayout::Grb,
        ..HardwareConfig::default()
    }
}

/// Helper: a controller plus a clone of its driver for inspection.
fn open(size: usize, config: HardwareConfig) -> (MockDriver, MatrixController<MockDriver>) {
    let drv = MockDriver::new();
    let m = MatrixController::with_driver(drv.clone(), size, config).unwrap();
    (drv, m)
}

// ── Test: reference scenario ──

#[test]
fn white_pixel_reads_back_before_render() {
    let (drv, mut m) = open(3, grb_config());
    m.initialize().unwrap();

    m.set(0, &Rgba16::new(65535, 65535, 65535, 0));
    assert_eq!(m.at(0), Rgba8::new(255, 255, 255, 0));
    assert_eq!(m.at(1), Rgba8::BLACK);
    assert_eq!(drv.leds(0)[0], PackedColor(0x00FF_FFFF));

    m.render().unwrap();
    m.close().unwrap();
    assert_eq!(drv.frames(0).len(), 1);
    assert_eq!(drv.finalize_calls(), 1);
}

// ── Test: animation-style loop ──

#[test]
fn chase_across_strip_renders_each_frame() {
    let size = 8;
    let (drv, mut m) = open(size, grb_config());
    m.initialize().unwrap();

    let red = Rgba8::new(255, 0, 0, 0);
    for step in 0..size {
        for i in 0..size {
            m.set(i, &Rgba8::BLACK);
        }
        m.set(step, &red);
        m.render().unwrap();
    }

    let frames = drv.frames(0);
    assert_eq!(frames.len(), size);
    for (step, frame) in frames.iter().enumerate() {
        for (i, &px) in frame.iter().enumerate() {
            let expected = if i == step { 0x00FF_0000 } else { 0 };
            assert_eq!(px.raw(), expected, "frame {step} pixel {i}");
        }
    }
}

// ── Test: RGBW strip on the second sub-channel ──

#[test]
fn rgbw_on_second_sub_channel() {
    let config = HardwareConfig {
        pin: 13,
        pwm_channel: 1,
        strip_layout: StripLayout::Grbw,
        ..HardwareConfig::default()
    };
    let (drv, mut m) = open(4, config);

    let d = drv.descriptor().unwrap();
    assert_eq!(d.channels[0].count, 0);
    assert_eq!(d.channels[0].strip_layout, StripLayout::Rgb);
    assert_eq!(d.channels[1].count, 4);
    assert_eq!(d.channels[1].gpio_pin, 13);
    assert_eq!(d.channels[1].strip_layout.code(), 0x1808_1000);

    m.initialize().unwrap();
    let warm = color::parse_color("warm").unwrap();
    m.set(3, &warm);
    assert_eq!(drv.leds(1)[3], PackedColor(0xFF00_0000));
    assert_eq!(m.at(3), warm);
}

// ── Test: re-setting a read color is stable ──

#[test]
fn read_modify_write_is_stable() {
    let (_drv, mut m) = open(1, grb_config());
    m.set(0, &Rgba16::new(0x12FF, 0x3400, 0x56AA, 0x7801));
    let first = m.at(0);
    m.set(0, &first);
    assert_eq!(m.at(0), first);
    assert_eq!(first, Rgba8::new(0x12, 0x34, 0x56, 0x78));
}

// ── Test: driver failures ──

#[test]
fn init_rejection_is_reported_and_close_still_safe() {
    let (drv, mut m) = open(3, grb_config());
    drv.set_init_status(-14);

    let err = m.initialize().unwrap_err();
    assert!(matches!(err, MatrixError::Driver(DriverError::Init(-14))));
    assert_eq!(m.state(), State::Created);

    m.close().unwrap();
    m.close().unwrap();
    assert_eq!(drv.finalize_calls(), 1);
}

#[test]
fn render_failure_does_not_change_state() {
    let (drv, mut m) = open(2, grb_config());
    m.initialize().unwrap();
    drv.set_render_status(-11);
    assert!(m.render().is_err());
    assert_eq!(m.state(), State::Ready);

    drv.set_render_status(0);
    m.render().unwrap();
    assert_eq!(drv.render_calls(), 2);
    assert_eq!(drv.frames(0).len(), 1);
}

// ── Test: teardown ──

#[test]
fn scoped_controller_releases_on_early_return() {
    fn paint(drv: MockDriver) -> ledmatrix_lib::error::Result<()> {
        let mut m = MatrixController::with_driver(drv, 2, grb_config())?;
        m.initialize()?;
        m.set(0, &Rgba8::new(1, 1, 1, 0));
        m.render()?;
        Ok(())
    }

    let drv = MockDriver::new();
    drv.set_render_status(3);
    assert!(paint(drv.clone()).is_err());
    assert_eq!(drv.finalize_calls(), 1);
}

#[test]
fn generic_client_code_over_matrix_trait() {
    fn fill(m: &mut impl Matrix, color: &Rgba8) {
        for i in 0..m.len() {
            m.set(i, color);
        }
    }

    let (drv, mut m) = open(5, grb_config());
    m.initialize().unwrap();
    fill(&mut m, &Rgba8::new(0, 0x80, 0, 0));
    Matrix::render(&mut m).unwrap();
    assert!(drv.frames(0)[0].iter().all(|&px| px == PackedColor(0x0000_8000)));
}

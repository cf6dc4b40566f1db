//! `fill` / `set` / `clear` subcommands — paint the strip and render once.

use std::path::Path;

use ledmatrix_lib::driver::mock::MockDriver;
use ledmatrix_lib::{Matrix, MatrixController, Rgba8};

use super::{Config, FrameOutput, MatrixError, Result, color, print_json};

pub(super) enum Paint {
    Fill(Rgba8),
    Single(usize, Rgba8),
    Clear,
}

/// Run one full lifecycle: initialize, paint, render, close.
fn apply(m: &mut impl Matrix, paint: &Paint) -> Result<()> {
    m.initialize()?;
    match paint {
        Paint::Fill(c) => {
            for i in 0..m.len() {
                m.set(i, c);
            }
        }
        Paint::Single(index, c) => m.set(*index, c),
        Paint::Clear => {
            for i in 0..m.len() {
                m.set(i, &Rgba8::BLACK);
            }
        }
    }
    m.render()?;
    m.close()
}

fn check_index(paint: &Paint, size: usize) -> Result<()> {
    if let Paint::Single(index, _) = paint
        && *index >= size
    {
        return Err(MatrixError::Config(format!(
            "LED index {index} is out of range (strip has {size} LED{})",
            if size == 1 { "" } else { "s" }
        )));
    }
    Ok(())
}

pub(super) fn cmd_paint(
    paint: Paint,
    dry_run: bool,
    json: bool,
    custom_path: Option<&Path>,
) -> Result<()> {
    let config = super::load_config(custom_path);
    if let Err(errors) = config.validate() {
        for e in &errors {
            log::warn!("{e}");
        }
    }
    check_index(&paint, config.size)?;

    if dry_run {
        let frame = dry_run_paint(&config, &paint)?;
        print_frame(&frame, json);
        return Ok(());
    }
    hardware_paint(&config, &paint)
}

/// Paint against the in-memory driver and return the rendered frame.
fn dry_run_paint(config: &Config, paint: &Paint) -> Result<FrameOutput> {
    let driver = MockDriver::new();
    let mut m = MatrixController::with_driver(driver.clone(), config.size, config.hardware.clone())?;
    apply(&mut m, paint)?;

    let channel = config.hardware.pwm_channel;
    let pixels = driver
        .frames(channel)
        .pop()
        .unwrap_or_default()
        .into_iter()
        .map(|p| color::format_color(color::decode(p)))
        .collect();
    Ok(FrameOutput { channel, pixels })
}

fn print_frame(frame: &FrameOutput, json: bool) {
    if json {
        print_json(frame);
        return;
    }
    println!(
        "Rendered {} LED{} on sub-channel {} (dry run):",
        frame.pixels.len(),
        if frame.pixels.len() == 1 { "" } else { "s" },
        frame.channel
    );
    for (i, px) in frame.pixels.iter().enumerate() {
        println!("  [{i:>3}] {px}");
    }
}

#[cfg(all(feature = "rpi", target_os = "linux"))]
fn hardware_paint(config: &Config, paint: &Paint) -> Result<()> {
    use ledmatrix_lib::driver::Ws2811Driver;

    let mut m = MatrixController::<Ws2811Driver>::new(config.size, config.hardware.clone())?;
    apply(&mut m, paint)?;
    println!(
        "Rendered {} LED{} on GPIO {}",
        config.size,
        if config.size == 1 { "" } else { "s" },
        config.hardware.pin
    );
    Ok(())
}

#[cfg(not(all(feature = "rpi", target_os = "linux")))]
fn hardware_paint(_config: &Config, _paint: &Paint) -> Result<()> {
    Err(MatrixError::Config(
        "no hardware backend in this build (rebuild with --features rpi, or pass --dry-run)"
            .into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledmatrix_lib::HardwareConfig;

    fn config(size: usize) -> Config {
        Config {
            size,
            hardware: HardwareConfig::default(),
        }
    }

    #[test]
    fn dry_run_fill_paints_every_pixel() {
        let frame = dry_run_paint(&config(3), &Paint::Fill(Rgba8::new(0xFF, 0x80, 0, 0))).unwrap();
        assert_eq!(frame.channel, 0);
        assert_eq!(frame.pixels, vec!["#FF8000"; 3]);
    }

    #[test]
    fn dry_run_single_leaves_others_off() {
        let frame =
            dry_run_paint(&config(3), &Paint::Single(1, Rgba8::new(0, 0, 0xFF, 0))).unwrap();
        assert_eq!(frame.pixels, vec!["#000000", "#0000FF", "#000000"]);
    }

    #[test]
    fn dry_run_clear_is_black() {
        let frame = dry_run_paint(&config(2), &Paint::Clear).unwrap();
        assert_eq!(frame.pixels, vec!["#000000"; 2]);
    }

    #[test]
    fn dry_run_empty_strip() {
        let frame = dry_run_paint(&config(0), &Paint::Clear).unwrap();
        assert!(frame.pixels.is_empty());
    }

    #[test]
    fn dry_run_uses_configured_sub_channel() {
        let mut c = config(1);
        c.hardware.pwm_channel = 1;
        let frame = dry_run_paint(&c, &Paint::Fill(Rgba8::new(1, 2, 3, 4))).unwrap();
        assert_eq!(frame.channel, 1);
        assert_eq!(frame.pixels, vec!["#01020304"]);
    }

    #[test]
    fn index_past_end_is_rejected() {
        let err = check_index(&Paint::Single(3, Rgba8::BLACK), 3).unwrap_err();
        assert!(err.to_string().contains("out of range (strip has 3 LEDs)"));
        assert!(check_index(&Paint::Single(2, Rgba8::BLACK), 3).is_ok());
        assert!(check_index(&Paint::Clear, 0).is_ok());
    }

    #[cfg(not(all(feature = "rpi", target_os = "linux")))]
    #[test]
    fn hardware_paint_without_backend_fails() {
        let err = hardware_paint(&config(1), &Paint::Clear).unwrap_err();
        assert!(err.to_string().contains("--dry-run"));
    }
}

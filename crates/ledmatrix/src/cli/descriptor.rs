//! `descriptor` subcommand — show the driver descriptor for the config.

use std::path::Path;

use super::{Descriptor, DescriptorOutput, Result, kv, kv_width, print_json};

pub(super) fn cmd_descriptor(
    size: Option<usize>,
    json: bool,
    custom_path: Option<&Path>,
) -> Result<()> {
    let config = super::load_config(custom_path);
    let size = size.unwrap_or(config.size);
    let descriptor = Descriptor::from_config(size, &config.hardware)?;
    let active = config.hardware.pwm_channel;

    if json {
        print_json(&DescriptorOutput {
            active_channel: active,
            descriptor,
        });
        return Ok(());
    }

    let w = kv_width(&["Frequency:", "DMA channel:"], &[]);
    kv("Frequency:", format_args!("{} Hz", descriptor.frequency_hz), w);
    kv("DMA channel:", descriptor.dma_channel, w);
    println!();
    println!(
        "  {:<4}{:<8}{:<6}{:<12}{:<8}Layout",
        "Ch", "Count", "Pin", "Brightness", "Invert"
    );
    for (i, ch) in descriptor.channels.iter().enumerate() {
        let marker = if i == active { "*" } else { " " };
        println!(
            "{marker} {:<4}{:<8}{:<6}{:<12}{:<8}{} (0x{:08X})",
            i,
            ch.count,
            ch.gpio_pin,
            ch.brightness,
            ch.invert,
            ch.strip_layout,
            ch.strip_layout.code()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_with_size_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.toml");
        assert!(cmd_descriptor(Some(0), false, Some(&path)).is_ok());
        assert!(cmd_descriptor(Some(300), true, Some(&path)).is_ok());
    }

    #[test]
    fn descriptor_bad_channel_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[hardware]\npwm_channel = 2\n").unwrap();
        let err = cmd_descriptor(None, false, Some(&path)).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}

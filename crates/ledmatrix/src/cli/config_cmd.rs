//! `config` subcommand — show current configuration, or write a default file.

use std::path::Path;

use super::{
    Config, ConfigInitOutput, ConfigOutput, MatrixError, Result, kv, kv_indent, kv_width,
    print_json,
};

/// Write the default config to `custom_path` or the platform path.
///
/// Refuses to replace an existing file unless `force` is set.
pub(super) fn cmd_config_init(force: bool, json: bool, custom_path: Option<&Path>) -> Result<()> {
    let path = custom_path
        .map(|p| p.to_path_buf())
        .or_else(Config::path)
        .ok_or_else(|| MatrixError::Config("no config directory on this platform".into()))?;

    let replaced = path.exists();
    if replaced && !force {
        return Err(MatrixError::Config(format!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save_to(&path)?;
    log::debug!("wrote default config to {}", path.display());

    if json {
        print_json(&ConfigInitOutput {
            config_file: path.display().to_string(),
            replaced,
        });
        return Ok(());
    }
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub(super) fn cmd_config(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());

    let problems: Vec<String> = match config.validate() {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    };

    if json {
        let output = ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            problems,
        };
        print_json(&output);
        return Ok(());
    }

    let w = kv_width(
        &["Config file:", "Size:"],
        &[
            "pin:",
            "frequency_hz:",
            "dma_channel:",
            "invert:",
            "pwm_channel:",
            "brightness:",
            "strip_layout:",
        ],
    );

    match &config_path {
        Some(p) if config_exists => kv("Config file:", format_args!("{} (loaded)", p.display()), w),
        Some(p) => kv(
            "Config file:",
            format_args!("{} (not found, using defaults)", p.display()),
            w,
        ),
        None => kv("Config file:", "(no config directory)", w),
    }
    kv("Size:", format_args!("{} LEDs", config.size), w);
    println!();

    let hw = &config.hardware;
    println!("Hardware:");
    let pin = if hw.pin == 0 {
        "0 (unused)".to_string()
    } else {
        hw.pin.to_string()
    };
    kv_indent("pin:", pin, w);
    kv_indent("frequency_hz:", hw.frequency_hz, w);
    kv_indent("dma_channel:", hw.dma_channel, w);
    kv_indent("invert:", hw.invert, w);
    kv_indent("pwm_channel:", hw.pwm_channel, w);
    kv_indent("brightness:", format_args!("{}/255", hw.brightness), w);
    kv_indent(
        "strip_layout:",
        format_args!("{} (0x{:08X})", hw.strip_layout, hw.strip_layout.code()),
        w,
    );

    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for p in &problems {
            println!("  - {p}");
        }
    }
    Ok(())
}

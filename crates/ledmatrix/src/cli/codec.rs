//! `encode` / `decode` subcommands — inspect the packed color word.

use super::{ColorJson, MatrixError, Result, color, kv, kv_width, print_json};
use ledmatrix_lib::PackedColor;

fn color_json(packed: PackedColor) -> ColorJson {
    let c = color::decode(packed);
    ColorJson {
        packed: packed.to_string(),
        red: c.red,
        green: c.green,
        blue: c.blue,
        white: c.alpha,
        hex: color::format_color(c),
    }
}

fn print_color(packed: PackedColor, json: bool) {
    let out = color_json(packed);
    if json {
        print_json(&out);
        return;
    }
    let w = kv_width(&["Packed:", "Red:", "Green:", "Blue:", "White:", "Hex:"], &[]);
    kv("Packed:", &out.packed, w);
    kv("Red:", out.red, w);
    kv("Green:", out.green, w);
    kv("Blue:", out.blue, w);
    kv("White:", out.white, w);
    kv("Hex:", &out.hex, w);
}

/// Parse `0x00FF8000`, `00FF8000` or a decimal word.
fn parse_packed(s: &str) -> Result<PackedColor> {
    let s = s.trim();
    let invalid = || MatrixError::Color(format!("Invalid packed color: {s}"));
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex.replace('_', ""), 16),
        None if s.len() == 8 => (s.to_string(), 16),
        None => (s.to_string(), 10),
    };
    // from_str_radix tolerates a leading sign; only bare digits are a color.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }
    u32::from_str_radix(&digits, radix)
        .map(PackedColor)
        .map_err(|_| invalid())
}

pub(super) fn cmd_encode(input: &str, json: bool) -> Result<()> {
    let c = color::parse_color(input)?;
    print_color(color::encode(&c), json);
    Ok(())
}

pub(super) fn cmd_decode(input: &str, json: bool) -> Result<()> {
    let packed = parse_packed(input)?;
    print_color(packed, json);
    Ok(())
}

//! Color codec — application colors to and from the driver's packed word.
//!
//! The packed word is `0xWWRRGGBB`: white (or alpha) in the high byte, then
//! red, green and blue. It does not depend on the strip layout; the driver
//! reorders sub-pixels itself when it generates the signal.

use std::fmt;

/// The 32-bit color word exchanged with the native driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedColor(pub u32);

impl PackedColor {
    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn white(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for PackedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Four independent 16-bit channels (0–65535). `alpha` doubles as the white
/// sub-pixel on RGBW strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba16 {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub alpha: u16,
}

impl Rgba16 {
    pub const fn new(red: u16, green: u16, blue: u16, alpha: u16) -> Self {
        Rgba16 {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Four independent 8-bit channels, as read back from the driver buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Rgba8 {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Anything that can report 16-bit-per-channel RGBA values.
pub trait Color {
    fn rgba16(&self) -> Rgba16;
}

impl Color for Rgba16 {
    fn rgba16(&self) -> Rgba16 {
        *self
    }
}

impl Color for Rgba8 {
    /// Widens each channel by byte replication (`0xAB` → `0xABAB`), so a
    /// color read back with `at` encodes to the same packed word.
    fn rgba16(&self) -> Rgba16 {
        let widen = |v: u8| u16::from(v) * 0x101;
        Rgba16::new(
            widen(self.red),
            widen(self.green),
            widen(self.blue),
            widen(self.alpha),
        )
    }
}

impl<C: Color + ?Sized> Color for &C {
    fn rgba16(&self) -> Rgba16 {
        (**self).rgba16()
    }
}

/// Pack a color into the driver word, keeping the high byte of each channel.
pub fn encode(color: &impl Color) -> PackedColor {
    let c = color.rgba16();
    let high = |v: u16| u32::from(v >> 8);
    PackedColor(high(c.alpha) << 24 | high(c.red) << 16 | high(c.green) << 8 | high(c.blue))
}

/// Unpack a driver word. Channels stay in the 0–255 range.
pub fn decode(packed: PackedColor) -> Rgba8 {
    Rgba8::new(packed.red(), packed.green(), packed.blue(), packed.white())
}

/// Parse a color string.
///
/// Accepts:
/// - Hex: `"#FF0000"`, `"FF0000"`, or `"#FF000080"` with a trailing white byte
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"warm"`, `"orange"`,
///   `"yellow"`, `"purple"`, `"cyan"`, `"off"`/`"black"`
pub fn parse_color(s: &str) -> crate::error::Result<Rgba8> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(Rgba8::new(0xFF, 0, 0, 0)),
        "green" => return Ok(Rgba8::new(0, 0xFF, 0, 0)),
        "blue" => return Ok(Rgba8::new(0, 0, 0xFF, 0)),
        "white" => return Ok(Rgba8::new(0xFF, 0xFF, 0xFF, 0)),
        // White sub-pixel only (RGBW strips).
        "warm" => return Ok(Rgba8::new(0, 0, 0, 0xFF)),
        "orange" => return Ok(Rgba8::new(0xFF, 0x80, 0, 0)),
        "yellow" => return Ok(Rgba8::new(0xFF, 0xFF, 0, 0)),
        "purple" => return Ok(Rgba8::new(0x80, 0, 0xFF, 0)),
        "cyan" => return Ok(Rgba8::new(0, 0xFF, 0xFF, 0)),
        "off" | "black" => return Ok(Rgba8::BLACK),
        _ => {}
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if (hex.len() != 6 && hex.len() != 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(crate::MatrixError::Color(format!(
            "Invalid color: {s} (use #RRGGBB, #RRGGBBWW or a color name)"
        )));
    }
    let val = u32::from_str_radix(hex, 16)
        .map_err(|_| crate::MatrixError::Color(format!("Invalid hex color: {s}")))?;
    let [a, b, c, d] = val.to_be_bytes();
    if hex.len() == 6 {
        Ok(Rgba8::new(b, c, d, 0))
    } else {
        Ok(Rgba8::new(a, b, c, d))
    }
}

/// Format as `#RRGGBB`, or `#RRGGBBWW` when the white byte is set.
pub fn format_color(c: Rgba8) -> String {
    if c.alpha == 0 {
        format!("#{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
    } else {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            c.red, c.green, c.blue, c.alpha
        )
    }
}

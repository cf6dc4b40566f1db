//! Strip layouts — sub-pixel ordering codes understood by the ws2811 driver.
//!
//! Each code packs the bit shift of every color byte inside the driver's
//! packed word: `[W shift][R shift][G shift][B shift]`, one byte each.
//! A zero white shift means the strip has no white sub-pixel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Physical order of the color sub-pixels within each LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StripLayout {
    Rgb,
    Rbg,
    #[default]
    Grb,
    Gbr,
    Brg,
    Bgr,
    Rgbw,
    Rbgw,
    Grbw,
    Gbrw,
    Brgw,
    Bgrw,
}

/// Static lookup: layout → (name, driver code).
static LAYOUT_TABLE: [(StripLayout, &str, u32); 12] = [
    (StripLayout::Rgb, "RGB", 0x0010_0800),
    (StripLayout::Rbg, "RBG", 0x0010_0008),
    (StripLayout::Grb, "GRB", 0x0008_1000),
    (StripLayout::Gbr, "GBR", 0x0008_0010),
    (StripLayout::Brg, "BRG", 0x0000_1008),
    (StripLayout::Bgr, "BGR", 0x0000_0810),
    (StripLayout::Rgbw, "RGBW", 0x1810_0800),
    (StripLayout::Rbgw, "RBGW", 0x1810_0008),
    (StripLayout::Grbw, "GRBW", 0x1808_1000),
    (StripLayout::Gbrw, "GBRW", 0x1808_0010),
    (StripLayout::Brgw, "BRGW", 0x1800_1008),
    (StripLayout::Bgrw, "BGRW", 0x1800_0810),
];

/// Mask selecting the white shift byte of a layout code.
const WHITE_SHIFT_MASK: u32 = 0xFF00_0000;

impl StripLayout {
    /// Every layout the driver enumerates, 3-channel orderings first.
    pub const ALL: [StripLayout; 12] = [
        StripLayout::Rgb,
        StripLayout::Rbg,
        StripLayout::Grb,
        StripLayout::Gbr,
        StripLayout::Brg,
        StripLayout::Bgr,
        StripLayout::Rgbw,
        StripLayout::Rbgw,
        StripLayout::Grbw,
        StripLayout::Gbrw,
        StripLayout::Brgw,
        StripLayout::Bgrw,
    ];

    fn entry(self) -> &'static (StripLayout, &'static str, u32) {
        // Table order matches declaration order.
        &LAYOUT_TABLE[self as usize]
    }

    /// Opaque driver code for this layout.
    pub fn code(self) -> u32 {
        self.entry().2
    }

    /// Short uppercase name, e.g. `"GRB"` or `"GRBW"`.
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn has_white(self) -> bool {
        self.code() & WHITE_SHIFT_MASK != 0
    }

    /// Number of sub-pixels per LED (3 or 4).
    pub fn channel_count(self) -> usize {
        if self.has_white() { 4 } else { 3 }
    }
}

impl fmt::Display for StripLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StripLayout {
    type Err = crate::MatrixError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        let wanted = s.trim();
        LAYOUT_TABLE
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(wanted))
            .map(|(layout, _, _)| *layout)
            .ok_or_else(|| {
                crate::MatrixError::Config(format!(
                    "Unknown strip layout: {wanted} (expected one of RGB, GRB, GRBW, ...)"
                ))
            })
    }
}

impl Serialize for StripLayout {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for StripLayout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_distinct_and_nonzero() {
        let codes: HashSet<u32> = StripLayout::ALL.iter().map(|l| l.code()).collect();
        assert_eq!(codes.len(), 12);
        assert!(!codes.contains(&0));
    }

    #[test]
    fn table_matches_declaration_order() {
        for (i, layout) in StripLayout::ALL.iter().enumerate() {
            assert_eq!(LAYOUT_TABLE[i].0, *layout);
            assert_eq!(*layout as usize, i);
        }
    }

    #[test]
    fn known_driver_codes() {
        assert_eq!(StripLayout::Rgb.code(), 0x0010_0800);
        assert_eq!(StripLayout::Grb.code(), 0x0008_1000);
        assert_eq!(StripLayout::Grbw.code(), 0x1808_1000);
        assert_eq!(StripLayout::Bgrw.code(), 0x1800_0810);
    }

    #[test]
    fn white_channel_detection() {
        assert!(!StripLayout::Grb.has_white());
        assert_eq!(StripLayout::Grb.channel_count(), 3);
        assert!(StripLayout::Rgbw.has_white());
        assert_eq!(StripLayout::Rgbw.channel_count(), 4);
        assert_eq!(
            StripLayout::ALL.iter().filter(|l| l.has_white()).count(),
            6
        );
    }

    #[test]
    fn default_is_grb() {
        assert_eq!(StripLayout::default(), StripLayout::Grb);
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!("grb".parse::<StripLayout>().unwrap(), StripLayout::Grb);
        assert_eq!(" GrBw ".parse::<StripLayout>().unwrap(), StripLayout::Grbw);
    }

    #[test]
    fn parse_unknown_is_config_error() {
        let err = "RGBX".parse::<StripLayout>().unwrap_err();
        assert!(err.to_string().starts_with("Config error: Unknown strip layout"));
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(StripLayout::Brgw.to_string(), "BRGW");
    }
}

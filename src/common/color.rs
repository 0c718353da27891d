//! Color type conversions and utilities
//!
//! Provides type-safe color handling with conversions between:
//! - Color strings (`#RGB`, `#RRGGBB`, `#AARRGGBB`, `#RRRRGGGGBBBB`, X11 names)
//! - ARGB32 values (u32)
//! - X11 render Colors (16-bit per channel)
//! - Window opacity cardinals (`_NET_WM_WINDOW_OPACITY`)

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use x11rb::protocol::render::Color;

/// X11 color database names (lower case, spaces removed), sorted for binary search
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xF0F8FF),
    ("antiquewhite", 0xFAEBD7),
    ("aqua", 0x00FFFF),
    ("aquamarine", 0x7FFFD4),
    ("azure", 0xF0FFFF),
    ("beige", 0xF5F5DC),
    ("bisque", 0xFFE4C4),
    ("black", 0x000000),
    ("blanchedalmond", 0xFFEBCD),
    ("blue", 0x0000FF),
    ("blueviolet", 0x8A2BE2),
    ("brown", 0xA52A2A),
    ("burlywood", 0xDEB887),
    ("cadetblue", 0x5F9EA0),
    ("chartreuse", 0x7FFF00),
    ("chocolate", 0xD2691E),
    ("coral", 0xFF7F50),
    ("cornflowerblue", 0x6495ED),
    ("cornsilk", 0xFFF8DC),
    ("crimson", 0xDC143C),
    ("cyan", 0x00FFFF),
    ("darkblue", 0x00008B),
    ("darkcyan", 0x008B8B),
    ("darkgoldenrod", 0xB8860B),
    ("darkgray", 0xA9A9A9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xA9A9A9),
    ("darkkhaki", 0xBDB76B),
    ("darkmagenta", 0x8B008B),
    ("darkolivegreen", 0x556B2F),
    ("darkorange", 0xFF8C00),
    ("darkorchid", 0x9932CC),
    ("darkred", 0x8B0000),
    ("darksalmon", 0xE9967A),
    ("darkseagreen", 0x8FBC8F),
    ("darkslateblue", 0x483D8B),
    ("darkslategray", 0x2F4F4F),
    ("darkslategrey", 0x2F4F4F),
    ("darkturquoise", 0x00CED1),
    ("darkviolet", 0x9400D3),
    ("deeppink", 0xFF1493),
    ("deepskyblue", 0x00BFFF),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1E90FF),
    ("firebrick", 0xB22222),
    ("floralwhite", 0xFFFAF0),
    ("forestgreen", 0x228B22),
    ("fuchsia", 0xFF00FF),
    ("gainsboro", 0xDCDCDC),
    ("ghostwhite", 0xF8F8FF),
    ("gold", 0xFFD700),
    ("goldenrod", 0xDAA520),
    ("gray", 0xBEBEBE),
    ("green", 0x00FF00),
    ("greenyellow", 0xADFF2F),
    ("grey", 0xBEBEBE),
    ("honeydew", 0xF0FFF0),
    ("hotpink", 0xFF69B4),
    ("indianred", 0xCD5C5C),
    ("indigo", 0x4B0082),
    ("ivory", 0xFFFFF0),
    ("khaki", 0xF0E68C),
    ("lavender", 0xE6E6FA),
    ("lavenderblush", 0xFFF0F5),
    ("lawngreen", 0x7CFC00),
    ("lemonchiffon", 0xFFFACD),
    ("lightblue", 0xADD8E6),
    ("lightcoral", 0xF08080),
    ("lightcyan", 0xE0FFFF),
    ("lightgoldenrod", 0xEEDD82),
    ("lightgoldenrodyellow", 0xFAFAD2),
    ("lightgray", 0xD3D3D3),
    ("lightgreen", 0x90EE90),
    ("lightgrey", 0xD3D3D3),
    ("lightpink", 0xFFB6C1),
    ("lightsalmon", 0xFFA07A),
    ("lightseagreen", 0x20B2AA),
    ("lightskyblue", 0x87CEFA),
    ("lightslateblue", 0x8470FF),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xB0C4DE),
    ("lightyellow", 0xFFFFE0),
    ("lime", 0x00FF00),
    ("limegreen", 0x32CD32),
    ("linen", 0xFAF0E6),
    ("magenta", 0xFF00FF),
    ("maroon", 0xB03060),
    ("mediumaquamarine", 0x66CDAA),
    ("mediumblue", 0x0000CD),
    ("mediumorchid", 0xBA55D3),
    ("mediumpurple", 0x9370DB),
    ("mediumseagreen", 0x3CB371),
    ("mediumslateblue", 0x7B68EE),
    ("mediumspringgreen", 0x00FA9A),
    ("mediumturquoise", 0x48D1CC),
    ("mediumvioletred", 0xC71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xF5FFFA),
    ("mistyrose", 0xFFE4E1),
    ("moccasin", 0xFFE4B5),
    ("navajowhite", 0xFFDEAD),
    ("navy", 0x000080),
    ("navyblue", 0x000080),
    ("oldlace", 0xFDF5E6),
    ("olive", 0x808000),
    ("olivedrab", 0x6B8E23),
    ("orange", 0xFFA500),
    ("orangered", 0xFF4500),
    ("orchid", 0xDA70D6),
    ("palegoldenrod", 0xEEE8AA),
    ("palegreen", 0x98FB98),
    ("paleturquoise", 0xAFEEEE),
    ("palevioletred", 0xDB7093),
    ("papayawhip", 0xFFEFD5),
    ("peachpuff", 0xFFDAB9),
    ("peru", 0xCD853F),
    ("pink", 0xFFC0CB),
    ("plum", 0xDDA0DD),
    ("powderblue", 0xB0E0E6),
    ("purple", 0xA020F0),
    ("rebeccapurple", 0x663399),
    ("red", 0xFF0000),
    ("rosybrown", 0xBC8F8F),
    ("royalblue", 0x4169E1),
    ("saddlebrown", 0x8B4513),
    ("salmon", 0xFA8072),
    ("sandybrown", 0xF4A460),
    ("seagreen", 0x2E8B57),
    ("seashell", 0xFFF5EE),
    ("sienna", 0xA0522D),
    ("silver", 0xC0C0C0),
    ("skyblue", 0x87CEEB),
    ("slateblue", 0x6A5ACD),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xFFFAFA),
    ("springgreen", 0x00FF7F),
    ("steelblue", 0x4682B4),
    ("tan", 0xD2B48C),
    ("teal", 0x008080),
    ("thistle", 0xD8BFD8),
    ("tomato", 0xFF6347),
    ("turquoise", 0x40E0D0),
    ("violet", 0xEE82EE),
    ("violetred", 0xD02090),
    ("wheat", 0xF5DEB3),
    ("white", 0xFFFFFF),
    ("whitesmoke", 0xF5F5F5),
    ("yellow", 0xFFFF00),
    ("yellowgreen", 0x9ACD32),
];

/// RGB value of an X11 color name, including the `grayN`/`greyN` scale
fn named_rgb(name: &str) -> Option<u32> {
    if let Ok(index) = NAMED_COLORS.binary_search_by(|(n, _)| (*n).cmp(name)) {
        return Some(NAMED_COLORS[index].1);
    }

    let level = name
        .strip_prefix("gray")
        .or_else(|| name.strip_prefix("grey"))?
        .parse::<u8>()
        .ok()
        .filter(|level| *level <= 100)?;
    let v = (f64::from(level) * 2.55).round() as u32;
    Some(v << 16 | v << 8 | v)
}

/// Color in ARGB32 format (0xAARRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgbColor(u32);

impl ArgbColor {
    /// Parse a color string.
    ///
    /// Accepted forms:
    /// - `#RGB` (each digit doubled), `#RRGGBB`, `#AARRGGBB`, `#RRRRGGGGBBBB`
    /// - 6 or 8 hex digits without the `#` prefix
    /// - an X11 color name such as `red`, `Forest Green` or `gray50`
    ///
    /// Forms without an alpha channel are fully opaque.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        let name: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        if let Some(rgb) = named_rgb(&name) {
            return Some(Self(0xFF_00_00_00 | rgb));
        }

        match input.len() {
            6 | 8 => Self::parse_hex(input),
            _ => None,
        }
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u64::from_str_radix(hex, 16).ok()?;

        let argb = match hex.len() {
            3 => {
                let r = ((value >> 8) & 0xF) as u32;
                let g = ((value >> 4) & 0xF) as u32;
                let b = (value & 0xF) as u32;
                0xFF_00_00_00 | (r * 0x11) << 16 | (g * 0x11) << 8 | (b * 0x11)
            }
            6 => 0xFF_00_00_00 | value as u32,
            8 => value as u32,
            12 => {
                // 16 bits per channel, keep the high byte of each
                let r = ((value >> 40) & 0xFF) as u32;
                let g = ((value >> 24) & 0xFF) as u32;
                let b = ((value >> 8) & 0xFF) as u32;
                0xFF_00_00_00 | r << 16 | g << 8 | b
            }
            _ => return None,
        };

        Some(Self(argb))
    }

    /// Create from ARGB32 value
    pub fn from_argb32(argb: u32) -> Self {
        Self(argb)
    }

    /// Get raw ARGB32 value
    pub fn argb32(self) -> u32 {
        self.0
    }

    /// Pixel value for a 24-bit TrueColor visual (alpha stripped)
    pub fn rgb24(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Convert to X11 Color (16-bit per channel, 0-65535 range)
    pub fn to_x11_color(self) -> Color {
        let a = (self.0 >> 24) & 0xFF;
        let r = (self.0 >> 16) & 0xFF;
        let g = (self.0 >> 8) & 0xFF;
        let b = self.0 & 0xFF;

        // Scale from 8-bit (0-255) to 16-bit (0-65535)
        let scale = |v: u32| (v << 8 | v) as u16;

        Color {
            red: scale(r),
            green: scale(g),
            blue: scale(b),
            alpha: scale(a),
        }
    }
}

impl FromStr for ArgbColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unrecognised color '{}'", s))
    }
}

impl fmt::Display for ArgbColor {
    /// `#RRGGBB` when opaque, `#AARRGGBB` otherwise
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >> 24 == 0xFF {
            write!(f, "#{:06X}", self.rgb24())
        } else {
            write!(f, "#{:08X}", self.0)
        }
    }
}

impl Serialize for ArgbColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Window opacity as a fraction in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Opacity(f32);

impl Opacity {
    /// Create from a fraction (clamped to 0-1, NaN treated as opaque)
    pub fn from_fraction(fraction: f32) -> Self {
        if fraction.is_nan() {
            Self(1.0)
        } else {
            Self(fraction.clamp(0.0, 1.0))
        }
    }

    pub fn fraction(self) -> f32 {
        self.0
    }

    pub fn is_opaque(self) -> bool {
        self.0 >= 1.0
    }

    /// Convert to the `_NET_WM_WINDOW_OPACITY` cardinal (0 = transparent, 0xFFFFFFFF = opaque)
    pub fn to_cardinal(self) -> u32 {
        (self.0 as f64 * u32::MAX as f64).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!(ArgbColor::parse("#007A33"), Some(ArgbColor(0xFF007A33)));
        assert_eq!(ArgbColor::parse("#ffffff"), Some(ArgbColor(0xFFFFFFFF)));
        assert_eq!(ArgbColor::parse("#00CC00"), Some(ArgbColor(0xFF00CC00)));

        // Short form doubles each digit
        assert_eq!(ArgbColor::parse("#0C0"), Some(ArgbColor(0xFF00CC00)));

        // Explicit alpha
        assert_eq!(ArgbColor::parse("#7FFF0000"), Some(ArgbColor(0x7FFF0000)));

        // 16 bits per channel
        assert_eq!(
            ArgbColor::parse("#FFFF80800000"),
            Some(ArgbColor(0xFFFF8000))
        );

        // Prefix is optional for 6 and 8 digits
        assert_eq!(ArgbColor::parse("5bfc37"), Some(ArgbColor(0xFF5BFC37)));
        assert_eq!(ArgbColor::parse("00FF0000"), Some(ArgbColor(0x00FF0000)));
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(ArgbColor::parse("red"), Some(ArgbColor(0xFFFF0000)));
        assert_eq!(ArgbColor::parse("Dark Green"), Some(ArgbColor(0xFF006400)));
        assert_eq!(ArgbColor::parse("  WHITE "), Some(ArgbColor(0xFFFFFFFF)));

        // Full X11 database names, any case or spacing
        assert_eq!(ArgbColor::parse("ForestGreen"), Some(ArgbColor(0xFF228B22)));
        assert_eq!(ArgbColor::parse("slate gray"), Some(ArgbColor(0xFF708090)));
        assert_eq!(ArgbColor::parse("LightGoldenrodYellow"), Some(ArgbColor(0xFFFAFAD2)));
    }

    #[test]
    fn test_gray_scale_names() {
        assert_eq!(ArgbColor::parse("gray0"), Some(ArgbColor(0xFF000000)));
        assert_eq!(ArgbColor::parse("grey10"), Some(ArgbColor(0xFF1A1A1A)));
        assert_eq!(ArgbColor::parse("gray50"), Some(ArgbColor(0xFF7F7F7F)));
        assert_eq!(ArgbColor::parse("Gray 70"), Some(ArgbColor(0xFFB3B3B3)));
        assert_eq!(ArgbColor::parse("gray100"), Some(ArgbColor(0xFFFFFFFF)));
        assert_eq!(ArgbColor::parse("gray101"), None);
        assert_eq!(ArgbColor::parse("gray-1"), None);
    }

    #[test]
    fn test_named_color_table_is_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_invalid_colors() {
        assert_eq!(ArgbColor::parse("invalid"), None);
        assert_eq!(ArgbColor::parse(""), None);
        assert_eq!(ArgbColor::parse("#"), None);
        assert_eq!(ArgbColor::parse("#12345"), None);
        assert_eq!(ArgbColor::parse("#GGGGGG"), None);
        assert_eq!(ArgbColor::parse("#+12345"), None);
    }

    #[test]
    fn test_color_to_x11() {
        let color = ArgbColor(0xFF_80_40_20);
        let x11 = color.to_x11_color();

        // 0xFF → 0xFFFF, 0x80 → 0x8080, 0x40 → 0x4040, 0x20 → 0x2020
        assert_eq!(x11.alpha, 0xFFFF);
        assert_eq!(x11.red, 0x8080);
        assert_eq!(x11.green, 0x4040);
        assert_eq!(x11.blue, 0x2020);
        assert_eq!(color.rgb24(), 0x80_40_20);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(ArgbColor(0xFF007A33).to_string(), "#007A33");
        assert_eq!(ArgbColor(0x7FFF0000).to_string(), "#7FFF0000");
        assert_eq!("navy".parse::<ArgbColor>(), Ok(ArgbColor(0xFF000080)));
        assert!("nope".parse::<ArgbColor>().is_err());
    }

    #[test]
    fn test_opacity_clamped() {
        assert_eq!(Opacity::from_fraction(1.5).fraction(), 1.0);
        assert_eq!(Opacity::from_fraction(-0.2).fraction(), 0.0);
        assert_eq!(Opacity::from_fraction(f32::NAN).fraction(), 1.0);
        assert!(Opacity::from_fraction(1.0).is_opaque());
        assert!(!Opacity::from_fraction(0.75).is_opaque());
    }

    #[test]
    fn test_opacity_to_cardinal() {
        assert_eq!(Opacity::from_fraction(1.0).to_cardinal(), u32::MAX);
        assert_eq!(Opacity::from_fraction(0.0).to_cardinal(), 0);

        let half = Opacity::from_fraction(0.5).to_cardinal();
        assert!((0x7FFF_0000..=0x8001_0000).contains(&half));
    }
}

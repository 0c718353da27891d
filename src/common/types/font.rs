//! Font size and weight values as written in the configuration
//!
//! Sizes follow the Pango markup vocabulary (`small`, `x-large`, ...) or an
//! explicit point size; weights follow the CSS/Pango names or numeric values.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::common::constants::layout;

/// Point size of the `medium` absolute size
const MEDIUM_POINTS: f32 = 10.0;

/// Ratio between neighbouring absolute sizes
const SCALE_STEP: f32 = 1.2;

/// Pango units per point (`size='10240'` means 10pt)
const PANGO_SCALE: f32 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "String")]
pub enum FontSize {
    /// Named size, stored as steps relative to `medium` (small = -1)
    Named(i8),
    Points(f32),
}

impl FontSize {
    const NAMES: [(&'static str, i8); 7] = [
        ("xx-small", -3),
        ("x-small", -2),
        ("small", -1),
        ("medium", 0),
        ("large", 1),
        ("x-large", 2),
        ("xx-large", 3),
    ];

    pub fn points(self) -> f32 {
        match self {
            Self::Named(steps) => MEDIUM_POINTS * SCALE_STEP.powi(steps as i32),
            Self::Points(points) => points,
        }
    }

    /// Pixel size at the assumed screen resolution
    pub fn pixels(self) -> f32 {
        self.points() * layout::DPI / 72.0
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some((_, steps)) = Self::NAMES.iter().find(|(name, _)| *name == lower) {
            return Ok(Self::Named(*steps));
        }

        let number = lower.strip_suffix("pt").unwrap_or(&lower).trim();
        let value: f32 = number
            .parse()
            .map_err(|_| format!("unrecognised font size '{}'", s))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(format!("font size must be positive, got '{}'", s));
        }

        // Plain integers this large are Pango units
        if value >= PANGO_SCALE && !lower.ends_with("pt") {
            Ok(Self::Points(value / PANGO_SCALE))
        } else {
            Ok(Self::Points(value))
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(steps) => {
                let name = Self::NAMES
                    .iter()
                    .find(|(_, s)| s == steps)
                    .map(|(name, _)| *name)
                    .unwrap_or("medium");
                f.write_str(name)
            }
            Self::Points(points) => write!(f, "{}pt", points),
        }
    }
}

impl From<FontSize> for String {
    fn from(size: FontSize) -> Self {
        size.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Thin,
    Light,
    Normal,
    Medium,
    Semibold,
    Bold,
    Heavy,
}

impl FontWeight {
    /// Fontconfig style name for this weight
    pub fn style_name(self) -> &'static str {
        match self {
            Self::Thin => "Thin",
            Self::Light => "Light",
            Self::Normal => "Regular",
            Self::Medium => "Medium",
            Self::Semibold => "SemiBold",
            Self::Bold => "Bold",
            Self::Heavy => "Black",
        }
    }

    fn from_numeric(value: u16) -> Self {
        match value {
            0..=149 => Self::Thin,
            150..=349 => Self::Light,
            350..=449 => Self::Normal,
            450..=549 => Self::Medium,
            550..=649 => Self::Semibold,
            650..=799 => Self::Bold,
            _ => Self::Heavy,
        }
    }
}

impl FromStr for FontWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let weight = match lower.as_str() {
            "thin" | "ultralight" | "extralight" => Self::Thin,
            "light" => Self::Light,
            "normal" | "regular" | "book" => Self::Normal,
            "medium" => Self::Medium,
            "semibold" | "demibold" => Self::Semibold,
            "bold" => Self::Bold,
            "ultrabold" | "extrabold" | "heavy" | "black" | "ultraheavy" => Self::Heavy,
            other => {
                let value: u16 = other
                    .parse()
                    .map_err(|_| format!("unrecognised font weight '{}'", s))?;
                Self::from_numeric(value)
            }
        };
        Ok(weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_sizes() {
        let small: FontSize = "small".parse().unwrap();
        assert_eq!(small, FontSize::Named(-1));
        assert!((small.points() - 10.0 / 1.2).abs() < 0.001);

        let medium: FontSize = "Medium".parse().unwrap();
        assert_eq!(medium.points(), 10.0);
        assert!((medium.pixels() - 13.333).abs() < 0.01);

        let large: FontSize = "x-large".parse().unwrap();
        assert!((large.points() - 14.4).abs() < 0.001);
    }

    #[test]
    fn test_numeric_sizes() {
        assert_eq!("12".parse::<FontSize>(), Ok(FontSize::Points(12.0)));
        assert_eq!("12pt".parse::<FontSize>(), Ok(FontSize::Points(12.0)));
        assert_eq!("10240".parse::<FontSize>(), Ok(FontSize::Points(10.0)));
        assert!("0".parse::<FontSize>().is_err());
        assert!("huge".parse::<FontSize>().is_err());
    }

    #[test]
    fn test_size_display() {
        assert_eq!(FontSize::Named(-2).to_string(), "x-small");
        assert_eq!(FontSize::Points(14.0).to_string(), "14pt");
    }

    #[test]
    fn test_weights() {
        assert_eq!("bold".parse::<FontWeight>(), Ok(FontWeight::Bold));
        assert_eq!("NORMAL".parse::<FontWeight>(), Ok(FontWeight::Normal));
        assert_eq!("700".parse::<FontWeight>(), Ok(FontWeight::Bold));
        assert_eq!("400".parse::<FontWeight>(), Ok(FontWeight::Normal));
        assert!("fat".parse::<FontWeight>().is_err());
        assert_eq!(FontWeight::Normal.style_name(), "Regular");
    }
}

//! Banner settings: built-in defaults, config file values and command-line overrides
//!
//! Precedence is default < config file < command line. Each layer only
//! touches the keys it actually sets.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::error::{ConfigError, Result};
use super::ini::Section;
use crate::common::color::{ArgbColor, Opacity};
use crate::common::constants::defaults;
use crate::common::types::{Dimensions, FontSize, FontWeight};

/// Font description for one label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontSpec {
    pub face: String,
    pub size: FontSize,
    pub weight: FontWeight,
}

impl FontSpec {
    /// Font of the "(ESC to hide)" hint
    pub fn hint() -> Self {
        Self {
            face: defaults::hint::FACE.to_string(),
            size: defaults::hint::SIZE,
            weight: defaults::hint::WEIGHT,
        }
    }
}

/// Effective configuration for the lifetime of one set of banners
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerSettings {
    pub message: String,
    pub fgcolor: ArgbColor,
    pub bgcolor: ArgbColor,
    pub face: String,
    pub size: FontSize,
    pub weight: FontWeight,
    pub show_top: bool,
    pub show_bottom: bool,
    pub hres: u16,
    pub vres: u16,
    pub opacity: Opacity,
    pub sys_info: bool,
    pub esc: bool,
    pub spanning: bool,
    pub click_to_move: bool,
    pub hide_delay_secs: u64,
}

/// Values given on the command line; `None` leaves the lower layer untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub message: Option<String>,
    pub fgcolor: Option<ArgbColor>,
    pub bgcolor: Option<ArgbColor>,
    pub face: Option<String>,
    pub size: Option<FontSize>,
    pub weight: Option<FontWeight>,
    pub show_top: Option<bool>,
    pub show_bottom: Option<bool>,
    pub hres: Option<u16>,
    pub vres: Option<u16>,
    pub opacity: Option<f32>,
    pub sys_info: Option<bool>,
    pub esc: Option<bool>,
    pub spanning: Option<bool>,
    pub click_to_move: Option<bool>,
    pub hide_delay_secs: Option<u64>,
}

impl Default for BannerSettings {
    fn default() -> Self {
        Self {
            message: defaults::MESSAGE.to_string(),
            fgcolor: ArgbColor::from_argb32(defaults::FGCOLOR),
            bgcolor: ArgbColor::from_argb32(defaults::BGCOLOR),
            face: defaults::FACE.to_string(),
            size: defaults::SIZE,
            weight: defaults::WEIGHT,
            show_top: defaults::SHOW_TOP,
            show_bottom: defaults::SHOW_BOTTOM,
            hres: defaults::HRES,
            vres: defaults::VRES,
            opacity: Opacity::from_fraction(defaults::OPACITY),
            sys_info: defaults::SYS_INFO,
            esc: defaults::ESC,
            spanning: defaults::SPANNING,
            click_to_move: defaults::CLICK_TO_MOVE,
            hide_delay_secs: defaults::HIDE_DELAY_SECS,
        }
    }
}

const KNOWN_KEYS: &[&str] = &[
    "message",
    "fgcolor",
    "bgcolor",
    "face",
    "size",
    "weight",
    "show_top",
    "show_bottom",
    "hres",
    "vres",
    "opacity",
    "sys_info",
    "esc",
    "spanning",
    "click_to_move",
    "hide_delay",
];

impl BannerSettings {
    /// Overlay the values present in a config file section
    pub fn apply_section(&mut self, section: &Section<'_>) -> Result<()> {
        for key in section.keys() {
            if !KNOWN_KEYS.contains(&key) {
                warn!(key = %key, "Ignoring unknown configuration key");
            }
        }

        if let Some(message) = section.get("message") {
            self.message = message.to_string();
        }
        if let Some(color) = section.get_parsed::<ArgbColor>("fgcolor")? {
            self.fgcolor = color;
        }
        if let Some(color) = section.get_parsed::<ArgbColor>("bgcolor")? {
            self.bgcolor = color;
        }
        if let Some(face) = section.get("face") {
            self.face = face.to_string();
        }
        if let Some(size) = section.get_parsed::<FontSize>("size")? {
            self.size = size;
        }
        if let Some(weight) = section.get_parsed::<FontWeight>("weight")? {
            self.weight = weight;
        }
        if let Some(show) = section.get_bool("show_top")? {
            self.show_top = show;
        }
        if let Some(show) = section.get_bool("show_bottom")? {
            self.show_bottom = show;
        }
        if let Some(hres) = section.get_parsed::<u16>("hres")? {
            self.hres = hres;
        }
        if let Some(vres) = section.get_parsed::<u16>("vres")? {
            self.vres = vres;
        }
        if let Some(opacity) = section.get_parsed::<f32>("opacity")? {
            self.opacity = checked_opacity("opacity", opacity)?;
        }
        if let Some(sys_info) = section.get_bool("sys_info")? {
            self.sys_info = sys_info;
        }
        if let Some(esc) = section.get_bool("esc")? {
            self.esc = esc;
        }
        if let Some(spanning) = section.get_bool("spanning")? {
            self.spanning = spanning;
        }
        if let Some(click_to_move) = section.get_bool("click_to_move")? {
            self.click_to_move = click_to_move;
        }
        if let Some(delay) = section.get_parsed::<u64>("hide_delay")? {
            self.hide_delay_secs = checked_hide_delay("hide_delay", delay)?;
        }

        Ok(())
    }

    /// Overlay the values given on the command line
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<()> {
        let o = overrides;
        if let Some(message) = &o.message {
            self.message = message.clone();
        }
        if let Some(color) = o.fgcolor {
            self.fgcolor = color;
        }
        if let Some(color) = o.bgcolor {
            self.bgcolor = color;
        }
        if let Some(face) = &o.face {
            self.face = face.clone();
        }
        if let Some(size) = o.size {
            self.size = size;
        }
        if let Some(weight) = o.weight {
            self.weight = weight;
        }
        self.show_top = o.show_top.unwrap_or(self.show_top);
        self.show_bottom = o.show_bottom.unwrap_or(self.show_bottom);
        self.hres = o.hres.unwrap_or(self.hres);
        self.vres = o.vres.unwrap_or(self.vres);
        if let Some(opacity) = o.opacity {
            self.opacity = checked_opacity("opacity", opacity)?;
        }
        self.sys_info = o.sys_info.unwrap_or(self.sys_info);
        self.esc = o.esc.unwrap_or(self.esc);
        self.spanning = o.spanning.unwrap_or(self.spanning);
        self.click_to_move = o.click_to_move.unwrap_or(self.click_to_move);
        if let Some(delay) = o.hide_delay_secs {
            self.hide_delay_secs = checked_hide_delay("hide-delay", delay)?;
        }
        Ok(())
    }

    /// Statically configured screen size, when both dimensions are set
    pub fn static_resolution(&self) -> Option<Dimensions> {
        match (self.hres, self.vres) {
            (0, 0) => None,
            (0, _) | (_, 0) => {
                warn!(
                    hres = self.hres,
                    vres = self.vres,
                    "Static resolution needs both hres and vres, probing the screen instead"
                );
                None
            }
            (w, h) => Some(Dimensions::new(w, h)),
        }
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_secs(self.hide_delay_secs)
    }

    pub fn message_font(&self) -> FontSpec {
        FontSpec {
            face: self.face.clone(),
            size: self.size,
            weight: self.weight,
        }
    }

    /// Whether any banner would be shown at all
    pub fn shows_anything(&self) -> bool {
        let visible = self.show_top || self.show_bottom;
        if !visible {
            debug!("Both banners disabled");
        }
        visible
    }
}

fn checked_hide_delay(key: &str, secs: u64) -> Result<u64> {
    if secs > defaults::MAX_HIDE_DELAY_SECS {
        return Err(ConfigError::invalid(
            key,
            &secs.to_string(),
            format!("must be at most {} seconds", defaults::MAX_HIDE_DELAY_SECS),
        ));
    }
    Ok(secs)
}

fn checked_opacity(key: &str, value: f32) -> Result<Opacity> {
    if value.is_nan() {
        return Err(ConfigError::invalid(key, "NaN", "expected a number"));
    }
    if !(0.0..=1.0).contains(&value) {
        warn!(opacity = value, "Opacity outside 0..1, clamping");
    }
    Ok(Opacity::from_fraction(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::paths::DEFAULT_SECTION;
    use crate::config::ini::IniDocument;

    fn apply_file(settings: &mut BannerSettings, text: &str) -> Result<()> {
        let doc = IniDocument::parse(text, DEFAULT_SECTION)?;
        let section = doc.section(DEFAULT_SECTION).unwrap();
        settings.apply_section(&section)
    }

    #[test]
    fn test_defaults() {
        let settings = BannerSettings::default();
        assert_eq!(settings.message, "UNCLASSIFIED");
        assert_eq!(settings.fgcolor, ArgbColor::from_argb32(0xFFFFFFFF));
        assert_eq!(settings.bgcolor, ArgbColor::from_argb32(0xFF007A33));
        assert_eq!(settings.size, FontSize::Named(-1));
        assert_eq!(settings.weight, FontWeight::Bold);
        assert!(settings.show_top && settings.show_bottom);
        assert!(settings.esc);
        assert!(!settings.sys_info && !settings.spanning && !settings.click_to_move);
        assert_eq!(settings.opacity, Opacity::from_fraction(0.75));
        assert_eq!(settings.hide_delay(), Duration::from_secs(15));
        assert_eq!(settings.static_resolution(), None);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut settings = BannerSettings::default();
        apply_file(
            &mut settings,
            "message = SECRET\nbgcolor = #C8102E\nshow_bottom = false\nopacity = 1.0\nhres = 1920\nvres = 1080\n",
        )
        .unwrap();

        assert_eq!(settings.message, "SECRET");
        assert_eq!(settings.bgcolor, ArgbColor::from_argb32(0xFFC8102E));
        assert!(!settings.show_bottom);
        assert!(settings.show_top);
        assert!(settings.opacity.is_opaque());
        assert_eq!(
            settings.static_resolution(),
            Some(Dimensions::new(1920, 1080))
        );
        // Untouched keys keep their defaults
        assert_eq!(settings.fgcolor, ArgbColor::from_argb32(0xFFFFFFFF));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut settings = BannerSettings::default();
        apply_file(&mut settings, "message = SECRET\nshow_top = false\nesc = false\n").unwrap();

        let overrides = Overrides {
            message: Some("TOP SECRET".to_string()),
            show_bottom: Some(false),
            sys_info: Some(true),
            ..Default::default()
        };
        settings.apply_overrides(&overrides).unwrap();

        assert_eq!(settings.message, "TOP SECRET");
        assert!(!settings.show_bottom);
        assert!(settings.sys_info);
        // Absent flags leave file values alone
        assert!(!settings.show_top);
        assert!(!settings.esc);
    }

    #[test]
    fn test_invalid_file_values() {
        let mut settings = BannerSettings::default();
        let err = apply_file(&mut settings, "fgcolor = not-a-color\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "fgcolor"));

        let err = apply_file(&mut settings, "hres = -5\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "hres"));

        let err = apply_file(&mut settings, "show_top = sometimes\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "show_top"));
    }

    #[test]
    fn test_hide_delay_limit() {
        let mut settings = BannerSettings::default();
        let err = apply_file(&mut settings, "hide_delay = 18446744073709551615\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "hide_delay"));

        let err = settings
            .apply_overrides(&Overrides {
                hide_delay_secs: Some(u64::MAX),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "hide-delay"));
        assert_eq!(settings.hide_delay(), Duration::from_secs(15));

        settings
            .apply_overrides(&Overrides {
                hide_delay_secs: Some(defaults::MAX_HIDE_DELAY_SECS),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(
            settings.hide_delay(),
            Duration::from_secs(defaults::MAX_HIDE_DELAY_SECS)
        );
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut settings = BannerSettings::default();
        settings
            .apply_overrides(&Overrides {
                opacity: Some(3.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(settings.opacity.fraction(), 1.0);

        assert!(
            settings
                .apply_overrides(&Overrides {
                    opacity: Some(f32::NAN),
                    ..Default::default()
                })
                .is_err()
        );
    }

    #[test]
    fn test_partial_static_resolution_is_ignored() {
        let settings = BannerSettings {
            hres: 1920,
            vres: 0,
            ..Default::default()
        };
        assert_eq!(settings.static_resolution(), None);
    }

    #[test]
    fn test_hint_font() {
        let hint = FontSpec::hint();
        assert_eq!(hint.size, FontSize::Named(-3));
        assert_eq!(hint.size.to_string(), "xx-small");
        assert_eq!(hint.weight, FontWeight::Normal);
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(BannerSettings::default()).unwrap();
        assert_eq!(json["message"], "UNCLASSIFIED");
        assert_eq!(json["bgcolor"], "#007A33");
        assert_eq!(json["size"], "small");
        assert_eq!(json["weight"], "bold");
    }
}

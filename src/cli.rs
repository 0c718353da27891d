//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

use crate::common::color::ArgbColor;
use crate::common::constants::paths;
use crate::common::types::{FontSize, FontWeight};
use crate::config::{ConfigSource, Overrides};

#[derive(Parser, Debug)]
#[command(name = "classification-banner")]
#[command(version)]
#[command(about = "Display a classification banner on an X11 session", long_about = None)]
pub struct Cli {
    /// Configuration file to read instead of the default locations
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Section of the configuration file to use
    #[arg(long, value_name = "NAME", default_value = paths::DEFAULT_SECTION)]
    pub heading: String,

    /// Classification message to display
    #[arg(short, long)]
    pub message: Option<String>,

    /// Foreground (text) color
    #[arg(short, long, value_name = "COLOR")]
    pub fgcolor: Option<ArgbColor>,

    /// Background color
    #[arg(short, long, value_name = "COLOR")]
    pub bgcolor: Option<ArgbColor>,

    /// Font face
    #[arg(long)]
    pub face: Option<String>,

    /// Font size (xx-small .. xx-large, or points)
    #[arg(long)]
    pub size: Option<FontSize>,

    /// Font weight (normal, bold, ...)
    #[arg(long)]
    pub weight: Option<FontWeight>,

    /// Do not show the top banner
    #[arg(long)]
    pub hide_top: bool,

    /// Do not show the bottom banner
    #[arg(long)]
    pub hide_bottom: bool,

    /// Horizontal screen resolution (0 = detect)
    #[arg(short = 'x', long, value_name = "PIXELS")]
    pub hres: Option<u16>,

    /// Vertical screen resolution (0 = detect)
    #[arg(short = 'y', long, value_name = "PIXELS")]
    pub vres: Option<u16>,

    /// Window opacity between 0 and 1
    #[arg(short, long)]
    pub opacity: Option<f32>,

    /// Show host and user name on the top banner
    #[arg(long = "system-info")]
    pub system_info: bool,

    /// Do not show the "(ESC to hide)" hint
    #[arg(long)]
    pub disable_esc_msg: bool,

    /// Use one banner across all monitors
    #[arg(long)]
    pub enable_spanning: bool,

    /// Allow dragging banners vertically with the left mouse button
    #[arg(long)]
    pub click_to_move: bool,

    /// Seconds a banner stays hidden after ESC
    #[arg(long, value_name = "SECONDS")]
    pub hide_delay: Option<u64>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    pub dump_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// `Some(value)` when a switch is present, `None` to leave the lower layer alone
fn flag(present: bool, value: bool) -> Option<bool> {
    present.then_some(value)
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            message: self.message.clone(),
            fgcolor: self.fgcolor,
            bgcolor: self.bgcolor,
            face: self.face.clone(),
            size: self.size,
            weight: self.weight,
            show_top: flag(self.hide_top, false),
            show_bottom: flag(self.hide_bottom, false),
            hres: self.hres,
            vres: self.vres,
            opacity: self.opacity,
            sys_info: flag(self.system_info, true),
            esc: flag(self.disable_esc_msg, false),
            spanning: flag(self.enable_spanning, true),
            click_to_move: flag(self.click_to_move, true),
            hide_delay_secs: self.hide_delay,
        }
    }

    pub fn config_source(&self) -> ConfigSource {
        ConfigSource {
            explicit: self.config.clone(),
            heading: self.heading.clone(),
            overrides: self.overrides(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_means_no_overrides() {
        let cli = Cli::try_parse_from(["classification-banner"]).unwrap();
        assert_eq!(cli.overrides(), Overrides::default());
        assert_eq!(cli.heading, "DEFAULT");
        assert!(cli.config.is_none());
        assert!(!cli.dump_config);
    }

    #[test]
    fn test_value_flags() {
        let cli = Cli::try_parse_from([
            "classification-banner",
            "-m",
            "SECRET",
            "-f",
            "#000",
            "--bgcolor",
            "red",
            "--size",
            "large",
            "--weight",
            "normal",
            "-x",
            "1920",
            "-y",
            "1080",
            "-o",
            "0.5",
            "--hide-delay",
            "30",
            "-c",
            "/tmp/banner.conf",
            "--heading",
            "secret",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.message.as_deref(), Some("SECRET"));
        assert_eq!(overrides.fgcolor, Some(ArgbColor::from_argb32(0xFF000000)));
        assert_eq!(overrides.bgcolor, Some(ArgbColor::from_argb32(0xFFFF0000)));
        assert_eq!(overrides.size, Some(FontSize::Named(1)));
        assert_eq!(overrides.weight, Some(FontWeight::Normal));
        assert_eq!(overrides.hres, Some(1920));
        assert_eq!(overrides.vres, Some(1080));
        assert_eq!(overrides.opacity, Some(0.5));
        assert_eq!(overrides.hide_delay_secs, Some(30));

        let source = cli.config_source();
        assert_eq!(source.explicit, Some(PathBuf::from("/tmp/banner.conf")));
        assert_eq!(source.heading, "secret");
    }

    #[test]
    fn test_switches_only_move_away_from_default() {
        let cli = Cli::try_parse_from([
            "classification-banner",
            "--hide-top",
            "--hide-bottom",
            "--system-info",
            "--disable-esc-msg",
            "--enable-spanning",
            "--click-to-move",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.show_top, Some(false));
        assert_eq!(overrides.show_bottom, Some(false));
        assert_eq!(overrides.sys_info, Some(true));
        assert_eq!(overrides.esc, Some(false));
        assert_eq!(overrides.spanning, Some(true));
        assert_eq!(overrides.click_to_move, Some(true));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Cli::try_parse_from(["classification-banner", "-f", "chartreuse-ish"]).is_err());
        assert!(Cli::try_parse_from(["classification-banner", "-x", "-10"]).is_err());
        assert!(Cli::try_parse_from(["classification-banner", "--size", "enormous"]).is_err());
    }
}

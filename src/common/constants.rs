//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// X11 protocol and rendering constants
pub mod x11 {
    /// Standard 32-bit color depth required for ARGB text pixmaps
    pub const ARGB_DEPTH: u8 = 32;

    /// _NET_WM_STATE action: remove property (0)
    pub const NET_WM_STATE_REMOVE: u32 = 0;

    /// Source indication for _NET_ACTIVE_WINDOW (2 = pager/direct user action)
    pub const ACTIVE_WINDOW_SOURCE_PAGER: u32 = 2;

    /// WM_STATE iconic value
    pub const ICONIC_STATE: u32 = 3;

    /// _NET_WM_DESKTOP value meaning "all desktops"
    pub const ALL_DESKTOPS: u32 = 0xFFFF_FFFF;

    /// _MOTIF_WM_HINTS flag: the decorations field is valid
    pub const MOTIF_HINTS_DECORATIONS: u32 = 1 << 1;

    /// Keysym for the Escape key
    pub const XK_ESCAPE: u32 = 0xFF1B;

    /// WM_CLASS instance and class for banner windows
    pub const WM_CLASS: &[u8] = b"classification-banner\0ClassificationBanner\0";

    /// Window title for banner windows
    pub const WM_NAME: &str = "Classification Banner";
}

/// Mouse button constants
pub mod mouse {
    /// Left mouse button number
    pub const BUTTON_LEFT: u8 = 1;
}

/// Configuration file locations
pub mod paths {
    /// System-wide configuration file
    pub const SYSTEM_CONFIG: &str = "/etc/classification-banner";

    /// Application directory name under XDG config
    pub const APP_DIR: &str = "classification-banner";

    /// Per-user configuration filename
    pub const USER_CONFIG_FILENAME: &str = "banner.conf";

    /// Section used when the file has no header or none is requested
    pub const DEFAULT_SECTION: &str = "DEFAULT";
}

/// External commands used for screen probing
pub mod commands {
    pub const XRANDR: &str = "xrandr";
}

/// Banner layout constants
pub mod layout {
    /// Smallest banner height in pixels
    pub const MIN_HEIGHT: u16 = 5;

    /// Space above and below the tallest label
    pub const VERTICAL_PADDING: u16 = 2;

    /// Space between a side label and the banner edge
    pub const SIDE_MARGIN: u16 = 20;

    /// Screen resolution assumed when converting points to pixels
    pub const DPI: f32 = 96.0;
}

/// Default configuration values
/// These are used when neither the config file nor the command line sets a value
pub mod defaults {
    use crate::common::types::{FontSize, FontWeight};

    pub const MESSAGE: &str = "UNCLASSIFIED";
    /// ARGB32 white
    pub const FGCOLOR: u32 = 0xFFFF_FFFF;
    /// ARGB32 green used for UNCLASSIFIED markings
    pub const BGCOLOR: u32 = 0xFF00_7A33;
    pub const FACE: &str = "liberation-sans";
    pub const SIZE: FontSize = FontSize::Named(-1);
    pub const WEIGHT: FontWeight = FontWeight::Bold;
    pub const SHOW_TOP: bool = true;
    pub const SHOW_BOTTOM: bool = true;
    pub const HRES: u16 = 0;
    pub const VRES: u16 = 0;
    pub const OPACITY: f32 = 0.75;
    pub const SYS_INFO: bool = false;
    pub const ESC: bool = true;
    pub const SPANNING: bool = false;
    pub const CLICK_TO_MOVE: bool = false;

    /// Seconds a banner stays hidden after ESC
    pub const HIDE_DELAY_SECS: u64 = 15;

    /// Longest accepted hide delay (one day)
    pub const MAX_HIDE_DELAY_SECS: u64 = 86_400;

    /// The "(ESC to hide)" hint text and its font
    pub mod hint {
        use crate::common::types::{FontSize, FontWeight};

        pub const TEXT: &str = "  (ESC to hide temporarily)  ";
        pub const FACE: &str = "liberation-sans";
        pub const SIZE: FontSize = FontSize::Named(-3);
        pub const WEIGHT: FontWeight = FontWeight::Normal;
    }

    /// Preferred TrueType fonts when the configured face is missing (tried in order)
    pub const FONT_CANDIDATES: &[&str] = &["Liberation Sans", "DejaVu Sans", "Noto Sans"];
}

//! Banner windows
//!
//! A banner is a borderless strip along the top or bottom edge of a screen
//! region showing the classification message.

mod label;
pub mod layout;
pub mod state;
mod window;

use anyhow::{Context, Result};
use tracing::info;
use x11rb::rust_connection::RustConnection;

use crate::common::constants::defaults;
use crate::common::system;
use crate::config::{BannerSettings, FontSpec};
use crate::font::FontRenderer;

pub use layout::Edge;
pub use window::{Banner, LabelTexts};

/// Fonts shared by every banner built from one set of settings
#[derive(Debug)]
pub struct BannerFonts {
    pub message: FontRenderer,
    pub hint: FontRenderer,
}

impl BannerFonts {
    pub fn load(conn: &RustConnection, settings: &BannerSettings) -> Result<Self> {
        let message = FontRenderer::load(conn, &settings.message_font())
            .context("Failed to load message font")?;
        let hint = FontRenderer::load(conn, &FontSpec::hint())
            .context("Failed to load hint font")?;
        info!(message = message.name(), hint = hint.name(), "Banner fonts loaded");
        Ok(Self { message, hint })
    }

    /// Free server-side font resources
    pub fn release(&self, conn: &RustConnection) -> Result<()> {
        self.message.release(conn)?;
        self.hint.release(conn)
    }
}

impl LabelTexts {
    /// Label texts for the given settings and the current host and user
    pub fn collect(settings: &BannerSettings) -> Self {
        let (hostname, user) = if settings.sys_info {
            (system::short_hostname(), system::current_user())
        } else {
            (String::new(), String::new())
        };
        Self {
            message: settings.message.clone(),
            hostname,
            user,
            hint: defaults::hint::TEXT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_texts_without_sys_info() {
        let settings = BannerSettings {
            message: "SECRET".to_string(),
            ..Default::default()
        };
        let texts = LabelTexts::collect(&settings);
        assert_eq!(texts.message, "SECRET");
        assert_eq!(texts.hint, "  (ESC to hide temporarily)  ");
        assert!(texts.hostname.is_empty());
        assert!(texts.user.is_empty());
    }
}

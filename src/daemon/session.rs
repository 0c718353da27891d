//! The set of banners built from one configuration and screen layout

use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, error, info};
use x11rb::protocol::xproto::{ConnectionExt, Keycode, Window};
use x11rb::rust_connection::RustConnection;

use crate::banner::{Banner, BannerFonts, Edge, LabelTexts, state};
use crate::common::types::{Dimensions, Rect};
use crate::config::{BannerSettings, ConfigError};
use crate::geometry::{
    self, GeometrySource, RandrMonitors, RootWindow, StaticResolution, XrandrCommand,
};
use crate::x11::AppContext;

/// Banners currently on screen, with the settings and regions they were built from
pub struct BannerSet<'a> {
    pub settings: BannerSettings,
    pub regions: Vec<Rect>,
    pub banners: Vec<Banner<'a>>,
    fonts: BannerFonts,
    conn: &'a RustConnection,
}

impl<'a> BannerSet<'a> {
    /// Create and map every banner for `settings` across `regions`
    pub fn build(ctx: &AppContext<'a>, settings: BannerSettings, regions: Vec<Rect>) -> Result<Self> {
        let fonts = BannerFonts::load(ctx.conn, &settings)?;
        let texts = LabelTexts::collect(&settings);

        let mut set = Self {
            settings,
            regions,
            banners: Vec::new(),
            fonts,
            conn: ctx.conn,
        };

        let edges: Vec<Edge> = [
            (set.settings.show_top, Edge::Top),
            (set.settings.show_bottom, Edge::Bottom),
        ]
        .into_iter()
        .filter_map(|(shown, edge)| shown.then_some(edge))
        .collect();

        for region in set.regions.clone() {
            for edge in &edges {
                let banner = Banner::new(ctx, &set.settings, &set.fonts, &texts, region, *edge)
                    .with_context(|| format!("Failed to create {:?} banner for region {:?}", edge, region))?;
                set.banners.push(banner);
            }
        }

        info!(
            banners = set.banners.len(),
            regions = set.regions.len(),
            message = %set.settings.message,
            "Banners created"
        );
        Ok(set)
    }

    pub fn find_mut(&mut self, window: Window) -> Option<&mut Banner<'a>> {
        self.banners.iter_mut().find(|b| b.window == window)
    }

    /// Earliest moment a hidden banner must be shown again
    pub fn next_deadline(&self) -> Option<Instant> {
        state::next_deadline(self.banners.iter().map(|b| &b.visibility))
    }

    /// Show every banner whose hide delay has passed
    pub fn expire(&mut self, now: Instant) {
        for banner in &mut self.banners {
            if let Err(e) = banner.expire(now) {
                error!(window = banner.window, error = %e, "Failed to show banner again");
            }
        }
    }
}

impl Drop for BannerSet<'_> {
    fn drop(&mut self) {
        // Destroy windows before releasing the fonts their labels used
        self.banners.clear();
        if let Err(e) = self.fonts.release(self.conn) {
            error!(error = %e, "Failed to release banner fonts");
        }
    }
}

/// Settings to rebuild with: the reloaded ones, or `previous` when the reload failed
pub fn reloaded_settings(
    loaded: Result<BannerSettings, ConfigError>,
    previous: &BannerSettings,
) -> BannerSettings {
    match loaded {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Failed to reload configuration, keeping previous settings");
            previous.clone()
        }
    }
}

/// Whether banners built from `current` must be replaced to show `next`
pub fn needs_rebuild(
    force: bool,
    current: (&BannerSettings, &[Rect]),
    next: (&BannerSettings, &[Rect]),
) -> bool {
    force || current.0 != next.0 || current.1 != next.1
}

/// Current screen regions for `settings`
pub fn probe_regions(ctx: &AppContext, settings: &BannerSettings) -> Result<Vec<Rect>> {
    let fixed = settings.static_resolution().map(StaticResolution);
    let randr = RandrMonitors {
        conn: ctx.conn,
        root: ctx.screen.root,
    };
    let root = RootWindow(root_size(ctx));

    let mut sources: Vec<&dyn GeometrySource> = Vec::with_capacity(4);
    if let Some(fixed) = &fixed {
        sources.push(fixed);
    }
    sources.extend([&randr as &dyn GeometrySource, &XrandrCommand, &root]);

    let monitors = geometry::resolve_monitors(&sources)?;
    let regions = geometry::banner_regions(&monitors, settings.spanning);
    debug!(regions = ?regions, spanning = settings.spanning, "Banner regions");
    Ok(regions)
}

/// Root window size now, which may differ from the size at connection time
fn root_size(ctx: &AppContext) -> Dimensions {
    let current = ctx
        .conn
        .get_geometry(ctx.screen.root)
        .ok()
        .and_then(|cookie| cookie.reply().ok());
    match current {
        Some(geom) => Dimensions::new(geom.width, geom.height),
        None => Dimensions::new(ctx.screen.width_in_pixels, ctx.screen.height_in_pixels),
    }
}

/// Everything the event handlers may change
pub struct SessionState<'a> {
    pub set: BannerSet<'a>,
    pub esc_keycodes: Vec<Keycode>,
    /// Geometry changed; rebuild once the current batch of events is handled
    pub rebuild_requested: bool,
}

//! Banner X11 window
//!
//! Handles window creation, window manager hints, drawing, hiding and
//! resource cleanup.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use x11rb::connection::Connection;
use x11rb::properties::{WmHints, WmSizeHints, WmSizeHintsSpecification};
use x11rb::protocol::render::{ConnectionExt as RenderExt, CreatePictureAux, PictOp, Picture};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as WrapperExt;

use super::label::Label;
use super::layout::{self, Edge, LabelKind};
use super::state::{DragState, Visibility};
use super::BannerFonts;
use crate::common::color::{ArgbColor, Opacity};
use crate::common::constants::x11;
use crate::common::types::{Position, Rect};
use crate::config::BannerSettings;
use crate::x11::{AppContext, CachedAtoms, is_window_minimized, present_window, unminimize_window};

/// Text of every label kind, gathered once per rebuild
#[derive(Debug, Clone, Default)]
pub struct LabelTexts {
    pub message: String,
    pub hostname: String,
    pub user: String,
    pub hint: String,
}

impl LabelTexts {
    fn get(&self, kind: LabelKind) -> &str {
        match kind {
            LabelKind::Message => &self.message,
            LabelKind::Hostname => &self.hostname,
            LabelKind::User => &self.user,
            LabelKind::Hint => &self.hint,
        }
    }
}

/// One banner strip on one edge of one region
#[derive(Debug)]
pub struct Banner<'a> {
    // === X11 handles ===
    pub window: Window,
    picture: Picture,

    // === Layout ===
    pub edge: Edge,
    pub region: Rect,
    pub rect: Rect,
    labels: Vec<(Label<'a>, Position)>,
    background: ArgbColor,

    // === Runtime state ===
    pub visibility: Visibility,
    pub drag: DragState,

    // === Borrowed dependencies ===
    conn: &'a RustConnection,
    screen: &'a Screen,
    atoms: &'a CachedAtoms,
}

impl<'a> Banner<'a> {
    fn create_window(ctx: &AppContext, rect: Rect, background: ArgbColor) -> Result<Window> {
        let window = ctx
            .conn
            .generate_id()
            .context("Failed to generate X11 window ID")?;
        ctx.conn
            .create_window(
                ctx.screen.root_depth,
                window,
                ctx.screen.root,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                0,
                WindowClass::INPUT_OUTPUT,
                ctx.screen.root_visual,
                &CreateWindowAux::new()
                    .background_pixel(background.rgb24())
                    .event_mask(
                        EventMask::EXPOSURE
                            | EventMask::KEY_PRESS
                            | EventMask::BUTTON_PRESS
                            | EventMask::BUTTON_RELEASE
                            | EventMask::BUTTON_MOTION
                            | EventMask::STRUCTURE_NOTIFY
                            | EventMask::PROPERTY_CHANGE,
                    ),
            )
            .context("Failed to create banner window")?;
        Ok(window)
    }

    /// Window manager hints: no decorations, fixed size, on every desktop, above others
    fn setup_window_properties(
        ctx: &AppContext,
        window: Window,
        rect: Rect,
        opacity: Opacity,
    ) -> Result<()> {
        ctx.conn
            .change_property8(
                PropMode::REPLACE,
                window,
                AtomEnum::WM_NAME,
                AtomEnum::STRING,
                x11::WM_NAME.as_bytes(),
            )
            .context("Failed to set WM_NAME")?;
        ctx.conn
            .change_property8(
                PropMode::REPLACE,
                window,
                ctx.atoms.net_wm_name,
                ctx.atoms.utf8_string,
                x11::WM_NAME.as_bytes(),
            )
            .context("Failed to set _NET_WM_NAME")?;
        ctx.conn
            .change_property8(
                PropMode::REPLACE,
                window,
                ctx.atoms.wm_class,
                AtomEnum::STRING,
                x11::WM_CLASS,
            )
            .context("Failed to set WM_CLASS")?;

        // Set PID so the window can be traced back to this process
        ctx.conn
            .change_property32(
                PropMode::REPLACE,
                window,
                ctx.atoms.net_wm_pid,
                AtomEnum::CARDINAL,
                &[std::process::id()],
            )
            .context("Failed to set _NET_WM_PID")?;

        ctx.conn
            .change_property32(
                PropMode::REPLACE,
                window,
                ctx.atoms.net_wm_window_opacity,
                AtomEnum::CARDINAL,
                &[opacity.to_cardinal()],
            )
            .context("Failed to set window opacity")?;

        // flags, functions, decorations, input mode, status
        ctx.conn
            .change_property32(
                PropMode::REPLACE,
                window,
                ctx.atoms.motif_wm_hints,
                ctx.atoms.motif_wm_hints,
                &[x11::MOTIF_HINTS_DECORATIONS, 0, 0, 0, 0],
            )
            .context("Failed to set _MOTIF_WM_HINTS")?;

        let size_hints = WmSizeHints {
            position: Some((
                WmSizeHintsSpecification::UserSpecified,
                rect.x as i32,
                rect.y as i32,
            )),
            size: Some((
                WmSizeHintsSpecification::UserSpecified,
                rect.width as i32,
                rect.height as i32,
            )),
            min_size: Some((rect.width as i32, rect.height as i32)),
            max_size: Some((rect.width as i32, rect.height as i32)),
            ..WmSizeHints::default()
        };
        size_hints
            .set_normal_hints(ctx.conn, window)
            .context("Failed to set WM_NORMAL_HINTS")?;

        let wm_hints = WmHints {
            input: Some(true),
            ..WmHints::default()
        };
        wm_hints
            .set(ctx.conn, window)
            .context("Failed to set WM_HINTS")?;

        Self::set_initial_state(ctx.conn, ctx.atoms, window)?;
        Ok(())
    }

    /// `_NET_WM_STATE` and `_NET_WM_DESKTOP` for a window about to be mapped
    ///
    /// Window managers drop these when a window is withdrawn, so they are
    /// written again before every map.
    fn set_initial_state(conn: &RustConnection, atoms: &CachedAtoms, window: Window) -> Result<()> {
        conn.change_property32(
            PropMode::REPLACE,
            window,
            atoms.net_wm_state,
            AtomEnum::ATOM,
            &atoms.banner_states(),
        )
        .context("Failed to set _NET_WM_STATE")?;
        conn.change_property32(
            PropMode::REPLACE,
            window,
            atoms.net_wm_desktop,
            AtomEnum::CARDINAL,
            &[x11::ALL_DESKTOPS],
        )
        .context("Failed to set _NET_WM_DESKTOP")?;
        Ok(())
    }

    /// Create, lay out and map a banner on `edge` of `region`
    pub fn new(
        ctx: &AppContext<'a>,
        settings: &BannerSettings,
        fonts: &BannerFonts,
        texts: &LabelTexts,
        region: Rect,
        edge: Edge,
    ) -> Result<Self> {
        // Provisional one-pixel-high window; labels need a drawable before they can be measured
        let provisional = layout::banner_rect(region, edge, 1);
        let window = Self::create_window(ctx, provisional, settings.bgcolor)?;

        // RAII guard to destroy the window if initialization fails partway
        struct WindowGuard<'a> {
            conn: &'a RustConnection,
            window: Window,
            should_cleanup: bool,
        }

        impl Drop for WindowGuard<'_> {
            fn drop(&mut self) {
                if self.should_cleanup {
                    if let Err(e) = self.conn.destroy_window(self.window) {
                        error!(
                            window = self.window,
                            error = %e,
                            "Failed to cleanup window after initialization failure"
                        );
                    }
                    let _ = self.conn.flush();
                }
            }
        }

        let mut window_guard = WindowGuard {
            conn: ctx.conn,
            window,
            should_cleanup: true,
        };

        let mut labels = Vec::new();
        for kind in layout::labels_for(edge, settings) {
            let font = match kind {
                LabelKind::Hint => &fonts.hint,
                _ => &fonts.message,
            };
            let label = Label::new(
                ctx.conn,
                ctx.formats,
                window,
                font,
                texts.get(kind),
                settings.fgcolor.argb32(),
                settings.bgcolor.argb32(),
            )?;
            labels.push((kind, label));
        }

        let sizes: Vec<_> = labels.iter().map(|(kind, label)| (*kind, label.size())).collect();
        let placed = layout::layout(region, edge, &sizes);
        let rect = placed.rect;

        ctx.conn
            .configure_window(
                window,
                &ConfigureWindowAux::new()
                    .x(rect.x as i32)
                    .y(rect.y as i32)
                    .width(rect.width as u32)
                    .height(rect.height as u32),
            )
            .context("Failed to size banner window")?;

        Self::setup_window_properties(ctx, window, rect, settings.opacity)?;

        let picture = ctx
            .conn
            .generate_id()
            .context("Failed to generate ID for banner picture")?;
        ctx.conn
            .render_create_picture(picture, window, ctx.formats.rgb, &CreatePictureAux::new())
            .context("Failed to create banner picture")?;

        let labels = labels
            .into_iter()
            .zip(placed.labels)
            .map(|((_, label), (_, position))| (label, position))
            .collect();

        let banner = Self {
            window,
            picture,
            edge,
            region,
            rect,
            labels,
            background: settings.bgcolor,
            visibility: Visibility::Shown,
            drag: DragState::default(),
            conn: ctx.conn,
            screen: ctx.screen,
            atoms: ctx.atoms,
        };

        // Banner's Drop handles cleanup from here on
        window_guard.should_cleanup = false;

        present_window(ctx.conn, ctx.screen, ctx.atoms, window)
            .context("Failed to map banner window")?;
        info!(
            window = window,
            edge = ?edge,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "Mapped banner window"
        );

        Ok(banner)
    }

    /// Paint the background and every label
    pub fn draw(&self) -> Result<()> {
        self.conn
            .render_fill_rectangles(
                PictOp::SRC,
                self.picture,
                self.background.to_x11_color(),
                &[Rectangle {
                    x: 0,
                    y: 0,
                    width: self.rect.width,
                    height: self.rect.height,
                }],
            )
            .context("Failed to fill banner background")?;

        for (label, position) in &self.labels {
            label.draw(self.window, self.picture, *position)?;
        }

        self.conn
            .flush()
            .context("Failed to flush X11 connection after drawing banner")?;
        Ok(())
    }

    /// Unmap the banner for `delay`
    pub fn hide(&mut self, now: Instant, delay: Duration) -> Result<()> {
        self.visibility.hide(now, delay);
        self.drag.stop();
        self.conn
            .unmap_window(self.window)
            .context("Failed to unmap banner window")?;
        self.conn
            .flush()
            .context("Failed to flush X11 connection after hiding banner")?;
        info!(window = self.window, edge = ?self.edge, delay_secs = delay.as_secs(), "Banner hidden");
        Ok(())
    }

    /// Show the banner again if its hide delay has passed
    pub fn expire(&mut self, now: Instant) -> Result<bool> {
        if !self.visibility.expire(now) {
            return Ok(false);
        }
        self.show()?;
        Ok(true)
    }

    fn show(&self) -> Result<()> {
        Self::set_initial_state(self.conn, self.atoms, self.window)?;
        present_window(self.conn, self.screen, self.atoms, self.window)
            .context("Failed to show banner window")?;
        info!(window = self.window, edge = ?self.edge, "Banner shown");
        Ok(())
    }

    /// Undo an unmap or minimize that did not come from the banner itself
    pub fn restore(&self) -> Result<()> {
        if self.visibility.is_hidden() {
            return Ok(());
        }
        warn!(window = self.window, edge = ?self.edge, "Banner was hidden externally, restoring");
        unminimize_window(self.conn, self.screen, self.atoms, self.window)?;
        self.show()
    }

    /// Restore the banner if the window manager minimized it
    pub fn restore_if_minimized(&self) -> Result<()> {
        if self.visibility.is_hidden() {
            return Ok(());
        }
        if is_window_minimized(self.conn, self.window, self.atoms)? {
            self.restore()?;
        }
        Ok(())
    }

    /// Move the banner to a new vertical position within its region
    pub fn move_to(&mut self, position: Position) -> Result<()> {
        if position == self.rect.position() {
            return Ok(());
        }
        self.conn
            .configure_window(
                self.window,
                &ConfigureWindowAux::new()
                    .x(position.x as i32)
                    .y(position.y as i32),
            )
            .context("Failed to move banner window")?;
        self.conn
            .flush()
            .context("Failed to flush X11 connection after moving banner")?;
        self.rect.x = position.x;
        self.rect.y = position.y;
        debug!(window = self.window, x = position.x, y = position.y, "Banner moved");
        Ok(())
    }
}

impl Drop for Banner<'_> {
    fn drop(&mut self) {
        // Labels free their own pixmaps and GCs
        self.labels.clear();

        if let Err(e) = self.conn.render_free_picture(self.picture) {
            error!(picture = self.picture, error = %e, "Failed to free banner picture");
        }

        if let Err(e) = self.conn.destroy_window(self.window) {
            error!(window = self.window, error = %e, "Failed to destroy banner window");
        }

        if let Err(e) = self.conn.flush() {
            error!(error = %e, "Failed to flush X11 connection during cleanup");
        }
    }
}

//! Application context and cached X11 state

use anyhow::{Context, Result};
use x11rb::cookie::Cookie;
use x11rb::protocol::render::{ConnectionExt as RenderExt, Pictformat};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::common::constants::x11;

/// Immutable X11 state shared by every banner
pub struct AppContext<'a> {
    pub conn: &'a RustConnection,
    pub screen: &'a Screen,
    pub atoms: &'a CachedAtoms,
    pub formats: &'a CachedFormats,
}

/// Pre-cached X11 atoms to avoid repeated roundtrips
#[derive(Debug)]
pub struct CachedAtoms {
    pub utf8_string: Atom,
    pub wm_class: Atom,
    pub wm_state: Atom,
    pub net_wm_name: Atom,
    pub net_wm_pid: Atom,
    pub net_wm_desktop: Atom,
    pub net_wm_state: Atom,
    pub net_wm_state_above: Atom,
    pub net_wm_state_sticky: Atom,
    pub net_wm_state_skip_taskbar: Atom,
    pub net_wm_state_skip_pager: Atom,
    pub net_wm_state_hidden: Atom,
    pub net_wm_window_opacity: Atom,
    pub net_active_window: Atom,
    pub motif_wm_hints: Atom,
}

impl CachedAtoms {
    /// Intern every atom in one batch, then collect the replies
    pub fn new(conn: &RustConnection) -> Result<Self> {
        const NAMES: [&[u8]; 15] = [
            b"UTF8_STRING",
            b"WM_CLASS",
            b"WM_STATE",
            b"_NET_WM_NAME",
            b"_NET_WM_PID",
            b"_NET_WM_DESKTOP",
            b"_NET_WM_STATE",
            b"_NET_WM_STATE_ABOVE",
            b"_NET_WM_STATE_STICKY",
            b"_NET_WM_STATE_SKIP_TASKBAR",
            b"_NET_WM_STATE_SKIP_PAGER",
            b"_NET_WM_STATE_HIDDEN",
            b"_NET_WM_WINDOW_OPACITY",
            b"_NET_ACTIVE_WINDOW",
            b"_MOTIF_WM_HINTS",
        ];

        let cookies = NAMES
            .iter()
            .map(|name| {
                conn.intern_atom(false, name).with_context(|| {
                    format!("Failed to intern {} atom", String::from_utf8_lossy(name))
                })
            })
            .collect::<Result<Vec<Cookie<'_, RustConnection, InternAtomReply>>>>()?;

        let mut atoms = Vec::with_capacity(NAMES.len());
        for (name, cookie) in NAMES.iter().zip(cookies) {
            let atom = cookie
                .reply()
                .with_context(|| {
                    format!(
                        "Failed to get reply for {} atom",
                        String::from_utf8_lossy(name)
                    )
                })?
                .atom;
            atoms.push(atom);
        }

        Ok(Self {
            utf8_string: atoms[0],
            wm_class: atoms[1],
            wm_state: atoms[2],
            net_wm_name: atoms[3],
            net_wm_pid: atoms[4],
            net_wm_desktop: atoms[5],
            net_wm_state: atoms[6],
            net_wm_state_above: atoms[7],
            net_wm_state_sticky: atoms[8],
            net_wm_state_skip_taskbar: atoms[9],
            net_wm_state_skip_pager: atoms[10],
            net_wm_state_hidden: atoms[11],
            net_wm_window_opacity: atoms[12],
            net_active_window: atoms[13],
            motif_wm_hints: atoms[14],
        })
    }

    /// States every banner window starts with
    pub fn banner_states(&self) -> [Atom; 4] {
        [
            self.net_wm_state_above,
            self.net_wm_state_sticky,
            self.net_wm_state_skip_taskbar,
            self.net_wm_state_skip_pager,
        ]
    }
}

/// Pre-cached picture formats to avoid repeated expensive queries
#[derive(Debug)]
pub struct CachedFormats {
    /// Format matching the root visual, used for banner window pictures
    pub rgb: Pictformat,
    /// 32-bit format with alpha, used for rendered text
    pub argb: Pictformat,
}

impl CachedFormats {
    pub fn new(conn: &RustConnection, screen: &Screen) -> Result<Self> {
        let formats_reply = conn
            .render_query_pict_formats()
            .context("Failed to query RENDER picture formats")?
            .reply()
            .context("Failed to get RENDER formats reply")?;

        let rgb = formats_reply
            .formats
            .iter()
            .find(|f| f.depth == screen.root_depth && f.direct.alpha_mask == 0)
            .ok_or_else(|| anyhow::anyhow!("No RGB format found for depth {}", screen.root_depth))?
            .id;

        let argb = formats_reply
            .formats
            .iter()
            .find(|f| f.depth == x11::ARGB_DEPTH && f.direct.alpha_mask != 0)
            .ok_or_else(|| anyhow::anyhow!("No ARGB format found for depth {}", x11::ARGB_DEPTH))?
            .id;

        Ok(Self { rgb, argb })
    }
}

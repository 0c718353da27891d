//! Concrete geometry strategies, in the order they are normally tried

use anyhow::{Context, Result};
use tracing::debug;
use x11rb::connection::RequestConnection;
use x11rb::protocol::randr::{self, ConnectionExt as RandrExt};
use x11rb::protocol::xproto::{ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

use super::{GeometrySource, Monitor, xrandr};
use crate::common::constants::commands;
use crate::common::system;
use crate::common::types::{Dimensions, Rect};

/// Fixed `hres` × `vres` screen at the origin
pub struct StaticResolution(pub Dimensions);

impl GeometrySource for StaticResolution {
    fn name(&self) -> &'static str {
        "static"
    }

    fn monitors(&self) -> Result<Vec<Monitor>> {
        let Dimensions { width, height } = self.0;
        Ok(vec![Monitor::new(
            "static",
            true,
            Rect::new(0, 0, width, height),
        )])
    }
}

/// Monitors reported by the RandR 1.5 extension
pub struct RandrMonitors<'a> {
    pub conn: &'a RustConnection,
    pub root: Window,
}

impl GeometrySource for RandrMonitors<'_> {
    fn name(&self) -> &'static str {
        "randr"
    }

    fn monitors(&self) -> Result<Vec<Monitor>> {
        if self
            .conn
            .extension_information(randr::X11_EXTENSION_NAME)
            .context("Failed to query RandR extension")?
            .is_none()
        {
            anyhow::bail!("RandR extension not available");
        }

        let version = self
            .conn
            .randr_query_version(1, 5)
            .context("Failed to query RandR version")?
            .reply()
            .context("Failed to get RandR version reply")?;
        if (version.major_version, version.minor_version) < (1, 5) {
            anyhow::bail!(
                "RandR {}.{} has no monitor support",
                version.major_version,
                version.minor_version
            );
        }

        let reply = self
            .conn
            .randr_get_monitors(self.root, true)
            .context("Failed to request RandR monitors")?
            .reply()
            .context("Failed to get RandR monitors reply")?;

        reply
            .monitors
            .iter()
            .map(|info| {
                let name = monitor_name(self.conn, info.name);
                Ok(Monitor::new(
                    name,
                    info.primary,
                    Rect::new(info.x, info.y, info.width, info.height),
                ))
            })
            .collect()
    }
}

fn monitor_name(conn: &RustConnection, atom: u32) -> String {
    let name = conn
        .get_atom_name(atom)
        .ok()
        .and_then(|cookie| cookie.reply().ok())
        .map(|reply| String::from_utf8_lossy(&reply.name).into_owned());
    name.unwrap_or_else(|| {
        debug!(atom = atom, "Monitor name atom could not be resolved");
        format!("monitor-{}", atom)
    })
}

/// Output of the `xrandr` command line tool
pub struct XrandrCommand;

impl GeometrySource for XrandrCommand {
    fn name(&self) -> &'static str {
        "xrandr"
    }

    fn monitors(&self) -> Result<Vec<Monitor>> {
        let output = system::command_output(commands::XRANDR, &["--query"])
            .context("Failed to query xrandr")?;
        Ok(xrandr::parse_monitors(&output))
    }
}

/// Whole root window as one monitor
pub struct RootWindow(pub Dimensions);

impl GeometrySource for RootWindow {
    fn name(&self) -> &'static str {
        "root window"
    }

    fn monitors(&self) -> Result<Vec<Monitor>> {
        let Dimensions { width, height } = self.0;
        Ok(vec![Monitor::new("root", true, Rect::new(0, 0, width, height))])
    }
}

use anyhow::{Context, Result};
use tracing::{debug, info};
use x11rb::protocol::xproto::*;

use super::super::dispatcher::EventContext;

/// Handle Expose events - repaint once the last expose of a batch arrives
pub fn handle_expose(ctx: &mut EventContext, event: ExposeEvent) -> Result<()> {
    if event.count != 0 {
        return Ok(());
    }
    if let Some(banner) = ctx.state.set.find_mut(event.window) {
        banner
            .draw()
            .context(format!("Failed to draw banner (window={})", event.window))?;
    }
    Ok(())
}

/// Handle UnmapNotify events - a banner unmapped by anyone but us comes straight back
pub fn handle_unmap_notify(ctx: &mut EventContext, event: UnmapNotifyEvent) -> Result<()> {
    if let Some(banner) = ctx.state.set.find_mut(event.window) {
        debug!(window = event.window, hidden = banner.visibility.is_hidden(), "UnmapNotify received");
        banner
            .restore()
            .context(format!("Failed to restore unmapped banner (window={})", event.window))?;
    }
    Ok(())
}

/// Handle _NET_WM_STATE / WM_STATE changes - undo minimize requests
pub fn handle_state_change(ctx: &mut EventContext, window: Window) -> Result<()> {
    if let Some(banner) = ctx.state.set.find_mut(window) {
        banner
            .restore_if_minimized()
            .context(format!("Failed to restore minimized banner (window={})", window))?;
    }
    Ok(())
}

/// Handle ConfigureNotify events - the root window changing size means new geometry
pub fn handle_configure_notify(ctx: &mut EventContext, event: ConfigureNotifyEvent) -> Result<()> {
    if event.window == ctx.app_ctx.screen.root {
        debug!(width = event.width, height = event.height, "Root window resized");
        ctx.state.rebuild_requested = true;
    }
    Ok(())
}

/// Handle RandR notifications - monitors were added, removed or rearranged
pub fn handle_screen_change(ctx: &mut EventContext) -> Result<()> {
    if !ctx.state.rebuild_requested {
        info!("Screen configuration changed, banners will be rebuilt");
    }
    ctx.state.rebuild_requested = true;
    Ok(())
}

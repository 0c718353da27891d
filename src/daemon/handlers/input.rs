use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info};
use x11rb::protocol::xproto::*;

use super::super::dispatcher::EventContext;
use crate::common::constants::{mouse, x11};
use crate::common::types::Position;
use crate::x11::keycodes_for_keysym;

/// Handle KeyPress events - ESC hides the focused banner for the hide delay
#[tracing::instrument(skip(ctx), fields(window = event.event))]
pub fn handle_key_press(ctx: &mut EventContext, event: KeyPressEvent) -> Result<()> {
    if !ctx.state.esc_keycodes.contains(&event.detail) {
        return Ok(());
    }
    let delay = ctx.state.set.settings.hide_delay();
    if let Some(banner) = ctx.state.set.find_mut(event.event) {
        banner
            .hide(Instant::now(), delay)
            .context(format!("Failed to hide banner (window={})", event.event))?;
    }
    Ok(())
}

/// Handle ButtonPress events - start a click-to-move drag
#[tracing::instrument(skip(ctx), fields(window = event.event))]
pub fn handle_button_press(ctx: &mut EventContext, event: ButtonPressEvent) -> Result<()> {
    if !ctx.state.set.settings.click_to_move || event.detail != mouse::BUTTON_LEFT {
        return Ok(());
    }
    if let Some(banner) = ctx.state.set.find_mut(event.event) {
        let pointer = Position::new(event.root_x, event.root_y);
        banner.drag.start(pointer, banner.rect.position());
        debug!(x = event.root_x, y = event.root_y, "Drag started");
    }
    Ok(())
}

/// Handle ButtonRelease events - end the drag
pub fn handle_button_release(ctx: &mut EventContext, event: ButtonReleaseEvent) -> Result<()> {
    if event.detail != mouse::BUTTON_LEFT {
        return Ok(());
    }
    let Some(banner) = ctx.state.set.find_mut(event.event) else {
        return Ok(());
    };
    if banner.drag.dragging {
        banner.drag.stop();
        debug!(window = event.event, y = banner.rect.y, "Drag finished");
    }
    Ok(())
}

/// Handle MotionNotify events - follow the pointer while dragging
pub fn handle_motion_notify(ctx: &mut EventContext, event: MotionNotifyEvent) -> Result<()> {
    let Some(banner) = ctx.state.set.find_mut(event.event) else {
        return Ok(());
    };
    if !banner.drag.dragging {
        return Ok(());
    }
    let pointer = Position::new(event.root_x, event.root_y);
    let target = banner.drag.target(pointer, banner.region, banner.rect.height);
    banner
        .move_to(target)
        .context(format!("Failed to move banner (window={})", event.event))
}

/// Handle MappingNotify events - the keyboard layout changed, find ESC again
pub fn handle_mapping_notify(ctx: &mut EventContext, event: MappingNotifyEvent) -> Result<()> {
    if event.request != Mapping::KEYBOARD {
        return Ok(());
    }
    ctx.state.esc_keycodes = keycodes_for_keysym(ctx.app_ctx.conn, x11::XK_ESCAPE)
        .context("Failed to look up ESC keycodes after mapping change")?;
    info!(keycodes = ?ctx.state.esc_keycodes, "Keyboard mapping changed");
    Ok(())
}

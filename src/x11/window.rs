//! X11 window state queries and operations

use anyhow::{Context, Result};
use tracing::debug;
use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::common::constants::x11;

use super::CachedAtoms;

/// Check whether a window is currently minimized/iconified
pub fn is_window_minimized(
    conn: &RustConnection,
    window: Window,
    atoms: &CachedAtoms,
) -> Result<bool> {
    let net_state_cookie = conn
        .get_property(false, window, atoms.net_wm_state, AtomEnum::ATOM, 0, 1024)
        .context(format!("Failed to query _NET_WM_STATE for window {}", window))?;
    match net_state_cookie.reply() {
        Ok(reply) => {
            if let Some(mut values) = reply.value32()
                && values.any(|state| state == atoms.net_wm_state_hidden)
            {
                return Ok(true);
            }
        }
        Err(ReplyError::X11Error(err)) if err.error_kind == x11rb::protocol::ErrorKind::Window => {
            debug!(window = window, "Window destroyed before _NET_WM_STATE reply");
            return Ok(false);
        }
        Err(err) => {
            return Err(err)
                .context(format!("Failed to get _NET_WM_STATE reply for window {}", window));
        }
    }

    // ICCCM WM_STATE for window managers without EWMH hidden state
    let wm_state_cookie = conn
        .get_property(false, window, atoms.wm_state, atoms.wm_state, 0, 2)
        .context(format!("Failed to query WM_STATE for window {}", window))?;
    match wm_state_cookie.reply() {
        Ok(reply) => Ok(reply
            .value32()
            .and_then(|mut values| values.next())
            .is_some_and(|state| state == x11::ICONIC_STATE)),
        Err(ReplyError::X11Error(err)) if err.error_kind == x11rb::protocol::ErrorKind::Window => {
            debug!(window = window, "Window destroyed before WM_STATE reply");
            Ok(false)
        }
        Err(err) => Err(err).context(format!("Failed to get WM_STATE reply for window {}", window)),
    }
}

/// Map a window, put it on top and ask the window manager to focus it
///
/// Focus lets the banner receive the ESC key.
pub fn present_window(
    conn: &RustConnection,
    screen: &Screen,
    atoms: &CachedAtoms,
    window: Window,
) -> Result<()> {
    conn.map_window(window)
        .context(format!("Failed to map window {}", window))?;
    conn.configure_window(
        window,
        &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE),
    )
    .context(format!("Failed to raise window {} to top of stack", window))?;

    let event = ClientMessageEvent::new(
        32,
        window,
        atoms.net_active_window,
        [x11::ACTIVE_WINDOW_SOURCE_PAGER, x11rb::CURRENT_TIME, 0, 0, 0],
    );
    conn.send_event(
        false,
        screen.root,
        EventMask::SUBSTRUCTURE_NOTIFY | EventMask::SUBSTRUCTURE_REDIRECT,
        event,
    )
    .context(format!("Failed to send _NET_ACTIVE_WINDOW event for window {}", window))?;

    conn.flush()
        .context("Failed to flush X11 connection after presenting window")?;
    Ok(())
}

/// Clear `_NET_WM_STATE_HIDDEN` on a mapped window that the window manager minimized
pub fn unminimize_window(
    conn: &RustConnection,
    screen: &Screen,
    atoms: &CachedAtoms,
    window: Window,
) -> Result<()> {
    let event = ClientMessageEvent::new(
        32,
        window,
        atoms.net_wm_state,
        [
            x11::NET_WM_STATE_REMOVE,
            atoms.net_wm_state_hidden,
            0,
            x11::ACTIVE_WINDOW_SOURCE_PAGER,
            0,
        ],
    );
    conn.send_event(
        false,
        screen.root,
        EventMask::SUBSTRUCTURE_NOTIFY | EventMask::SUBSTRUCTURE_REDIRECT,
        event,
    )
    .context(format!("Failed to send _NET_WM_STATE restore event for window {}", window))?;
    Ok(())
}

/// All keycodes that produce `keysym` in the current keyboard mapping
pub fn keycodes_for_keysym(conn: &RustConnection, keysym: Keysym) -> Result<Vec<Keycode>> {
    let setup = conn.setup();
    let min = setup.min_keycode;
    let count = setup.max_keycode - min + 1;

    let mapping = conn
        .get_keyboard_mapping(min, count)
        .context("Failed to request keyboard mapping")?
        .reply()
        .context("Failed to get keyboard mapping reply")?;

    Ok(keycodes_in_mapping(
        min,
        mapping.keysyms_per_keycode,
        &mapping.keysyms,
        keysym,
    ))
}

fn keycodes_in_mapping(
    min_keycode: Keycode,
    keysyms_per_keycode: u8,
    keysyms: &[Keysym],
    wanted: Keysym,
) -> Vec<Keycode> {
    if keysyms_per_keycode == 0 {
        return Vec::new();
    }
    keysyms
        .chunks(keysyms_per_keycode as usize)
        .enumerate()
        .filter(|(_, syms)| syms.contains(&wanted))
        .filter_map(|(index, _)| u8::try_from(min_keycode as usize + index).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keycodes_in_mapping() {
        // Keycodes 8..=11, two keysyms each; Escape on keycode 9
        let keysyms = [0, 0, x11::XK_ESCAPE, 0, 0x61, 0x41, 0, 0];
        assert_eq!(keycodes_in_mapping(8, 2, &keysyms, x11::XK_ESCAPE), vec![9]);

        // Same keysym on several keys
        let keysyms = [x11::XK_ESCAPE, x11::XK_ESCAPE, 0];
        assert_eq!(
            keycodes_in_mapping(8, 1, &keysyms, x11::XK_ESCAPE),
            vec![8, 9]
        );

        assert!(keycodes_in_mapping(8, 0, &keysyms, x11::XK_ESCAPE).is_empty());
    }
}

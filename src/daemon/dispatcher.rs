//! X11 event processing for the banner daemon
//!
//! Dispatcher that routes X11 events to specialized handlers.

use anyhow::Result;
use x11rb::protocol::Event;

use super::handlers;
use super::session::SessionState;
use crate::x11::AppContext;

/// Context bundle for event handlers
pub struct EventContext<'a, 'b> {
    pub app_ctx: &'b AppContext<'a>,
    pub state: &'b mut SessionState<'a>,
}

pub fn handle_event(ctx: &mut EventContext, event: Event) -> Result<()> {
    match event {
        Event::Expose(event) => handlers::window::handle_expose(ctx, event),
        Event::UnmapNotify(event) => handlers::window::handle_unmap_notify(ctx, event),
        Event::ConfigureNotify(event) => handlers::window::handle_configure_notify(ctx, event),
        Event::PropertyNotify(event) => {
            let atoms = ctx.app_ctx.atoms;
            if event.atom == atoms.net_wm_state || event.atom == atoms.wm_state {
                handlers::window::handle_state_change(ctx, event.window)
            } else {
                Ok(())
            }
        }
        Event::RandrScreenChangeNotify(_) | Event::RandrNotify(_) => {
            handlers::window::handle_screen_change(ctx)
        }
        Event::MappingNotify(event) => handlers::input::handle_mapping_notify(ctx, event),
        Event::KeyPress(event) => handlers::input::handle_key_press(ctx, event),
        Event::ButtonPress(event) => handlers::input::handle_button_press(ctx, event),
        Event::ButtonRelease(event) => handlers::input::handle_button_release(ctx, event),
        Event::MotionNotify(event) => handlers::input::handle_motion_notify(ctx, event),
        _ => Ok(()),
    }
}

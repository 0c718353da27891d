//! X11 utilities and cached state
//!
//! Atom and picture format caches plus helpers for window state and the
//! keyboard mapping.

mod context;
mod window;

pub use context::{AppContext, CachedAtoms, CachedFormats};
pub use window::{is_window_minimized, keycodes_for_keysym, present_window, unminimize_window};

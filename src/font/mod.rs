//! Font discovery and rendering
//!
//! Uses fontconfig to find TrueType fonts and fontdue to rasterize them, with
//! the X11 core `fixed` font as a last resort.

mod discovery;
mod rendering;

pub use rendering::{FontRenderer, TextExtent, core_text_extents, latin1, text8_chunks};

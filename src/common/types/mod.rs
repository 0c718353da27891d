//! Domain types for type safety and clarity

pub mod font;
pub mod geometry;

pub use font::{FontSize, FontWeight};
pub use geometry::{Dimensions, Position, Rect};

//! Geometric types for X11 coordinates and dimensions
//!
//! Provides type-safe wrappers for positions and sizes to avoid
//! common integer confusion (e.g., swapping width/height or x/y).

use serde::Serialize;

/// A position in 2D space (X11 coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Width × height in pixels
/// Using a newtype prevents accidentally swapping width and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub struct Dimensions {
    pub width: u16,
    pub height: u16,
}

impl Dimensions {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned screen rectangle (a monitor, a banner region, a window)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn left(&self) -> i32 {
        self.x as i32
    }

    pub fn top(&self) -> i32 {
        self.y as i32
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.x as i32 + self.width as i32
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.y as i32 + self.height as i32
    }

    /// Smallest rectangle containing both `self` and `other`
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(
            clamp_i16(left),
            clamp_i16(top),
            clamp_u16(right - left),
            clamp_u16(bottom - top),
        )
    }

    /// Bounding box of a set of rectangles, `None` when empty
    pub fn bounding<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
        rects.into_iter().fold(None, |acc, rect| match acc {
            None => Some(*rect),
            Some(bounds) => Some(bounds.union(rect)),
        })
    }
}

pub(crate) fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

pub(crate) fn clamp_u16(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(1920, 0, 2560, 1440);
        assert_eq!(rect.left(), 1920);
        assert_eq!(rect.right(), 4480);
        assert_eq!(rect.top(), 0);
        assert_eq!(rect.bottom(), 1440);
        assert_eq!(rect.position(), Position::new(1920, 0));
        assert_eq!(rect.dimensions(), Dimensions::new(2560, 1440));
    }

    #[test]
    fn test_rect_union() {
        let left = Rect::new(0, 180, 1920, 1080);
        let right = Rect::new(1920, 0, 2560, 1440);
        assert_eq!(left.union(&right), Rect::new(0, 0, 4480, 1440));
        assert_eq!(right.union(&left), Rect::new(0, 0, 4480, 1440));
    }

    #[test]
    fn test_bounding_box() {
        let rects = [
            Rect::new(0, 0, 1280, 1024),
            Rect::new(1280, 0, 1280, 1024),
            Rect::new(0, 1024, 1280, 1024),
        ];
        assert_eq!(Rect::bounding(&rects), Some(Rect::new(0, 0, 2560, 2048)));
        assert_eq!(Rect::bounding(&[]), None);
    }

    #[test]
    fn test_dimensions_empty() {
        assert!(Dimensions::new(0, 10).is_empty());
        assert!(Dimensions::new(10, 0).is_empty());
        assert!(!Dimensions::new(1, 1).is_empty());
    }
}

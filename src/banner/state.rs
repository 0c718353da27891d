//! Per-banner state that does not touch the X server

use std::time::{Duration, Instant};

use crate::common::constants::defaults::MAX_HIDE_DELAY_SECS;
use crate::common::types::geometry::clamp_i16;
use crate::common::types::{Position, Rect};

/// Whether a banner is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Shown,
    /// Hidden by the user until the deadline passes
    Hidden { until: Instant },
}

impl Visibility {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden { .. })
    }

    /// Hide for `delay` starting at `now`, saturating at the hide delay limit
    pub fn hide(&mut self, now: Instant, delay: Duration) {
        let delay = delay.min(Duration::from_secs(MAX_HIDE_DELAY_SECS));
        let until = now.checked_add(delay).unwrap_or(now);
        *self = Self::Hidden { until };
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            Self::Shown => None,
            Self::Hidden { until } => Some(*until),
        }
    }

    /// Switch back to shown once the deadline has passed; returns true on change
    pub fn expire(&mut self, now: Instant) -> bool {
        match self {
            Self::Hidden { until } if *until <= now => {
                *self = Self::Shown;
                true
            }
            _ => false,
        }
    }
}

/// In-progress click-to-move drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragState {
    pub dragging: bool,
    /// Pointer position (root coordinates) when the drag started
    pub pointer_start: Position,
    /// Window position when the drag started
    pub window_start: Position,
}

impl DragState {
    pub fn start(&mut self, pointer: Position, window: Position) {
        *self = Self {
            dragging: true,
            pointer_start: pointer,
            window_start: window,
        };
    }

    pub fn stop(&mut self) {
        self.dragging = false;
    }

    /// Window position for the current pointer, moving vertically only
    /// and keeping the whole banner inside `region`
    pub fn target(&self, pointer: Position, region: Rect, height: u16) -> Position {
        let dy = pointer.y as i32 - self.pointer_start.y as i32;
        let lowest = (region.bottom() - height as i32).max(region.top());
        let y = (self.window_start.y as i32 + dy).clamp(region.top(), lowest);
        Position::new(self.window_start.x, clamp_i16(y))
    }
}

/// Earliest deadline among hidden banners
pub fn next_deadline<'a>(states: impl IntoIterator<Item = &'a Visibility>) -> Option<Instant> {
    states.into_iter().filter_map(Visibility::deadline).min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hide_and_expire() {
        let now = Instant::now();
        let mut visibility = Visibility::default();
        assert!(!visibility.is_hidden());
        assert_eq!(visibility.deadline(), None);
        assert!(!visibility.expire(now));

        visibility.hide(now, Duration::from_secs(15));
        assert!(visibility.is_hidden());
        assert_eq!(visibility.deadline(), Some(now + Duration::from_secs(15)));

        // Not yet
        assert!(!visibility.expire(now + Duration::from_secs(14)));
        assert!(visibility.is_hidden());

        assert!(visibility.expire(now + Duration::from_secs(15)));
        assert_eq!(visibility, Visibility::Shown);
    }

    #[test]
    fn test_zero_delay_expires_immediately() {
        let now = Instant::now();
        let mut visibility = Visibility::default();
        visibility.hide(now, Duration::ZERO);
        assert!(visibility.expire(now));
    }

    #[test]
    fn test_huge_delay_is_capped() {
        let now = Instant::now();
        let mut visibility = Visibility::default();
        visibility.hide(now, Duration::from_secs(u64::MAX));
        assert_eq!(
            visibility.deadline(),
            Some(now + Duration::from_secs(MAX_HIDE_DELAY_SECS))
        );
    }

    #[test]
    fn test_next_deadline() {
        let now = Instant::now();
        let mut a = Visibility::default();
        let mut b = Visibility::default();
        let c = Visibility::default();
        assert_eq!(next_deadline([&a, &b, &c]), None);

        a.hide(now, Duration::from_secs(10));
        b.hide(now, Duration::from_secs(5));
        assert_eq!(
            next_deadline([&a, &b, &c]),
            Some(now + Duration::from_secs(5))
        );
    }

    #[test]
    fn test_drag_is_vertical_and_clamped() {
        let region = Rect::new(1920, 0, 1280, 1024);
        let mut drag = DragState::default();
        drag.start(Position::new(2000, 10), Position::new(1920, 0));
        assert!(drag.dragging);

        // Horizontal movement is ignored
        assert_eq!(
            drag.target(Position::new(2500, 110), region, 20),
            Position::new(1920, 100)
        );
        // Cannot leave the top of the region
        assert_eq!(
            drag.target(Position::new(2000, -500), region, 20),
            Position::new(1920, 0)
        );
        // Cannot leave the bottom of the region
        assert_eq!(
            drag.target(Position::new(2000, 5000), region, 20),
            Position::new(1920, 1004)
        );

        drag.stop();
        assert!(!drag.dragging);
    }
}

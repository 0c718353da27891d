//! Placement of banner windows and the labels inside them

use crate::common::constants::layout::{MIN_HEIGHT, SIDE_MARGIN, VERTICAL_PADDING};
use crate::common::types::geometry::clamp_i16;
use crate::common::types::{Dimensions, Position, Rect};
use crate::config::BannerSettings;

/// Which edge of its region a banner sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Text shown in a banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Classification message, centred
    Message,
    /// Short host name, left aligned
    Hostname,
    /// User name, right aligned
    User,
    /// "(ESC to hide)" hint, left aligned
    Hint,
}

impl LabelKind {
    fn align(self) -> Align {
        match self {
            Self::Message => Align::Center,
            Self::Hostname | Self::Hint => Align::Left,
            Self::User => Align::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

/// Labels a banner on `edge` shows for the given settings
pub fn labels_for(edge: Edge, settings: &BannerSettings) -> Vec<LabelKind> {
    let mut labels = vec![LabelKind::Message];
    if edge == Edge::Top && settings.sys_info {
        labels.extend([LabelKind::Hostname, LabelKind::User]);
    } else if settings.esc {
        labels.push(LabelKind::Hint);
    }
    labels
}

/// Banner height for labels of the given sizes
pub fn banner_height(labels: &[Dimensions]) -> u16 {
    let tallest = labels.iter().map(|d| d.height).max().unwrap_or(0);
    tallest
        .saturating_add(2 * VERTICAL_PADDING)
        .max(MIN_HEIGHT)
}

/// Window geometry of a banner inside `region`
pub fn banner_rect(region: Rect, edge: Edge, height: u16) -> Rect {
    let height = height.min(region.height);
    let y = match edge {
        Edge::Top => region.y,
        Edge::Bottom => clamp_i16(region.bottom() - height as i32),
    };
    Rect::new(region.x, y, region.width, height)
}

/// Top-left corner of a label inside a banner of the given size
pub fn label_position(kind: LabelKind, label: Dimensions, banner: Dimensions) -> Position {
    let free = banner.width as i32 - label.width as i32;
    let x = match kind.align() {
        Align::Center => free / 2,
        Align::Left => SIDE_MARGIN as i32,
        Align::Right => free - SIDE_MARGIN as i32,
    };
    let y = (banner.height as i32 - label.height as i32) / 2;
    Position::new(clamp_i16(x), clamp_i16(y))
}

/// Complete layout of one banner
#[derive(Debug, Clone, PartialEq)]
pub struct BannerLayout {
    pub edge: Edge,
    pub rect: Rect,
    pub labels: Vec<(LabelKind, Position)>,
}

/// Lay out a banner on `edge` of `region` holding labels of the given sizes
pub fn layout(region: Rect, edge: Edge, labels: &[(LabelKind, Dimensions)]) -> BannerLayout {
    let sizes: Vec<Dimensions> = labels.iter().map(|(_, size)| *size).collect();
    let rect = banner_rect(region, edge, banner_height(&sizes));
    let placed = labels
        .iter()
        .map(|(kind, size)| (*kind, label_position(*kind, *size, rect.dimensions())))
        .collect();
    BannerLayout {
        edge,
        rect,
        labels: placed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    };

    #[test]
    fn test_labels_for() {
        let mut settings = BannerSettings::default();
        assert_eq!(
            labels_for(Edge::Top, &settings),
            vec![LabelKind::Message, LabelKind::Hint]
        );

        settings.sys_info = true;
        assert_eq!(
            labels_for(Edge::Top, &settings),
            vec![LabelKind::Message, LabelKind::Hostname, LabelKind::User]
        );
        // Bottom banner never shows system info
        assert_eq!(
            labels_for(Edge::Bottom, &settings),
            vec![LabelKind::Message, LabelKind::Hint]
        );

        settings.esc = false;
        assert_eq!(labels_for(Edge::Bottom, &settings), vec![LabelKind::Message]);
    }

    #[test]
    fn test_banner_height() {
        assert_eq!(
            banner_height(&[Dimensions::new(120, 16), Dimensions::new(80, 12)]),
            20
        );
        // Minimum height
        assert_eq!(banner_height(&[]), 5);
        assert_eq!(banner_height(&[Dimensions::new(0, 0)]), 5);
    }

    #[test]
    fn test_top_and_bottom_rects() {
        assert_eq!(banner_rect(SCREEN, Edge::Top, 20), Rect::new(0, 0, 1920, 20));
        assert_eq!(
            banner_rect(SCREEN, Edge::Bottom, 20),
            Rect::new(0, 1060, 1920, 20)
        );

        let second = Rect::new(1920, 180, 1280, 1024);
        assert_eq!(
            banner_rect(second, Edge::Top, 20),
            Rect::new(1920, 180, 1280, 20)
        );
        assert_eq!(
            banner_rect(second, Edge::Bottom, 20),
            Rect::new(1920, 1184, 1280, 20)
        );
    }

    #[test]
    fn test_label_positions() {
        let banner = Dimensions::new(1920, 20);
        let label = Dimensions::new(100, 16);
        assert_eq!(
            label_position(LabelKind::Message, label, banner),
            Position::new(910, 2)
        );
        assert_eq!(
            label_position(LabelKind::Hostname, label, banner),
            Position::new(20, 2)
        );
        assert_eq!(
            label_position(LabelKind::User, label, banner),
            Position::new(1800, 2)
        );
        assert_eq!(
            label_position(LabelKind::Hint, Dimensions::new(90, 12), banner),
            Position::new(20, 4)
        );
    }

    #[test]
    fn test_full_layout() {
        let layout = layout(
            SCREEN,
            Edge::Bottom,
            &[
                (LabelKind::Message, Dimensions::new(100, 16)),
                (LabelKind::Hint, Dimensions::new(90, 12)),
            ],
        );
        assert_eq!(layout.rect, Rect::new(0, 1060, 1920, 20));
        assert_eq!(
            layout.labels,
            vec![
                (LabelKind::Message, Position::new(910, 2)),
                (LabelKind::Hint, Position::new(20, 4)),
            ]
        );
    }
}

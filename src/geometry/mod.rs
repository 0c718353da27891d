//! Screen geometry probing
//!
//! Monitors are discovered through an ordered chain of [`GeometrySource`]s;
//! the first source that reports at least one monitor wins. Banner regions
//! are then derived from the monitors and the spanning setting.

mod sources;
pub mod xrandr;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::common::types::Rect;

pub use sources::{RandrMonitors, RootWindow, StaticResolution, XrandrCommand};

/// One physical or logical output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    pub name: String,
    pub primary: bool,
    pub rect: Rect,
}

impl Monitor {
    pub fn new(name: impl Into<String>, primary: bool, rect: Rect) -> Self {
        Self {
            name: name.into(),
            primary,
            rect,
        }
    }
}

/// A way of finding out where the monitors are
pub trait GeometrySource {
    /// Human-readable strategy name for logs
    fn name(&self) -> &'static str;

    /// Monitors known to this source, primary first
    fn monitors(&self) -> Result<Vec<Monitor>>;
}

/// Primary monitor first, zero-sized outputs dropped
fn normalize(mut monitors: Vec<Monitor>) -> Vec<Monitor> {
    monitors.retain(|m| !m.rect.dimensions().is_empty());
    monitors.sort_by_key(|m| !m.primary);
    monitors
}

/// Ask each source in turn until one reports monitors
pub fn resolve_monitors(sources: &[&dyn GeometrySource]) -> Result<Vec<Monitor>> {
    for source in sources {
        match source.monitors() {
            Ok(monitors) if !monitors.is_empty() => {
                let monitors = normalize(monitors);
                if monitors.is_empty() {
                    warn!(source = source.name(), "Geometry source reported only empty outputs");
                    continue;
                }
                info!(
                    source = source.name(),
                    count = monitors.len(),
                    "Screen geometry resolved"
                );
                for monitor in &monitors {
                    debug!(
                        name = %monitor.name,
                        primary = monitor.primary,
                        x = monitor.rect.x,
                        y = monitor.rect.y,
                        width = monitor.rect.width,
                        height = monitor.rect.height,
                        "Monitor"
                    );
                }
                return Ok(monitors);
            }
            Ok(_) => {
                warn!(source = source.name(), "Geometry source reported no monitors");
            }
            Err(e) => {
                warn!(source = source.name(), error = %e, "Geometry source failed");
            }
        }
    }

    anyhow::bail!("Unable to determine screen geometry")
}

/// Screen areas that each get a top and bottom banner
///
/// With spanning enabled, or a single monitor, this is one region covering
/// every monitor. Otherwise each monitor is its own region.
pub fn banner_regions(monitors: &[Monitor], spanning: bool) -> Vec<Rect> {
    if spanning || monitors.len() == 1 {
        Rect::bounding(monitors.iter().map(|m| &m.rect))
            .into_iter()
            .collect()
    } else {
        monitors.iter().map(|m| m.rect).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Fixed {
        name: &'static str,
        result: fn() -> Result<Vec<Monitor>>,
        calls: Cell<u32>,
    }

    impl Fixed {
        fn new(name: &'static str, result: fn() -> Result<Vec<Monitor>>) -> Self {
            Self {
                name,
                result,
                calls: Cell::new(0),
            }
        }
    }

    impl GeometrySource for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn monitors(&self) -> Result<Vec<Monitor>> {
            self.calls.set(self.calls.get() + 1);
            (self.result)()
        }
    }

    fn dual() -> Vec<Monitor> {
        vec![
            Monitor::new("DP-1", false, Rect::new(1920, 0, 2560, 1440)),
            Monitor::new("HDMI-1", true, Rect::new(0, 180, 1920, 1080)),
        ]
    }

    #[test]
    fn test_first_successful_source_wins() {
        let failing = Fixed::new("failing", || Err(anyhow::anyhow!("no randr")));
        let empty = Fixed::new("empty", || Ok(Vec::new()));
        let working = Fixed::new("working", || Ok(dual()));
        let unused = Fixed::new("unused", || Ok(dual()));

        let monitors = resolve_monitors(&[&failing, &empty, &working, &unused]).unwrap();
        assert_eq!(monitors.len(), 2);
        // Primary sorted first
        assert_eq!(monitors[0].name, "HDMI-1");
        assert_eq!(unused.calls.get(), 0);
        assert_eq!(failing.calls.get(), 1);
    }

    #[test]
    fn test_all_sources_failing_is_error() {
        let failing = Fixed::new("failing", || Err(anyhow::anyhow!("nope")));
        let zero = Fixed::new("zero", || Ok(vec![Monitor::new("X", true, Rect::new(0, 0, 0, 0))]));
        assert!(resolve_monitors(&[&failing, &zero]).is_err());
        assert!(resolve_monitors(&[]).is_err());
    }

    #[test]
    fn test_regions_per_monitor() {
        let regions = banner_regions(&dual(), false);
        assert_eq!(
            regions,
            vec![Rect::new(1920, 0, 2560, 1440), Rect::new(0, 180, 1920, 1080)]
        );
    }

    #[test]
    fn test_regions_spanning() {
        assert_eq!(
            banner_regions(&dual(), true),
            vec![Rect::new(0, 0, 4480, 1440)]
        );
    }

    #[test]
    fn test_single_monitor_is_one_region() {
        let single = vec![Monitor::new("eDP-1", true, Rect::new(0, 0, 1366, 768))];
        assert_eq!(banner_regions(&single, false), vec![Rect::new(0, 0, 1366, 768)]);
        assert!(banner_regions(&[], false).is_empty());
    }
}

//! Parsing of `xrandr` query output

use crate::common::types::{Dimensions, Rect};

use super::Monitor;

/// Parse a `WxH+X+Y` geometry token such as `1920x1080+0+0`
pub fn parse_geometry(token: &str) -> Option<Rect> {
    let (size, offsets) = token.split_once('+')?;
    let (width, height) = size.split_once('x')?;
    let (x, y) = offsets.split_once('+')?;
    Some(Rect::new(
        x.parse().ok()?,
        y.parse().ok()?,
        width.parse().ok()?,
        height.parse().ok()?,
    ))
}

/// Connected outputs that have a mode set
///
/// ```text
/// HDMI-1 connected primary 1920x1080+0+0 (normal left inverted ...) 527mm x 296mm
/// DP-1 connected 2560x1440+1920+0 (normal left inverted ...) 597mm x 336mm
/// ```
pub fn connected_outputs(output: &str) -> Vec<Monitor> {
    output
        .lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let name = tokens.next()?;
            if tokens.next()? != "connected" {
                return None;
            }
            let mut primary = false;
            for token in tokens {
                if token == "primary" {
                    primary = true;
                } else if let Some(rect) = parse_geometry(token) {
                    return Some(Monitor::new(name, primary, rect));
                }
            }
            None
        })
        .collect()
}

/// Size from the `Screen 0: minimum 8 x 8, current 3840 x 1080, maximum ...` line
pub fn current_screen_size(output: &str) -> Option<Dimensions> {
    output.lines().find_map(|line| {
        let rest = line.split_once("current ")?.1;
        let mut tokens = rest.split_whitespace();
        let width = tokens.next()?.parse().ok()?;
        if tokens.next()? != "x" {
            return None;
        }
        let height = tokens.next()?.trim_end_matches(',').parse().ok()?;
        Some(Dimensions::new(width, height))
    })
}

/// Size from the legacy `*0  1024 x 768  ( 260mm x 195mm )` line
pub fn legacy_screen_size(output: &str) -> Option<Dimensions> {
    output.lines().find_map(|line| {
        if !line.starts_with("*0") {
            return None;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [_, width, "x", height, ..] => {
                Some(Dimensions::new(width.parse().ok()?, height.parse().ok()?))
            }
            _ => None,
        }
    })
}

/// Monitors described by `xrandr` output, trying each known format in turn
pub fn parse_monitors(output: &str) -> Vec<Monitor> {
    let outputs = connected_outputs(output);
    if !outputs.is_empty() {
        return outputs;
    }

    current_screen_size(output)
        .or_else(|| legacy_screen_size(output))
        .filter(|size| !size.is_empty())
        .map(|size| vec![Monitor::new("screen", true, Rect::new(0, 0, size.width, size.height))])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUAL_HEAD: &str = "\
Screen 0: minimum 8 x 8, current 4480 x 1440, maximum 32767 x 32767
DP-1 connected 2560x1440+1920+0 (normal left inverted right x axis y axis) 597mm x 336mm
   2560x1440     59.95*+
HDMI-1 connected primary 1920x1080+0+180 (normal left inverted right x axis y axis) 527mm x 296mm
   1920x1080     60.00*+  50.00
HDMI-2 disconnected (normal left inverted right x axis y axis)
DP-2 connected (normal left inverted right x axis y axis)
";

    #[test]
    fn test_parse_geometry() {
        assert_eq!(parse_geometry("1920x1080+0+0"), Some(Rect::new(0, 0, 1920, 1080)));
        assert_eq!(
            parse_geometry("2560x1440+1920+0"),
            Some(Rect::new(1920, 0, 2560, 1440))
        );
        assert_eq!(parse_geometry("1920x1080"), None);
        assert_eq!(parse_geometry("(normal"), None);
        assert_eq!(parse_geometry("axbxc+1+2"), None);
    }

    #[test]
    fn test_connected_outputs() {
        let monitors = connected_outputs(DUAL_HEAD);
        assert_eq!(
            monitors,
            vec![
                Monitor::new("DP-1", false, Rect::new(1920, 0, 2560, 1440)),
                Monitor::new("HDMI-1", true, Rect::new(0, 180, 1920, 1080)),
            ]
        );
    }

    #[test]
    fn test_current_screen_size() {
        assert_eq!(
            current_screen_size(DUAL_HEAD),
            Some(Dimensions::new(4480, 1440))
        );
        assert_eq!(current_screen_size("nothing here"), None);
    }

    #[test]
    fn test_falls_back_to_current_line() {
        let output = "Screen 0: minimum 320 x 200, current 1280 x 1024, maximum 8192 x 8192\n\
                      default connected (normal)\n";
        assert_eq!(
            parse_monitors(output),
            vec![Monitor::new("screen", true, Rect::new(0, 0, 1280, 1024))]
        );
    }

    #[test]
    fn test_legacy_format() {
        let output = "*0   1024 x 768    ( 260mm x 195mm )  *60\n";
        assert_eq!(legacy_screen_size(output), Some(Dimensions::new(1024, 768)));
        assert_eq!(
            parse_monitors(output),
            vec![Monitor::new("screen", true, Rect::new(0, 0, 1024, 768))]
        );
    }

    #[test]
    fn test_unparseable_output() {
        assert!(parse_monitors("").is_empty());
        assert!(parse_monitors("Can't open display").is_empty());
    }
}

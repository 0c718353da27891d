//! Font discovery via fontconfig

use anyhow::{Context, Result};
use fontconfig::{Fontconfig, Pattern};
use std::ffi::CString;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::common::constants::defaults::FONT_CANDIDATES;
use crate::common::types::FontWeight;

/// Style suffixes a face name may carry, longest first
const KNOWN_STYLES: &[&str] = &[
    "Condensed Bold",
    "Bold Oblique",
    "Bold Italic",
    "Condensed",
    "ExtraBold",
    "SemiBold",
    "Black",
    "Bold",
    "Medium",
    "Regular",
    "Light",
    "Thin",
    "Oblique",
    "Italic",
];

/// Turn a configured face such as `liberation-sans` into a fontconfig family
pub fn family_name(face: &str) -> String {
    face.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a trailing style off a face name.
///
/// Example: "DejaVu Sans Bold" -> ("DejaVu Sans", Some("Bold"))
fn split_style(font_name: &str) -> (&str, Option<&str>) {
    for style in KNOWN_STYLES {
        if let Some(prefix) = font_name.strip_suffix(style)
            && prefix.ends_with(' ')
        {
            let family = prefix.trim();
            if !family.is_empty() {
                return (family, Some(style));
            }
        }
    }
    (font_name, None)
}

/// Find the font file for a face and weight
///
/// A style written in the face itself wins over `weight`. Fails when
/// fontconfig would substitute a different family.
pub fn find_font_path(face: &str, weight: FontWeight) -> Result<PathBuf> {
    let fc = Fontconfig::new().context("Failed to initialize fontconfig")?;

    let requested = family_name(face);
    let (family, explicit_style) = split_style(&requested);
    let style = explicit_style.unwrap_or(weight.style_name());

    let mut pattern = Pattern::new(&fc);
    let family_cstr =
        CString::new(family).with_context(|| format!("Invalid family name: {}", family))?;
    pattern.add_string(fontconfig::FC_FAMILY, &family_cstr);
    let style_cstr = CString::new(style).with_context(|| format!("Invalid style name: {}", style))?;
    pattern.add_string(fontconfig::FC_STYLE, &style_cstr);

    let matched = pattern.font_match();

    if let Some(matched_family) = matched.get_string(fontconfig::FC_FAMILY)
        && !matched_family.eq_ignore_ascii_case(family)
    {
        return Err(anyhow::anyhow!(
            "Font '{}' not found - fontconfig returned family '{}' instead",
            face,
            matched_family
        ));
    }

    let file_path = matched
        .filename()
        .with_context(|| format!("No font file found for '{}'", face))?;
    let path = PathBuf::from(file_path);

    if !path.exists() {
        warn!(
            font = face,
            path = %path.display(),
            "Font file path from fontconfig does not exist"
        );
        return Err(anyhow::anyhow!(
            "Font file path '{}' does not exist",
            path.display()
        ));
    }

    debug!(
        face = face,
        family = family,
        style = style,
        path = %path.display(),
        "Resolved font path via fontconfig"
    );
    Ok(path)
}

/// First installed font from the preferred TrueType list
pub fn find_fallback_font(weight: FontWeight) -> Result<(String, PathBuf)> {
    for candidate in FONT_CANDIDATES {
        match find_font_path(candidate, weight) {
            Ok(path) => {
                info!(font = candidate, path = %path.display(), "Selected fallback font via fontconfig");
                return Ok((candidate.to_string(), path));
            }
            Err(e) => debug!(font = candidate, error = %e, "Fallback font unavailable"),
        }
    }

    Err(anyhow::anyhow!(
        "No TrueType fonts found. Tried: {:?}",
        FONT_CANDIDATES
    ))
}

//! Font rendering logic (Fontdue + X11 fallback)

use anyhow::{Context, Result};
use fontdue::{Font, FontSettings};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Char2b, ConnectionExt as XprotoExt, Font as X11Font, QueryTextExtentsReply,
};

use super::discovery::{find_fallback_font, find_font_path};
use crate::config::FontSpec;

/// X11 core font used when no TrueType font can be loaded
const CORE_FONT: &[u8] = b"fixed";

/// Rendered text as BGRA bitmap (optimized for X11)
#[derive(Debug)]
pub struct RenderedText {
    pub width: usize,
    pub height: usize,
    /// Little-endian ARGB (BGRA in memory): Blue, Green, Red, Alpha
    pub data: Vec<u8>,
}

impl RenderedText {
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }
}

/// Size of a line of text and the distance from its top to the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    pub width: u16,
    pub height: u16,
    pub ascent: u16,
}

/// Font renderer with TrueType (fontdue) or X11 core font fallback
#[derive(Debug)]
pub enum FontRenderer {
    Fontdue {
        font: Font,
        font_name: String,
        size: f32,
    },
    X11Fallback {
        font_id: X11Font,
    },
}

impl FontRenderer {
    /// Load a TrueType font from a file path
    pub fn from_path(path: PathBuf, font_name: String, size: f32) -> Result<Self> {
        debug!(path = %path.display(), size = size, "Attempting to load font from path");

        let font_data = fs::read(&path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;

        let font = Font::from_bytes(font_data, FontSettings::default()).map_err(|e| {
            anyhow::anyhow!(
                "Failed to parse font file '{}': {}. Font may be corrupt or in an unsupported format.",
                path.display(),
                e
            )
        })?;

        Ok(Self::Fontdue {
            font,
            font_name,
            size,
        })
    }

    /// Load the configured face, then a preferred TrueType font, then the X11 core font
    pub fn load<C: Connection>(conn: &C, spec: &FontSpec) -> Result<Self> {
        let size = spec.size.pixels();

        let configured = find_font_path(&spec.face, spec.weight)
            .and_then(|path| Self::from_path(path, spec.face.clone(), size));
        let error = match configured {
            Ok(renderer) => {
                debug!(face = %spec.face, weight = ?spec.weight, size = size, "Loaded configured font");
                return Ok(renderer);
            }
            Err(e) => e,
        };
        warn!(
            face = %spec.face,
            error = %error,
            "Failed to load configured font, trying fallback fonts"
        );

        match find_fallback_font(spec.weight)
            .and_then(|(name, path)| Self::from_path(path, name, size))
        {
            Ok(renderer) => Ok(renderer),
            Err(e) => {
                warn!(error = %e, "No TrueType fonts available, falling back to X11 core fonts");
                Self::open_core_font(conn)
            }
        }
    }

    fn open_core_font<C: Connection>(conn: &C) -> Result<Self> {
        let font_id = conn
            .generate_id()
            .context("Failed to generate X11 font ID")?;
        conn.open_font(font_id, CORE_FONT)
            .context("Failed to open X11 'fixed' font")?;

        info!("Using X11 core font 'fixed' (basic rendering)");
        Ok(Self::X11Fallback { font_id })
    }

    pub fn x11_font_id(&self) -> Option<X11Font> {
        match self {
            Self::X11Fallback { font_id } => Some(*font_id),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Fontdue { font_name, .. } => font_name,
            Self::X11Fallback { .. } => "fixed",
        }
    }

    /// Measure one line of text without rasterizing it
    pub fn measure<C: Connection>(&self, conn: &C, text: &str) -> Result<TextExtent> {
        match self {
            Self::Fontdue { font, size, .. } => {
                let (_, advance) = layout_line(font, *size, text);
                let (ascent, descent) = vertical_extent(font, *size, text);
                Ok(TextExtent {
                    width: advance.ceil() as u16,
                    height: (ascent + descent) as u16,
                    ascent: ascent as u16,
                })
            }
            Self::X11Fallback { font_id } => {
                let extents = core_text_extents(conn, *font_id, &latin1(text))?;
                let ascent = extents.font_ascent.max(0) as u16;
                let descent = extents.font_descent.max(0) as u16;
                Ok(TextExtent {
                    width: extents.overall_width.max(0) as u16,
                    height: ascent + descent,
                    ascent,
                })
            }
        }
    }

    /// Render text to a BGRA bitmap whose height matches [`Self::measure`]
    pub fn render_text(&self, text: &str, fg_color: u32) -> Result<RenderedText> {
        let Self::Fontdue { font, size, .. } = self else {
            return Ok(RenderedText::empty());
        };

        let (positions, advance) = layout_line(font, *size, text);
        let (ascent, descent) = vertical_extent(font, *size, text);
        let width = advance.ceil() as usize;
        let height = (ascent + descent) as usize;
        if width == 0 || height == 0 {
            return Ok(RenderedText::empty());
        }

        let mut data = vec![0u8; width * height * 4];

        let fg_a = (fg_color >> 24) & 0xFF;
        let fg_r = (fg_color >> 16) & 0xFF;
        let fg_g = (fg_color >> 8) & 0xFF;
        let fg_b = fg_color & 0xFF;

        for (ch, x_offset) in positions {
            let (metrics, bitmap) = font.rasterize(ch, *size);
            let glyph_top = ascent - (metrics.height as i32 + metrics.ymin);
            let glyph_left = x_offset.round() as i32 + metrics.xmin;

            for gy in 0..metrics.height {
                let py = glyph_top + gy as i32;
                if py < 0 || py >= height as i32 {
                    continue;
                }
                for gx in 0..metrics.width {
                    let px = glyph_left + gx as i32;
                    if px < 0 || px >= width as i32 {
                        continue;
                    }

                    let coverage = bitmap[gy * metrics.width + gx] as u32;
                    if coverage == 0 {
                        continue;
                    }

                    // Premultiplied: pixel = color * coverage / 255
                    let idx = ((py as usize) * width + (px as usize)) * 4;
                    data[idx] = data[idx].max(((fg_b * coverage) / 255) as u8);
                    data[idx + 1] = data[idx + 1].max(((fg_g * coverage) / 255) as u8);
                    data[idx + 2] = data[idx + 2].max(((fg_r * coverage) / 255) as u8);
                    data[idx + 3] = data[idx + 3].max(((fg_a * coverage) / 255) as u8);
                }
            }
        }

        Ok(RenderedText {
            width,
            height,
            data,
        })
    }

    /// Free server-side resources held by the renderer
    pub fn release<C: Connection>(&self, conn: &C) -> Result<()> {
        if let Self::X11Fallback { font_id } = self {
            conn.close_font(*font_id)
                .context("Failed to close X11 core font")?;
        }
        Ok(())
    }
}

/// Pen position of each character and the total advance, with kerning
fn layout_line(font: &Font, size: f32, text: &str) -> (Vec<(char, f32)>, f32) {
    let mut positions = Vec::with_capacity(text.len());
    let mut pen = 0.0f32;
    let mut previous: Option<char> = None;

    for ch in text.chars() {
        if let Some(prev) = previous {
            pen += font.horizontal_kern(prev, ch, size).unwrap_or(0.0);
        }
        positions.push((ch, pen));
        pen += font.metrics(ch, size).advance_width;
        previous = Some(ch);
    }

    (positions, pen.max(0.0))
}

/// Pixels above and below the baseline
///
/// Uses the font's line metrics so every label in a font has the same
/// height; falls back to the glyph bounds for fonts without them.
fn vertical_extent(font: &Font, size: f32, text: &str) -> (i32, i32) {
    if let Some(line) = font.horizontal_line_metrics(size) {
        return (line.ascent.ceil() as i32, (-line.descent).ceil().max(0.0) as i32);
    }

    text.chars().fold((0, 0), |(ascent, descent), ch| {
        let metrics = font.metrics(ch, size);
        (
            ascent.max(metrics.height as i32 + metrics.ymin),
            descent.max(-metrics.ymin),
        )
    })
}

/// Longest string a single ImageText8 request can carry
pub const MAX_TEXT8_LEN: usize = u8::MAX as usize;

/// Split Latin-1 text into pieces short enough for ImageText8
pub fn text8_chunks(bytes: &[u8]) -> std::slice::Chunks<'_, u8> {
    bytes.chunks(MAX_TEXT8_LEN)
}

/// Server-side extents of Latin-1 text in a core font
pub fn core_text_extents<C: Connection>(
    conn: &C,
    font_id: X11Font,
    bytes: &[u8],
) -> Result<QueryTextExtentsReply> {
    let chars: Vec<Char2b> = bytes
        .iter()
        .map(|&byte| Char2b {
            byte1: 0,
            byte2: byte,
        })
        .collect();
    conn.query_text_extents(font_id, &chars)
        .context("Failed to send text extents query")?
        .reply()
        .context("Failed to get text extents reply")
}

/// Text as Latin-1 bytes for X11 core fonts, unmappable characters replaced by `?`
pub fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}

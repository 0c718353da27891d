//! Server-side resources for one line of banner text

use anyhow::{Context, Result};
use tracing::error;
use x11rb::connection::Connection;
use x11rb::protocol::render::{ConnectionExt as RenderExt, CreatePictureAux, PictOp, Picture};
use x11rb::protocol::xproto::{
    ConnectionExt as XprotoExt, CreateGCAux, Drawable, Font as X11Font, Gcontext, ImageFormat,
    Pixmap,
};
use x11rb::rust_connection::RustConnection;

use crate::common::constants::x11;
use crate::common::types::geometry::clamp_i16;
use crate::common::types::{Dimensions, Position};
use crate::font::{FontRenderer, TextExtent, core_text_extents, latin1, text8_chunks};
use crate::x11::CachedFormats;

#[derive(Debug)]
enum Content {
    /// Pre-rendered ARGB text, composited onto the banner
    Picture { pixmap: Pixmap, picture: Picture },
    /// Core font text, drawn with ImageText8 on every expose, one run per
    /// request-sized piece at its x offset
    CoreText { gc: Gcontext, runs: Vec<(i16, Vec<u8>)> },
    /// Nothing to draw (empty text)
    Empty,
}

/// Text ready to be drawn onto a banner window
#[derive(Debug)]
pub struct Label<'a> {
    content: Content,
    extent: TextExtent,
    conn: &'a RustConnection,
}

impl<'a> Label<'a> {
    /// Render `text` for drawing onto `drawable`
    ///
    /// `fg` and `bg` are ARGB32 colors; the background only matters for core
    /// font text, which is drawn with an opaque background.
    pub fn new(
        conn: &'a RustConnection,
        formats: &CachedFormats,
        drawable: Drawable,
        font: &FontRenderer,
        text: &str,
        fg: u32,
        bg: u32,
    ) -> Result<Self> {
        let extent = font
            .measure(conn, text)
            .with_context(|| format!("Failed to measure label '{}'", text))?;

        let content = match font.x11_font_id() {
            Some(font_id) => Self::core_text(conn, drawable, font_id, text, fg, bg)?,
            None => Self::rendered(conn, formats, drawable, font, text, fg)?,
        };

        Ok(Self {
            content,
            extent,
            conn,
        })
    }

    fn core_text(
        conn: &RustConnection,
        drawable: Drawable,
        font_id: X11Font,
        text: &str,
        fg: u32,
        bg: u32,
    ) -> Result<Content> {
        let gc = conn
            .generate_id()
            .context("Failed to generate GC ID for X11 text")?;
        conn.create_gc(
            gc,
            drawable,
            &CreateGCAux::new()
                .font(font_id)
                .foreground(fg & 0x00FF_FFFF)
                .background(bg & 0x00FF_FFFF),
        )
        .context(format!("Failed to create GC for label '{}'", text))?;

        let bytes = latin1(text);
        let mut runs = Vec::new();
        let mut offset = 0i16;
        for chunk in text8_chunks(&bytes) {
            runs.push((offset, chunk.to_vec()));
            let extents = match core_text_extents(conn, font_id, chunk) {
                Ok(extents) => extents,
                Err(e) => {
                    let _ = conn.free_gc(gc);
                    return Err(e.context(format!("Failed to measure label '{}'", text)));
                }
            };
            offset = clamp_i16(offset as i32 + extents.overall_width);
        }

        Ok(Content::CoreText { gc, runs })
    }

    fn rendered(
        conn: &RustConnection,
        formats: &CachedFormats,
        drawable: Drawable,
        font: &FontRenderer,
        text: &str,
        fg: u32,
    ) -> Result<Content> {
        let rendered = font
            .render_text(text, fg)
            .context(format!("Failed to render label '{}'", text))?;
        if rendered.width == 0 || rendered.height == 0 {
            return Ok(Content::Empty);
        }
        let width = u16::try_from(rendered.width).context("Label too wide")?;
        let height = u16::try_from(rendered.height).context("Label too tall")?;

        let pixmap = conn
            .generate_id()
            .context("Failed to generate ID for text pixmap")?;
        conn.create_pixmap(x11::ARGB_DEPTH, pixmap, drawable, width, height)
            .context(format!("Failed to create text pixmap for '{}'", text))?;

        // ARGB pixmaps need a GC of matching depth for PutImage
        let upload_gc = conn
            .generate_id()
            .context("Failed to generate ID for upload GC")?;
        conn.create_gc(upload_gc, pixmap, &CreateGCAux::new())
            .context("Failed to create upload GC")?;
        let uploaded = conn
            .put_image(
                ImageFormat::Z_PIXMAP,
                pixmap,
                upload_gc,
                width,
                height,
                0,
                0,
                0,
                x11::ARGB_DEPTH,
                &rendered.data,
            )
            .context(format!("Failed to upload text image for '{}'", text));
        conn.free_gc(upload_gc)
            .context("Failed to free upload GC")?;
        if let Err(e) = uploaded {
            let _ = conn.free_pixmap(pixmap);
            return Err(e);
        }

        let picture = conn
            .generate_id()
            .context("Failed to generate ID for text picture")?;
        if let Err(e) = conn.render_create_picture(
            picture,
            pixmap,
            formats.argb,
            &CreatePictureAux::new(),
        ) {
            let _ = conn.free_pixmap(pixmap);
            return Err(e).context(format!("Failed to create text picture for '{}'", text));
        }

        Ok(Content::Picture { pixmap, picture })
    }

    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.extent.width, self.extent.height)
    }

    /// Draw the label with its top-left corner at `position`
    pub fn draw(&self, window: Drawable, window_picture: Picture, position: Position) -> Result<()> {
        match &self.content {
            Content::Picture { picture, .. } => {
                self.conn
                    .render_composite(
                        PictOp::OVER,
                        *picture,
                        x11rb::NONE,
                        window_picture,
                        0,
                        0,
                        0,
                        0,
                        position.x,
                        position.y,
                        self.extent.width,
                        self.extent.height,
                    )
                    .context("Failed to composite label")?;
            }
            Content::CoreText { gc, runs } => {
                let baseline = position.y.saturating_add(self.extent.ascent as i16);
                for (offset, bytes) in runs {
                    self.conn
                        .image_text8(window, *gc, position.x.saturating_add(*offset), baseline, bytes)
                        .context("Failed to draw core font label")?;
                }
            }
            Content::Empty => {}
        }
        Ok(())
    }
}

impl Drop for Label<'_> {
    fn drop(&mut self) {
        match &self.content {
            Content::Picture { pixmap, picture } => {
                if let Err(e) = self.conn.render_free_picture(*picture) {
                    error!(picture = picture, error = %e, "Failed to free text picture");
                }
                if let Err(e) = self.conn.free_pixmap(*pixmap) {
                    error!(pixmap = pixmap, error = %e, "Failed to free text pixmap");
                }
            }
            Content::CoreText { gc, .. } => {
                if let Err(e) = self.conn.free_gc(*gc) {
                    error!(gc = gc, error = %e, "Failed to free text GC");
                }
            }
            Content::Empty => {}
        }
    }
}

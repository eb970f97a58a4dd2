//! PNG rasterization of composed documents

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use std::sync::Arc;

use super::VectorDocument;
use crate::error::RenderError;

/// Largest edge the image endpoint will produce
pub const DEFAULT_MAX_SIZE: u32 = 1024;

/// Shareable rasterizer. The font database is loaded once and reused.
#[derive(Clone)]
pub struct Rasterizer {
    fontdb: Arc<fontdb::Database>,
    max_size: u32,
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer")
            .field("faces", &self.fontdb.len())
            .field("max_size", &self.max_size)
            .finish()
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE, false)
    }
}

impl Rasterizer {
    pub fn new(max_size: u32, load_system_fonts: bool) -> Self {
        let mut db = fontdb::Database::new();
        if load_system_fonts {
            db.load_system_fonts();
            log::debug!("Loaded {} font faces", db.len());
        }
        Self {
            fontdb: Arc::new(db),
            max_size,
        }
    }

    /// Target size after applying the cap
    pub fn clamp(&self, width: u32, height: u32) -> (u32, u32) {
        (width.min(self.max_size), height.min(self.max_size))
    }

    /// Render to PNG bytes, scaling to fill and cropping the overflow evenly
    pub fn rasterize(&self, document: &VectorDocument, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let pixmap = self.render_pixmap(document, width, height)?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::RenderFailure(format!("PNG encoding failed: {}", e)))
    }

    fn render_pixmap(&self, document: &VectorDocument, width: u32, height: u32) -> Result<Pixmap, RenderError> {
        let (width, height) = self.clamp(width, height);
        if width == 0 || height == 0 {
            return Err(RenderError::RenderFailure(format!(
                "target size {}x{} is empty",
                width, height
            )));
        }

        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);

        let tree = usvg::Tree::from_str(document.as_str(), &options)
            .map_err(|e| RenderError::RenderFailure(format!("invalid SVG: {}", e)))?;

        let size = tree.size();
        let (src_w, src_h) = (size.width(), size.height());
        let scale = (width as f32 / src_w).max(height as f32 / src_h);
        let dx = (width as f32 - src_w * scale) / 2.0;
        let dy = (height as f32 - src_h * scale) / 2.0;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| RenderError::RenderFailure(format!("cannot allocate {}x{} pixmap", width, height)))?;
        resvg::render(
            &tree,
            Transform::from_row(scale, 0.0, 0.0, scale, dx, dy),
            &mut pixmap.as_mut(),
        );

        log::debug!(
            "Rasterized {}x{} document to {}x{} (scale {:.3})",
            src_w,
            src_h,
            width,
            height,
            scale
        );
        Ok(pixmap)
    }
}

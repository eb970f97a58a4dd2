//! Layered SVG composition
//!
//! Layers are painted in category order, one `<g id="layer-…">` per
//! category, with the identifier label always last. A missing fragment never
//! fails the render: the category's fallback chain is tried and, if nothing
//! resolves, the layer is left out.

pub mod fragments;
pub mod markup;
pub mod raster;

use indexmap::IndexMap;

use crate::config::CanvasConfig;
use crate::error::RenderError;
use crate::selector::{Identifier, Selection};
use crate::traits::TraitOption;

pub use fragments::{DirFragmentStore, FragmentStore, MemoryFragmentStore};
pub use raster::Rasterizer;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// A complete, self-contained SVG document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorDocument {
    markup: String,
    layers: Vec<String>,
}

impl VectorDocument {
    #[cfg(test)]
    /// Wrap existing markup, e.g. a document read back from disk
    pub fn from_markup(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            layers: Vec::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.markup
    }

    /// Categories that produced a layer, bottom first
    pub fn layers(&self) -> &[String] {
        &self.layers
    }
}

/// Builds documents on a fixed canvas
#[derive(Debug, Clone)]
pub struct Compositor {
    canvas: CanvasConfig,
    fallbacks: IndexMap<String, Vec<String>>,
}

impl Compositor {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self {
            canvas,
            fallbacks: IndexMap::new(),
        }
    }

    /// Per-category fragment keys tried after the selected one
    pub fn with_fallbacks(mut self, fallbacks: IndexMap<String, Vec<String>>) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    pub fn compose(
        &self,
        identifier: &Identifier,
        selection: &Selection,
        order: &[String],
        store: &dyn FragmentStore,
    ) -> VectorDocument {
        let (width, height) = (self.canvas.width, self.canvas.height);
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
             width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = width,
            h = height
        );

        if let Some(color) = &self.canvas.background {
            svg.push_str(&format!(
                "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
                width,
                height,
                markup::escape(color)
            ));
        }

        let mut layers = Vec::new();
        for category in order {
            let Some(body) = self.resolve_layer(category, selection.get(category), store) else {
                continue;
            };
            svg.push_str(&format!(
                "<g id=\"layer-{}\">{}</g>\n",
                markup::escape(category),
                body
            ));
            layers.push(category.clone());
        }

        if self.canvas.label.enabled {
            svg.push_str(&self.label(identifier));
        }

        svg.push_str("</svg>\n");

        VectorDocument { markup: svg, layers }
    }

    /// Selected asset first, then configured fallbacks; first hit wins
    fn resolve_layer(&self, category: &str, chosen: Option<&TraitOption>, store: &dyn FragmentStore) -> Option<String> {
        let chosen = chosen?;
        let fallbacks = self.fallbacks.get(category).map(Vec::as_slice).unwrap_or(&[]);

        let attempts = std::iter::once(chosen.asset.as_str()).chain(fallbacks.iter().map(String::as_str));
        for asset in attempts {
            match store.fragment(category, asset) {
                Some(fragment) => return Some(markup::strip_wrapper(&fragment)),
                None => log::warn!(
                    "{}",
                    RenderError::MissingFragment {
                        category: category.to_string(),
                        asset: asset.to_string(),
                    }
                ),
            }
        }

        log::warn!("Skipping layer '{}' for option '{}'", category, chosen.id);
        None
    }

    fn label(&self, identifier: &Identifier) -> String {
        let label = &self.canvas.label;
        let margin = label.font_size;
        format!(
            "<g id=\"label\"><text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">#{}</text></g>\n",
            self.canvas.width.saturating_sub(margin),
            self.canvas.height.saturating_sub(margin),
            markup::escape(&label.font_family),
            label.font_size,
            markup::escape(&label.fill),
            identifier
        )
    }
}

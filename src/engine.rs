//! Loaded, read-only rendering context shared by every command
//!
//! Built once from `Config`: the trait set comes from `paths.traits` (or the
//! embedded set when that file is absent) and fragments from
//! `paths.fragments` (or the embedded fragments when that directory is absent).

use eyre::Result;

use crate::assets;
use crate::compositor::{Compositor, DirFragmentStore, FragmentStore, Rasterizer, VectorDocument};
use crate::config::Config;
use crate::error::RenderError;
use crate::metadata::FrameMetadata;
use crate::selector::{Identifier, Selection, select_traits};
use crate::traits::TraitSet;

/// Where the engine's inputs came from, for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(String),
    Builtin,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path),
            Source::Builtin => write!(f, "built-in"),
        }
    }
}

pub struct FrameEngine {
    set: TraitSet,
    salt: String,
    compositor: Compositor,
    store: Box<dyn FragmentStore>,
    rasterizer: Rasterizer,
    raster_size: u32,
    pub traits_source: Source,
    pub fragments_source: Source,
}

impl FrameEngine {
    pub fn from_config(config: &Config) -> Result<Self> {
        let traits_path = config.traits_path();
        let (set, traits_source) = if traits_path.exists() {
            (TraitSet::load(&traits_path)?, Source::File(traits_path.display().to_string()))
        } else {
            log::info!("No trait file at {}, using built-in set", traits_path.display());
            (TraitSet::builtin()?, Source::Builtin)
        };

        let fragments_dir = config.fragments_dir();
        let (store, fragments_source): (Box<dyn FragmentStore>, Source) = if fragments_dir.is_dir() {
            let source = Source::File(fragments_dir.display().to_string());
            (Box::new(DirFragmentStore::new(fragments_dir)), source)
        } else {
            log::info!(
                "No fragment directory at {}, using built-in fragments",
                fragments_dir.display()
            );
            (Box::new(assets::builtin_store()), Source::Builtin)
        };

        Ok(Self::new(set, store, config)
            .with_sources(traits_source, fragments_source))
    }

    pub fn new(set: TraitSet, store: Box<dyn FragmentStore>, config: &Config) -> Self {
        let compositor = Compositor::new(config.canvas.clone()).with_fallbacks(set.defaults.clone());
        let rasterizer = Rasterizer::new(config.raster.max_size, config.raster.load_system_fonts);

        Self {
            set,
            salt: config.selector.salt.clone(),
            compositor,
            store,
            rasterizer,
            raster_size: config.raster.size,
            traits_source: Source::Builtin,
            fragments_source: Source::Builtin,
        }
    }

    fn with_sources(mut self, traits: Source, fragments: Source) -> Self {
        self.traits_source = traits;
        self.fragments_source = fragments;
        self
    }

    pub fn trait_set(&self) -> &TraitSet {
        &self.set
    }

    pub fn store(&self) -> &dyn FragmentStore {
        self.store.as_ref()
    }

    pub fn select(&self, identifier: &Identifier) -> Selection {
        select_traits(identifier, &self.set, &self.salt)
    }

    pub fn compose(&self, identifier: &Identifier) -> (Selection, VectorDocument) {
        let selection = self.select(identifier);
        let document = self
            .compositor
            .compose(identifier, &selection, &self.set.order, self.store.as_ref());
        (selection, document)
    }

    /// PNG bytes; `size` falls back to the configured raster size
    pub fn render_png(&self, identifier: &Identifier, size: Option<u32>) -> Result<Vec<u8>, RenderError> {
        let (_, document) = self.compose(identifier);
        self.rasterize(&document, size)
    }

    /// Rasterize an already composed document to a square PNG
    pub fn rasterize(&self, document: &VectorDocument, size: Option<u32>) -> Result<Vec<u8>, RenderError> {
        let size = size.unwrap_or(self.raster_size);
        self.rasterizer.rasterize(document, size, size)
    }

    pub fn metadata(&self, identifier: &Identifier) -> FrameMetadata {
        FrameMetadata::from_selection(&self.select(identifier))
    }
}

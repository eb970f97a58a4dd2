//! Read-only lookup of SVG fragments keyed by (category, asset)

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Source of fragment markup. `None` means "not found"; implementations log
/// their own I/O problems instead of failing the render.
pub trait FragmentStore: Send + Sync {
    fn fragment(&self, category: &str, asset: &str) -> Option<String>;
}

/// Fragments laid out as `<root>/<category>/<asset>.svg`
#[derive(Debug, Clone)]
pub struct DirFragmentStore {
    root: PathBuf,
}

impl DirFragmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path for a fragment, or `None` if either key would escape the root
    pub fn path_for(&self, category: &str, asset: &str) -> Option<PathBuf> {
        if !is_plain_key(category) || !is_plain_key(asset) {
            return None;
        }
        Some(self.root.join(category).join(format!("{}.svg", asset)))
    }

    /// Asset keys present on disk for a category, sorted
    pub fn assets(&self, category: &str) -> Vec<String> {
        let dir = self.root.join(category);
        if !dir.is_dir() {
            return Vec::new();
        }

        let mut assets: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "svg"))
            .filter_map(|e| e.path().file_stem().map(|s| s.to_string_lossy().to_string()))
            .collect();
        assets.sort();
        assets
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty() && key != "." && key != ".." && !key.contains(['/', '\\'])
}

impl FragmentStore for DirFragmentStore {
    fn fragment(&self, category: &str, asset: &str) -> Option<String> {
        let Some(path) = self.path_for(category, asset) else {
            log::warn!("Rejected fragment key {}/{}", category, asset);
            return None;
        };

        if !path.exists() {
            return None;
        }

        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                log::warn!("Failed to read fragment {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// In-memory store, used for embedded defaults and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryFragmentStore {
    fragments: HashMap<(String, String), String>,
}

impl MemoryFragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: &str, asset: &str, markup: impl Into<String>) {
        self.fragments
            .insert((category.to_string(), asset.to_string()), markup.into());
    }

    #[cfg(test)]
    pub fn with(mut self, category: &str, asset: &str, markup: impl Into<String>) -> Self {
        self.insert(category, asset, markup);
        self
    }

    #[cfg(test)]
    pub fn remove_category(&mut self, category: &str) {
        self.fragments.retain(|(c, _), _| c != category);
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }
}

impl FragmentStore for MemoryFragmentStore {
    fn fragment(&self, category: &str, asset: &str) -> Option<String> {
        self.fragments
            .get(&(category.to_string(), asset.to_string()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_dir_store_reads_fragment() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("eyes")).unwrap();
        fs::write(temp.path().join("eyes/eyes-laser.svg"), "<circle r=\"4\"/>").unwrap();

        let store = DirFragmentStore::new(temp.path());
        assert_eq!(store.fragment("eyes", "eyes-laser").as_deref(), Some("<circle r=\"4\"/>"));
        assert!(store.fragment("eyes", "eyes-wink").is_none());
        assert!(store.fragment("mouth", "mouth-grin").is_none());
    }

    #[test]
    fn test_dir_store_rejects_traversal() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("secret.svg"), "<g/>").unwrap();

        let store = DirFragmentStore::new(temp.path().join("fragments"));
        assert!(store.fragment("..", "secret").is_none());
        assert!(store.fragment("eyes", "../../secret").is_none());
        assert!(store.path_for("eyes", "").is_none());
    }

    #[test]
    fn test_dir_store_lists_assets() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("body");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("body-robot.svg"), "<g/>").unwrap();
        fs::write(dir.join("body-angel.svg"), "<g/>").unwrap();
        fs::write(dir.join("notes.txt"), "ignore me").unwrap();

        let store = DirFragmentStore::new(temp.path());
        assert_eq!(store.assets("body"), vec!["body-angel", "body-robot"]);
        assert!(store.assets("aura").is_empty());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryFragmentStore::new()
            .with("eyes", "laser", "<g/>")
            .with("mouth", "grin", "<path/>");
        assert_eq!(store.len(), 2);
        assert_eq!(store.fragment("eyes", "laser").as_deref(), Some("<g/>"));

        store.remove_category("eyes");
        assert!(store.fragment("eyes", "laser").is_none());
        assert_eq!(store.len(), 1);
    }
}

//! Built-in trait set and fragments embedded in the binary

use eyre::{Context, Result};
use std::fs;
use std::path::Path;

use crate::compositor::MemoryFragmentStore;

/// (category, asset, markup)
pub const BUILTIN_FRAGMENTS: &[(&str, &str, &str)] = &[
    ("accessory", "accessory-chain", include_str!("../assets/fragments/accessory/accessory-chain.svg")),
    ("accessory", "accessory-none", include_str!("../assets/fragments/accessory/accessory-none.svg")),
    ("accessory", "accessory-scarf", include_str!("../assets/fragments/accessory/accessory-scarf.svg")),
    ("aura", "aura-flame", include_str!("../assets/fragments/aura/aura-flame.svg")),
    ("aura", "aura-holy", include_str!("../assets/fragments/aura/aura-holy.svg")),
    ("aura", "aura-none", include_str!("../assets/fragments/aura/aura-none.svg")),
    ("background", "background-midnight", include_str!("../assets/fragments/background/background-midnight.svg")),
    ("background", "background-mint", include_str!("../assets/fragments/background/background-mint.svg")),
    ("background", "background-sunset", include_str!("../assets/fragments/background/background-sunset.svg")),
    ("body", "body-angel", include_str!("../assets/fragments/body/body-angel.svg")),
    ("body", "body-ghost", include_str!("../assets/fragments/body/body-ghost.svg")),
    ("body", "body-plain", include_str!("../assets/fragments/body/body-plain.svg")),
    ("body", "body-robot", include_str!("../assets/fragments/body/body-robot.svg")),
    ("expression", "expression-blush", include_str!("../assets/fragments/expression/expression-blush.svg")),
    ("expression", "expression-neutral", include_str!("../assets/fragments/expression/expression-neutral.svg")),
    ("expression", "expression-tear", include_str!("../assets/fragments/expression/expression-tear.svg")),
    ("eyes", "eyes-laser", include_str!("../assets/fragments/eyes/eyes-laser.svg")),
    ("eyes", "eyes-plain", include_str!("../assets/fragments/eyes/eyes-plain.svg")),
    ("eyes", "eyes-sleepy", include_str!("../assets/fragments/eyes/eyes-sleepy.svg")),
    ("eyes", "eyes-star", include_str!("../assets/fragments/eyes/eyes-star.svg")),
    ("eyes", "eyes-wink", include_str!("../assets/fragments/eyes/eyes-wink.svg")),
    ("headgear", "headgear-cap", include_str!("../assets/fragments/headgear/headgear-cap.svg")),
    ("headgear", "headgear-crown", include_str!("../assets/fragments/headgear/headgear-crown.svg")),
    ("headgear", "headgear-headset", include_str!("../assets/fragments/headgear/headgear-headset.svg")),
    ("headgear", "headgear-none", include_str!("../assets/fragments/headgear/headgear-none.svg")),
    ("mouth", "mouth-flat", include_str!("../assets/fragments/mouth/mouth-flat.svg")),
    ("mouth", "mouth-grin", include_str!("../assets/fragments/mouth/mouth-grin.svg")),
    ("mouth", "mouth-smile", include_str!("../assets/fragments/mouth/mouth-smile.svg")),
];

/// Store serving the embedded fragments, used when no fragment directory exists
pub fn builtin_store() -> MemoryFragmentStore {
    let mut store = MemoryFragmentStore::new();
    for (category, asset, markup) in BUILTIN_FRAGMENTS {
        store.insert(category, asset, *markup);
    }
    log::debug!("Serving {} built-in fragments", store.len());
    store
}

/// Write the embedded fragments under `root`. Existing files are kept unless
/// `force` is set. Returns the number of files written.
pub fn write_fragments(root: &Path, force: bool) -> Result<usize> {
    let mut written = 0;
    for (category, asset, markup) in BUILTIN_FRAGMENTS {
        let dir = root.join(category);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(format!("{}.svg", asset));
        if path.exists() && !force {
            continue;
        }
        fs::write(&path, markup).with_context(|| format!("Failed to write {}", path.display()))?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{DirFragmentStore, FragmentStore};
    use crate::traits::TraitSet;
    use tempfile::tempdir;

    #[test]
    fn test_every_builtin_option_has_fragment() {
        let set = TraitSet::builtin().unwrap();
        let store = builtin_store();
        for (category, options) in &set.tables {
            for option in options {
                assert!(
                    store.fragment(category, &option.asset).is_some(),
                    "missing fragment {}/{}",
                    category,
                    option.asset
                );
            }
        }
        for (category, assets) in &set.defaults {
            for asset in assets {
                assert!(store.fragment(category, asset).is_some());
            }
        }
    }

    #[test]
    fn test_write_fragments() {
        let temp = tempdir().unwrap();
        let written = write_fragments(temp.path(), false).unwrap();
        assert_eq!(written, BUILTIN_FRAGMENTS.len());

        let store = DirFragmentStore::new(temp.path());
        assert!(store.fragment("eyes", "eyes-laser").is_some());

        // second pass keeps existing files
        assert_eq!(write_fragments(temp.path(), false).unwrap(), 0);
        assert_eq!(write_fragments(temp.path(), true).unwrap(), BUILTIN_FRAGMENTS.len());
    }
}

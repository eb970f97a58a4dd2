use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::compositor::raster::DEFAULT_MAX_SIZE;

/// Main fidframe configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub paths: PathsConfig,
    pub selector: SelectorConfig,
    pub canvas: CanvasConfig,
    pub raster: RasterConfig,
}

/// Log verbosity, overridden by RUST_LOG when set
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Trait tables, order and rules
    pub traits: PathBuf,
    /// Root of `<category>/<asset>.svg` fragments
    pub fragments: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Appended to the identifier before hashing. Changing it reshuffles every
    /// identifier's traits.
    pub salt: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// Solid fill painted under every layer
    pub background: Option<String>,
    pub label: LabelConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LabelConfig {
    pub enabled: bool,
    pub font_size: u32,
    pub font_family: String,
    pub fill: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Default edge length for `render`
    pub size: u32,
    /// Hard cap on either edge
    pub max_size: u32,
    /// Needed for the identifier label to show up in PNG output
    pub load_system_fonts: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let fidframe_dir = Config::fidframe_dir();

        Self {
            traits: fidframe_dir.join("traits.yaml"),
            fragments: fidframe_dir.join("fragments"),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            salt: "fidframe-v1".to_string(),
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            background: None,
            label: LabelConfig::default(),
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            font_size: 32,
            font_family: "monospace".to_string(),
            fill: "#ffffff".to_string(),
        }
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_MAX_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            load_system_fonts: true,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Check FIDFRAME_CONFIG env var
        if let Ok(env_path) = std::env::var("FIDFRAME_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from FIDFRAME_CONFIG: {}", e);
                    }
                }
            }
        }

        // Try FIDFRAME_DIR/fidframe.yaml
        if let Ok(dir) = std::env::var("FIDFRAME_DIR") {
            let path = PathBuf::from(dir).join("fidframe.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from FIDFRAME_DIR: {}", e);
                    }
                }
            }
        }

        // Try ~/.config/fidframe/fidframe.yaml
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("fidframe").join("fidframe.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./fidframe.yaml (for development)
        let local_config = PathBuf::from("fidframe.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            eyre::bail!(
                "canvas size must be non-zero, got {}x{}",
                self.canvas.width,
                self.canvas.height
            );
        }
        if self.raster.max_size == 0 {
            eyre::bail!("raster.max_size must be non-zero");
        }
        Ok(())
    }

    /// Directory holding fidframe.yaml, traits.yaml and fragments/
    pub fn fidframe_dir() -> PathBuf {
        std::env::var("FIDFRAME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("fidframe"))
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    pub fn traits_path(&self) -> PathBuf {
        Self::expand_path(&self.paths.traits)
    }

    pub fn fragments_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.canvas.width, 1024);
        assert_eq!(config.canvas.height, 1024);
        assert!(config.canvas.label.enabled);
        assert_eq!(config.raster.max_size, 1024);
        assert_eq!(config.selector.salt, "fidframe-v1");
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_default_paths() {
        let paths = PathsConfig::default();
        assert!(paths.traits.ends_with("traits.yaml"));
        assert!(paths.fragments.ends_with("fragments"));
    }

    #[test]
    fn test_expand_path_no_expansion() {
        let path = PathBuf::from("/usr/local/share");
        let expanded = Config::expand_path(&path);
        assert_eq!(expanded, PathBuf::from("/usr/local/share"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/fragments");
        let expanded = Config::expand_path(&path);
        assert!(!expanded.to_string_lossy().contains('~'));
        assert!(expanded.to_string_lossy().contains("fragments"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        // SAFETY: Test runs single-threaded, env var is test-specific
        unsafe {
            std::env::set_var("FIDFRAME_TEST_VAR", "/custom/path");
        }
        let path = PathBuf::from("$FIDFRAME_TEST_VAR/traits.yaml");
        let expanded = Config::expand_path(&path);
        assert_eq!(expanded, PathBuf::from("/custom/path/traits.yaml"));
        unsafe {
            std::env::remove_var("FIDFRAME_TEST_VAR");
        }
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r##"
log_level: debug
canvas:
  width: 512
  background: "#000000"
selector:
  salt: custom
"##;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.canvas.width, 512);
        assert_eq!(config.canvas.height, 1024);
        assert_eq!(config.canvas.background.as_deref(), Some("#000000"));
        assert_eq!(config.canvas.label.font_size, 32);
        assert_eq!(config.selector.salt, "custom");
        assert_eq!(config.raster.size, 1024);
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("fidframe.yaml");
        fs::write(&path, "raster:\n  size: 256\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.raster.size, 256);
    }

    #[test]
    fn test_load_rejects_zero_canvas() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("fidframe.yaml");
        fs::write(&path, "canvas:\n  width: 0\n").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let yaml_str = serde_yaml::to_string(&config).expect("Failed to serialize");
        let parsed: Config = serde_yaml::from_str(&yaml_str).expect("Failed to deserialize");
        assert_eq!(parsed.canvas, config.canvas);
        assert_eq!(parsed.selector.salt, config.selector.salt);
    }

    #[test]
    fn test_load_returns_config() {
        let result = Config::load(None);
        assert!(result.is_ok());
    }
}

//! # Configuration System
//!
//! Serde-backed configuration for the engine and its subsystems. Files are
//! read as TOML or RON depending on their extension.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging, frame stepping
//! - **Window Config**: surface size (drives the default camera aspect)
//! - **Render Config**: light budget, debug overlay, clear color
//! - **Asset Config**: asset root and fallback shaders

pub use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Load configuration from file, falling back to defaults when absent or invalid
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default configuration ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Semantically invalid value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Window Configuration
///
/// The window itself belongs to the platform layer; the engine only needs its
/// size to derive a default aspect ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Window title
    pub title: String,
}

impl WindowConfig {
    /// Width divided by height
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Force".to_string(),
        }
    }
}

/// # Render Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum number of lights uploaded per frame
    pub max_lights: usize,
    /// Draw wireframe boxes at lights and colliders after the main pass
    pub debug_overlay: bool,
    /// Framebuffer clear color (RGBA)
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_lights: 8,
            debug_overlay: false,
            clear_color: [0.1, 0.1, 0.1, 1.0],
        }
    }
}

/// # Asset Configuration
///
/// Configuration for asset lookup and fallback resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Base directory that relative asset paths are resolved against
    pub assets_dir: String,
    /// Vertex shader used by materials that declare no `SHADER`
    pub default_vertex_shader: String,
    /// Fragment shader used by materials that declare no `SHADER`
    pub default_fragment_shader: String,
}

impl AssetConfig {
    /// Create a new asset configuration
    pub fn new() -> Self {
        Self {
            assets_dir: ".".to_string(),
            default_vertex_shader: "assets/shaders/lit.vs".to_string(),
            default_fragment_shader: "assets/shaders/lit.fs".to_string(),
        }
    }

    /// Set assets directory
    pub fn with_assets_dir(mut self, dir: impl Into<String>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Resolve a path from a text file against the asset root
    pub fn resolve(&self, path: &str) -> std::path::PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            Path::new(&self.assets_dir).join(candidate)
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Engine Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine
    pub log_level: String,
    /// Fixed simulation step in seconds; wall-clock timing when `None`
    pub fixed_time_step: Option<f32>,
    /// Window configuration
    pub window: WindowConfig,
    /// Rendering configuration
    pub render: RenderConfig,
    /// Asset configuration
    pub assets: AssetConfig,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            fixed_time_step: None,
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            assets: AssetConfig::default(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Use a fixed time step
    pub fn with_fixed_time_step(mut self, step: f32) -> Self {
        self.fixed_time_step = Some(step);
        self
    }

    /// Enable or disable the debug overlay
    pub fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.render.debug_overlay = enabled;
        self
    }

    /// Set asset configuration
    pub fn with_assets(mut self, assets: AssetConfig) -> Self {
        self.assets = assets;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.max_lights == 0 {
            return Err(ConfigError::Invalid("max_lights must be at least 1".to_string()));
        }
        if let Some(step) = self.fixed_time_step {
            if step <= 0.0 || !step.is_finite() {
                return Err(ConfigError::Invalid(format!("fixed_time_step must be positive, got {step}")));
            }
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");

        let config = EngineConfig::new().with_log_level("debug").with_fixed_time_step(0.02);
        config.save_to_file(&path).unwrap();

        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.log_level, "debug");
        assert_eq!(loaded.fixed_time_step, Some(0.02));
        assert_eq!(loaded.render.max_lights, 8);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.ron");
        std::fs::write(&path, "(render: (debug_overlay: true))").unwrap();

        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert!(loaded.render.debug_overlay);
        assert_eq!(loaded.window.width, 800);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = EngineConfig::load_from_file("engine.ini").unwrap_err();
        // The file does not exist either; IO is checked first
        assert!(matches!(err, ConfigError::Io(_)));

        let err = EngineConfig::default().save_to_file("engine.ini").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_validate_rejects_zero_lights() {
        let mut config = EngineConfig::default();
        config.render.max_lights = 0;
        assert!(config.validate().is_err());
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_asset_resolve() {
        let assets = AssetConfig::new().with_assets_dir("data");
        assert_eq!(assets.resolve("models/bird.obj"), Path::new("data/models/bird.obj"));
    }
}

//! Window configuration loaded from TOML files

pub use serde::{Deserialize, Serialize};

use crate::video::VideoMode;
use crate::window::WindowStyle;

/// Result type for configuration loading and saving
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration trait for TOML-backed settings types
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a TOML file
    fn load_from_file(path: &str) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    fn save_to_file(&self, path: &str) -> ConfigResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
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
}

/// Startup settings for the main window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Client-area width in pixels
    pub width: u32,
    /// Client-area height in pixels
    pub height: u32,
    /// Color depth in bits per pixel
    pub bits_per_pixel: u32,
    /// Start in exclusive fullscreen
    pub fullscreen: bool,
    /// Whether held keys generate repeated press events
    pub key_repeat: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "prism".to_owned(),
            width: 1280,
            height: 720,
            bits_per_pixel: 32,
            fullscreen: false,
            key_repeat: true,
        }
    }
}

impl Config for WindowConfig {}

impl WindowConfig {
    /// The video mode these settings describe
    pub fn video_mode(&self) -> VideoMode {
        VideoMode::new(self.width, self.height, self.bits_per_pixel)
    }

    /// The window style these settings describe
    pub fn style(&self) -> WindowStyle {
        if self.fullscreen {
            WindowStyle::FULLSCREEN
        } else {
            WindowStyle::default()
        }
    }
}

//! Configuration system
//!
//! Tree parameters are plain serde structs that can be loaded from and
//! saved to TOML or RON files.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
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

    /// A parameter is outside its valid range
    #[error("Invalid parameter `{name}`: {reason}")]
    Invalid {
        /// Field name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Split-control parameters shared by every node of one tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Depth below which nodes are allowed to split (root is depth 0)
    pub max_depth: u32,

    /// Objects a node may hold locally before it splits
    pub max_objects: usize,

    /// Multiplier applied to each child's exact half extent (>= 1.0)
    pub loose_factor: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            max_objects: 8,
            loose_factor: 1.2,
        }
    }
}

impl OctreeConfig {
    /// Check the parameters for values the tree cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.loose_factor.is_finite() || self.loose_factor < 1.0 {
            return Err(ConfigError::Invalid {
                name: "loose_factor",
                reason: format!("must be finite and >= 1.0, got {}", self.loose_factor),
            });
        }
        if self.max_objects == 0 {
            return Err(ConfigError::Invalid {
                name: "max_objects",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Config for OctreeConfig {}

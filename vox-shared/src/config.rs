use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vox_lib::octree::Octree;

use crate::voxel::PhysicsVoxel;

/// Errors that can occur when loading or saving a [`CollisionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),
    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    Parse(#[source] ron::error::SpannedError),
    /// Failed to serialize the config to RON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),
    /// The config was parsed, but holds values that cannot be used.
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Edge length of a chunk in voxels.
    pub chunk_size: u16,
    /// Edge length of a single voxel in world units.
    pub voxel_scale: f32,
    /// Default filter for [`init_logging`](crate::logging::init_logging), overridden by `RUST_LOG`.
    pub log_level: String,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            chunk_size: 32,
            voxel_scale: 1.0,
            log_level: "info".to_string(),
        }
    }
}

impl CollisionConfig {
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(ron_str).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
            .map_err(ConfigError::Serialize)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_ron_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = u32::from(self.chunk_size);
        if size < 2 || size > Octree::<PhysicsVoxel>::MAX_SIZE || !size.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "chunk_size must be a power of two of at least 2, got {}",
                self.chunk_size
            )));
        }
        if !(self.voxel_scale > 0.0 && self.voxel_scale.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "voxel_scale must be positive, got {}",
                self.voxel_scale
            )));
        }
        Ok(())
    }

    pub fn chunk_size(&self) -> u32 {
        u32::from(self.chunk_size)
    }

    /// Installs the global log subscriber with [`CollisionConfig::log_level`] as its default filter.
    pub fn init_logging(&self) -> bool {
        crate::logging::init_logging(&self.log_level)
    }
}

//! `ocean.ron`: chunk grid and wave settings.

use std::error::Error;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use bevy::prelude::*;
use ocean_shared::water::{WavePreset, WaveSettings};
use ocean_shared::{ChunkSystemSettings, ConfigFolderPaths};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanConfig {
    pub chunks: ChunkSystemSettings,
    pub waves: WaveSettings,
}

impl OceanConfig {
    pub fn with_overrides(
        mut self,
        chunks_x: Option<i32>,
        chunks_z: Option<i32>,
        preset: Option<WavePreset>,
    ) -> Self {
        if let Some(chunks_x) = chunks_x {
            self.chunks.chunks_x = chunks_x;
        }
        if let Some(chunks_z) = chunks_z {
            self.chunks.chunks_z = chunks_z;
        }
        if let Some(preset) = preset {
            self.waves = preset.to_settings();
        }
        self
    }
}

fn read_config(path: &Path) -> Result<OceanConfig, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    Ok(ron::from_str(&content)?)
}

fn write_config(config: &OceanConfig, path: &Path) -> Result<(), Box<dyn Error>> {
    let pretty_config = PrettyConfig::new().with_depth_limit(4);
    let serialized = ron::ser::to_string_pretty(config, pretty_config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)?.write_all(serialized.as_bytes())?;
    Ok(())
}

/// Loads `ocean.ron`, creating it with defaults when absent. A malformed file
/// is reported and replaced by defaults in memory only.
pub fn load_ocean_config(paths: &ConfigFolderPaths) -> OceanConfig {
    let path = paths.settings_file();

    if !path.exists() {
        let config = OceanConfig::default();
        if let Err(e) = write_config(&config, &path) {
            error!("Failed to write default ocean config to {:?}: {}", path, e);
        }
        return config;
    }

    match read_config(&path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to read ocean config {:?}, using defaults: {}", path, e);
            OceanConfig::default()
        }
    }
}

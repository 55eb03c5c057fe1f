//! Chunk grid configuration.
//!
//! Settings are supplied by the host (file, CLI, tests) and treated as
//! immutable while the streamer runs. Anything that cannot be recovered
//! per tick is rejected up front by [`ChunkSystemSettings::validate`].

use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("chunk grid extent must be at least 1 with a representable area, got {chunks_x}x{chunks_z}")]
    GridExtent { chunks_x: i32, chunks_z: i32 },
    #[error("chunk resolution must be at least 1, got {0}")]
    Resolution(i32),
    #[error("chunk world size must be a positive finite number, got {0}")]
    WorldSize(f32),
    #[error("update interval must be a positive finite number of seconds, got {0}")]
    UpdateInterval(f32),
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkSystemSettings {
    /// Load window width, in chunks.
    pub chunks_x: i32,
    /// Load window depth, in chunks.
    pub chunks_z: i32,
    /// Quads per chunk edge. A chunk has `(chunk_resolution + 1)^2` vertices.
    pub chunk_resolution: i32,
    /// Edge length of one chunk in world units.
    pub chunk_world_size: f32,
    /// Per-tick load cap. Only honored when `enforce_chunk_budget` is set.
    pub max_chunks_per_tick: usize,
    pub enforce_chunk_budget: bool,
    /// Seconds between two periodic ticks.
    pub update_interval_secs: f32,
}

impl Default for ChunkSystemSettings {
    fn default() -> Self {
        Self {
            chunks_x: DEFAULT_CHUNKS_X,
            chunks_z: DEFAULT_CHUNKS_Z,
            chunk_resolution: DEFAULT_CHUNK_RESOLUTION,
            chunk_world_size: DEFAULT_CHUNK_WORLD_SIZE,
            max_chunks_per_tick: DEFAULT_MAX_CHUNKS_PER_TICK,
            enforce_chunk_budget: false,
            update_interval_secs: DEFAULT_UPDATE_INTERVAL_SECS,
        }
    }
}

impl ChunkSystemSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let extent_ok = self.chunks_x >= 1
            && self.chunks_z >= 1
            && self.chunks_x.checked_mul(self.chunks_z).is_some();
        if !extent_ok {
            return Err(SettingsError::GridExtent {
                chunks_x: self.chunks_x,
                chunks_z: self.chunks_z,
            });
        }
        if self.chunk_resolution < 1 {
            return Err(SettingsError::Resolution(self.chunk_resolution));
        }
        if !self.chunk_world_size.is_finite() || self.chunk_world_size <= 0.0 {
            return Err(SettingsError::WorldSize(self.chunk_world_size));
        }
        if !self.update_interval_secs.is_finite() || self.update_interval_secs <= 0.0 {
            return Err(SettingsError::UpdateInterval(self.update_interval_secs));
        }
        Ok(())
    }

    /// Number of containers created up front by the pool.
    pub fn prewarm_count(&self) -> usize {
        self.chunks_x.max(0) as usize * self.chunks_z.max(0) as usize
    }

    /// Per-tick load cap, or `None` when the cap is advisory.
    pub fn load_budget(&self) -> Option<usize> {
        self.enforce_chunk_budget.then_some(self.max_chunks_per_tick)
    }

    pub fn with_grid(mut self, chunks_x: i32, chunks_z: i32) -> Self {
        self.chunks_x = chunks_x;
        self.chunks_z = chunks_z;
        self
    }

    pub fn with_chunk_size(mut self, resolution: i32, world_size: f32) -> Self {
        self.chunk_resolution = resolution;
        self.chunk_world_size = world_size;
        self
    }
}

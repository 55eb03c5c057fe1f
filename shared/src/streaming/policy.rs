//! Load window and unload radius around the viewer.

use std::collections::HashSet;

use bevy::math::Vec3;

use crate::settings::ChunkSystemSettings;
use crate::world::{grid_distance, world_position_to_grid_coord, GridCoord};

/// Decides which cells enter and leave the loaded set.
///
/// The load window is the square `[-chunks_x / 2, chunks_x / 2] x
/// [-chunks_z / 2, chunks_z / 2]` around the viewer cell, inclusive on both
/// ends with truncating division, so even extents produce one extra row and
/// column. Loaded cells are evicted once their Euclidean distance to the
/// viewer cell exceeds `max(chunks_x, chunks_z) / 2 + 1`.
#[derive(Debug, Clone)]
pub struct LoadPolicy {
    chunks_x: i32,
    chunks_z: i32,
    world_size: f32,
    loaded: HashSet<GridCoord>,
}

impl LoadPolicy {
    pub fn new(settings: &ChunkSystemSettings) -> Self {
        Self {
            chunks_x: settings.chunks_x,
            chunks_z: settings.chunks_z,
            world_size: settings.chunk_world_size,
            loaded: HashSet::new(),
        }
    }

    pub fn viewer_coord(&self, viewer: Vec3) -> GridCoord {
        world_position_to_grid_coord(viewer, self.world_size)
    }

    pub fn unload_radius(&self) -> i32 {
        self.chunks_x.max(self.chunks_z) / 2
    }

    /// Every cell of the load window, X-major.
    pub fn window(&self, center: GridCoord) -> impl Iterator<Item = GridCoord> {
        let half_x = self.chunks_x / 2;
        let half_z = self.chunks_z / 2;
        (-half_x..=half_x)
            .flat_map(move |x| (-half_z..=half_z).map(move |z| center + GridCoord::new(x, z)))
    }

    /// Window cells around the viewer that are not loaded yet.
    pub fn compute_load_targets(&self, viewer: Vec3) -> Vec<GridCoord> {
        let center = self.viewer_coord(viewer);
        self.window(center)
            .filter(|coord| !self.loaded.contains(coord))
            .collect()
    }

    /// Loaded cells beyond the unload radius, sorted for deterministic order.
    pub fn compute_unload_targets(&self, viewer: Vec3) -> Vec<GridCoord> {
        let center = self.viewer_coord(viewer);
        let limit = (self.unload_radius() + 1) as f32;

        let mut targets: Vec<GridCoord> = self
            .loaded
            .iter()
            .copied()
            .filter(|coord| grid_distance(*coord, center) > limit)
            .collect();
        targets.sort_by_key(|coord| (coord.x, coord.y));
        targets
    }

    pub fn mark_loaded(&mut self, coord: GridCoord) {
        self.loaded.insert(coord);
    }

    pub fn mark_unloaded(&mut self, coord: GridCoord) {
        self.loaded.remove(&coord);
    }

    pub fn is_loaded(&self, coord: GridCoord) -> bool {
        self.loaded.contains(&coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn clear(&mut self) {
        self.loaded.clear();
    }
}

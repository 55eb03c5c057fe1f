//! Flat grid mesh generation for a single chunk.
//!
//! The grid spans `[0, world_size]` on X and Z at Y = 0, row-major along X,
//! with UVs mapped linearly to `[0, 1]`. Output depends on the inputs only.

use bevy::math::{Vec2, Vec3};

use super::ChunkGeometry;

pub fn grid_vertex_count(resolution: u32) -> usize {
    let side = resolution as usize + 1;
    side * side
}

pub fn grid_index_count(resolution: u32) -> usize {
    let quads = resolution as usize;
    quads * quads * 6
}

/// Generates the base grid for a chunk of `resolution` quads per edge.
pub fn generate_grid_mesh(resolution: u32, world_size: f32) -> ChunkGeometry {
    let mut geometry = ChunkGeometry::with_capacity(
        grid_vertex_count(resolution),
        grid_index_count(resolution),
    );
    fill_grid_mesh(&mut geometry, resolution, world_size);
    geometry
}

/// Overwrites `geometry` with the base grid, reusing its buffers.
pub fn fill_grid_mesh(geometry: &mut ChunkGeometry, resolution: u32, world_size: f32) {
    geometry.vertices.clear();
    geometry.indices.clear();
    geometry.uvs.clear();

    if resolution == 0 {
        return;
    }

    let step = world_size / resolution as f32;
    let inv_resolution = 1.0 / resolution as f32;

    for z in 0..=resolution {
        for x in 0..=resolution {
            geometry
                .vertices
                .push(Vec3::new(x as f32 * step, 0.0, z as f32 * step));
            geometry
                .uvs
                .push(Vec2::new(x as f32 * inv_resolution, z as f32 * inv_resolution));
        }
    }

    let row = resolution + 1;
    for z in 0..resolution {
        for x in 0..resolution {
            let bottom_left = z * row + x;
            let bottom_right = bottom_left + 1;
            let top_left = (z + 1) * row + x;
            let top_right = top_left + 1;

            geometry.indices.extend_from_slice(&[
                bottom_left,
                top_left,
                bottom_right,
                bottom_right,
                top_left,
                top_right,
            ]);
        }
    }
}

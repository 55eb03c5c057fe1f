use bevy::math::{IVec2, Vec3};

/// Integer (x, z) cell of the logical chunk grid.
pub type GridCoord = IVec2;

pub fn world_to_grid_coord(x: f32, world_size: f32) -> i32 {
    (x / world_size).floor() as i32
}

/// Grid cell containing a world-space position. Y is ignored.
pub fn world_position_to_grid_coord(position: Vec3, world_size: f32) -> GridCoord {
    GridCoord::new(
        world_to_grid_coord(position.x, world_size),
        world_to_grid_coord(position.z, world_size),
    )
}

/// World-space origin (minimum corner) of a chunk, at Y = 0.
pub fn grid_coord_to_world_origin(coord: GridCoord, world_size: f32) -> Vec3 {
    Vec3::new(
        coord.x as f32 * world_size,
        0.0,
        coord.y as f32 * world_size,
    )
}

pub fn grid_distance(a: GridCoord, b: GridCoord) -> f32 {
    (a - b).as_vec2().length()
}

/// Stable debug label used for render objects.
pub fn chunk_label(coord: GridCoord) -> String {
    format!("Chunk_{}_{}", coord.x, coord.y)
}

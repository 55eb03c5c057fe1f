//! CPU-side wave displacement for chunk meshes.
//!
//! Waves are a superposition of up to three sine components and only move
//! vertices vertically. The same formula is evaluated by the water shader
//! from the parameters pushed by [`WaveSettings::push_shader_parameters`].
//!
//! ```rust
//! use bevy::math::Vec2;
//! use ocean_shared::water::{compute_wave_height, WaveSettings};
//!
//! let height = compute_wave_height(Vec2::new(10.0, 5.0), 0.5, &WaveSettings::default());
//! assert!(height.is_finite());
//! ```

use bevy::math::Vec2;

use super::{WaveDescriptor, WaveSettings};
use crate::world::{Chunk, ChunkGeometry, GridCoord};

/// Height contributed by a single wave component.
///
/// # Arguments
/// * `pos` - World position (x, z)
/// * `wave` - Wave component
/// * `time` - Animation time (seconds)
/// * `settings` - Shared speed, amplitude and frequency
pub fn wave_component_height(
    pos: Vec2,
    wave: &WaveDescriptor,
    time: f32,
    settings: &WaveSettings,
) -> f32 {
    let speed = wave.speed_factor * settings.speed;
    let amplitude = wave.amplitude_factor * settings.amplitude;
    let phase = speed * settings.frequency;
    let theta = wave.direction.dot(pos) * settings.frequency + time * phase;

    amplitude * theta.sin()
}

/// Total wave height at a world position.
pub fn compute_wave_height(pos: Vec2, time: f32, settings: &WaveSettings) -> f32 {
    settings
        .active_waves()
        .map(|wave| wave_component_height(pos, wave, time, settings))
        .sum()
}

/// Overwrites the Y of every vertex with the wave height at its world
/// position. X, Z and the buffer allocation are left untouched.
pub fn displace_geometry(
    geometry: &mut ChunkGeometry,
    coord: GridCoord,
    world_size: f32,
    time: f32,
    settings: &WaveSettings,
) {
    let origin = coord.as_vec2() * world_size;

    for vertex in geometry.vertices.iter_mut() {
        let world_pos = origin + Vec2::new(vertex.x, vertex.z);
        vertex.y = compute_wave_height(world_pos, time, settings);
    }
}

/// Applies [`displace_geometry`] to a chunk at its current coordinate.
pub fn apply_wave_displacement<H>(
    chunk: &mut Chunk<H>,
    world_size: f32,
    time: f32,
    settings: &WaveSettings,
) {
    let coord = chunk.coord;
    displace_geometry(&mut chunk.geometry, coord, world_size, time, settings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::WavePreset;
    use crate::world::generate_grid_mesh;

    fn single_wave(amplitude: f32) -> WaveSettings {
        WaveSettings {
            speed: 1.0,
            amplitude,
            frequency: 1.0,
            steepness: 0.9,
            waves: vec![WaveDescriptor::new(1.0, 0.0, 0.0, 1.0)],
        }
    }

    #[test]
    fn single_wave_matches_closed_form() {
        let settings = single_wave(2.0);
        for pos in [Vec2::new(0.3, 0.0), Vec2::new(1.2, 7.0), Vec2::new(-4.0, 2.0)] {
            let expected = 2.0 * (pos.x * 1.0).sin();
            let height = compute_wave_height(pos, 0.0, &settings);
            assert!((height - expected).abs() < 1e-5, "at {pos}: {height} != {expected}");
        }
    }

    #[test]
    fn zero_speed_factor_freezes_the_wave() {
        let settings = single_wave(1.0);
        let pos = Vec2::new(0.7, 0.0);
        let h0 = compute_wave_height(pos, 0.0, &settings);
        let h1 = compute_wave_height(pos, 12.0, &settings);
        assert!((h0 - h1).abs() < 1e-6);
    }

    #[test]
    fn height_varies_with_time() {
        let settings = WavePreset::Ocean.to_settings();
        let pos = Vec2::new(3.0, 4.0);
        let h0 = compute_wave_height(pos, 0.0, &settings);
        let h1 = compute_wave_height(pos, 1.0, &settings);
        assert!((h0 - h1).abs() > 1e-3, "height should vary with time");
    }

    #[test]
    fn direction_is_not_normalized() {
        let mut settings = single_wave(1.0);
        settings.waves[0].direction = Vec2::new(2.0, 0.0);
        let pos = Vec2::new(0.4, 0.0);
        let height = compute_wave_height(pos, 0.0, &settings);
        assert!((height - (0.8f32).sin()).abs() < 1e-6);
    }

    #[test]
    fn still_water_is_flat() {
        let settings = WaveSettings::still();
        assert_eq!(compute_wave_height(Vec2::new(5.0, 5.0), 3.0, &settings), 0.0);
    }

    #[test]
    fn displacement_uses_chunk_world_position() {
        let settings = single_wave(1.0);
        let mut geometry = generate_grid_mesh(2, 10.0);
        displace_geometry(&mut geometry, GridCoord::new(1, 0), 10.0, 0.0, &settings);

        // Local (5, 0) in chunk (1, 0) is world x = 15.
        let expected = 15.0f32.sin();
        assert!((geometry.vertices[1].y - expected).abs() < 1e-5);
        assert_eq!(geometry.vertices[1].x, 5.0);
        assert_eq!(geometry.vertices[1].z, 0.0);
    }

    #[test]
    fn displacement_overwrites_in_place() {
        let settings = WavePreset::Storm.to_settings();
        let mut chunk: Chunk<()> = Chunk::detached(GridCoord::new(-3, 2));
        chunk.geometry = generate_grid_mesh(4, 8.0);
        let ptr = chunk.geometry.vertices.as_ptr();

        apply_wave_displacement(&mut chunk, 8.0, 1.5, &settings);
        let first = chunk.geometry.clone();
        apply_wave_displacement(&mut chunk, 8.0, 1.5, &settings);

        assert_eq!(chunk.geometry, first);
        assert_eq!(chunk.geometry.vertices.as_ptr(), ptr);
    }
}

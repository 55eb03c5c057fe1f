use crate::settings::ChunkSystemSettings;
use crate::water::{apply_wave_displacement, WaveSettings};
use crate::world::{fill_grid_mesh, Chunk, GridCoord};

/// Builds chunk geometry and animates it.
#[derive(Debug, Clone, Copy)]
pub struct ChunkGenerator {
    resolution: u32,
    world_size: f32,
}

impl ChunkGenerator {
    pub fn new(settings: &ChunkSystemSettings) -> Self {
        Self {
            resolution: settings.chunk_resolution.max(0) as u32,
            world_size: settings.chunk_world_size,
        }
    }

    /// A standalone, fully displaced chunk with no render object.
    pub fn build_chunk<H>(&self, coord: GridCoord, waves: &WaveSettings, time: f32) -> Chunk<H> {
        let mut chunk = Chunk::detached(coord);
        self.generate(&mut chunk, waves, time);
        chunk
    }

    /// Writes the base grid into the chunk buffers and displaces it once.
    pub fn generate<H>(&self, chunk: &mut Chunk<H>, waves: &WaveSettings, time: f32) {
        fill_grid_mesh(&mut chunk.geometry, self.resolution, self.world_size);
        apply_wave_displacement(chunk, self.world_size, time, waves);
    }

    /// Re-displaces existing geometry in place.
    ///
    /// Returns true if vertices changed and the renderer has to recompute
    /// normals and bounds; false if the chunk has no geometry yet.
    pub fn refresh_geometry<H>(&self, chunk: &mut Chunk<H>, waves: &WaveSettings, time: f32) -> bool {
        if !chunk.has_geometry() {
            return false;
        }
        apply_wave_displacement(chunk, self.world_size, time, waves);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::{compute_wave_height, WavePreset};
    use bevy::math::Vec2;

    fn generator() -> ChunkGenerator {
        ChunkGenerator::new(&ChunkSystemSettings::default().with_chunk_size(4, 8.0))
    }

    #[test]
    fn build_chunk_is_displaced() {
        let waves = WavePreset::Ocean.to_settings();
        let chunk: Chunk<()> = generator().build_chunk(GridCoord::new(2, -1), &waves, 0.75);

        assert_eq!(chunk.geometry.vertex_count(), 25);
        assert_eq!(chunk.geometry.indices.len(), 96);
        let last = *chunk.geometry.vertices.last().unwrap();
        let expected = compute_wave_height(Vec2::new(16.0 + 8.0, -8.0 + 8.0), 0.75, &waves);
        assert!((last.y - expected).abs() < 1e-5);
    }

    #[test]
    fn refresh_without_geometry_is_noop() {
        let waves = WaveSettings::default();
        let mut chunk: Chunk<()> = Chunk::detached(GridCoord::ZERO);
        assert!(!generator().refresh_geometry(&mut chunk, &waves, 1.0));
        assert!(!chunk.has_geometry());
    }

    #[test]
    fn refresh_tracks_time() {
        let waves = WavePreset::Storm.to_settings();
        let generator = generator();
        let mut chunk: Chunk<()> = generator.build_chunk(GridCoord::new(1, 1), &waves, 0.0);
        let before = chunk.geometry.clone();

        assert!(generator.refresh_geometry(&mut chunk, &waves, 2.0));
        assert_ne!(chunk.geometry.vertices, before.vertices);
        assert_eq!(chunk.geometry.indices, before.indices);
        assert_eq!(chunk.geometry.uvs, before.uvs);

        let rebuilt: Chunk<()> = generator.build_chunk(GridCoord::new(1, 1), &waves, 2.0);
        assert_eq!(chunk.geometry, rebuilt.geometry);
    }

    #[test]
    fn regenerate_reuses_buffers() {
        let waves = WaveSettings::default();
        let generator = generator();
        let mut chunk: Chunk<()> = generator.build_chunk(GridCoord::ZERO, &waves, 0.0);
        let ptr = chunk.geometry.vertices.as_ptr();

        chunk.coord = GridCoord::new(7, 7);
        generator.generate(&mut chunk, &waves, 0.0);
        assert_eq!(chunk.geometry.vertices.as_ptr(), ptr);
    }
}

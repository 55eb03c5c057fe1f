use bevy::math::{Vec2, Vec3};

use super::GridCoord;

/// Stable identity of a pooled container, independent of the grid cell it
/// currently represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub usize);

/// CPU-side geometry of one chunk.
///
/// Buffers are sized on first generation and only overwritten afterwards, so
/// a container keeps its allocation across every logical lifetime it serves.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChunkGeometry {
    /// Vertex positions, local to the chunk origin.
    pub vertices: Vec<Vec3>,
    /// Triangle list, 6 indices per quad.
    pub indices: Vec<u32>,
    pub uvs: Vec<Vec2>,
}

impl ChunkGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(index_count),
            uvs: Vec::with_capacity(vertex_count),
        }
    }

    /// Returns true if no geometry has been generated yet.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// One cell of the streamed grid together with the render object backing it.
///
/// `H` is the opaque render handle handed out by the renderer. It is `None`
/// when the renderer could not provide an object, or after teardown.
#[derive(Debug)]
pub struct Chunk<H> {
    pub id: ContainerId,
    pub coord: GridCoord,
    pub render: Option<H>,
    pub geometry: ChunkGeometry,
    pub active: bool,
}

impl<H> Chunk<H> {
    pub fn new(id: ContainerId, coord: GridCoord, render: Option<H>) -> Self {
        Self {
            id,
            coord,
            render,
            geometry: ChunkGeometry::new(),
            active: false,
        }
    }

    /// A chunk with no render object, e.g. for offline generation.
    pub fn detached(coord: GridCoord) -> Self {
        Self {
            id: ContainerId(usize::MAX),
            coord,
            render: None,
            geometry: ChunkGeometry::new(),
            active: true,
        }
    }

    pub fn has_geometry(&self) -> bool {
        !self.geometry.is_empty()
    }
}

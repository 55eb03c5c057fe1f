//! Seams between the streaming engine and the host renderer.

use bevy::math::{Vec3, Vec4};

use crate::world::ChunkGeometry;

/// Render-object and mesh-buffer collaborator.
///
/// The engine never looks inside a handle. Every call on a handle comes from
/// the pool or the streamer, which own the handle exclusively.
pub trait ChunkRenderer {
    type Handle;

    /// Creates an inactive render object. `None` when the renderer cannot
    /// provide one; the chunk then streams without a render object.
    fn create_object(&mut self, label: &str) -> Option<Self::Handle>;

    fn set_active(&mut self, handle: &mut Self::Handle, active: bool);

    fn set_position(&mut self, handle: &mut Self::Handle, position: Vec3);

    fn set_label(&mut self, _handle: &mut Self::Handle, _label: &str) {}

    /// Uploads the chunk geometry and recomputes normals and bounds. Called
    /// after every geometry mutation.
    fn upload_mesh(&mut self, handle: &mut Self::Handle, geometry: &ChunkGeometry);

    /// Binds the water material. Returns false if no material is available.
    fn apply_material(&mut self, handle: &mut Self::Handle) -> bool;

    fn destroy(&mut self, handle: Self::Handle);
}

/// Receives named shader parameters once per tick.
pub trait WaveParameterSink {
    fn set_float(&mut self, name: &str, value: f32);
    fn set_vector(&mut self, name: &str, value: Vec4);
}

/// No shader attached.
impl WaveParameterSink for () {
    fn set_float(&mut self, _name: &str, _value: f32) {}
    fn set_vector(&mut self, _name: &str, _value: Vec4) {}
}

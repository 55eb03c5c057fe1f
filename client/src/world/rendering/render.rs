use bevy::{
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        primitives::Aabb,
    },
};
use ocean_shared::world::ChunkGeometry;
use ocean_shared::ChunkRenderer;

/// Render-side state of one pooled chunk container.
#[derive(Debug, Clone)]
pub struct ChunkRenderHandle {
    pub entity: Entity,
    pub mesh: Option<Handle<Mesh>>,
}

/// Marker for chunk container entities.
#[derive(Component)]
pub struct WaterChunk;

fn build_mesh(geometry: &ChunkGeometry) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, Default::default());
    write_geometry(&mut mesh, geometry);
    mesh
}

fn write_geometry(mesh: &mut Mesh, geometry: &ChunkGeometry) {
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, geometry.vertices.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, geometry.uvs.clone());
    mesh.insert_indices(Indices::U32(geometry.indices.clone()));
    mesh.compute_normals();
}

/// Short-lived renderer built inside a system from its parameters.
///
/// Entity changes go through `Commands` and land at the next sync point.
pub struct BevyChunkRenderer<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    material: Option<Handle<StandardMaterial>>,
}

impl<'a, 'w, 's> BevyChunkRenderer<'a, 'w, 's> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        meshes: &'a mut Assets<Mesh>,
        material: Option<Handle<StandardMaterial>>,
    ) -> Self {
        Self {
            commands,
            meshes,
            material,
        }
    }
}

impl ChunkRenderer for BevyChunkRenderer<'_, '_, '_> {
    type Handle = ChunkRenderHandle;

    fn create_object(&mut self, label: &str) -> Option<ChunkRenderHandle> {
        let entity = self
            .commands
            .spawn((
                WaterChunk,
                Name::new(label.to_string()),
                Transform::default(),
                Visibility::Hidden,
            ))
            .id();
        Some(ChunkRenderHandle { entity, mesh: None })
    }

    fn set_active(&mut self, handle: &mut ChunkRenderHandle, active: bool) {
        let visibility = if active {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        self.commands.entity(handle.entity).insert(visibility);
    }

    fn set_position(&mut self, handle: &mut ChunkRenderHandle, position: Vec3) {
        self.commands
            .entity(handle.entity)
            .insert(Transform::from_translation(position));
    }

    fn set_label(&mut self, handle: &mut ChunkRenderHandle, label: &str) {
        self.commands
            .entity(handle.entity)
            .insert(Name::new(label.to_string()));
    }

    fn upload_mesh(&mut self, handle: &mut ChunkRenderHandle, geometry: &ChunkGeometry) {
        let existing = handle
            .mesh
            .as_ref()
            .and_then(|mesh| self.meshes.get_mut(mesh));

        match existing {
            Some(mesh) => write_geometry(mesh, geometry),
            None => {
                let mesh = self.meshes.add(build_mesh(geometry));
                self.commands
                    .entity(handle.entity)
                    .insert(Mesh3d(mesh.clone()));
                handle.mesh = Some(mesh);
            }
        }

        // Bounds are only computed for entities without one.
        self.commands.entity(handle.entity).remove::<Aabb>();
    }

    fn apply_material(&mut self, handle: &mut ChunkRenderHandle) -> bool {
        let Some(material) = self.material.clone() else {
            return false;
        };
        self.commands
            .entity(handle.entity)
            .insert(MeshMaterial3d(material));
        true
    }

    fn destroy(&mut self, handle: ChunkRenderHandle) {
        self.commands.entity(handle.entity).despawn();
        if let Some(mesh) = handle.mesh {
            self.meshes.remove(&mesh);
        }
    }
}

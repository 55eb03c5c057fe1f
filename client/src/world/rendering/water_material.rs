//! Shared water material for every chunk.

use bevy::prelude::*;

use crate::shaders::WaveUniforms;

const SHALLOW_COLOR: Color = Color::srgba(0.2, 0.5, 0.8, 0.7);

/// Creates the water material: translucent, double sided, glossy.
pub fn create_water_material() -> StandardMaterial {
    StandardMaterial {
        base_color: SHALLOW_COLOR,
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.1,
        reflectance: 0.5,
        cull_mode: None, // Render both sides for underwater visibility
        double_sided: true,
        ..default()
    }
}

/// Resource holding the shared water material handle.
///
/// Chunks share a single material to reduce draw calls.
#[derive(Resource)]
pub struct WaterMaterialResource {
    pub handle: Handle<StandardMaterial>,
}

pub fn setup_water_material(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let handle = materials.add(create_water_material());
    commands.insert_resource(WaterMaterialResource { handle });
    info!("Water material initialized");
}

/// Rougher, more opaque water as the sea gets steeper.
pub fn roughness_for(uniforms: &WaveUniforms) -> f32 {
    0.05 + 0.4 * uniforms.wave_steepness.clamp(0.0, 1.0)
}

pub fn alpha_for(uniforms: &WaveUniforms) -> f32 {
    0.6 + 0.3 * uniforms.wave_steepness.clamp(0.0, 1.0)
}

/// Follows the wave uniforms. The material asset is only mutated when its
/// roughness or color differ.
pub fn sync_water_material_system(
    uniforms: Res<WaveUniforms>,
    material: Option<Res<WaterMaterialResource>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !uniforms.is_changed() {
        return;
    }
    let Some(material) = material else {
        return;
    };
    let roughness = roughness_for(&uniforms);
    let color = SHALLOW_COLOR.with_alpha(alpha_for(&uniforms));
    let up_to_date = materials
        .get(&material.handle)
        .is_none_or(|water| water.perceptual_roughness == roughness && water.base_color == color);
    if up_to_date {
        return;
    }
    if let Some(water) = materials.get_mut(&material.handle) {
        water.perceptual_roughness = roughness;
        water.base_color = color;
    }
}

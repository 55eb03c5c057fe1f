use crate::shaders::WaveUniforms;
use crate::world::{ActivePreset, OceanStreamer, StreamingStats};
use bevy::prelude::*;

#[derive(Component)]
pub struct ChunksNumberText;

#[derive(Component)]
pub struct PoolText;

#[derive(Component)]
pub struct ViewerCellText;

#[derive(Component)]
pub struct WavesText;

pub fn chunks_text_update_system(
    query: Query<Entity, With<ChunksNumberText>>,
    mut writer: TextUiWriter,
    streamer: Res<OceanStreamer>,
    stats: Res<StreamingStats>,
) {
    for entity in query.iter() {
        let state = if streamer.0.is_running() { "" } else { " (paused)" };
        *writer.text(entity, 0) = format!(
            "Loaded chunks: {}{} | last tick +{} -{} ~{} deferred {}",
            streamer.0.loaded_count(),
            state,
            stats.last.created.len(),
            stats.last.removed.len(),
            stats.last.refreshed,
            stats.last.deferred
        );
    }
}

pub fn pool_text_update_system(
    query: Query<Entity, With<PoolText>>,
    mut writer: TextUiWriter,
    streamer: Res<OceanStreamer>,
) {
    let pool = streamer.0.pool();
    for entity in query.iter() {
        *writer.text(entity, 0) = format!(
            "Pool: {} active, {} reserve, {} created",
            pool.active_count(),
            pool.reserve_count(),
            pool.created_count()
        );
    }
}

pub fn viewer_text_update_system(
    query: Query<Entity, With<ViewerCellText>>,
    mut writer: TextUiWriter,
    streamer: Res<OceanStreamer>,
) {
    let Some(cell) = streamer.0.viewer_chunk() else {
        return;
    };
    for entity in query.iter() {
        *writer.text(entity, 0) = format!("Viewer cell: {} {}", cell.x, cell.y);
    }
}

pub fn waves_text_update_system(
    query: Query<Entity, With<WavesText>>,
    mut writer: TextUiWriter,
    uniforms: Res<WaveUniforms>,
    preset: Res<ActivePreset>,
) {
    let name = match preset.0 {
        Some(preset) => format!("{:?}", preset),
        None => "custom".to_string(),
    };
    for entity in query.iter() {
        *writer.text(entity, 0) = format!(
            "Waves: {} | amplitude {:.2} frequency {:.2} steepness {:.2}",
            name, uniforms.wave_amplitude, uniforms.wave_frequency, uniforms.wave_steepness
        );
    }
}

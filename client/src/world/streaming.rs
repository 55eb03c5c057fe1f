//! Hosts the chunk streamer inside the Bevy app.

use bevy::prelude::*;
use ocean_shared::streaming::{ChunkStreamer, TickReport};
use ocean_shared::water::WavePreset;
use ocean_shared::world::{grid_coord_to_world_origin, GridCoord};

use crate::config::OceanConfig;
use crate::input::data::{KeyMap, ViewerAction};
use crate::input::keyboard::is_action_just_pressed;
use crate::shaders::WaveUniforms;
use crate::viewer::StreamingViewer;

use super::rendering::{
    setup_water_material, sync_water_material_system, BevyChunkRenderer, ChunkRenderHandle,
    WaterMaterialResource,
};

#[derive(Resource)]
pub struct OceanStreamer(pub ChunkStreamer<ChunkRenderHandle>);

/// Preset currently applied, `None` while the waves come from `ocean.ron`.
#[derive(Resource, Debug, Default)]
pub struct ActivePreset(pub Option<WavePreset>);

/// Last tick outcome and running totals for the HUD.
#[derive(Resource, Debug, Default)]
pub struct StreamingStats {
    pub last: TickReport,
    pub ticks: u64,
    pub total_created: usize,
    pub total_removed: usize,
}

impl StreamingStats {
    fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.total_created += report.created.len();
        self.total_removed += report.removed.len();
        self.last = report.clone();
    }
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ChunkSpawned {
    pub coord: GridCoord,
    pub origin: Vec3,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ChunkDespawned {
    pub coord: GridCoord,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ViewerCellChanged {
    pub coord: GridCoord,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum StreamingSet {
    Controls,
    Tick,
}

pub struct StreamingPlugin;

impl Plugin for StreamingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveUniforms>()
            .init_resource::<StreamingStats>()
            .init_resource::<ActivePreset>()
            .add_event::<ChunkSpawned>()
            .add_event::<ChunkDespawned>()
            .add_event::<ViewerCellChanged>()
            .configure_sets(Update, (StreamingSet::Controls, StreamingSet::Tick).chain())
            .add_systems(
                Startup,
                (setup_water_material, setup_streamer_system).chain(),
            )
            .add_systems(
                Update,
                (
                    streaming_controls_system.in_set(StreamingSet::Controls),
                    chunk_tick_system.in_set(StreamingSet::Tick),
                    sync_water_material_system.after(StreamingSet::Tick),
                ),
            )
            .add_systems(Last, cleanup_on_exit_system);
    }
}

pub fn setup_streamer_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut streamer: ResMut<OceanStreamer>,
    mut uniforms: ResMut<WaveUniforms>,
    material: Option<Res<WaterMaterialResource>>,
) {
    let material = material.map(|material| material.handle.clone());
    let mut renderer = BevyChunkRenderer::new(&mut commands, &mut meshes, material);
    streamer.0.initialize(&mut renderer, &mut *uniforms);
}

pub fn chunk_tick_system(
    time: Res<Time>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut streamer: ResMut<OceanStreamer>,
    mut uniforms: ResMut<WaveUniforms>,
    mut stats: ResMut<StreamingStats>,
    material: Option<Res<WaterMaterialResource>>,
    viewer: Query<&Transform, With<StreamingViewer>>,
    mut ev_spawned: EventWriter<ChunkSpawned>,
    mut ev_despawned: EventWriter<ChunkDespawned>,
    mut ev_viewer: EventWriter<ViewerCellChanged>,
) {
    // Nothing is borrowed mutably between ticks.
    if !streamer.0.poll_tick(time.delta()) {
        return;
    }
    let Ok(viewer) = viewer.single() else {
        debug!("No viewer, skipping chunk tick");
        return;
    };

    let previous_cell = streamer.0.viewer_chunk();
    let material = material.map(|material| material.handle.clone());
    let mut renderer = BevyChunkRenderer::new(&mut commands, &mut meshes, material);
    let mut pushed = uniforms.clone();
    let report = streamer.0.update_system(
        viewer.translation,
        time.elapsed_secs(),
        &mut renderer,
        &mut pushed,
    );
    uniforms.set_if_neq(pushed);

    if previous_cell != Some(report.viewer_chunk) {
        ev_viewer.write(ViewerCellChanged {
            coord: report.viewer_chunk,
        });
    }
    let world_size = streamer.0.settings().chunk_world_size;
    for coord in &report.created {
        ev_spawned.write(ChunkSpawned {
            coord: *coord,
            origin: grid_coord_to_world_origin(*coord, world_size),
        });
    }
    for coord in &report.removed {
        ev_despawned.write(ChunkDespawned { coord: *coord });
    }

    stats.record(&report);
}

pub fn streaming_controls_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    config: Res<OceanConfig>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut streamer: ResMut<OceanStreamer>,
    mut uniforms: ResMut<WaveUniforms>,
    mut preset: ResMut<ActivePreset>,
    material: Option<Res<WaterMaterialResource>>,
) {
    if is_action_just_pressed(ViewerAction::ToggleStreaming, &keyboard_input, &key_map) {
        let running = !streamer.0.is_running();
        streamer.0.set_running(running);
        info!("Chunk streaming {}", if running { "resumed" } else { "paused" });
    }

    if is_action_just_pressed(ViewerAction::CycleWavePreset, &keyboard_input, &key_map) {
        let next = preset.0.unwrap_or_default().next();
        preset.0 = Some(next);
        streamer.0.set_wave_parameters(next.to_settings(), &mut *uniforms);
        info!("Wave preset: {:?}", next);
    }

    if is_action_just_pressed(ViewerAction::ReloadChunks, &keyboard_input, &key_map) {
        let material = material.map(|material| material.handle.clone());
        let mut renderer = BevyChunkRenderer::new(&mut commands, &mut meshes, material);
        streamer.0.cleanup(&mut renderer);
        if preset.0.is_none() {
            streamer.0.set_wave_parameters(config.waves.clone(), &mut *uniforms);
        }
        streamer.0.initialize(&mut renderer, &mut *uniforms);
        info!("Reloaded all chunks");
    }
}

pub fn cleanup_on_exit_system(
    mut exit_events: EventReader<AppExit>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut streamer: ResMut<OceanStreamer>,
) {
    if exit_events.read().next().is_none() {
        return;
    }
    let mut renderer = BevyChunkRenderer::new(&mut commands, &mut meshes, None);
    streamer.0.cleanup(&mut renderer);
}

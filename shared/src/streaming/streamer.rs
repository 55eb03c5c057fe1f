//! Per-tick orchestration of pool, policy and generator.

use std::collections::HashSet;
use std::time::Duration;

use bevy::math::Vec3;
use bevy_log::{debug, info, warn};

use super::events::{global, ChunkEventBus, GlobalChunkEvent};
use super::{ChunkGenerator, ChunkPool, ChunkRenderer, LoadPolicy, TickScheduler, WaveParameterSink};
use crate::settings::{ChunkSystemSettings, SettingsError};
use crate::water::WaveSettings;
use crate::world::{grid_coord_to_world_origin, grid_distance, Chunk, GridCoord};

/// Step of the tick currently executing. Back to `Idle` between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPhase {
    #[default]
    Idle,
    Diffing,
    Loading,
    Unloading,
    Refreshing,
}

/// What one tick changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub viewer_chunk: GridCoord,
    /// Newly loaded cells, in load order.
    pub created: Vec<GridCoord>,
    /// Evicted cells, in unload order.
    pub removed: Vec<GridCoord>,
    /// Chunks whose geometry was re-displaced.
    pub refreshed: usize,
    /// Load targets postponed by the per-tick budget.
    pub deferred: usize,
}

impl TickReport {
    /// Returns true if no chunk entered or left the loaded set.
    pub fn is_steady(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty()
    }
}

/// Streams water chunks around a moving viewer.
///
/// Every tick pushes the wave parameters, loads the window cells that are
/// missing, evicts the cells outside the unload radius and re-displaces the
/// geometry of every loaded chunk, in that order.
pub struct ChunkStreamer<H> {
    settings: ChunkSystemSettings,
    waves: WaveSettings,
    pool: ChunkPool<H>,
    policy: LoadPolicy,
    generator: ChunkGenerator,
    loaded: HashSet<GridCoord>,
    events: ChunkEventBus<H>,
    scheduler: TickScheduler,
    phase: TickPhase,
    viewer_chunk: Option<GridCoord>,
    initialized: bool,
}

impl<H> ChunkStreamer<H> {
    pub fn new(settings: ChunkSystemSettings, waves: WaveSettings) -> Result<Self, SettingsError> {
        settings.validate()?;

        Ok(Self {
            pool: ChunkPool::new(settings.chunk_world_size),
            policy: LoadPolicy::new(&settings),
            generator: ChunkGenerator::new(&settings),
            scheduler: TickScheduler::new(settings.update_interval_secs),
            loaded: HashSet::new(),
            events: ChunkEventBus::new(),
            phase: TickPhase::Idle,
            viewer_chunk: None,
            initialized: false,
            settings,
            waves,
        })
    }

    /// Prewarms the pool, opens the global channel, pushes the wave
    /// parameters and starts the periodic tick. No-op when already running.
    pub fn initialize<R, S>(&mut self, renderer: &mut R, sink: &mut S)
    where
        R: ChunkRenderer<Handle = H>,
        S: WaveParameterSink + ?Sized,
    {
        if self.initialized {
            debug!("Chunk streamer already initialized");
            return;
        }

        self.pool.prewarm(self.settings.prewarm_count(), renderer);
        global::init();
        self.waves.push_shader_parameters(sink);
        self.scheduler.start();
        self.initialized = true;

        info!(
            "Chunk streamer initialized: {}x{} chunks, resolution {}, size {}",
            self.settings.chunks_x,
            self.settings.chunks_z,
            self.settings.chunk_resolution,
            self.settings.chunk_world_size
        );
    }

    /// Advances the periodic scheduler by one frame. Returns true when the
    /// host should run [`update_system`](Self::update_system).
    pub fn poll_tick(&mut self, delta: Duration) -> bool {
        self.scheduler.advance(delta)
    }

    /// Runs one full tick immediately.
    pub fn update_system<R, S>(
        &mut self,
        viewer: Vec3,
        time: f32,
        renderer: &mut R,
        sink: &mut S,
    ) -> TickReport
    where
        R: ChunkRenderer<Handle = H>,
        S: WaveParameterSink + ?Sized,
    {
        self.waves.push_shader_parameters(sink);
        self.update_chunks(viewer, time, renderer)
    }

    /// Load, unload and refresh pass without touching shader parameters.
    pub fn update_chunks<R>(&mut self, viewer: Vec3, time: f32, renderer: &mut R) -> TickReport
    where
        R: ChunkRenderer<Handle = H>,
    {
        self.phase = TickPhase::Diffing;
        let center = self.policy.viewer_coord(viewer);
        let mut report = TickReport {
            viewer_chunk: center,
            ..Default::default()
        };

        if self.viewer_chunk != Some(center) {
            self.viewer_chunk = Some(center);
            self.events.emit_viewer_chunk_changed(center);
            global::publish(GlobalChunkEvent::ViewerChunkChanged { coord: center });
        }

        let mut to_load: Vec<GridCoord> = self
            .policy
            .compute_load_targets(viewer)
            .into_iter()
            .filter(|coord| !self.loaded.contains(coord))
            .collect();

        if let Some(budget) = self.settings.load_budget() {
            if to_load.len() > budget {
                // stable sort keeps window order between equidistant cells
                to_load.sort_by(|a, b| {
                    grid_distance(*a, center).total_cmp(&grid_distance(*b, center))
                });
                report.deferred = to_load.len() - budget;
                to_load.truncate(budget);
            }
        }

        self.phase = TickPhase::Loading;
        for coord in to_load {
            self.load_chunk(coord, time, renderer);
            report.created.push(coord);
        }

        self.phase = TickPhase::Unloading;
        for coord in self.policy.compute_unload_targets(viewer) {
            if self.loaded.contains(&coord) {
                self.unload_chunk(coord, renderer);
                report.removed.push(coord);
            }
        }

        self.phase = TickPhase::Refreshing;
        report.refreshed = self.refresh_loaded(time, renderer);

        self.phase = TickPhase::Idle;
        report
    }

    /// Replaces the wave configuration and pushes it to the shader.
    pub fn set_wave_parameters<S>(&mut self, waves: WaveSettings, sink: &mut S)
    where
        S: WaveParameterSink + ?Sized,
    {
        self.waves = waves;
        self.waves.push_shader_parameters(sink);
        info!(
            "Wave parameters updated: amplitude {}, frequency {}, {} components",
            self.waves.amplitude,
            self.waves.frequency,
            self.waves.active_waves().count()
        );
    }

    /// Stops ticking and releases every render object. Instance subscribers
    /// are dropped and this streamer's reference on the global channel is
    /// released. Safe to call repeatedly.
    pub fn cleanup<R>(&mut self, renderer: &mut R)
    where
        R: ChunkRenderer<Handle = H>,
    {
        self.scheduler.stop();
        self.pool.teardown(renderer);
        self.policy.clear();
        self.loaded.clear();
        self.events.clear();
        self.viewer_chunk = None;
        self.phase = TickPhase::Idle;

        if self.initialized {
            self.initialized = false;
            global::release();
            info!("Chunk streamer cleaned up");
        }
    }

    pub fn settings(&self) -> &ChunkSystemSettings {
        &self.settings
    }

    pub fn waves(&self) -> &WaveSettings {
        &self.waves
    }

    pub fn pool(&self) -> &ChunkPool<H> {
        &self.pool
    }

    pub fn events_mut(&mut self) -> &mut ChunkEventBus<H> {
        &mut self.events
    }

    pub fn chunk(&self, coord: GridCoord) -> Option<&Chunk<H>> {
        self.pool.get(coord)
    }

    pub fn is_loaded(&self, coord: GridCoord) -> bool {
        self.loaded.contains(&coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Loaded cells sorted by (x, z).
    pub fn loaded_coords(&self) -> Vec<GridCoord> {
        let mut coords: Vec<GridCoord> = self.loaded.iter().copied().collect();
        coords.sort_by_key(|coord| (coord.x, coord.y));
        coords
    }

    pub fn viewer_chunk(&self) -> Option<GridCoord> {
        self.viewer_chunk
    }

    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Pauses or resumes the periodic tick. Loaded chunks stay loaded.
    pub fn set_running(&mut self, running: bool) {
        if running && self.initialized {
            self.scheduler.start();
        } else if !running {
            self.scheduler.stop();
        }
    }

    fn load_chunk<R>(&mut self, coord: GridCoord, time: f32, renderer: &mut R)
    where
        R: ChunkRenderer<Handle = H>,
    {
        let chunk = self.pool.acquire(coord, renderer);

        if !chunk.has_geometry() {
            self.generator.generate(chunk, &self.waves, time);
            if let Some(handle) = chunk.render.as_mut() {
                renderer.upload_mesh(handle, &chunk.geometry);
            }
        }

        if let Some(handle) = chunk.render.as_mut() {
            if !renderer.apply_material(handle) {
                warn!("No water material for chunk {:?}", coord);
            }
        }

        let container = chunk.id;
        self.events.emit_chunk_created(chunk);
        global::publish(GlobalChunkEvent::Created {
            coord,
            origin: grid_coord_to_world_origin(coord, self.settings.chunk_world_size),
            container,
        });

        self.policy.mark_loaded(coord);
        self.loaded.insert(coord);
        debug!("Loaded chunk {:?} into container {}", coord, container.0);
    }

    fn unload_chunk<R>(&mut self, coord: GridCoord, renderer: &mut R)
    where
        R: ChunkRenderer<Handle = H>,
    {
        self.pool.release(coord, renderer);
        self.events.emit_chunk_removed(coord);
        global::publish(GlobalChunkEvent::Removed { coord });

        self.policy.mark_unloaded(coord);
        self.loaded.remove(&coord);
        debug!("Unloaded chunk {:?}", coord);
    }

    fn refresh_loaded<R>(&mut self, time: f32, renderer: &mut R) -> usize
    where
        R: ChunkRenderer<Handle = H>,
    {
        let mut refreshed = 0;
        for coord in self.loaded.iter() {
            let Some(chunk) = self.pool.get_mut(*coord) else {
                continue;
            };
            if !chunk.active {
                continue;
            }
            if self.generator.refresh_geometry(chunk, &self.waves, time) {
                if let Some(handle) = chunk.render.as_mut() {
                    renderer.upload_mesh(handle, &chunk.geometry);
                }
                refreshed += 1;
            }
        }
        refreshed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::pool::tests::TableRenderer;
    use crate::water::WavePreset;
    use std::sync::{Arc, Mutex};

    fn streamer(settings: ChunkSystemSettings) -> ChunkStreamer<u32> {
        ChunkStreamer::new(settings, WavePreset::Calm.to_settings()).unwrap()
    }

    fn renderer() -> TableRenderer {
        TableRenderer {
            has_material: true,
            ..Default::default()
        }
    }

    #[test]
    fn malformed_settings_fail_fast() {
        let settings = ChunkSystemSettings::default().with_chunk_size(0, 10.0);
        let result = ChunkStreamer::<u32>::new(settings, WaveSettings::default());
        assert!(matches!(result, Err(SettingsError::Resolution(0))));

        let settings = ChunkSystemSettings::default().with_chunk_size(4, -1.0);
        assert!(ChunkStreamer::<u32>::new(settings, WaveSettings::default()).is_err());
    }

    #[test]
    fn first_tick_loads_window_from_prewarmed_pool() {
        let _guard = global::test_guard();
        let mut renderer = renderer();
        let mut streamer = streamer(ChunkSystemSettings::default());
        streamer.initialize(&mut renderer, &mut ());

        let report = streamer.update_system(Vec3::ZERO, 0.0, &mut renderer, &mut ());

        assert_eq!(report.created.len(), 9);
        assert!(report.removed.is_empty());
        assert_eq!(report.refreshed, 9);
        assert_eq!(streamer.loaded_count(), 9);
        assert_eq!(streamer.pool().created_count(), 9);
        assert_eq!(streamer.pool().reserve_count(), 0);
        assert!(renderer.objects.values().all(|object| object.material));
        assert_eq!(streamer.phase(), TickPhase::Idle);

        streamer.cleanup(&mut renderer);
    }

    #[test]
    fn steady_tick_only_refreshes() {
        let _guard = global::test_guard();
        let mut renderer = renderer();
        let mut streamer = streamer(ChunkSystemSettings::default());
        streamer.initialize(&mut renderer, &mut ());
        streamer.update_system(Vec3::ZERO, 0.0, &mut renderer, &mut ());

        let report = streamer.update_system(Vec3::new(4.0, 0.0, 4.0), 0.5, &mut renderer, &mut ());
        assert!(report.is_steady());
        assert_eq!(report.refreshed, 9);
        // one upload on generation, one per refresh
        assert!(renderer.objects.values().all(|object| object.uploads == 3));

        streamer.cleanup(&mut renderer);
    }

    #[test]
    fn moving_viewer_reuses_containers() {
        let _guard = global::test_guard();
        let mut renderer = renderer();
        let mut streamer = streamer(ChunkSystemSettings::default());
        streamer.initialize(&mut renderer, &mut ());
        streamer.update_system(Vec3::ZERO, 0.0, &mut renderer, &mut ());

        // three cells east: the new window is created before eviction, so
        // the pool overflows once
        let report = streamer.update_system(Vec3::new(35.0, 0.0, 0.0), 1.0, &mut renderer, &mut ());
        assert_eq!(report.viewer_chunk, GridCoord::new(3, 0));
        assert_eq!(report.created.len(), 9);
        assert_eq!(report.removed.len(), 8);
        assert!(!report.removed.contains(&GridCoord::new(1, 0)));
        assert_eq!(streamer.pool().created_count(), 18);
        assert_eq!(streamer.pool().reserve_count(), 8);

        // eight released containers are reused, one more is created
        let report = streamer.update_system(Vec3::new(65.0, 0.0, 0.0), 2.0, &mut renderer, &mut ());
        assert_eq!(report.created.len(), 9);
        assert_eq!(streamer.pool().created_count(), 19);

        streamer.cleanup(&mut renderer);
    }

    #[test]
    fn unknown_coordinate_is_not_unloaded_twice() {
        let _guard = global::test_guard();
        let mut renderer = renderer();
        let mut streamer = streamer(ChunkSystemSettings::default());
        streamer.initialize(&mut renderer, &mut ());
        streamer.update_system(Vec3::ZERO, 0.0, &mut renderer, &mut ());

        let far = Vec3::new(500.0, 0.0, 500.0);
        let report = streamer.update_system(far, 0.0, &mut renderer, &mut ());
        assert_eq!(report.removed.len(), 9);
        let report = streamer.update_system(far, 0.0, &mut renderer, &mut ());
        assert!(report.removed.is_empty());
        assert_eq!(streamer.loaded_count(), 9);

        streamer.cleanup(&mut renderer);
    }

    #[test]
    fn budget_loads_nearest_first_and_defers_rest() {
        let _guard = global::test_guard();
        let mut renderer = renderer();
        let settings = ChunkSystemSettings {
            enforce_chunk_budget: true,
            max_chunks_per_tick: 4,
            ..Default::default()
        };
        let mut streamer = streamer(settings);
        streamer.initialize(&mut renderer, &mut ());

        let report = streamer.update_system(Vec3::ZERO, 0.0, &mut renderer, &mut ());
        assert_eq!(report.created.len(), 4);
        assert_eq!(report.deferred, 5);
        assert_eq!(report.created[0], GridCoord::ZERO);
        for coord in &report.created[1..] {
            assert_eq!(grid_distance(*coord, GridCoord::ZERO), 1.0);
        }

        let report = streamer.update_system(Vec3::ZERO, 0.1, &mut renderer, &mut ());
        assert_eq!(report.created.len(), 4);
        assert_eq!(report.deferred, 1);
        let report = streamer.update_system(Vec3::ZERO, 0.2, &mut renderer, &mut ());
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.deferred, 0);
        assert_eq!(streamer.loaded_count(), 9);

        streamer.cleanup(&mut renderer);
    }

    #[test]
    fn viewer_change_is_published_once_per_cell() {
        let _guard = global::test_guard();
        let mut renderer = renderer();
        let mut streamer = streamer(ChunkSystemSettings::default());
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        streamer
            .events_mut()
            .on_viewer_chunk_changed(move |coord| sink.lock().unwrap().push(coord));
        streamer.initialize(&mut renderer, &mut ());

        streamer.update_system(Vec3::ZERO, 0.0, &mut renderer, &mut ());
        streamer.update_system(Vec3::new(9.0, 0.0, 9.0), 0.0, &mut renderer, &mut ());
        streamer.update_system(Vec3::new(11.0, 0.0, 9.0), 0.0, &mut renderer, &mut ());

        assert_eq!(
            *changes.lock().unwrap(),
            vec![GridCoord::ZERO, GridCoord::new(1, 0)]
        );
        streamer.cleanup(&mut renderer);
    }

    #[test]
    fn ticks_follow_scheduler() {
        let _guard = global::test_guard();
        let mut renderer = renderer();
        let mut streamer = streamer(ChunkSystemSettings::default());

        let frame = Duration::from_millis(16);
        assert!(!streamer.poll_tick(frame));

        streamer.initialize(&mut renderer, &mut ());
        assert!(streamer.poll_tick(frame));
        streamer.update_system(Vec3::ZERO, 0.0, &mut renderer, &mut ());
        assert!(!streamer.poll_tick(frame));
        assert!(streamer.poll_tick(Duration::from_millis(100)));

        streamer.set_running(false);
        assert!(!streamer.poll_tick(Duration::from_secs(1)));
        assert_eq!(streamer.loaded_count(), 9);

        streamer.set_running(true);
        assert!(streamer.poll_tick(frame));

        streamer.cleanup(&mut renderer);
        streamer.set_running(true);
        assert!(!streamer.poll_tick(frame));
    }

    #[test]
    fn cleanup_is_idempotent_and_allows_restart() {
        let _guard = global::test_guard();
        let mut renderer = renderer();
        let mut streamer = streamer(ChunkSystemSettings::default());
        streamer.initialize(&mut renderer, &mut ());
        streamer.events_mut().on_chunk_removed(|_| {});
        streamer.update_system(Vec3::ZERO, 0.0, &mut renderer, &mut ());

        streamer.cleanup(&mut renderer);
        streamer.cleanup(&mut renderer);

        assert_eq!(renderer.destroyed.len(), 9);
        assert!(renderer.objects.is_empty());
        assert_eq!(streamer.loaded_count(), 0);
        assert!(!streamer.pool().is_active(GridCoord::ZERO));
        assert_eq!(streamer.events_mut().subscriber_count(), 0);
        assert!(!global::is_initialized());
        assert!(!streamer.is_running());
        assert_eq!(streamer.pool().created_count(), 0);

        streamer.initialize(&mut renderer, &mut ());
        let report = streamer.update_system(Vec3::ZERO, 0.0, &mut renderer, &mut ());
        assert_eq!(report.created.len(), 9);
        streamer.cleanup(&mut renderer);
    }

    #[test]
    fn recycled_container_keeps_its_vertex_buffer() {
        let _guard = global::test_guard();
        let mut renderer = renderer();
        let mut streamer = streamer(ChunkSystemSettings::default().with_grid(1, 1));
        streamer.initialize(&mut renderer, &mut ());

        streamer.update_system(Vec3::ZERO, 0.0, &mut renderer, &mut ());
        let first = streamer.chunk(GridCoord::ZERO).unwrap();
        let (id, buffer, capacity) = (
            first.id,
            first.geometry.vertices.as_ptr(),
            first.geometry.vertices.capacity(),
        );

        // (0, 0) is evicted here, then handed to (4, 0) on the next tick
        streamer.update_system(Vec3::new(25.0, 0.0, 0.0), 0.1, &mut renderer, &mut ());
        assert!(!streamer.is_loaded(GridCoord::ZERO));
        streamer.update_system(Vec3::new(45.0, 0.0, 0.0), 0.2, &mut renderer, &mut ());

        let reused = streamer.chunk(GridCoord::new(4, 0)).unwrap();
        assert_eq!(reused.id, id);
        assert_eq!(reused.geometry.vertices.as_ptr(), buffer);
        assert_eq!(reused.geometry.vertices.capacity(), capacity);

        streamer.cleanup(&mut renderer);
    }

    #[test]
    fn global_channel_outlives_one_of_two_streamers() {
        let _guard = global::test_guard();
        let mut first_renderer = renderer();
        let mut second_renderer = renderer();
        let mut first = streamer(ChunkSystemSettings::default());
        let mut second = streamer(ChunkSystemSettings::default());
        first.initialize(&mut first_renderer, &mut ());
        second.initialize(&mut second_renderer, &mut ());

        let created = Arc::new(Mutex::new(0));
        let counter = created.clone();
        global::subscribe(move |event| {
            if matches!(event, GlobalChunkEvent::Created { .. }) {
                *counter.lock().unwrap() += 1;
            }
        })
        .unwrap();

        first.cleanup(&mut first_renderer);
        assert!(global::is_initialized());
        second.update_system(Vec3::ZERO, 0.0, &mut second_renderer, &mut ());
        assert_eq!(*created.lock().unwrap(), 9);

        // a second cleanup of the same streamer must not drop another reference
        first.cleanup(&mut first_renderer);
        assert!(global::is_initialized());

        second.cleanup(&mut second_renderer);
        assert!(!global::is_initialized());
    }

    #[test]
    fn missing_render_objects_do_not_stop_streaming() {
        let _guard = global::test_guard();
        let mut renderer = TableRenderer {
            fail_create: true,
            ..Default::default()
        };
        let mut streamer = streamer(ChunkSystemSettings::default());
        streamer.initialize(&mut renderer, &mut ());

        let report = streamer.update_system(Vec3::ZERO, 0.0, &mut renderer, &mut ());
        assert_eq!(report.created.len(), 9);
        assert_eq!(report.refreshed, 9);
        assert!(streamer.chunk(GridCoord::ZERO).unwrap().has_geometry());

        streamer.cleanup(&mut renderer);
        assert!(renderer.destroyed.is_empty());
    }
}

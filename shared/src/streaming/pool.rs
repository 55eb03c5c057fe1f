//! Chunk pool recycling render containers across grid cells.
//!
//! Containers are created once (prewarm or overflow) and then move between
//! the reserve queue and the active map until teardown. A container is never
//! present in both collections.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use bevy_log::{debug, warn};

use super::ChunkRenderer;
use crate::world::{chunk_label, grid_coord_to_world_origin, Chunk, ContainerId, GridCoord};

pub struct ChunkPool<H> {
    /// Inactive containers, oldest release first.
    reserve: VecDeque<Chunk<H>>,
    /// Containers checked out for a grid cell.
    active: HashMap<GridCoord, Chunk<H>>,
    world_size: f32,
    /// Containers created since the last teardown, prewarm and overflow
    /// included. Also the next `ContainerId`.
    created: usize,
}

impl<H> ChunkPool<H> {
    pub fn new(world_size: f32) -> Self {
        Self {
            reserve: VecDeque::new(),
            active: HashMap::new(),
            world_size,
            created: 0,
        }
    }

    /// Creates `count` inactive containers up front.
    pub fn prewarm<R>(&mut self, count: usize, renderer: &mut R)
    where
        R: ChunkRenderer<Handle = H>,
    {
        for _ in 0..count {
            let id = self.next_id();
            let mut render = renderer.create_object(&format!("Chunk_Pooled_{}", id.0));
            if let Some(handle) = render.as_mut() {
                renderer.set_active(handle, false);
            } else {
                warn!("Renderer returned no object for pooled container {}", id.0);
            }
            self.reserve.push_back(Chunk::new(id, GridCoord::ZERO, render));
        }
        debug!("Prewarmed chunk pool with {} containers", count);
    }

    /// Checks out the container for `coord`.
    ///
    /// Returns the already active container if there is one. Otherwise the
    /// oldest released container is repositioned and activated, or a new one
    /// is created when the reserve is empty. Geometry is left as is; an empty
    /// geometry means the container was never generated.
    pub fn acquire<R>(&mut self, coord: GridCoord, renderer: &mut R) -> &mut Chunk<H>
    where
        R: ChunkRenderer<Handle = H>,
    {
        let world_size = self.world_size;
        match self.active.entry(coord) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let chunk = match self.reserve.pop_front() {
                    Some(chunk) => chunk,
                    None => {
                        let id = ContainerId(self.created);
                        self.created += 1;
                        create_overflow(id, coord, renderer)
                    }
                };
                entry.insert(activate(chunk, coord, world_size, renderer))
            }
        }
    }

    /// Returns the container for `coord` to the back of the reserve. No-op if
    /// `coord` is not active.
    pub fn release<R>(&mut self, coord: GridCoord, renderer: &mut R) -> bool
    where
        R: ChunkRenderer<Handle = H>,
    {
        let Some(mut chunk) = self.active.remove(&coord) else {
            return false;
        };

        if let Some(handle) = chunk.render.as_mut() {
            renderer.set_active(handle, false);
        }
        chunk.active = false;
        self.reserve.push_back(chunk);
        true
    }

    pub fn is_active(&self, coord: GridCoord) -> bool {
        self.active.contains_key(&coord)
    }

    pub fn get(&self, coord: GridCoord) -> Option<&Chunk<H>> {
        self.active.get(&coord)
    }

    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut Chunk<H>> {
        self.active.get_mut(&coord)
    }

    /// Returns an iterator over active coordinates.
    pub fn active_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.active.keys().copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn reserve_count(&self) -> usize {
        self.reserve.len()
    }

    /// Total containers alive in the pool.
    pub fn container_count(&self) -> usize {
        self.active.len() + self.reserve.len()
    }

    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Destroys every render object, active and pooled, and empties the pool.
    /// Container numbering starts over. Calling it again does nothing.
    pub fn teardown<R>(&mut self, renderer: &mut R)
    where
        R: ChunkRenderer<Handle = H>,
    {
        let active = self.active.drain().map(|(_, chunk)| chunk);
        let pooled = self.reserve.drain(..);

        let mut destroyed = 0;
        for mut chunk in active.chain(pooled) {
            if let Some(handle) = chunk.render.take() {
                renderer.destroy(handle);
                destroyed += 1;
            }
        }
        self.created = 0;

        if destroyed > 0 {
            debug!("Destroyed {} chunk render objects", destroyed);
        }
    }

    fn next_id(&mut self) -> ContainerId {
        let id = ContainerId(self.created);
        self.created += 1;
        id
    }
}

fn create_overflow<H, R>(id: ContainerId, coord: GridCoord, renderer: &mut R) -> Chunk<H>
where
    R: ChunkRenderer<Handle = H>,
{
    debug!(
        "Chunk pool exhausted, creating container {} for {:?}",
        id.0, coord
    );
    let render = renderer.create_object(&chunk_label(coord));
    if render.is_none() {
        warn!("Renderer returned no object for chunk {:?}", coord);
    }
    Chunk::new(id, coord, render)
}

fn activate<H, R>(
    mut chunk: Chunk<H>,
    coord: GridCoord,
    world_size: f32,
    renderer: &mut R,
) -> Chunk<H>
where
    R: ChunkRenderer<Handle = H>,
{
    chunk.coord = coord;
    chunk.active = true;
    if let Some(handle) = chunk.render.as_mut() {
        renderer.set_label(handle, &chunk_label(coord));
        renderer.set_position(handle, grid_coord_to_world_origin(coord, world_size));
        renderer.set_active(handle, true);
    }
    chunk
}

//! Chunk lifecycle events.
//!
//! Every transition is published twice: on the [`ChunkEventBus`] owned by the
//! streamer, whose handlers see the chunk itself, and on the process-wide
//! [`global`] channel, which carries plain [`GlobalChunkEvent`] values so it
//! does not depend on the renderer's handle type.

use bevy::math::Vec3;

use crate::world::{Chunk, ContainerId, GridCoord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type CreatedHandler<H> = Box<dyn FnMut(&Chunk<H>) + Send + Sync>;
type CoordHandler = Box<dyn FnMut(GridCoord) + Send + Sync>;

/// Instance-scoped dispatcher. Handlers run synchronously, in subscription
/// order, on the thread that ticks the streamer.
pub struct ChunkEventBus<H> {
    next_id: u64,
    created: Vec<(SubscriptionId, CreatedHandler<H>)>,
    removed: Vec<(SubscriptionId, CoordHandler)>,
    viewer_changed: Vec<(SubscriptionId, CoordHandler)>,
}

impl<H> Default for ChunkEventBus<H> {
    fn default() -> Self {
        Self {
            next_id: 0,
            created: Vec::new(),
            removed: Vec::new(),
            viewer_changed: Vec::new(),
        }
    }
}

impl<H> ChunkEventBus<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_chunk_created<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Chunk<H>) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.created.push((id, Box::new(handler)));
        id
    }

    pub fn on_chunk_removed<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(GridCoord) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.removed.push((id, Box::new(handler)));
        id
    }

    pub fn on_viewer_chunk_changed<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(GridCoord) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.viewer_changed.push((id, Box::new(handler)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriber_count();
        self.created.retain(|(sub, _)| *sub != id);
        self.removed.retain(|(sub, _)| *sub != id);
        self.viewer_changed.retain(|(sub, _)| *sub != id);
        self.subscriber_count() != before
    }

    pub fn clear(&mut self) {
        self.created.clear();
        self.removed.clear();
        self.viewer_changed.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.created.len() + self.removed.len() + self.viewer_changed.len()
    }

    pub fn emit_chunk_created(&mut self, chunk: &Chunk<H>) {
        for (_, handler) in self.created.iter_mut() {
            handler(chunk);
        }
    }

    pub fn emit_chunk_removed(&mut self, coord: GridCoord) {
        for (_, handler) in self.removed.iter_mut() {
            handler(coord);
        }
    }

    pub fn emit_viewer_chunk_changed(&mut self, coord: GridCoord) {
        for (_, handler) in self.viewer_changed.iter_mut() {
            handler(coord);
        }
    }

    fn next_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Payload of the process-wide channel.
///
/// `Created` describes the chunk by coordinate, origin and container rather
/// than carrying the chunk. The channel is one static shared by every
/// streamer, so it cannot be generic over the renderer's handle type, and
/// that handle is not required to be `Send`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlobalChunkEvent {
    Created {
        coord: GridCoord,
        origin: Vec3,
        container: ContainerId,
    },
    Removed {
        coord: GridCoord,
    },
    ViewerChunkChanged {
        coord: GridCoord,
    },
}

impl GlobalChunkEvent {
    pub fn coord(&self) -> GridCoord {
        match *self {
            Self::Created { coord, .. } => coord,
            Self::Removed { coord } => coord,
            Self::ViewerChunkChanged { coord } => coord,
        }
    }
}

/// Process-wide broadcast channel.
///
/// Every streamer holds one reference from `initialize` to `cleanup`
/// ([`init`](global::init) / [`release`](global::release)); the channel is
/// open while at least one reference is held. [`reset`](global::reset)
/// closes it regardless. Publishing or subscribing while closed does nothing.
/// Handlers run while the channel is locked and must not call back into it.
pub mod global {
    use std::sync::{Mutex, MutexGuard};

    use lazy_static::lazy_static;

    use super::{GlobalChunkEvent, SubscriptionId};

    type GlobalHandler = Box<dyn FnMut(&GlobalChunkEvent) + Send>;

    #[derive(Default)]
    struct GlobalBus {
        owners: usize,
        next_id: u64,
        subscribers: Vec<(SubscriptionId, GlobalHandler)>,
    }

    lazy_static! {
        static ref BUS: Mutex<Option<GlobalBus>> = Mutex::new(None);
    }

    fn lock() -> MutexGuard<'static, Option<GlobalBus>> {
        // A panicking handler leaves the subscriber list intact.
        BUS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Takes a reference on the channel, opening it if needed. Returns true
    /// if this call opened it.
    pub fn init() -> bool {
        let mut guard = lock();
        let opened = guard.is_none();
        guard.get_or_insert_with(GlobalBus::default).owners += 1;
        opened
    }

    /// Drops a reference taken by [`init`]. The last one closes the channel
    /// and drops every subscriber. Returns true if the channel was closed.
    pub fn release() -> bool {
        let mut guard = lock();
        let Some(bus) = guard.as_mut() else {
            return false;
        };
        bus.owners = bus.owners.saturating_sub(1);
        if bus.owners > 0 {
            return false;
        }
        guard.take();
        true
    }

    /// Closes the channel for every owner and drops every subscriber.
    pub fn reset() {
        lock().take();
    }

    pub fn is_initialized() -> bool {
        lock().is_some()
    }

    /// `None` when the channel is closed.
    pub fn subscribe<F>(handler: F) -> Option<SubscriptionId>
    where
        F: FnMut(&GlobalChunkEvent) + Send + 'static,
    {
        let mut guard = lock();
        let bus = guard.as_mut()?;
        let id = SubscriptionId(bus.next_id);
        bus.next_id += 1;
        bus.subscribers.push((id, Box::new(handler)));
        Some(id)
    }

    pub fn unsubscribe(id: SubscriptionId) -> bool {
        let mut guard = lock();
        let Some(bus) = guard.as_mut() else {
            return false;
        };
        let before = bus.subscribers.len();
        bus.subscribers.retain(|(sub, _)| *sub != id);
        bus.subscribers.len() != before
    }

    pub fn subscriber_count() -> usize {
        lock().as_ref().map_or(0, |bus| bus.subscribers.len())
    }

    pub fn publish(event: GlobalChunkEvent) {
        let mut guard = lock();
        if let Some(bus) = guard.as_mut() {
            for (_, handler) in bus.subscribers.iter_mut() {
                handler(&event);
            }
        }
    }

    /// Serializes tests that open or close the channel.
    #[cfg(test)]
    pub(crate) fn test_guard() -> MutexGuard<'static, ()> {
        lazy_static! {
            static ref GUARD: Mutex<()> = Mutex::new(());
        }
        GUARD.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn handlers_run_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus: ChunkEventBus<()> = ChunkEventBus::new();

        for tag in ["first", "second"] {
            let log = log.clone();
            bus.on_chunk_removed(move |coord| log.lock().unwrap().push((tag, coord)));
        }
        bus.emit_chunk_removed(GridCoord::new(2, 3));

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ("first", GridCoord::new(2, 3)),
                ("second", GridCoord::new(2, 3))
            ]
        );
    }

    #[test]
    fn created_handlers_see_the_chunk() {
        let seen = Arc::new(Mutex::new(None));
        let mut bus: ChunkEventBus<u8> = ChunkEventBus::new();
        {
            let seen = seen.clone();
            bus.on_chunk_created(move |chunk| {
                *seen.lock().unwrap() = Some((chunk.coord, chunk.render));
            });
        }

        let chunk = Chunk::new(ContainerId(4), GridCoord::new(-1, 0), Some(9u8));
        bus.emit_chunk_created(&chunk);
        assert_eq!(*seen.lock().unwrap(), Some((GridCoord::new(-1, 0), Some(9))));
    }

    #[test]
    fn unsubscribe_and_clear() {
        let count = Arc::new(Mutex::new(0));
        let mut bus: ChunkEventBus<()> = ChunkEventBus::new();
        let counter = count.clone();
        let id = bus.on_viewer_chunk_changed(move |_| *counter.lock().unwrap() += 1);
        bus.on_chunk_removed(|_| {});

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit_viewer_chunk_changed(GridCoord::ZERO);
        assert_eq!(*count.lock().unwrap(), 0);

        bus.clear();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn global_channel_lifecycle() {
        let _guard = global::test_guard();
        global::reset();

        assert!(global::subscribe(|_| {}).is_none());
        global::publish(GlobalChunkEvent::Removed {
            coord: GridCoord::ZERO,
        });

        assert!(global::init());

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let id = global::subscribe(move |event| sink.lock().unwrap().push(*event)).unwrap();
        global::publish(GlobalChunkEvent::ViewerChunkChanged {
            coord: GridCoord::new(1, 2),
        });
        assert_eq!(received.lock().unwrap()[0].coord(), GridCoord::new(1, 2));

        assert!(global::unsubscribe(id));
        global::subscribe(|_| {});
        assert_eq!(global::subscriber_count(), 1);

        global::reset();
        assert!(!global::is_initialized());
        assert_eq!(global::subscriber_count(), 0);
        assert!(global::init());
        assert_eq!(global::subscriber_count(), 0);
        global::reset();
    }

    #[test]
    fn channel_stays_open_until_last_owner_releases() {
        let _guard = global::test_guard();
        global::reset();

        assert!(global::init());
        assert!(!global::init());
        global::subscribe(|_| {});

        assert!(!global::release());
        assert!(global::is_initialized());
        assert_eq!(global::subscriber_count(), 1);

        assert!(global::release());
        assert!(!global::is_initialized());
        assert!(!global::release());
    }
}

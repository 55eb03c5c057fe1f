//! Chunk lifecycle: pooling, load policy, generation and the per-tick
//! orchestration tying them together.

pub mod events;
mod generator;
pub(crate) mod pool;
mod policy;
mod render;
mod scheduler;
mod streamer;

pub use events::{global, ChunkEventBus, GlobalChunkEvent, SubscriptionId};
pub use generator::ChunkGenerator;
pub use policy::LoadPolicy;
pub use pool::ChunkPool;
pub use render::{ChunkRenderer, WaveParameterSink};
pub use scheduler::TickScheduler;
pub use streamer::{ChunkStreamer, TickPhase, TickReport};

//! Wave model shared by mesh displacement and the water shader.
//!
//! ```text
//!              WaveSettings
//!                   │
//!       ┌───────────┴───────────┐
//!       ▼                       ▼
//!  displacement.rs        WaveParameterSink
//!  (vertex Y, per tick)   (shader uniforms, per tick)
//! ```

pub mod config;
pub mod displacement;

pub use config::*;
pub use displacement::*;

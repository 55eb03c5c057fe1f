//! Shader-facing data for the water surface.
//!
//! The streamer pushes the wave parameters into [`WaveUniforms`] once per
//! tick; the water material reads them back to tune its look.

mod water_uniforms;

pub use water_uniforms::WaveUniforms;

//! Wave uniform data
//!
//! Separated into its own module to isolate the `#![allow(dead_code)]` directive,
//! which is required due to the ShaderType derive macro generating internal
//! `check` functions that trigger warnings.

#![allow(dead_code)]

use bevy::{prelude::*, render::render_resource::ShaderType};
use ocean_shared::constants::{shader_params, MAX_WAVE_DESCRIPTORS};
use ocean_shared::WaveParameterSink;

/// Wave parameters in uniform layout, refreshed by the streamer every tick.
#[derive(Resource, ShaderType, Debug, Clone, Default, PartialEq)]
pub struct WaveUniforms {
    pub wave_speed: f32,
    pub wave_amplitude: f32,
    pub wave_frequency: f32,
    pub wave_steepness: f32,
    /// xy: direction, z: speed factor, w: amplitude factor
    pub wave_directions: [Vec4; MAX_WAVE_DESCRIPTORS],
}

impl WaveParameterSink for WaveUniforms {
    fn set_float(&mut self, name: &str, value: f32) {
        match name {
            shader_params::WAVE_SPEED => self.wave_speed = value,
            shader_params::WAVE_AMPLITUDE => self.wave_amplitude = value,
            shader_params::WAVE_FREQUENCY => self.wave_frequency = value,
            shader_params::WAVE_STEEPNESS => self.wave_steepness = value,
            _ => debug!("Unknown wave parameter {}", name),
        }
    }

    fn set_vector(&mut self, name: &str, value: Vec4) {
        match shader_params::WAVE_DIRECTIONS.iter().position(|slot| *slot == name) {
            Some(index) => self.wave_directions[index] = value,
            None => debug!("Unknown wave vector {}", name),
        }
    }
}

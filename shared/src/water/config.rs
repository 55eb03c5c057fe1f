//! Wave configuration shared by CPU displacement and the water shader.
//!
//! The same [`WaveSettings`] drive vertex displacement on the CPU and the
//! parameters pushed to the renderer once per tick, so both stay in sync.

use bevy::math::{Vec2, Vec4};
use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};

use crate::constants::{shader_params, MAX_WAVE_DESCRIPTORS};
use crate::streaming::WaveParameterSink;

/// One sinusoidal wave component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveDescriptor {
    /// Travel direction on the XZ plane. Used as given, not normalized.
    pub direction: Vec2,
    /// Multiplier applied to [`WaveSettings::speed`].
    pub speed_factor: f32,
    /// Multiplier applied to [`WaveSettings::amplitude`].
    pub amplitude_factor: f32,
}

impl WaveDescriptor {
    pub const fn new(dir_x: f32, dir_z: f32, speed_factor: f32, amplitude_factor: f32) -> Self {
        Self {
            direction: Vec2::new(dir_x, dir_z),
            speed_factor,
            amplitude_factor,
        }
    }

    /// Packed `(dir.x, dir.z, speed_factor, amplitude_factor)` as uploaded to
    /// the shader.
    pub fn packed(&self) -> Vec4 {
        Vec4::new(
            self.direction.x,
            self.direction.y,
            self.speed_factor,
            self.amplitude_factor,
        )
    }
}

pub const DEFAULT_WAVE_DESCRIPTORS: [WaveDescriptor; MAX_WAVE_DESCRIPTORS] = [
    WaveDescriptor::new(1.0, 0.0, 0.0, 0.0),
    WaveDescriptor::new(0.0, 1.0, 0.0, 0.0),
    WaveDescriptor::new(0.7, 0.7, 0.0, 0.0),
];

/// Complete wave configuration. Swapped wholesale at runtime, never mutated
/// mid-tick.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveSettings {
    pub speed: f32,
    pub amplitude: f32,
    pub frequency: f32,
    /// Crest sharpness in `[0, 1]`. Forwarded to the shader only.
    pub steepness: f32,
    /// Wave components. Entries past the third are ignored.
    pub waves: Vec<WaveDescriptor>,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            amplitude: 0.5,
            frequency: 1.0,
            steepness: 0.5,
            waves: DEFAULT_WAVE_DESCRIPTORS.to_vec(),
        }
    }
}

impl WaveSettings {
    /// Settings with no wave components, producing a flat surface.
    pub fn still() -> Self {
        Self {
            waves: Vec::new(),
            ..Default::default()
        }
    }

    pub fn with_steepness(mut self, steepness: f32) -> Self {
        self.steepness = steepness.clamp(0.0, 1.0);
        self
    }

    /// Adds a wave component. Returns false if all slots are taken.
    pub fn add_wave(&mut self, wave: WaveDescriptor) -> bool {
        if self.waves.len() < MAX_WAVE_DESCRIPTORS {
            self.waves.push(wave);
            true
        } else {
            false
        }
    }

    /// Iterator over the wave components that take part in displacement.
    pub fn active_waves(&self) -> impl Iterator<Item = &WaveDescriptor> {
        self.waves.iter().take(MAX_WAVE_DESCRIPTORS)
    }

    /// Pushes the scalar parameters and up to three packed directions.
    pub fn push_shader_parameters<S: WaveParameterSink + ?Sized>(&self, sink: &mut S) {
        sink.set_float(shader_params::WAVE_SPEED, self.speed);
        sink.set_float(shader_params::WAVE_AMPLITUDE, self.amplitude);
        sink.set_float(shader_params::WAVE_FREQUENCY, self.frequency);
        sink.set_float(shader_params::WAVE_STEEPNESS, self.steepness.clamp(0.0, 1.0));
        for (name, wave) in shader_params::WAVE_DIRECTIONS.iter().zip(self.active_waves()) {
            sink.set_vector(name, wave.packed());
        }
    }
}

/// Ready-made wave configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WavePreset {
    /// Flat water
    Still,
    /// Single slow swell
    Calm,
    /// Three crossing components
    #[default]
    Ocean,
    /// Fast, tall waves
    Storm,
}

impl WavePreset {
    pub const ALL: [WavePreset; 4] = [
        WavePreset::Still,
        WavePreset::Calm,
        WavePreset::Ocean,
        WavePreset::Storm,
    ];

    pub fn to_settings(self) -> WaveSettings {
        let mut settings = WaveSettings::still();

        match self {
            WavePreset::Still => {}
            WavePreset::Calm => {
                settings.amplitude = 0.2;
                settings.frequency = 0.3;
                settings.add_wave(WaveDescriptor::new(1.0, 0.2, 0.5, 1.0));
            }
            WavePreset::Ocean => {
                settings.amplitude = 0.5;
                settings.frequency = 0.5;
                settings.add_wave(WaveDescriptor::new(1.0, 0.0, 1.0, 1.0));
                settings.add_wave(WaveDescriptor::new(0.0, 1.0, 1.3, 0.6));
                settings.add_wave(WaveDescriptor::new(0.7, 0.7, 1.7, 0.35));
            }
            WavePreset::Storm => {
                settings.speed = 2.0;
                settings.amplitude = 1.5;
                settings.frequency = 0.35;
                settings.steepness = 0.8;
                settings.add_wave(WaveDescriptor::new(1.0, 0.2, 1.0, 1.0));
                settings.add_wave(WaveDescriptor::new(-0.5, 1.0, 1.4, 0.7));
                settings.add_wave(WaveDescriptor::new(0.7, -0.7, 1.9, 0.45));
            }
        }

        settings
    }

    /// The preset after this one, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Recorded {
        floats: HashMap<String, f32>,
        vectors: HashMap<String, Vec4>,
    }

    impl WaveParameterSink for Recorded {
        fn set_float(&mut self, name: &str, value: f32) {
            self.floats.insert(name.to_string(), value);
        }

        fn set_vector(&mut self, name: &str, value: Vec4) {
            self.vectors.insert(name.to_string(), value);
        }
    }

    #[test]
    fn preset_wave_counts() {
        assert_eq!(WavePreset::Still.to_settings().waves.len(), 0);
        assert_eq!(WavePreset::Calm.to_settings().waves.len(), 1);
        assert_eq!(WavePreset::Ocean.to_settings().waves.len(), 3);
        assert_eq!(WavePreset::Storm.to_settings().waves.len(), 3);
    }

    #[test]
    fn add_wave_stops_at_capacity() {
        let mut settings = WaveSettings::default();
        assert_eq!(settings.waves.len(), MAX_WAVE_DESCRIPTORS);
        assert!(!settings.add_wave(WaveDescriptor::new(1.0, 1.0, 1.0, 1.0)));
    }

    #[test]
    fn extra_descriptors_are_ignored() {
        let mut settings = WaveSettings::default();
        settings.waves.push(WaveDescriptor::new(5.0, 5.0, 5.0, 5.0));
        assert_eq!(settings.active_waves().count(), MAX_WAVE_DESCRIPTORS);
    }

    #[test]
    fn pushes_scalars_and_present_directions_only() {
        let mut settings = WavePreset::Calm.to_settings().with_steepness(2.0);
        settings.speed = 3.0;

        let mut sink = Recorded::default();
        settings.push_shader_parameters(&mut sink);

        assert_eq!(sink.floats[shader_params::WAVE_SPEED], 3.0);
        assert_eq!(sink.floats[shader_params::WAVE_STEEPNESS], 1.0);
        assert_eq!(sink.vectors.len(), 1);
        assert_eq!(
            sink.vectors[shader_params::WAVE_DIRECTIONS[0]],
            Vec4::new(1.0, 0.2, 0.5, 1.0)
        );
    }

    #[test]
    fn preset_cycle_wraps() {
        assert_eq!(WavePreset::Still.next(), WavePreset::Calm);
        assert_eq!(WavePreset::Storm.next(), WavePreset::Still);
    }
}

pub const DEFAULT_CHUNKS_X: i32 = 3;
pub const DEFAULT_CHUNKS_Z: i32 = 3;
pub const DEFAULT_CHUNK_RESOLUTION: i32 = 10;
pub const DEFAULT_CHUNK_WORLD_SIZE: f32 = 10.0;
pub const DEFAULT_MAX_CHUNKS_PER_TICK: usize = 2;
pub const DEFAULT_UPDATE_INTERVAL_SECS: f32 = 0.1;

/// Number of wave descriptors the displacement and the shader consume.
pub const MAX_WAVE_DESCRIPTORS: usize = 3;

/// Shader parameter names pushed once per tick.
pub mod shader_params {
    pub const WAVE_SPEED: &str = "wave_speed";
    pub const WAVE_AMPLITUDE: &str = "wave_amplitude";
    pub const WAVE_FREQUENCY: &str = "wave_frequency";
    pub const WAVE_STEEPNESS: &str = "wave_steepness";
    pub const WAVE_DIRECTIONS: [&str; super::MAX_WAVE_DESCRIPTORS] =
        ["wave_direction_1", "wave_direction_2", "wave_direction_3"];
}

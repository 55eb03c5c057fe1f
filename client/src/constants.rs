use bevy::math::Vec3;

pub const WINDOW_TITLE: &str = "Ocean Streamer";

pub const VIEWER_START: Vec3 = Vec3::new(0.0, 12.0, 18.0);
/// Units per second.
pub const FLY_SPEED: f32 = 12.0;
pub const SPRINT_MULTIPLIER: f32 = 4.0;
/// Radians per pixel of mouse motion.
pub const LOOK_SENSITIVITY: f32 = 0.003;

pub mod controller;

use bevy::prelude::*;

pub use controller::*;

/// The entity whose position drives chunk streaming.
#[derive(Component)]
pub struct StreamingViewer;

pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_viewer_system)
            .add_systems(Update, (viewer_look_system, viewer_movement_system).chain());
    }
}

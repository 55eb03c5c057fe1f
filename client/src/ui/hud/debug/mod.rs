mod loaded_stats;
pub mod setup;

use bevy::prelude::*;
pub use loaded_stats::*;
pub use setup::*;

use crate::world::StreamingSet;

pub struct DebugHudPlugin;
impl Plugin for DebugHudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_debug_hud).add_systems(
            Update,
            (
                chunks_text_update_system,
                pool_text_update_system,
                viewer_text_update_system,
                waves_text_update_system,
                toggle_hud_system,
            )
                .after(StreamingSet::Tick),
        );
    }
}

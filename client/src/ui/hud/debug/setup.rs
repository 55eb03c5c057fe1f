use super::loaded_stats::{ChunksNumberText, PoolText, ViewerCellText, WavesText};
use crate::input::data::{KeyMap, ViewerAction};
use crate::input::keyboard::is_action_just_pressed;
use bevy::prelude::*;

/// Marker to find the container entity so we can show/hide the HUD
#[derive(Component)]
pub struct HudRoot;

pub fn setup_debug_hud(mut commands: Commands) {
    // create our UI root node
    // this is the wrapper/container for the text
    let root = commands
        .spawn((
            HudRoot,
            // give it a dark background for readability
            BackgroundColor(Color::BLACK.with_alpha(0.5)),
            // make it "always on top" by setting the Z index to maximum
            GlobalZIndex(i32::MAX),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(1.),
                top: Val::Percent(1.),
                bottom: Val::Auto,
                right: Val::Auto,
                padding: UiRect::all(Val::Px(4.0)),
                flex_direction: FlexDirection::Column,
                ..Default::default()
            },
        ))
        .id();

    fn spawn_debug_text<T: Component>(
        commands: &mut Commands,
        marker: T,
        initial_text: &str,
    ) -> Entity {
        commands
            .spawn((
                marker,
                Text::new(initial_text),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ))
            .id()
    }

    let chunks_text = spawn_debug_text(&mut commands, ChunksNumberText, "...");
    let pool_text = spawn_debug_text(&mut commands, PoolText, "...");
    let viewer_text = spawn_debug_text(&mut commands, ViewerCellText, "Viewer cell: N/A");
    let waves_text = spawn_debug_text(&mut commands, WavesText, "...");
    commands
        .entity(root)
        .add_children(&[chunks_text, pool_text, viewer_text, waves_text]);
}

/// Toggle the HUD when pressing F3
pub fn toggle_hud_system(
    mut q: Query<&mut Visibility, With<HudRoot>>,
    kbd: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
) {
    if !is_action_just_pressed(ViewerAction::ToggleHud, &kbd, &key_map) {
        return;
    }
    let Ok(mut vis) = q.single_mut() else {
        return;
    };
    *vis = match *vis {
        Visibility::Hidden => Visibility::Visible,
        _ => Visibility::Hidden,
    };
}

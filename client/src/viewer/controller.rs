use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

use super::StreamingViewer;
use crate::constants::{FLY_SPEED, LOOK_SENSITIVITY, SPRINT_MULTIPLIER, VIEWER_START};
use crate::input::data::{KeyMap, ViewerAction};
use crate::input::keyboard::is_action_pressed;

/// Yaw and pitch of the fly camera, in radians.
#[derive(Component, Debug, Default)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

pub fn spawn_viewer_system(mut commands: Commands) {
    let transform = Transform::from_translation(VIEWER_START).looking_at(Vec3::ZERO, Vec3::Y);
    let (yaw, pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);

    commands.spawn((
        StreamingViewer,
        Camera3d::default(),
        transform,
        LookAngles { yaw, pitch },
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(4.0, 20.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Rotates the camera while the right mouse button is held.
pub fn viewer_look_system(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut query: Query<(&mut Transform, &mut LookAngles), With<StreamingViewer>>,
) {
    if !mouse_buttons.pressed(MouseButton::Right) || mouse_motion.delta == Vec2::ZERO {
        return;
    }
    let Ok((mut transform, mut angles)) = query.single_mut() else {
        return;
    };

    angles.yaw -= mouse_motion.delta.x * LOOK_SENSITIVITY;
    angles.pitch = (angles.pitch - mouse_motion.delta.y * LOOK_SENSITIVITY).clamp(-1.54, 1.54);
    transform.rotation = Quat::from_euler(EulerRot::YXZ, angles.yaw, angles.pitch, 0.0);
}

pub fn viewer_movement_system(
    time: Res<Time>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    mut query: Query<&mut Transform, With<StreamingViewer>>,
) {
    let Ok(mut transform) = query.single_mut() else {
        debug!("viewer not found");
        return;
    };

    let direction = movement_direction(&transform, |action| {
        is_action_pressed(action, &keyboard_input, &key_map)
    });
    if direction == Vec3::ZERO {
        return;
    }

    let mut speed = FLY_SPEED;
    if is_action_pressed(ViewerAction::Sprint, &keyboard_input, &key_map) {
        speed *= SPRINT_MULTIPLIER;
    }
    transform.translation += direction * speed * time.delta_secs();
}

/// Normalized movement from the pressed actions. Forward and strafe stay on
/// the horizontal plane.
pub fn movement_direction(transform: &Transform, pressed: impl Fn(ViewerAction) -> bool) -> Vec3 {
    let forward = Vec3::new(transform.forward().x, 0.0, transform.forward().z).normalize_or_zero();
    let right = Vec3::new(transform.right().x, 0.0, transform.right().z).normalize_or_zero();

    const AXES: [(ViewerAction, fn(Vec3, Vec3) -> Vec3); 6] = [
        (ViewerAction::MoveForward, |forward, _| forward),
        (ViewerAction::MoveBackward, |forward, _| -forward),
        (ViewerAction::MoveRight, |_, right| right),
        (ViewerAction::MoveLeft, |_, right| -right),
        (ViewerAction::FlyUp, |_, _| Vec3::Y),
        (ViewerAction::FlyDown, |_, _| Vec3::NEG_Y),
    ];

    AXES.iter()
        .filter(|(action, _)| pressed(*action))
        .map(|(_, axis)| axis(forward, right))
        .sum::<Vec3>()
        .normalize_or_zero()
}

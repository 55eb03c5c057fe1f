use crate::input::data::{KeyMap, ViewerAction};
use bevy::prelude::*;
use bevy::{input::ButtonInput, prelude::KeyCode};
use ocean_shared::ConfigFolderPaths;
use ron::{from_str, ser::PrettyConfig};
use std::path::Path;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
};

fn write_keybindings_to_path(key_map: &KeyMap, binds_path: &Path) -> Result<(), std::io::Error> {
    let pretty_config = PrettyConfig::new()
        .with_depth_limit(3)
        .with_separate_tuple_members(true)
        .with_enumerate_arrays(true);

    let serialized = ron::ser::to_string_pretty(key_map, pretty_config)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "serialization failed"))?;
    if let Some(parent) = binds_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(binds_path)?;
    file.write_all(serialized.as_bytes())
}

pub fn is_action_pressed(
    action: ViewerAction,
    keyboard_input: &ButtonInput<KeyCode>,
    key_map: &KeyMap,
) -> bool {
    key_map
        .map
        .get(&action)
        .is_some_and(|keys| keyboard_input.any_pressed(keys.iter().copied()))
}

pub fn is_action_just_pressed(
    action: ViewerAction,
    keyboard_input: &ButtonInput<KeyCode>,
    key_map: &KeyMap,
) -> bool {
    key_map
        .map
        .get(&action)
        .is_some_and(|keys| keyboard_input.any_just_pressed(keys.iter().copied()))
}

pub(crate) fn default_key_map() -> BTreeMap<ViewerAction, Vec<KeyCode>> {
    let mut map = BTreeMap::new();
    map.insert(ViewerAction::MoveForward, vec![KeyCode::KeyW, KeyCode::ArrowUp]);
    map.insert(
        ViewerAction::MoveBackward,
        vec![KeyCode::KeyS, KeyCode::ArrowDown],
    );
    map.insert(ViewerAction::MoveLeft, vec![KeyCode::KeyA, KeyCode::ArrowLeft]);
    map.insert(
        ViewerAction::MoveRight,
        vec![KeyCode::KeyD, KeyCode::ArrowRight],
    );
    map.insert(ViewerAction::FlyUp, vec![KeyCode::Space]);
    map.insert(ViewerAction::FlyDown, vec![KeyCode::ShiftLeft]);
    map.insert(ViewerAction::Sprint, vec![KeyCode::ControlLeft]);
    map.insert(ViewerAction::ToggleHud, vec![KeyCode::F3]);
    map.insert(ViewerAction::ToggleStreaming, vec![KeyCode::KeyP]);
    map.insert(ViewerAction::ReloadChunks, vec![KeyCode::KeyR]);
    map.insert(ViewerAction::CycleWavePreset, vec![KeyCode::KeyN]);
    map
}

/// Reads the key map from the config folder, writing the defaults when the
/// file is missing or unreadable.
pub fn get_bindings(config_folder_paths: &ConfigFolderPaths) -> KeyMap {
    let binds_path = config_folder_paths.bindings_file();

    let parsed = fs::read_to_string(binds_path.as_path())
        .ok()
        .and_then(|content| from_str::<KeyMap>(&content).ok());
    if let Some(key_map) = parsed {
        return key_map;
    }

    let key_map = KeyMap::default();
    if let Err(e) = write_keybindings_to_path(&key_map, binds_path.as_path()) {
        error!(
            "Failed to create default keybindings file at {:?}: {}",
            binds_path, e
        );
    }
    key_map
}

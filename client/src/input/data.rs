use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViewerAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    FlyUp,
    FlyDown,
    Sprint,
    ToggleHud,
    ToggleStreaming,
    ReloadChunks,
    CycleWavePreset,
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct KeyMap {
    #[serde(default = "super::keyboard::default_key_map")]
    pub map: BTreeMap<ViewerAction, Vec<KeyCode>>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            map: super::keyboard::default_key_map(),
        }
    }
}

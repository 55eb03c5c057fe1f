use std::path::PathBuf;

use bevy_ecs::resource::Resource;

pub mod constants;
pub mod settings;
pub mod streaming;
pub mod water;
pub mod world;

pub use constants::*;
pub use settings::{ChunkSystemSettings, SettingsError};
pub use streaming::{ChunkRenderer, ChunkStreamer, TickReport, WaveParameterSink};

#[derive(Resource, Debug, Clone)]
pub struct ConfigFolderPaths {
    pub config_folder_path: PathBuf,
}

impl ConfigFolderPaths {
    pub fn settings_file(&self) -> PathBuf {
        self.config_folder_path.join("ocean.ron")
    }

    pub fn bindings_file(&self) -> PathBuf {
        self.config_folder_path.join("bindings.ron")
    }
}

pub fn get_config_folder_paths(config_folder_path: Option<String>) -> ConfigFolderPaths {
    let mut paths = default_config_folder_paths();

    if let Some(folder) = config_folder_path {
        paths.config_folder_path = folder.into();
    }

    paths
}

#[cfg(target_os = "windows")]
pub fn default_config_folder_paths() -> ConfigFolderPaths {
    ConfigFolderPaths {
        config_folder_path: "%AppData/ocean-streamer".into(),
    }
}

#[cfg(target_os = "linux")]
pub fn default_config_folder_paths() -> ConfigFolderPaths {
    ConfigFolderPaths {
        config_folder_path: "$HOME/.config/ocean-streamer".into(),
    }
}

#[cfg(target_os = "macos")]
pub fn default_config_folder_paths() -> ConfigFolderPaths {
    ConfigFolderPaths {
        config_folder_path: "$HOME/Library/Application Support/ocean-streamer".into(),
    }
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
pub fn default_config_folder_paths() -> ConfigFolderPaths {
    ConfigFolderPaths {
        config_folder_path: "ocean-streamer".into(),
    }
}

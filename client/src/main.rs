mod config;
mod constants;
mod input;
mod shaders;
mod ui;
mod viewer;
mod world;

use bevy::{prelude::*, window::PresentMode};
use clap::{Parser, ValueEnum};
use config::{load_ocean_config, OceanConfig};
use constants::WINDOW_TITLE;
use input::keyboard::get_bindings;
use ocean_shared::streaming::ChunkStreamer;
use ocean_shared::water::WavePreset;
use ocean_shared::get_config_folder_paths;
use ui::hud::debug::DebugHudPlugin;
use viewer::ViewerPlugin;
use world::{ActivePreset, OceanStreamer, StreamingPlugin};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetArg {
    Still,
    Calm,
    Ocean,
    Storm,
}

impl From<PresetArg> for WavePreset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Still => WavePreset::Still,
            PresetArg::Calm => WavePreset::Calm,
            PresetArg::Ocean => WavePreset::Ocean,
            PresetArg::Storm => WavePreset::Storm,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(
        short,
        long,
        help = "Folder holding ocean.ron and bindings.ron, created if missing"
    )]
    config_folder_path: Option<String>,

    #[arg(long, help = "Chunks loaded along X, overrides ocean.ron")]
    chunks_x: Option<i32>,

    #[arg(long, help = "Chunks loaded along Z, overrides ocean.ron")]
    chunks_z: Option<i32>,

    #[arg(short, long, value_enum, help = "Wave preset, overrides ocean.ron")]
    preset: Option<PresetArg>,
}

fn main() {
    let args = Args::parse();

    let config_folder_paths = get_config_folder_paths(args.config_folder_path);

    println!(
        "Starting application with config folder: {}",
        config_folder_paths.config_folder_path.display()
    );

    let preset = args.preset.map(WavePreset::from);
    let config: OceanConfig = load_ocean_config(&config_folder_paths).with_overrides(
        args.chunks_x,
        args.chunks_z,
        preset,
    );

    let streamer = match ChunkStreamer::new(config.chunks.clone(), config.waves.clone()) {
        Ok(streamer) => streamer,
        Err(err) => {
            eprintln!("Error: invalid chunk settings: {err}");
            eprintln!(
                "Check {} or the command-line overrides.",
                config_folder_paths.settings_file().display()
            );
            std::process::exit(1);
        }
    };

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: WINDOW_TITLE.to_string(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    app.insert_resource(get_bindings(&config_folder_paths))
        .insert_resource(OceanStreamer(streamer))
        .insert_resource(ActivePreset(preset))
        .insert_resource(config)
        .insert_resource(config_folder_paths)
        .insert_resource(ClearColor(Color::srgb(0.55, 0.75, 0.9)))
        .add_plugins((ViewerPlugin, StreamingPlugin, DebugHudPlugin))
        .run();
}

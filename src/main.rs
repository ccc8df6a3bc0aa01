use bevy::log::{Level, LogPlugin};
use bevy::window::{MonitorSelection, WindowMode};
use bevy_panorbit_camera::PanOrbitCameraPlugin;
use clap::Parser;
use panoview::cli::{Args, handle_print_config, handle_save_config, load_and_apply_config};
use panoview::prelude::*;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    let args = Args::parse();
    #[cfg(target_arch = "wasm32")]
    let args = Args::parse_from(["panoview"]);

    let config = match load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if args.print_config {
        if let Err(e) = handle_print_config(&config) {
            eprintln!("{e}");
            std::process::exit(1);
        }
        return;
    }

    if let Some(path) = &args.save_config {
        if let Err(e) = handle_save_config(&config, path) {
            eprintln!("{e}");
            std::process::exit(1);
        }
        return;
    }

    #[allow(unused_mut)]
    let mut window = Window {
        title: config.window.title.clone(),
        mode: if config.window.start_fullscreen {
            WindowMode::BorderlessFullscreen(MonitorSelection::Current)
        } else {
            WindowMode::Windowed
        },
        canvas: config.window.canvas.clone(),
        ..default()
    };

    // WASM: Fit canvas to parent element and leave touch gestures to the viewer.
    #[cfg(target_arch = "wasm32")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let default_plugins = DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(window),
            ..default()
        })
        .set(LogPlugin {
            level: log_level,
            ..default()
        });

    // Static hosts don't serve .meta files.
    #[cfg(target_arch = "wasm32")]
    let default_plugins = default_plugins.set(AssetPlugin {
        meta_check: bevy::asset::AssetMetaCheck::Never,
        ..default()
    });

    let mut app = App::new();

    app.add_plugins((
        default_plugins,
        PanOrbitCameraPlugin,
        ViewerPlugin::with_config(config),
    ));

    app.run();
}

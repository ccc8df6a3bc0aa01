//! Viewer plugin
//!
//! Owns the configuration, the viewer states, and the command stream, and
//! bundles every plugin that makes up the panorama viewer. Session-scoped
//! plugins hang their setup and teardown off `ViewerState::Open`.

use crate::plugins::camera::CameraPlugin;
use crate::plugins::control_mode::ControlModePlugin;
use crate::plugins::controls::ControlsPlugin;
use crate::plugins::fullscreen::FullscreenPlugin;
use crate::plugins::gyro_camera::GyroCameraPlugin;
use crate::plugins::panorama::PanoramaPlugin;
use crate::plugins::permission::PermissionPlugin;
use crate::plugins::sensor::SensorPlugin;
use crate::prelude::*;

/// Per-frame ordering: input becomes commands, commands take effect, then the
/// camera is written.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerSet {
    Input,
    Commands,
    Camera,
}

#[derive(Default)]
pub struct ViewerPlugin {
    config: Option<ViewerConfig>,
}

impl ViewerPlugin {
    /// Loads the configuration from the user's config file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `config` instead of reading the user's config file.
    pub fn with_config(config: ViewerConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(ViewerConfig::load_from_user_config);

        match config.to_toml() {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        app.insert_state(config.controls.initial_mode);
        app.insert_resource(config);

        app.init_state::<ViewerState>();
        app.add_sub_state::<PermissionState>();
        app.add_event::<ViewerCommand>();

        app.configure_sets(
            Update,
            (ViewerSet::Input, ViewerSet::Commands, ViewerSet::Camera).chain(),
        );

        app.add_systems(
            Update,
            (
                handle_viewer_visibility,
                #[cfg(not(target_arch = "wasm32"))]
                handle_quit,
            )
                .in_set(ViewerSet::Commands),
        );

        app.add_plugins((
            CameraPlugin,
            ControlsPlugin,
            ControlModePlugin,
            PermissionPlugin,
            SensorPlugin,
            PanoramaPlugin,
            GyroCameraPlugin,
            FullscreenPlugin,
        ));
    }
}

fn handle_viewer_visibility(
    mut commands: EventReader<ViewerCommand>,
    viewer_state: Res<State<ViewerState>>,
    mut next_state: ResMut<NextState<ViewerState>>,
) {
    // Only the last open/close in a frame counts.
    let target = commands
        .read()
        .filter_map(|command| match command {
            ViewerCommand::OpenViewer => Some(ViewerState::Open),
            ViewerCommand::CloseViewer => Some(ViewerState::Closed),
            _ => None,
        })
        .last();

    let Some(target) = target else {
        return;
    };

    if target != *viewer_state.get() {
        info!(?target, "Viewer state change");
        next_state.set(target);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn handle_quit(mut commands: EventReader<ViewerCommand>, mut exit: EventWriter<AppExit>) {
    let quit = commands
        .read()
        .filter(|command| **command == ViewerCommand::Quit)
        .count()
        > 0;
    if quit {
        info!("Quitting");
        exit.write(AppExit::Success);
    }
}

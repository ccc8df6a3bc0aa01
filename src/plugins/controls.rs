//! Controls plugin
//!
//! Translates keyboard input into [`ViewerCommand`] events. Any other input
//! surface (an embedding page, touch buttons) drives the viewer by writing the
//! same events.

use crate::prelude::*;

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, keyboard_input_handler.in_set(ViewerSet::Input));
    }
}

/// Handles keyboard input and emits ViewerCommand events
fn keyboard_input_handler(
    keys: Res<ButtonInput<KeyCode>>,
    viewer_state: Res<State<ViewerState>>,
    mut commands: EventWriter<ViewerCommand>,
) {
    for &keycode in keys.get_just_pressed() {
        match keycode {
            KeyCode::KeyG => {
                commands.write(ViewerCommand::ToggleControlMode);
            }
            KeyCode::KeyC => {
                commands.write(ViewerCommand::Recalibrate);
            }
            KeyCode::KeyF => {
                commands.write(ViewerCommand::ToggleFullscreen);
            }
            KeyCode::Enter => {
                commands.write(ViewerCommand::OpenViewer);
            }
            KeyCode::Escape => match viewer_state.get() {
                ViewerState::Open => {
                    commands.write(ViewerCommand::CloseViewer);
                }
                #[cfg(not(target_arch = "wasm32"))]
                ViewerState::Closed => {
                    commands.write(ViewerCommand::Quit);
                }
                #[cfg(target_arch = "wasm32")]
                ViewerState::Closed => {}
            },
            _ => {}
        }
    }
}

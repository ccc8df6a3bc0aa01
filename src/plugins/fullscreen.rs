//! Fullscreen plugin
//!
//! Toggles the viewer in and out of fullscreen through the platform. A request
//! only asks; the controller's state follows the platform's change
//! notifications, and a second toggle is ignored while a request is in flight.

use crate::platform::{self, FullscreenNotice, FullscreenPlatform, ListenerGuard};
use crate::prelude::*;
use bevy::window::PrimaryWindow;

/// The fullscreen implementation selected for this platform at startup.
pub struct FullscreenBackend(pub Box<dyn FullscreenPlatform>);

/// The live fullscreen listener for the current session.
pub struct FullscreenWatch(pub ListenerGuard);

#[derive(Resource, Debug, Default)]
pub struct FullscreenController {
    active: bool,
    pending: bool,
    notices: Option<async_channel::Receiver<FullscreenNotice>>,
}

impl FullscreenController {
    /// Fullscreen state as last reported by the platform.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a request has been issued and not yet answered.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Applies a platform notification.
    pub fn apply(&mut self, notice: FullscreenNotice) {
        match notice {
            FullscreenNotice::Changed { active } => {
                if self.active != active {
                    info!(active, "Fullscreen changed");
                }
                self.active = active;
            }
            FullscreenNotice::Rejected => {
                warn!("Fullscreen request was rejected");
            }
        }
        self.pending = false;
    }
}

pub struct FullscreenPlugin;

impl Plugin for FullscreenPlugin {
    fn build(&self, app: &mut App) {
        app.insert_non_send_resource(FullscreenBackend(platform::fullscreen_platform()));
        app.init_resource::<FullscreenController>();

        app.add_systems(OnEnter(ViewerState::Open), watch_fullscreen);
        app.add_systems(OnExit(ViewerState::Open), unwatch_fullscreen);
        app.add_systems(
            PreUpdate,
            drain_fullscreen_notices.run_if(in_state(ViewerState::Open)),
        );
        app.add_systems(
            Update,
            handle_toggle_fullscreen
                .in_set(ViewerSet::Commands)
                .run_if(in_state(ViewerState::Open)),
        );
    }
}

fn watch_fullscreen(world: &mut World) {
    if world.contains_non_send::<FullscreenWatch>() {
        return;
    }

    let (sink, notices) = async_channel::unbounded();

    let mut windows = world.query_filtered::<&Window, With<PrimaryWindow>>();
    let active = {
        let backend = world.non_send_resource::<FullscreenBackend>();
        windows
            .iter(world)
            .next()
            .is_some_and(|window| backend.0.is_fullscreen(window))
    };
    let guard = world.non_send_resource::<FullscreenBackend>().0.watch(sink);
    world.insert_non_send_resource(FullscreenWatch(guard));

    let mut controller = world.resource_mut::<FullscreenController>();
    controller.active = active;
    controller.pending = false;
    controller.notices = Some(notices);
}

fn unwatch_fullscreen(world: &mut World) {
    world.remove_non_send_resource::<FullscreenWatch>();

    let mut controller = world.resource_mut::<FullscreenController>();
    controller.notices = None;
    controller.pending = false;
}

fn drain_fullscreen_notices(
    mut backend: NonSendMut<FullscreenBackend>,
    mut controller: ResMut<FullscreenController>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some(notices) = controller.notices.clone() else {
        return;
    };

    if let Ok(window) = windows.single() {
        backend.0.sync(window);
    }

    while let Ok(notice) = notices.try_recv() {
        controller.apply(notice);
    }
}

fn handle_toggle_fullscreen(
    mut commands: EventReader<ViewerCommand>,
    mut backend: NonSendMut<FullscreenBackend>,
    mut controller: ResMut<FullscreenController>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    for command in commands.read() {
        if *command != ViewerCommand::ToggleFullscreen {
            continue;
        }

        if controller.pending {
            debug!("Fullscreen request already pending");
            continue;
        }

        let Ok(mut window) = windows.single_mut() else {
            warn!("No primary window to show fullscreen");
            continue;
        };

        let enter = !controller.active;
        match backend.0.request(enter, &mut window) {
            Ok(()) => {
                debug!(enter, "Fullscreen requested");
                controller.pending = true;
            }
            Err(err) => warn!("{err}"),
        }
    }
}

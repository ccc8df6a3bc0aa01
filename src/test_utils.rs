//! Test utilities for plugin testing

use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput, NativeKey};
use bevy::window::PrimaryWindow;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::platform::{
    FullscreenError, FullscreenNotice, FullscreenPlatform, FullscreenSink, ListenerGuard,
    OrientationSource, PermissionNegotiator, PermissionReply, SampleSink,
};
use crate::plugins::fullscreen::FullscreenBackend;
use crate::plugins::panorama::PanoramaReadiness;
use crate::plugins::permission::PermissionBackend;
use crate::plugins::sensor::OrientationBackend;
use crate::prelude::*;

/// Creates a minimal test app with core Bevy plugins needed for testing
pub fn create_test_app() -> App {
    let mut app = App::new();

    // Add minimal plugins needed for testing
    app.add_plugins((
        MinimalPlugins,
        bevy::asset::AssetPlugin::default(),
        bevy::input::InputPlugin,
        bevy::state::app::StatesPlugin,
        bevy::transform::TransformPlugin,
    ));

    // Initialize assets needed by the panorama plugin
    app.init_asset::<Image>();
    app.init_asset::<bevy::render::mesh::Mesh>();
    app.init_asset::<bevy::pbr::StandardMaterial>();

    app.world_mut().spawn((Window::default(), PrimaryWindow));

    app
}

/// Platform doubles wired into a viewer test app.
pub struct ScriptedPlatform {
    pub permission: ScriptedPermission,
    pub sensor: ScriptedOrientationSource,
    pub fullscreen: ScriptedFullscreen,
}

/// Creates a test app running the full viewer with scripted platform doubles
/// in place of the real permission prompt, sensor, and fullscreen API.
///
/// Nothing has run yet when this returns; the first `update` opens the viewer
/// and issues the permission request.
pub fn create_viewer_app(config: ViewerConfig) -> (App, ScriptedPlatform) {
    let mut app = create_test_app();
    app.add_plugins(ViewerPlugin::with_config(config));

    let platform = ScriptedPlatform {
        permission: ScriptedPermission::default(),
        sensor: ScriptedOrientationSource::default(),
        fullscreen: ScriptedFullscreen::default(),
    };

    app.insert_non_send_resource(PermissionBackend(Box::new(platform.permission.clone())));
    app.insert_non_send_resource(OrientationBackend(Box::new(platform.sensor.clone())));
    app.insert_non_send_resource(FullscreenBackend(Box::new(platform.fullscreen.clone())));

    (app, platform)
}

/// Opens the readiness gate as if the panorama had finished loading.
pub fn mark_panorama_loaded(app: &mut App) {
    app.world_mut()
        .resource_mut::<PanoramaReadiness>()
        .mark_ready();
}

/// Writes a command event, as the keyboard handler or an embedding page would.
pub fn send_command(app: &mut App, command: ViewerCommand) {
    app.world_mut().send_event(command);
}

/// Queues a key-down event for the primary window.
///
/// Unlike [`press_key`], this goes through the input plugin, so the key reads
/// as just pressed during the next update.
pub fn tap_key(app: &mut App, key: KeyCode) {
    let mut windows = app
        .world_mut()
        .query_filtered::<Entity, With<PrimaryWindow>>();
    let Some(window) = windows.iter(app.world()).next() else {
        return;
    };

    app.world_mut().send_event(KeyboardInput {
        key_code: key,
        logical_key: Key::Unidentified(NativeKey::Unidentified),
        state: ButtonState::Pressed,
        text: None,
        repeat: false,
        window,
    });
}

/// Helper to simulate a key press
pub fn press_key(app: &mut App, key: KeyCode) {
    // Clear the input state to ensure just_pressed works correctly
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .clear();
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
}

/// Helper to simulate a key release
pub fn release_key(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .release(key);
}

/// Permission negotiator that holds every request until the test answers it.
#[derive(Clone, Default)]
pub struct ScriptedPermission {
    pending: Rc<RefCell<Vec<PermissionReply>>>,
    requests: Rc<Cell<usize>>,
}

impl ScriptedPermission {
    /// Number of requests issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.get()
    }

    /// Answers every request still waiting.
    pub fn resolve(&self, state: PermissionState) {
        for reply in self.pending.borrow_mut().drain(..) {
            reply.resolve(state);
        }
    }
}

impl PermissionNegotiator for ScriptedPermission {
    fn request(&self, reply: PermissionReply) {
        self.requests.set(self.requests.get() + 1);
        self.pending.borrow_mut().push(reply);
    }
}

/// Orientation source the test feeds by hand.
#[derive(Clone, Default)]
pub struct ScriptedOrientationSource {
    sink: Rc<RefCell<Option<SampleSink>>>,
}

impl ScriptedOrientationSource {
    pub fn is_attached(&self) -> bool {
        self.sink.borrow().is_some()
    }

    /// Delivers a reading, as the platform event would. Returns `false` when no
    /// listener is attached.
    pub fn emit(&self, sample: OrientationSample) -> bool {
        match self.sink.borrow().as_ref() {
            Some(sink) => sink.force_send(sample).is_ok(),
            None => false,
        }
    }
}

impl OrientationSource for ScriptedOrientationSource {
    fn subscribe(&self, sink: SampleSink) -> ListenerGuard {
        *self.sink.borrow_mut() = Some(sink);

        let slot = Rc::clone(&self.sink);
        ListenerGuard::new(move || {
            slot.borrow_mut().take();
        })
    }
}

/// Fullscreen platform that records requests and reports changes only when
/// the test says so.
#[derive(Clone, Default)]
pub struct ScriptedFullscreen {
    requests: Rc<RefCell<Vec<bool>>>,
    refuse: Rc<Cell<bool>>,
    sink: Rc<RefCell<Option<FullscreenSink>>>,
}

impl ScriptedFullscreen {
    /// Every request so far; `true` asked to enter fullscreen.
    pub fn requests(&self) -> Vec<bool> {
        self.requests.borrow().clone()
    }

    /// Makes the following requests fail synchronously.
    pub fn refuse_requests(&self, refuse: bool) {
        self.refuse.set(refuse);
    }

    pub fn is_watched(&self) -> bool {
        self.sink.borrow().is_some()
    }

    /// Delivers a notification, as the platform event would.
    pub fn notify(&self, notice: FullscreenNotice) -> bool {
        match self.sink.borrow().as_ref() {
            Some(sink) => sink.try_send(notice).is_ok(),
            None => false,
        }
    }
}

impl FullscreenPlatform for ScriptedFullscreen {
    fn request(&mut self, enter: bool, _window: &mut Window) -> Result<(), FullscreenError> {
        self.requests.borrow_mut().push(enter);
        if self.refuse.get() {
            return Err(FullscreenError::Rejected("refused by test".into()));
        }
        Ok(())
    }

    fn is_fullscreen(&self, _window: &Window) -> bool {
        false
    }

    fn watch(&self, sink: FullscreenSink) -> ListenerGuard {
        *self.sink.borrow_mut() = Some(sink);

        let slot = Rc::clone(&self.sink);
        ListenerGuard::new(move || {
            slot.borrow_mut().take();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert!(app.world().contains_resource::<Time>());
        assert!(app.world().contains_resource::<ButtonInput<KeyCode>>());
    }

    #[test]
    fn test_key_helpers() {
        let mut app = create_test_app();

        press_key(&mut app, KeyCode::KeyG);
        let input = app.world().resource::<ButtonInput<KeyCode>>();
        assert!(input.pressed(KeyCode::KeyG));

        release_key(&mut app, KeyCode::KeyG);
        app.update(); // Need to update for release to take effect
        let input = app.world().resource::<ButtonInput<KeyCode>>();
        assert!(!input.pressed(KeyCode::KeyG));
    }

    #[test]
    fn test_scripted_source_stops_after_guard_drop() {
        let source = ScriptedOrientationSource::default();
        let (sink, receiver) = async_channel::bounded(1);

        let guard = source.subscribe(sink);
        assert!(source.emit(OrientationSample::from_degrees(1.0, 2.0, 3.0)));
        assert!(receiver.try_recv().is_ok());

        drop(guard);
        assert!(!source.is_attached());
        assert!(!source.emit(OrientationSample::from_degrees(1.0, 2.0, 3.0)));
    }
}

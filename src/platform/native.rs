use super::{FullscreenNotice, FullscreenPlatform, FullscreenSink, ListenerGuard};
use super::{FullscreenError, OrientationSource, SampleSink};
use bevy::prelude::*;
use bevy::window::{MonitorSelection, WindowMode};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Desktops have no orientation sensor; the subscription never emits.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSensor;

impl OrientationSource for NoSensor {
    fn subscribe(&self, _sink: SampleSink) -> ListenerGuard {
        debug!("No orientation sensor on this platform");
        ListenerGuard::inert()
    }
}

/// Fullscreen through the primary window's mode.
///
/// A request only writes the window's mode; the window system applies it at the
/// end of the frame. The change is reported by the next frame's `sync`, from the
/// mode the window then holds. Bevy surfaces no refusal from the window system,
/// so the window's mode is the best available record of the state.
#[derive(Debug, Default)]
pub struct WindowFullscreen {
    sink: Rc<RefCell<Option<FullscreenSink>>>,
    reported: Cell<Option<bool>>,
}

impl WindowFullscreen {
    fn notify(&self, active: bool) {
        if let Some(sink) = self.sink.borrow().as_ref() {
            let _ = sink.try_send(FullscreenNotice::Changed { active });
            self.reported.set(Some(active));
        }
    }
}

impl FullscreenPlatform for WindowFullscreen {
    fn request(&mut self, enter: bool, window: &mut Window) -> Result<(), FullscreenError> {
        if self.is_fullscreen(window) == enter {
            // Nothing will change for sync to see.
            self.notify(enter);
            return Ok(());
        }

        window.mode = if enter {
            WindowMode::BorderlessFullscreen(MonitorSelection::Current)
        } else {
            WindowMode::Windowed
        };
        Ok(())
    }

    fn is_fullscreen(&self, window: &Window) -> bool {
        !matches!(window.mode, WindowMode::Windowed)
    }

    fn sync(&mut self, window: &Window) {
        let active = self.is_fullscreen(window);
        if self.reported.get() != Some(active) {
            self.notify(active);
        }
    }

    fn watch(&self, sink: FullscreenSink) -> ListenerGuard {
        *self.sink.borrow_mut() = Some(sink);
        self.reported.set(None);

        let slot = Rc::clone(&self.sink);
        ListenerGuard::new(move || {
            slot.borrow_mut().take();
        })
    }
}

use super::{FullscreenError, FullscreenNotice, FullscreenPlatform, FullscreenSink};
use super::{ListenerGuard, OrientationSource, PermissionNegotiator, PermissionReply, SampleSink};
use crate::orientation::OrientationSample;
use crate::states::PermissionState;
use bevy::prelude::*;
use bevy::tasks::AsyncComputeTaskPool;
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

const ORIENTATION_EVENT: &str = "deviceorientation";
const FULLSCREEN_CHANGE_EVENT: &str = "fullscreenchange";
const FULLSCREEN_ERROR_EVENT: &str = "fullscreenerror";

/// Looks up `DeviceOrientationEvent.requestPermission`, which only browsers that
/// gate the sensor behind a prompt define.
fn permission_prompt() -> Option<(JsValue, Function)> {
    let constructor = Reflect::get(&js_sys::global(), &JsValue::from_str("DeviceOrientationEvent")).ok()?;
    if constructor.is_undefined() {
        return None;
    }

    let request = Reflect::get(&constructor, &JsValue::from_str("requestPermission")).ok()?;
    let request = request.dyn_into::<Function>().ok()?;
    Some((constructor, request))
}

pub(super) fn has_permission_prompt() -> bool {
    permission_prompt().is_some()
}

/// Browsers that require `DeviceOrientationEvent.requestPermission()` from a
/// user gesture before orientation events are delivered.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptPermission;

impl PermissionNegotiator for PromptPermission {
    fn request(&self, reply: PermissionReply) {
        let Some((constructor, request)) = permission_prompt() else {
            reply.resolve(PermissionState::Granted);
            return;
        };

        // The call itself has to happen synchronously in the gesture handler;
        // only the promise is awaited.
        let promise = match request.call0(&constructor) {
            Ok(value) => value,
            Err(err) => {
                warn!(?err, "Orientation permission request threw");
                reply.resolve(PermissionState::Denied);
                return;
            }
        };

        let Ok(promise) = promise.dyn_into::<Promise>() else {
            warn!("Orientation permission request did not return a promise");
            reply.resolve(PermissionState::Denied);
            return;
        };

        AsyncComputeTaskPool::get()
            .spawn_local(async move {
                let state = match JsFuture::from(promise).await {
                    Ok(value) if value.as_string().as_deref() == Some("granted") => {
                        PermissionState::Granted
                    }
                    Ok(value) => {
                        info!(?value, "Orientation permission not granted");
                        PermissionState::Denied
                    }
                    Err(err) => {
                        warn!(?err, "Orientation permission request rejected");
                        PermissionState::Denied
                    }
                };
                reply.resolve(state);
            })
            .detach();
    }
}

/// `deviceorientation` events on the browser window.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebOrientationSource;

impl OrientationSource for WebOrientationSource {
    fn subscribe(&self, sink: SampleSink) -> ListenerGuard {
        let Some(window) = web_sys::window() else {
            warn!("No browser window; orientation events unavailable");
            return ListenerGuard::inert();
        };

        let callback = Closure::<dyn FnMut(web_sys::DeviceOrientationEvent)>::new(
            move |event: web_sys::DeviceOrientationEvent| {
                let sample = OrientationSample::new(
                    event.alpha().map(|degrees| degrees as f32),
                    event.beta().map(|degrees| degrees as f32),
                    event.gamma().map(|degrees| degrees as f32),
                );
                // Capacity one: the newest reading displaces the unread one.
                let _ = sink.force_send(sample);
            },
        );

        if let Err(err) = window
            .add_event_listener_with_callback(ORIENTATION_EVENT, callback.as_ref().unchecked_ref())
        {
            warn!(?err, "Failed to attach orientation listener");
            return ListenerGuard::inert();
        }

        ListenerGuard::new(move || {
            let _ = window.remove_event_listener_with_callback(
                ORIENTATION_EVENT,
                callback.as_ref().unchecked_ref(),
            );
            drop(callback);
        })
    }
}

/// The document Fullscreen API.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebFullscreen;

fn document() -> Result<web_sys::Document, FullscreenError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or(FullscreenError::Unavailable("no document"))
}

impl FullscreenPlatform for WebFullscreen {
    fn request(&mut self, enter: bool, window: &mut Window) -> Result<(), FullscreenError> {
        let document = document()?;

        if !enter {
            document.exit_fullscreen();
            return Ok(());
        }

        let container = window
            .canvas
            .as_deref()
            .and_then(|selector| document.query_selector(selector).ok().flatten())
            .or_else(|| document.document_element())
            .ok_or(FullscreenError::Unavailable("no element to show fullscreen"))?;

        container
            .request_fullscreen()
            .map_err(|err| FullscreenError::Rejected(format!("{err:?}")))
    }

    fn is_fullscreen(&self, _window: &Window) -> bool {
        document_is_fullscreen()
    }

    fn watch(&self, sink: FullscreenSink) -> ListenerGuard {
        let Ok(document) = document() else {
            return ListenerGuard::inert();
        };

        let change_sink = sink.clone();
        let on_change = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            let active = document_is_fullscreen();
            let _ = change_sink.try_send(FullscreenNotice::Changed { active });
        });
        let on_error = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            let _ = sink.try_send(FullscreenNotice::Rejected);
        });

        let attached = document
            .add_event_listener_with_callback(
                FULLSCREEN_CHANGE_EVENT,
                on_change.as_ref().unchecked_ref(),
            )
            .and_then(|()| {
                document.add_event_listener_with_callback(
                    FULLSCREEN_ERROR_EVENT,
                    on_error.as_ref().unchecked_ref(),
                )
            });
        if let Err(err) = attached {
            warn!(?err, "Failed to attach fullscreen listeners");
        }

        ListenerGuard::new(move || {
            let _ = document.remove_event_listener_with_callback(
                FULLSCREEN_CHANGE_EVENT,
                on_change.as_ref().unchecked_ref(),
            );
            let _ = document.remove_event_listener_with_callback(
                FULLSCREEN_ERROR_EVENT,
                on_error.as_ref().unchecked_ref(),
            );
            drop(on_change);
            drop(on_error);
        })
    }
}

fn document_is_fullscreen() -> bool {
    document()
        .ok()
        .and_then(|document| document.fullscreen_element())
        .is_some()
}

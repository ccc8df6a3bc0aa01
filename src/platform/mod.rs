//! Platform seams
//!
//! Everything that differs between a desktop window and a browser tab sits
//! behind the traits in this module: the orientation permission prompt, the
//! orientation event stream, and the fullscreen API. Implementations are picked
//! once at startup by the constructor functions at the bottom of this file.
//!
//! Platform callbacks never touch the ECS world directly. They push into
//! channels that the plugins drain once per frame.

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use native::{NoSensor, WindowFullscreen};
#[cfg(target_arch = "wasm32")]
pub use web::{PromptPermission, WebFullscreen, WebOrientationSource};

use crate::orientation::OrientationSample;
use crate::states::PermissionState;
use bevy::prelude::*;
use std::fmt;

/// Receives orientation readings from the platform listener.
pub type SampleSink = async_channel::Sender<OrientationSample>;

/// Receives fullscreen notifications from the platform listener.
pub type FullscreenSink = async_channel::Sender<FullscreenNotice>;

/// One-shot handle through which a permission request reports its outcome.
#[derive(Clone, Debug)]
pub struct PermissionReply(async_channel::Sender<PermissionState>);

impl PermissionReply {
    pub fn new(sender: async_channel::Sender<PermissionState>) -> Self {
        Self(sender)
    }

    /// Reports the outcome. Replies sent after the viewer closed are dropped.
    pub fn resolve(&self, state: PermissionState) {
        if self.0.try_send(state).is_err() {
            debug!(?state, "Permission reply dropped");
        }
    }
}

/// Capability check that gates access to the orientation sensor.
pub trait PermissionNegotiator: 'static {
    /// Starts the request. The outcome arrives on `reply`, possibly later.
    fn request(&self, reply: PermissionReply);
}

/// Platforms that expose orientation without asking.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysGranted;

impl PermissionNegotiator for AlwaysGranted {
    fn request(&self, reply: PermissionReply) {
        reply.resolve(PermissionState::Granted);
    }
}

/// Source of device-orientation readings.
pub trait OrientationSource: 'static {
    /// Starts forwarding readings into `sink` until the guard is dropped.
    fn subscribe(&self, sink: SampleSink) -> ListenerGuard;
}

/// What the platform reports back after a fullscreen request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenNotice {
    /// The fullscreen state changed; `active` is the state now in effect.
    Changed { active: bool },
    /// The platform refused the last request.
    Rejected,
}

/// Fullscreen toggling for the viewer's container.
pub trait FullscreenPlatform: 'static {
    /// Asks the platform to enter or leave fullscreen.
    ///
    /// `Ok` only means the request was issued; the state changes when a
    /// [`FullscreenNotice`] arrives.
    fn request(&mut self, enter: bool, window: &mut Window) -> Result<(), FullscreenError>;

    /// Whether the viewer is in fullscreen right now.
    fn is_fullscreen(&self, window: &Window) -> bool;

    /// Called once per frame, before notifications are read, for platforms that
    /// observe fullscreen changes on the window rather than through an event.
    fn sync(&mut self, _window: &Window) {}

    /// Starts forwarding fullscreen notifications into `sink` until the guard is
    /// dropped.
    fn watch(&self, sink: FullscreenSink) -> ListenerGuard;
}

/// A fullscreen request the platform refused outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullscreenError {
    /// The platform has no fullscreen support or no element to put in it.
    Unavailable(&'static str),
    /// The platform threw while handling the request.
    Rejected(String),
}

impl fmt::Display for FullscreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FullscreenError::Unavailable(what) => write!(f, "fullscreen unavailable: {what}"),
            FullscreenError::Rejected(msg) => write!(f, "fullscreen request rejected: {msg}"),
        }
    }
}

impl std::error::Error for FullscreenError {}

/// Owned platform listener. Dropping it detaches the listener.
#[must_use = "dropping the guard detaches the listener immediately"]
pub struct ListenerGuard {
    detach: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// A guard with nothing to detach, for platforms without the listener.
    pub fn inert() -> Self {
        Self { detach: None }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// Picks the permission negotiator for the running platform.
pub fn permission_negotiator() -> Box<dyn PermissionNegotiator> {
    #[cfg(target_arch = "wasm32")]
    {
        if web::has_permission_prompt() {
            info!("Orientation access requires a permission prompt");
            return Box::new(PromptPermission);
        }
    }

    Box::new(AlwaysGranted)
}

/// Picks the orientation source for the running platform.
pub fn orientation_source() -> Box<dyn OrientationSource> {
    #[cfg(target_arch = "wasm32")]
    return Box::new(WebOrientationSource);

    #[cfg(not(target_arch = "wasm32"))]
    Box::new(NoSensor)
}

/// Picks the fullscreen implementation for the running platform.
pub fn fullscreen_platform() -> Box<dyn FullscreenPlatform> {
    #[cfg(target_arch = "wasm32")]
    return Box::new(WebFullscreen);

    #[cfg(not(target_arch = "wasm32"))]
    Box::new(WindowFullscreen::default())
}

//! Sensor plugin
//!
//! Keeps the latest device-orientation reading while the viewer is open and
//! permission has been granted. The platform listener is an owned guard: it is
//! attached when permission is granted and dropped, detaching the listener,
//! when the viewer closes.

use crate::platform::{self, ListenerGuard, OrientationSource, SampleSink};
use crate::prelude::*;

/// The orientation source selected for this platform at startup.
pub struct OrientationBackend(pub Box<dyn OrientationSource>);

/// The live platform subscription for the current session.
pub struct OrientationSubscription(pub ListenerGuard);

/// Latest-value store for orientation readings.
///
/// Readings overwrite each other; nothing is queued. Until the first reading
/// arrives, and whenever no listener is attached, the latest reading is empty.
#[derive(Resource, Debug, Default)]
pub struct OrientationSampler {
    latest: OrientationSample,
    receiver: Option<async_channel::Receiver<OrientationSample>>,
}

impl OrientationSampler {
    pub fn latest(&self) -> OrientationSample {
        self.latest
    }

    pub fn is_listening(&self) -> bool {
        self.receiver.is_some()
    }

    /// Opens a fresh capacity-one channel and returns its sending half.
    fn attach(&mut self) -> SampleSink {
        let (sink, receiver) = async_channel::bounded(1);
        self.receiver = Some(receiver);
        self.latest = OrientationSample::EMPTY;
        sink
    }

    fn detach(&mut self) {
        self.receiver = None;
        self.latest = OrientationSample::EMPTY;
    }

    /// Adopts whatever arrived since the last frame. Returns whether anything did.
    pub fn drain(&mut self) -> bool {
        let Some(receiver) = self.receiver.as_ref() else {
            return false;
        };

        let mut updated = false;
        while let Ok(sample) = receiver.try_recv() {
            self.latest = sample;
            updated = true;
        }
        updated
    }
}

pub struct SensorPlugin;

impl Plugin for SensorPlugin {
    fn build(&self, app: &mut App) {
        app.insert_non_send_resource(OrientationBackend(platform::orientation_source()));
        app.init_resource::<OrientationSampler>();

        app.add_systems(OnEnter(PermissionState::Granted), attach_orientation_listener);
        app.add_systems(OnExit(ViewerState::Open), detach_orientation_listener);
        app.add_systems(
            PreUpdate,
            sample_orientation.run_if(in_state(PermissionState::Granted)),
        );
    }
}

fn attach_orientation_listener(world: &mut World) {
    if world.contains_non_send::<OrientationSubscription>() {
        return;
    }

    let sink = world.resource_mut::<OrientationSampler>().attach();
    let guard = world.non_send_resource::<OrientationBackend>().0.subscribe(sink);
    world.insert_non_send_resource(OrientationSubscription(guard));

    info!("Listening for device orientation");
}

fn detach_orientation_listener(world: &mut World) {
    world.remove_non_send_resource::<OrientationSubscription>();

    let mut sampler = world.resource_mut::<OrientationSampler>();
    if sampler.is_listening() {
        info!("Stopped listening for device orientation");
    }
    sampler.detach();
}

fn sample_orientation(mut sampler: ResMut<OrientationSampler>) {
    if sampler.drain() {
        trace!(sample = ?sampler.latest(), "Orientation reading");
    }
}

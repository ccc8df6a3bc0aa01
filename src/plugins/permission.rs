//! Permission plugin
//!
//! Runs the orientation capability check once per viewing session. The request
//! is issued when the viewer opens; its outcome moves [`PermissionState`] out of
//! `Pending` exactly once. A negotiator that drops its reply without answering
//! counts as a denial. A request still unanswered when the viewer closes is
//! not issued again on reopen; its answer applies to the reopened session.

use crate::platform::{self, PermissionNegotiator, PermissionReply};
use crate::prelude::*;
use async_channel::TryRecvError;

/// The negotiator selected for this platform at startup.
///
/// Non-send because browser negotiators hold JavaScript handles.
pub struct PermissionBackend(pub Box<dyn PermissionNegotiator>);

/// The request in flight for the current session, if any.
#[derive(Resource, Debug, Default)]
pub struct PermissionRequest {
    reply: Option<async_channel::Receiver<PermissionState>>,
}

impl PermissionRequest {
    pub fn is_pending(&self) -> bool {
        self.reply.is_some()
    }
}

pub struct PermissionPlugin;

impl Plugin for PermissionPlugin {
    fn build(&self, app: &mut App) {
        app.insert_non_send_resource(PermissionBackend(platform::permission_negotiator()));
        app.init_resource::<PermissionRequest>();

        app.add_systems(OnEnter(ViewerState::Open), request_permission);
        app.add_systems(OnExit(ViewerState::Open), keep_permission_request);
        app.add_systems(
            PreUpdate,
            poll_permission_reply.run_if(in_state(PermissionState::Pending)),
        );
    }
}

fn request_permission(backend: NonSend<PermissionBackend>, mut request: ResMut<PermissionRequest>) {
    if request.is_pending() {
        debug!("Permission request already in flight");
        return;
    }

    let (reply_tx, reply_rx) = async_channel::bounded(1);
    request.reply = Some(reply_rx);

    debug!("Requesting orientation permission");
    backend.0.request(PermissionReply::new(reply_tx));
}

fn poll_permission_reply(
    mut request: ResMut<PermissionRequest>,
    mut next_state: ResMut<NextState<PermissionState>>,
) {
    let Some(reply) = request.reply.as_ref() else {
        return;
    };

    let outcome = match reply.try_recv() {
        Ok(PermissionState::Pending) | Err(TryRecvError::Empty) => return,
        Ok(state) => state,
        Err(TryRecvError::Closed) => {
            warn!("Permission request ended without an answer");
            PermissionState::Denied
        }
    };

    match outcome {
        PermissionState::Granted => info!("Orientation permission granted"),
        _ => info!("Orientation permission denied; gyro control unavailable this session"),
    }

    request.reply = None;
    next_state.set(outcome);
}

// An unanswered request outlives the session; its answer settles the next one.
fn keep_permission_request(request: Res<PermissionRequest>) {
    if request.is_pending() {
        debug!("Viewer closed with a permission request in flight");
    }
}

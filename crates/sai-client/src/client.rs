//! Entry-point object, lifecycle, and request marshalling.

use crate::notifications::{notification_worker, NotificationHandlers};
use crate::state::LibraryState;
use sai_attr::codec::{deserialize_attrs, serialize_attrs, FieldValue};
use sai_attr::Attribute;
use sai_bus::{ops, store, Bus, BusError, BusMessage, BusQueue, Selected, WakeEvent};
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// How long synchronous waits (gets, view transitions) block for a reply.
pub(crate) const RESPONSE_TIMEOUT: Duration = Duration::from_secs(60);

/// The two-phase reconfiguration operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTransition {
    /// Open a candidate view; subsequent mutations are compiled, not applied.
    InitView,
    /// Diff the candidate against the current view and apply the difference.
    ApplyView,
}

impl ViewTransition {
    pub fn op_name(self) -> &'static str {
        match self {
            ViewTransition::InitView => ops::VIEW_INIT,
            ViewTransition::ApplyView => ops::VIEW_APPLY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwitchPhase {
    Uninitialized,
    Initialized,
    Shutdown,
}

struct Lifecycle {
    phase: SwitchPhase,
    worker: Option<JoinHandle<()>>,
    stop: WakeEvent,
}

/// The client-side switch API.
///
/// Cheap to share: entry points take `&self` and serialize through the
/// internal API lock.
pub struct SaiClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) bus: Arc<dyn Bus>,
    pub(crate) state: Mutex<LibraryState>,
    lifecycle: Mutex<Lifecycle>,
    response_timeout: Duration,
}

impl SaiClient {
    pub fn new(bus: Arc<dyn Bus>) -> Self {
        SaiClient::with_response_timeout(bus, RESPONSE_TIMEOUT)
    }

    /// Overrides the synchronous-reply timeout (tests use short ones).
    pub fn with_response_timeout(bus: Arc<dyn Bus>, response_timeout: Duration) -> Self {
        SaiClient {
            inner: Arc::new(ClientInner {
                bus,
                state: Mutex::new(LibraryState::new()),
                lifecycle: Mutex::new(Lifecycle {
                    phase: SwitchPhase::Uninitialized,
                    worker: None,
                    stop: WakeEvent::new(),
                }),
                response_timeout,
            }),
        }
    }

    /// Initializes the switch, driving the daemon through `transition`.
    ///
    /// Blocks until the daemon acknowledges the view operation or the
    /// timeout elapses (`FAILURE`). Calling this again on an initialized
    /// switch with [`ViewTransition::InitView`] flushes the local indices
    /// (the new candidate view starts from a fresh slate) and keeps the
    /// running notification worker.
    pub fn initialize(
        &self,
        transition: ViewTransition,
        handlers: NotificationHandlers,
    ) -> SaiResult<()> {
        let mut lifecycle = self.inner.lifecycle.lock().unwrap();

        let status = self.inner.notify_view(transition.op_name());
        if !status.is_success() {
            error!(op = transition.op_name(), %status, "view transition rejected");
            return Err(status);
        }
        info!(op = transition.op_name(), "view transition acknowledged");

        if lifecycle.phase == SwitchPhase::Initialized {
            if transition == ViewTransition::InitView {
                info!("init view on an initialized switch, flushing local state");
                self.inner.state.lock().unwrap().reset();
            }
            return Ok(());
        }

        self.inner.state.lock().unwrap().reset();

        let stop = WakeEvent::new();
        let worker_inner = Arc::clone(&self.inner);
        let worker_stop = stop.clone();
        let worker = std::thread::Builder::new()
            .name("sai-notifications".to_string())
            .spawn(move || notification_worker(worker_inner, handlers, worker_stop))
            .map_err(|e| {
                error!(error = %e, "failed to spawn notification worker");
                Status::Failure
            })?;

        lifecycle.stop = stop;
        lifecycle.worker = Some(worker);
        lifecycle.phase = SwitchPhase::Initialized;
        Ok(())
    }

    /// Tears the switch down: signals the notification worker, joins it,
    /// and forgets the handler table.
    pub fn shutdown(&self) -> SaiResult<()> {
        let mut lifecycle = self.inner.lifecycle.lock().unwrap();
        if lifecycle.phase != SwitchPhase::Initialized {
            warn!("shutdown called on uninitialized switch");
            return Err(Status::Uninitialized);
        }

        lifecycle.stop.notify();
        if let Some(worker) = lifecycle.worker.take() {
            if worker.join().is_err() {
                error!("notification worker panicked");
            }
        }
        lifecycle.phase = SwitchPhase::Shutdown;
        Ok(())
    }
}

impl ClientInner {
    /// Draws a fresh virtual id for `kind` from the shared counter.
    pub(crate) fn allocate_vid(&self, kind: ObjectType) -> SaiResult<ObjectId> {
        let counter = self.bus.incr(store::VID_COUNTER).map_err(bus_failure)?;
        let vid = ObjectId::pack(kind, counter);
        debug!(%vid, %kind, "allocated virtual id");
        Ok(vid)
    }

    pub(crate) fn push_create(
        &self,
        kind: ObjectType,
        object_ref: &str,
        attrs: &[Attribute],
    ) -> SaiResult<()> {
        let fields = self.serialize(kind, attrs)?;
        self.push(kind, object_ref, ops::OP_CREATE, fields)
    }

    pub(crate) fn push_remove(&self, kind: ObjectType, object_ref: &str) -> SaiResult<()> {
        self.push(kind, object_ref, ops::OP_REMOVE, vec![])
    }

    pub(crate) fn push_set(
        &self,
        kind: ObjectType,
        object_ref: &str,
        attr: &Attribute,
    ) -> SaiResult<()> {
        let fields = self.serialize(kind, std::slice::from_ref(attr))?;
        self.push(kind, object_ref, ops::OP_SET, fields)
    }

    /// Issues a get and blocks for the paired response.
    ///
    /// On success the returned values are copied into `attrs`. On
    /// `BUFFER_OVERFLOW` the list-valued attributes are resized to the
    /// required element counts (contents undefined) and the status is
    /// returned as the error.
    pub(crate) fn get_attributes(
        &self,
        kind: ObjectType,
        object_ref: &str,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let fields = self.serialize(kind, attrs)?;
        let key = format!("{}:{}", kind.name(), object_ref);
        self.bus
            .push(BusQueue::GetRequest, BusMessage::new(key, ops::OP_GET, fields))
            .map_err(bus_failure)?;
        self.wait_get_response(kind, attrs)
    }

    fn wait_get_response(&self, kind: ObjectType, attrs: &mut [Attribute]) -> SaiResult<()> {
        let deadline = Instant::now() + self.response_timeout;
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .ok_or(Status::Failure)?;
            match self
                .bus
                .select(&[BusQueue::GetResponse], None, Some(remaining))
                .map_err(bus_failure)?
            {
                Selected::Timeout => {
                    error!("timed out waiting for get response");
                    return Err(Status::Failure);
                }
                Selected::Event => unreachable!("no event registered"),
                Selected::Queue(_) => {}
            }

            while let Some(message) = self.bus.pop(BusQueue::GetResponse).map_err(bus_failure)? {
                if message.op != ops::OP_GET_RESPONSE {
                    // stale delget marker from a previous exchange
                    continue;
                }
                let status = Status::from_wire(&message.key).unwrap_or(Status::Failure);
                match status {
                    Status::Success => {
                        let values = deserialize_attrs(kind, &message.fields).map_err(|e| {
                            error!(error = %e, "malformed get response");
                            Status::Failure
                        })?;
                        apply_response_values(attrs, values);
                        return Ok(());
                    }
                    Status::BufferOverflow => {
                        let values = deserialize_attrs(kind, &message.fields).map_err(|e| {
                            error!(error = %e, "malformed overflow response");
                            Status::Failure
                        })?;
                        apply_response_values(attrs, values);
                        return Err(Status::BufferOverflow);
                    }
                    other => return Err(other),
                }
            }
        }
    }

    /// Sends a view-transition op and waits for the daemon's status reply.
    fn notify_view(&self, op: &str) -> Status {
        if let Err(e) = self
            .bus
            .push(BusQueue::ViewRequest, BusMessage::new(op, op, vec![]))
        {
            error!(error = %e, "failed to send view transition");
            return Status::Failure;
        }

        match self
            .bus
            .select(&[BusQueue::ViewResponse], None, Some(self.response_timeout))
        {
            Ok(Selected::Queue(_)) => {}
            Ok(_) | Err(_) => {
                error!(op, "no view transition reply");
                return Status::Failure;
            }
        }
        match self.bus.pop(BusQueue::ViewResponse) {
            Ok(Some(message)) => Status::from_wire(&message.op).unwrap_or(Status::Failure),
            _ => Status::Failure,
        }
    }

    fn serialize(&self, kind: ObjectType, attrs: &[Attribute]) -> SaiResult<Vec<FieldValue>> {
        serialize_attrs(kind, attrs, false).map_err(|e| {
            warn!(%kind, error = %e, "attribute list rejected");
            Status::InvalidParameter
        })
    }

    fn push(
        &self,
        kind: ObjectType,
        object_ref: &str,
        op: &str,
        fields: Vec<FieldValue>,
    ) -> SaiResult<()> {
        let key = format!("{}:{}", kind.name(), object_ref);
        debug!(%key, op, "queueing request");
        self.bus
            .push(BusQueue::AsicState, BusMessage::new(key, op, fields))
            .map_err(bus_failure)
    }
}

/// Copies response values into the caller's attribute slots, matching by id.
fn apply_response_values(attrs: &mut [Attribute], values: Vec<Attribute>) {
    for value in values {
        if let Some(slot) = attrs.iter_mut().find(|a| a.id == value.id) {
            slot.value = value.value;
        }
    }
}

/// Finds an attribute by id, mirroring the lookup every validator starts with.
pub(crate) fn find_attr(attrs: &[Attribute], id: u32) -> Option<&Attribute> {
    attrs.iter().find(|a| a.id == id)
}

/// Rejects an empty get list or any id outside the kind's gettable set.
pub(crate) fn check_gettable(attrs: &[Attribute], gettable: &[u32]) -> SaiResult<()> {
    if attrs.is_empty() {
        warn!("attribute count must be at least 1");
        return Err(Status::InvalidParameter);
    }
    for attr in attrs {
        if !gettable.contains(&attr.id) {
            warn!(id = attr.id, "getting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
    }
    Ok(())
}

fn bus_failure(e: BusError) -> Status {
    error!(error = %e, "bus operation failed");
    Status::Failure
}

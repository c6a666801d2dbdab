//! The daemon's single-threaded request loop.
//!
//! Waits on the request, get-request, and view queues plus a shutdown
//! token. Requests are deserialized against the attribute metadata, object
//! references rewritten virtual→real, and dispatched per kind to the
//! vendor SDK; get results are rewritten real→virtual and published on the
//! get-response queue. Anything that would desync the two sides is fatal.

use crate::sdk::VendorSdk;
use crate::translator::{IdTranslator, TranslateError};
use crate::view::{ViewOp, ViewState};
use sai_attr::codec::{deserialize_attrs, serialize_attrs};
use sai_attr::rewrite::{rewrite_object_ids, RewriteError};
use sai_attr::{Attribute, CodecError};
use sai_bus::{ops, Bus, BusError, BusMessage, BusQueue, Selected, WakeEvent};
use sai_types::{FdbEntry, NeighborEntry, ObjectId, ObjectType, RouteEntry, Status};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

const REQUEST_SOURCES: [BusQueue; 3] =
    [BusQueue::AsicState, BusQueue::GetRequest, BusQueue::ViewRequest];

/// Unrecoverable daemon conditions. The process exits on any of these; a
/// supervisor restart resumes from the persistent translation store.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("malformed request key: {0}")]
    BadKey(String),

    #[error("undefined object kind: {0}")]
    UnknownKind(String),

    #[error("api {0} is not implemented")]
    UnknownOp(String),

    #[error("request carries no attribute")]
    MissingAttribute,

    #[error("failed to execute api {op}: {status}")]
    ApiFailed { op: String, status: Status },
}

impl From<RewriteError<TranslateError>> for FatalError {
    fn from(e: RewriteError<TranslateError>) -> Self {
        match e {
            RewriteError::Codec(c) => FatalError::Codec(c),
            RewriteError::Translate(t) => FatalError::Translate(t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestOp {
    Create,
    Remove,
    Set,
    Get,
}

impl RequestOp {
    fn parse(op: &str) -> Option<RequestOp> {
        match op {
            ops::OP_CREATE => Some(RequestOp::Create),
            ops::OP_REMOVE => Some(RequestOp::Remove),
            ops::OP_SET => Some(RequestOp::Set),
            ops::OP_GET => Some(RequestOp::Get),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Mutations go straight to the SDK.
    Direct,
    /// Mutations compile into the candidate view.
    InitView,
}

pub struct Dispatcher {
    bus: Arc<dyn Bus>,
    sdk: Box<dyn VendorSdk>,
    translator: IdTranslator,
    mode: Mode,
    /// What the daemon has applied, in library (virtual-id) space.
    applied: ViewState,
    candidate: ViewState,
    stop: WakeEvent,
    idle_hook: Option<Box<dyn FnMut() + Send>>,
}

impl Dispatcher {
    pub fn new(bus: Arc<dyn Bus>, sdk: Box<dyn VendorSdk>) -> Self {
        let translator = IdTranslator::new(Arc::clone(&bus));
        Dispatcher {
            bus,
            sdk,
            translator,
            mode: Mode::Direct,
            applied: ViewState::default(),
            candidate: ViewState::default(),
            stop: WakeEvent::new(),
            idle_hook: None,
        }
    }

    /// Token that makes [`run`](Dispatcher::run) drain and exit.
    pub fn stop_handle(&self) -> WakeEvent {
        self.stop.clone()
    }

    /// Installs a callback run once per loop pass (log-level sync).
    pub fn set_idle_hook(&mut self, hook: Box<dyn FnMut() + Send>) {
        self.idle_hook = Some(hook);
    }

    /// Runs until the stop token fires (clean, `Ok`) or a fatal condition
    /// surfaces (`Err`; the caller is expected to exit non-zero).
    pub fn run(&mut self) -> Result<(), FatalError> {
        info!("syncd listening for events");
        loop {
            match self.bus.select(&REQUEST_SOURCES, Some(&self.stop), None)? {
                Selected::Event => {
                    for queue in REQUEST_SOURCES {
                        self.drain_queue(queue)?;
                    }
                    self.pump_notifications()?;
                    info!("shutdown requested, drained outstanding work");
                    return Ok(());
                }
                Selected::Queue(queue) => self.drain_queue(queue)?,
                Selected::Timeout => {}
            }
            self.pump_notifications()?;
            if let Some(hook) = self.idle_hook.as_mut() {
                hook();
            }
        }
    }

    fn drain_queue(&mut self, queue: BusQueue) -> Result<(), FatalError> {
        while let Some(message) = self.bus.pop(queue)? {
            if queue == BusQueue::ViewRequest {
                self.process_view_request(message)?;
            } else {
                self.process_request(message)?;
            }
        }
        Ok(())
    }

    fn process_request(&mut self, message: BusMessage) -> Result<(), FatalError> {
        if message.op == ops::OP_DELGET {
            return Ok(());
        }
        let op = RequestOp::parse(&message.op)
            .ok_or_else(|| FatalError::UnknownOp(message.op.clone()))?;
        let (kind_name, object_ref) = message
            .key
            .split_once(':')
            .ok_or_else(|| FatalError::BadKey(message.key.clone()))?;
        let kind: ObjectType = kind_name
            .parse()
            .map_err(|_| FatalError::UnknownKind(kind_name.to_string()))?;

        debug!(key = %message.key, op = %message.op, "processing request");
        let mut attrs = deserialize_attrs(kind, &message.fields)?;

        if self.mode == Mode::InitView && op != RequestOp::Get {
            match op {
                RequestOp::Create => self.candidate.record_create(kind, object_ref, &attrs),
                RequestOp::Set => self.candidate.record_set(kind, object_ref, &attrs),
                RequestOp::Remove => self.candidate.record_remove(kind, object_ref),
                RequestOp::Get => unreachable!(),
            }
            return Ok(());
        }

        // the views track library-space values, so keep a pre-translation copy
        let original = (op != RequestOp::Get).then(|| attrs.clone());
        let status = self.execute(kind, object_ref, op, &mut attrs)?;

        if op == RequestOp::Get {
            return self.send_get_response(kind, status, &mut attrs);
        }
        if status != Status::Success {
            error!(key = %message.key, op = %message.op, %status, "failed to execute api");
            return Err(FatalError::ApiFailed { op: message.op, status });
        }

        let original = original.unwrap_or_default();
        match op {
            RequestOp::Create => self.applied.record_create(kind, object_ref, &original),
            RequestOp::Set => self.applied.record_set(kind, object_ref, &original),
            RequestOp::Remove => self.applied.record_remove(kind, object_ref),
            RequestOp::Get => unreachable!(),
        }
        Ok(())
    }

    /// Translates and dispatches one operation to the SDK.
    fn execute(
        &mut self,
        kind: ObjectType,
        object_ref: &str,
        op: RequestOp,
        attrs: &mut [Attribute],
    ) -> Result<Status, FatalError> {
        if op != RequestOp::Get {
            let translator = &self.translator;
            rewrite_object_ids(kind, attrs, &mut |vid| translator.vid_to_rid(vid))?;
        }

        let status = match kind {
            ObjectType::Switch => match op {
                RequestOp::Set => self.sdk.set_switch(first_attr(attrs)?),
                RequestOp::Get => self.sdk.get_switch(attrs),
                _ => Status::NotSupported,
            },
            ObjectType::Trap | ObjectType::UserDefinedTrap => {
                let trap_ref: ObjectId = object_ref
                    .parse()
                    .map_err(|_| FatalError::BadKey(object_ref.to_string()))?;
                let trap_id = trap_ref.as_raw() as u32;
                match op {
                    RequestOp::Set => self.sdk.set_trap(trap_id, first_attr(attrs)?),
                    RequestOp::Get => self.sdk.get_trap(trap_id, attrs),
                    _ => Status::NotSupported,
                }
            }
            ObjectType::Vlan => {
                let vlan_id: u16 = object_ref
                    .parse()
                    .map_err(|_| FatalError::BadKey(object_ref.to_string()))?;
                match op {
                    RequestOp::Create => self.sdk.create_vlan(vlan_id),
                    RequestOp::Remove => self.sdk.remove_vlan(vlan_id),
                    RequestOp::Set => self.sdk.set_vlan(vlan_id, first_attr(attrs)?),
                    RequestOp::Get => self.sdk.get_vlan(vlan_id, attrs),
                }
            }
            ObjectType::RouteEntry => {
                let entry: RouteEntry = object_ref
                    .parse()
                    .map_err(|_| FatalError::BadKey(object_ref.to_string()))?;
                let entry = RouteEntry {
                    vr_id: self.translator.vid_to_rid(entry.vr_id)?,
                    ..entry
                };
                match op {
                    RequestOp::Create => self.sdk.create_route(&entry, attrs),
                    RequestOp::Remove => self.sdk.remove_route(&entry),
                    RequestOp::Set => self.sdk.set_route(&entry, first_attr(attrs)?),
                    RequestOp::Get => self.sdk.get_route(&entry, attrs),
                }
            }
            ObjectType::NeighborEntry => {
                let entry: NeighborEntry = object_ref
                    .parse()
                    .map_err(|_| FatalError::BadKey(object_ref.to_string()))?;
                let entry = NeighborEntry {
                    rif_id: self.translator.vid_to_rid(entry.rif_id)?,
                    ..entry
                };
                match op {
                    RequestOp::Create => self.sdk.create_neighbor(&entry, attrs),
                    RequestOp::Remove => self.sdk.remove_neighbor(&entry),
                    RequestOp::Set => self.sdk.set_neighbor(&entry, first_attr(attrs)?),
                    RequestOp::Get => self.sdk.get_neighbor(&entry, attrs),
                }
            }
            ObjectType::FdbEntry => {
                let entry: FdbEntry = object_ref
                    .parse()
                    .map_err(|_| FatalError::BadKey(object_ref.to_string()))?;
                match op {
                    RequestOp::Create => self.sdk.create_fdb_entry(&entry, attrs),
                    RequestOp::Remove => self.sdk.remove_fdb_entry(&entry),
                    RequestOp::Set => self.sdk.set_fdb_entry(&entry, first_attr(attrs)?),
                    RequestOp::Get => self.sdk.get_fdb_entry(&entry, attrs),
                }
            }
            _ => {
                let vid: ObjectId = object_ref
                    .parse()
                    .map_err(|_| FatalError::BadKey(object_ref.to_string()))?;
                match op {
                    RequestOp::Create => match self.sdk.create(kind, attrs) {
                        Ok(rid) => {
                            self.translator.bind(vid, rid)?;
                            Status::Success
                        }
                        Err(status) => status,
                    },
                    RequestOp::Remove => {
                        let rid = self.translator.vid_to_rid(vid)?;
                        self.translator.unbind(vid, rid)?;
                        self.sdk.remove(kind, rid)
                    }
                    RequestOp::Set => {
                        let rid = self.translator.vid_to_rid(vid)?;
                        self.sdk.set(kind, rid, first_attr(attrs)?)
                    }
                    RequestOp::Get => {
                        let rid = self.translator.vid_to_rid(vid)?;
                        self.sdk.get(kind, rid, attrs)
                    }
                }
            }
        };
        Ok(status)
    }

    /// Publishes a get result: full values on success, counts only on
    /// overflow, nothing otherwise, then the reclaim marker.
    fn send_get_response(
        &self,
        kind: ObjectType,
        status: Status,
        attrs: &mut [Attribute],
    ) -> Result<(), FatalError> {
        let fields = match status {
            Status::Success => {
                let translator = &self.translator;
                let sdk = &self.sdk;
                rewrite_object_ids(kind, attrs, &mut |rid| {
                    translator.rid_to_vid(rid, |r| sdk.object_type_query(r))
                })?;
                serialize_attrs(kind, attrs, false)?
            }
            Status::BufferOverflow => serialize_attrs(kind, attrs, true)?,
            _ => Vec::new(),
        };

        let key = status.to_wire();
        self.bus.push(
            BusQueue::GetResponse,
            BusMessage::new(key.clone(), ops::OP_GET_RESPONSE, fields),
        )?;
        self.bus.push(
            BusQueue::GetResponse,
            BusMessage::new(key, ops::OP_DEL_GET_RESPONSE, Vec::new()),
        )?;
        Ok(())
    }

    fn process_view_request(&mut self, message: BusMessage) -> Result<(), FatalError> {
        let status = match message.op.as_str() {
            ops::VIEW_INIT => {
                info!("entering init view, compiling a fresh candidate");
                self.candidate = ViewState::default();
                self.mode = Mode::InitView;
                Status::Success
            }
            ops::VIEW_APPLY => self.apply_view()?,
            other => {
                warn!(op = other, "unknown view operation");
                Status::NotSupported
            }
        };
        let wire = status.to_wire();
        self.bus.push(
            BusQueue::ViewResponse,
            BusMessage::new(wire.clone(), wire, Vec::new()),
        )?;
        Ok(())
    }

    fn apply_view(&mut self) -> Result<Status, FatalError> {
        if self.mode != Mode::InitView {
            warn!("apply view without a preceding init view");
            return Ok(Status::Success);
        }

        let plan = ViewState::diff(&self.applied, &self.candidate);
        info!(operations = plan.len(), "applying candidate view");
        for op in plan {
            match op {
                ViewOp::Create { kind, object_ref, mut attrs } => {
                    let status =
                        self.execute(kind, &object_ref, RequestOp::Create, &mut attrs)?;
                    if status != Status::Success {
                        return Err(FatalError::ApiFailed { op: ops::OP_CREATE.into(), status });
                    }
                }
                ViewOp::Remove { kind, object_ref } => {
                    let status =
                        self.execute(kind, &object_ref, RequestOp::Remove, &mut [])?;
                    if status != Status::Success {
                        return Err(FatalError::ApiFailed { op: ops::OP_REMOVE.into(), status });
                    }
                }
                ViewOp::Set { kind, object_ref, attr } => {
                    let mut attrs = [attr];
                    let status = self.execute(kind, &object_ref, RequestOp::Set, &mut attrs)?;
                    if status != Status::Success {
                        return Err(FatalError::ApiFailed { op: ops::OP_SET.into(), status });
                    }
                }
            }
        }

        self.applied = std::mem::take(&mut self.candidate);
        self.mode = Mode::Direct;
        Ok(Status::Success)
    }

    /// Forwards SDK events, rewriting embedded real ids to virtual ids.
    fn pump_notifications(&mut self) -> Result<(), FatalError> {
        for mut notification in self.sdk.drain_notifications() {
            let translator = &self.translator;
            let sdk = &self.sdk;
            notification.rewrite_oids(&mut |rid| {
                translator.rid_to_vid(rid, |r| sdk.object_type_query(r))
            })?;
            let (op, data, fields) = notification.encode()?;
            self.bus
                .push(BusQueue::Notifications, BusMessage::new(data, op, fields))?;
        }
        Ok(())
    }
}

fn first_attr(attrs: &[Attribute]) -> Result<&Attribute, FatalError> {
    attrs.first().ok_or(FatalError::MissingAttribute)
}

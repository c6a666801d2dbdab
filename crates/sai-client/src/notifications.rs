//! Notification delivery.
//!
//! A single worker thread waits on the notification queue and a shutdown
//! token. Payload object ids arrive already rewritten to virtual ids by the
//! daemon; handlers run under the API lock so they observe a consistent
//! local state.

use crate::client::ClientInner;
use sai_attr::enums::{FdbEventType, SwitchOperStatus};
use sai_attr::events::{Notification, PortStatusChange};
use sai_attr::Attribute;
use sai_bus::{Bus, BusQueue, Selected, WakeEvent};
use sai_types::{FdbEntry, ObjectId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Callbacks the application registers at switch initialization.
///
/// Absent handlers drop their events.
#[derive(Default)]
pub struct NotificationHandlers {
    pub on_switch_state_change: Option<Box<dyn Fn(SwitchOperStatus) + Send + Sync>>,
    pub on_port_state_change: Option<Box<dyn Fn(&[PortStatusChange]) + Send + Sync>>,
    pub on_fdb_event: Option<Box<dyn Fn(FdbEventType, &FdbEntry, &[Attribute]) + Send + Sync>>,
    pub on_switch_shutdown_request: Option<Box<dyn Fn() + Send + Sync>>,
    pub on_packet_event: Option<Box<dyn Fn(&[u8], ObjectId, ObjectId) + Send + Sync>>,
    pub on_queue_pfc_deadlock: Option<Box<dyn Fn(ObjectId, i32) + Send + Sync>>,
}

pub(crate) fn notification_worker(
    inner: Arc<ClientInner>,
    handlers: NotificationHandlers,
    stop: WakeEvent,
) {
    debug!("notification worker started");
    loop {
        match inner
            .bus
            .select(&[BusQueue::Notifications], Some(&stop), None)
        {
            Ok(Selected::Event) => break,
            Ok(Selected::Queue(_)) => {}
            Ok(Selected::Timeout) => continue,
            Err(e) => {
                warn!(error = %e, "notification wait failed");
                break;
            }
        }

        while let Ok(Some(message)) = inner.bus.pop(BusQueue::Notifications) {
            let notification =
                match Notification::decode(&message.op, &message.key, &message.fields) {
                    Ok(n) => n,
                    Err(e) => {
                        warn!(op = %message.op, error = %e, "dropping malformed notification");
                        continue;
                    }
                };
            // handlers run under the API lock
            let _state = inner.state.lock().unwrap();
            dispatch(&handlers, notification);
        }
    }
    debug!("notification worker stopped");
}

fn dispatch(handlers: &NotificationHandlers, notification: Notification) {
    match notification {
        Notification::SwitchStateChange { status } => {
            if let Some(handler) = &handlers.on_switch_state_change {
                handler(status);
            }
        }
        Notification::PortStateChange { entries } => {
            if let Some(handler) = &handlers.on_port_state_change {
                handler(&entries);
            }
        }
        Notification::FdbEvent { event, entry, attrs } => {
            if let Some(handler) = &handlers.on_fdb_event {
                handler(event, &entry, &attrs);
            }
        }
        Notification::SwitchShutdownRequest => {
            if let Some(handler) = &handlers.on_switch_shutdown_request {
                handler();
            }
        }
        Notification::PacketEvent { payload, ingress_port, ingress_lag } => {
            if let Some(handler) = &handlers.on_packet_event {
                handler(&payload, ingress_port, ingress_lag);
            }
        }
        Notification::QueuePfcDeadlock { queue, event } => {
            if let Some(handler) = &handlers.on_queue_pfc_deadlock {
                handler(queue, event);
            }
        }
    }
}

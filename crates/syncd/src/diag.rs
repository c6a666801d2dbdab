//! Vendor diag shell.
//!
//! With `--diag` the daemon runs a detached thread that periodically
//! issues the vendor-specific switch attribute through the normal request
//! path, which keeps the vendor shell session alive on platforms that
//! need it.

use sai_attr::codec::serialize_attrs;
use sai_attr::ids::switch_attr;
use sai_attr::{Attribute, Value};
use sai_bus::{ops, Bus, BusMessage, BusQueue, WakeEvent};
use sai_types::{ObjectId, ObjectType};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info};

const DIAG_INTERVAL: Duration = Duration::from_secs(1);

/// The vendor attribute poked to keep the diag shell open.
const DIAG_ATTR: u32 = switch_attr::CUSTOM_RANGE_BASE + 1;

pub fn spawn(bus: Arc<dyn Bus>, stop: WakeEvent) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("sai-diag-shell".to_string())
        .spawn(move || {
            info!("diag shell thread started");
            let attr = Attribute::new(DIAG_ATTR, Value::S32(1));
            let fields = match serialize_attrs(ObjectType::Switch, &[attr], false) {
                Ok(fields) => fields,
                Err(e) => {
                    error!(error = %e, "open sai shell failed");
                    return;
                }
            };
            while !stop.is_set() {
                let message = BusMessage::new(
                    format!("{}:{}", ObjectType::Switch.name(), ObjectId::NULL),
                    ops::OP_SET,
                    fields.clone(),
                );
                if let Err(e) = bus.push(BusQueue::AsicState, message) {
                    error!(error = %e, "open sai shell failed");
                    return;
                }
                std::thread::sleep(DIAG_INTERVAL);
            }
        })
        .expect("failed to spawn diag thread")
}

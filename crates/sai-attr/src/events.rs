//! Asynchronous notification payloads.
//!
//! Notifications travel daemon→library as `(op, data, fields)` triples on
//! the notification queue. The daemon rewrites embedded real ids to virtual
//! ids before publishing, so the library only ever observes virtual ids.

use crate::codec::{deserialize_attrs, serialize_attrs, FieldValue};
use crate::enums::{FdbEventType, PortOperStatus, SwitchOperStatus};
use crate::rewrite::{rewrite_object_ids, RewriteError};
use crate::{Attribute, CodecError};
use sai_types::{FdbEntry, ObjectId, ObjectType};

pub const OP_SWITCH_STATE_CHANGE: &str = "switch_state_change";
pub const OP_PORT_STATE_CHANGE: &str = "port_state_change";
pub const OP_FDB_EVENT: &str = "fdb_event";
pub const OP_SWITCH_SHUTDOWN_REQUEST: &str = "switch_shutdown_request";
pub const OP_PACKET_EVENT: &str = "packet_event";
pub const OP_QUEUE_PFC_DEADLOCK: &str = "queue_pfc_deadlock";

/// One port's operational status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortStatusChange {
    pub port: ObjectId,
    pub status: PortOperStatus,
}

/// A decoded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    SwitchStateChange {
        status: SwitchOperStatus,
    },
    PortStateChange {
        entries: Vec<PortStatusChange>,
    },
    FdbEvent {
        event: FdbEventType,
        entry: FdbEntry,
        attrs: Vec<Attribute>,
    },
    SwitchShutdownRequest,
    PacketEvent {
        payload: Vec<u8>,
        ingress_port: ObjectId,
        ingress_lag: ObjectId,
    },
    QueuePfcDeadlock {
        queue: ObjectId,
        event: i32,
    },
}

impl Notification {
    /// The event name used as the message op.
    pub fn op(&self) -> &'static str {
        match self {
            Notification::SwitchStateChange { .. } => OP_SWITCH_STATE_CHANGE,
            Notification::PortStateChange { .. } => OP_PORT_STATE_CHANGE,
            Notification::FdbEvent { .. } => OP_FDB_EVENT,
            Notification::SwitchShutdownRequest => OP_SWITCH_SHUTDOWN_REQUEST,
            Notification::PacketEvent { .. } => OP_PACKET_EVENT,
            Notification::QueuePfcDeadlock { .. } => OP_QUEUE_PFC_DEADLOCK,
        }
    }

    /// Encodes to the `(op, data, fields)` wire triple.
    pub fn encode(&self) -> Result<(String, String, Vec<FieldValue>), CodecError> {
        let triple = match self {
            Notification::SwitchStateChange { status } => (
                self.op().to_string(),
                format!("{:x}", status.as_i32() as u32),
                vec![],
            ),
            Notification::PortStateChange { entries } => (
                self.op().to_string(),
                String::new(),
                entries
                    .iter()
                    .map(|e| (e.port.to_string(), format!("{:x}", e.status.as_i32() as u32)))
                    .collect(),
            ),
            Notification::FdbEvent { event, entry, attrs } => {
                let mut fields = vec![("event".to_string(), format!("{:x}", event.as_i32() as u32))];
                fields.extend(serialize_attrs(ObjectType::FdbEntry, attrs, false)?);
                (self.op().to_string(), entry.to_string(), fields)
            }
            Notification::SwitchShutdownRequest => {
                (self.op().to_string(), String::new(), vec![])
            }
            Notification::PacketEvent { payload, ingress_port, ingress_lag } => (
                self.op().to_string(),
                hex_encode(payload),
                vec![
                    ("ingress_port".to_string(), ingress_port.to_string()),
                    ("ingress_lag".to_string(), ingress_lag.to_string()),
                ],
            ),
            Notification::QueuePfcDeadlock { queue, event } => (
                self.op().to_string(),
                queue.to_string(),
                vec![("event".to_string(), format!("{:x}", *event as u32))],
            ),
        };
        Ok(triple)
    }

    /// Decodes the `(op, data, fields)` wire triple.
    pub fn decode(op: &str, data: &str, fields: &[FieldValue]) -> Result<Notification, CodecError> {
        match op {
            OP_SWITCH_STATE_CHANGE => {
                let raw = parse_hex_i32(data)?;
                let status = SwitchOperStatus::from_i32(raw).ok_or(malformed(data))?;
                Ok(Notification::SwitchStateChange { status })
            }
            OP_PORT_STATE_CHANGE => {
                let entries = fields
                    .iter()
                    .map(|(port, status)| {
                        let port: ObjectId = port.parse().map_err(|_| malformed(port))?;
                        let status = PortOperStatus::from_i32(parse_hex_i32(status)?)
                            .ok_or(malformed(status))?;
                        Ok(PortStatusChange { port, status })
                    })
                    .collect::<Result<_, CodecError>>()?;
                Ok(Notification::PortStateChange { entries })
            }
            OP_FDB_EVENT => {
                let entry: FdbEntry = data.parse().map_err(|_| malformed(data))?;
                let event_text = fields
                    .iter()
                    .find(|(name, _)| name == "event")
                    .map(|(_, v)| v.as_str())
                    .ok_or(malformed(data))?;
                let event =
                    FdbEventType::from_i32(parse_hex_i32(event_text)?).ok_or(malformed(event_text))?;
                let attr_fields: Vec<FieldValue> = fields
                    .iter()
                    .filter(|(name, _)| name != "event")
                    .cloned()
                    .collect();
                let attrs = deserialize_attrs(ObjectType::FdbEntry, &attr_fields)?;
                Ok(Notification::FdbEvent { event, entry, attrs })
            }
            OP_SWITCH_SHUTDOWN_REQUEST => Ok(Notification::SwitchShutdownRequest),
            OP_PACKET_EVENT => {
                let payload = hex_decode(data)?;
                let ingress_port = field_oid(fields, "ingress_port")?;
                let ingress_lag = field_oid(fields, "ingress_lag")?;
                Ok(Notification::PacketEvent { payload, ingress_port, ingress_lag })
            }
            OP_QUEUE_PFC_DEADLOCK => {
                let queue: ObjectId = data.parse().map_err(|_| malformed(data))?;
                let event_text = fields
                    .iter()
                    .find(|(name, _)| name == "event")
                    .map(|(_, v)| v.as_str())
                    .ok_or(malformed(data))?;
                Ok(Notification::QueuePfcDeadlock { queue, event: parse_hex_i32(event_text)? })
            }
            _ => Err(CodecError::Malformed { text: op.to_string() }),
        }
    }

    /// Rewrites every embedded object id through `translate`.
    pub fn rewrite_oids<E: std::error::Error>(
        &mut self,
        translate: &mut dyn FnMut(ObjectId) -> Result<ObjectId, E>,
    ) -> Result<(), RewriteError<E>> {
        match self {
            Notification::SwitchStateChange { .. } | Notification::SwitchShutdownRequest => Ok(()),
            Notification::PortStateChange { entries } => {
                for entry in entries.iter_mut() {
                    entry.port = translate(entry.port).map_err(RewriteError::Translate)?;
                }
                Ok(())
            }
            Notification::FdbEvent { attrs, .. } => {
                rewrite_object_ids(ObjectType::FdbEntry, attrs, translate)
            }
            Notification::PacketEvent { ingress_port, ingress_lag, .. } => {
                *ingress_port = translate(*ingress_port).map_err(RewriteError::Translate)?;
                *ingress_lag = translate(*ingress_lag).map_err(RewriteError::Translate)?;
                Ok(())
            }
            Notification::QueuePfcDeadlock { queue, .. } => {
                *queue = translate(*queue).map_err(RewriteError::Translate)?;
                Ok(())
            }
        }
    }
}

fn field_oid(fields: &[FieldValue], name: &str) -> Result<ObjectId, CodecError> {
    let text = fields
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
        .ok_or(CodecError::Malformed { text: name.to_string() })?;
    text.parse().map_err(|_| malformed(text))
}

fn parse_hex_i32(text: &str) -> Result<i32, CodecError> {
    u32::from_str_radix(text, 16)
        .map(|v| v as i32)
        .map_err(|_| malformed(text))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(text: &str) -> Result<Vec<u8>, CodecError> {
    if text.len() % 2 != 0 {
        return Err(malformed(text));
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).map_err(|_| malformed(text)))
        .collect()
}

fn malformed(text: &str) -> CodecError {
    CodecError::Malformed {
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::fdb_attr;
    use crate::Value;
    use pretty_assertions::assert_eq;

    fn round_trip(notification: Notification) {
        let (op, data, fields) = notification.encode().unwrap();
        let back = Notification::decode(&op, &data, &fields).unwrap();
        assert_eq!(back, notification);
    }

    #[test]
    fn test_round_trips() {
        round_trip(Notification::SwitchStateChange { status: SwitchOperStatus::Up });
        round_trip(Notification::SwitchShutdownRequest);
        round_trip(Notification::PortStateChange {
            entries: vec![
                PortStatusChange {
                    port: ObjectId::pack(ObjectType::Port, 1),
                    status: PortOperStatus::Up,
                },
                PortStatusChange {
                    port: ObjectId::pack(ObjectType::Port, 2),
                    status: PortOperStatus::Down,
                },
            ],
        });
        round_trip(Notification::FdbEvent {
            event: FdbEventType::Learned,
            entry: FdbEntry::new("00:11:22:33:44:55".parse().unwrap(), 100),
            attrs: vec![Attribute::oid(fdb_attr::PORT_ID, ObjectId::pack(ObjectType::Port, 3))],
        });
        round_trip(Notification::PacketEvent {
            payload: vec![0xde, 0xad, 0xbe, 0xef],
            ingress_port: ObjectId::pack(ObjectType::Port, 4),
            ingress_lag: ObjectId::NULL,
        });
        round_trip(Notification::QueuePfcDeadlock {
            queue: ObjectId::pack(ObjectType::Queue, 9),
            event: 1,
        });
    }

    #[test]
    fn test_rewrite_touches_embedded_oids() {
        let mut notification = Notification::FdbEvent {
            event: FdbEventType::Learned,
            entry: FdbEntry::new("00:11:22:33:44:55".parse().unwrap(), 1),
            attrs: vec![Attribute::new(
                fdb_attr::PORT_ID,
                Value::ObjectId(ObjectId::from_raw(100)),
            )],
        };
        notification
            .rewrite_oids(&mut |oid| {
                Ok::<_, std::convert::Infallible>(ObjectId::from_raw(oid.as_raw() + 1))
            })
            .unwrap();
        match notification {
            Notification::FdbEvent { attrs, .. } => {
                assert_eq!(attrs[0].value, Value::ObjectId(ObjectId::from_raw(101)));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_unknown_op_is_error() {
        assert!(Notification::decode("no_such_event", "", &[]).is_err());
    }
}

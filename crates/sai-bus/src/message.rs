//! The key/op/fields message tuple.

use serde::{Deserialize, Serialize};

/// A serialized attribute field or event datum: `(name, value)`.
pub type FieldValue = (String, String);

/// The unit of transfer on every bus queue.
///
/// For requests, `key` is `"<kind-name>:<object-ref>"` and `op` is one of
/// the request verbs. For get responses, `key` carries the status code. For
/// notifications, `op` is the event name and `key` the event data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusMessage {
    pub key: String,
    pub op: String,
    pub fields: Vec<FieldValue>,
}

impl BusMessage {
    pub fn new(key: impl Into<String>, op: impl Into<String>, fields: Vec<FieldValue>) -> Self {
        BusMessage {
            key: key.into(),
            op: op.into(),
            fields,
        }
    }

    /// Returns the value of a named field, if present.
    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| f == name)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_field() {
        let msg = BusMessage::new(
            "next-hop:0004000000000001",
            "create",
            vec![("0".to_string(), "0".to_string()), ("1".to_string(), "a".to_string())],
        );
        assert_eq!(msg.get_field("1"), Some("a"));
        assert_eq!(msg.get_field("2"), None);
    }

    #[test]
    fn test_json_round_trip() {
        let msg = BusMessage::new("switch:0000000000000000", "get", vec![]);
        let text = serde_json::to_string(&msg).unwrap();
        let back: BusMessage = serde_json::from_str(&text).unwrap();
        assert_eq!(back, msg);
    }
}

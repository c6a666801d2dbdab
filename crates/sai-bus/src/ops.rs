//! Protocol vocabulary: request verbs, response markers, view transitions.

/// Request verbs on the ASIC-state and get-request queues.
pub const OP_CREATE: &str = "create";
pub const OP_REMOVE: &str = "remove";
pub const OP_SET: &str = "set";
pub const OP_GET: &str = "get";
/// Marker reclaiming a consumed get-response slot.
pub const OP_DELGET: &str = "delget";

/// Ops on the get-response queue.
pub const OP_GET_RESPONSE: &str = "getresponse";
pub const OP_DEL_GET_RESPONSE: &str = "delgetresponse";

/// View-transition operations on the syncd-notification channel.
pub const VIEW_INIT: &str = "SAI_INIT_VIEW";
pub const VIEW_APPLY: &str = "SAI_APPLY_VIEW";

//! Shared values for recurring structured-log fields.

pub const REASON_QUEUE_CLOSED: &str = "queue_closed";
pub const REASON_UNKNOWN_INVOCATION: &str = "unknown_invocation";
pub const REASON_ORPHANED_CALL: &str = "orphaned_call";

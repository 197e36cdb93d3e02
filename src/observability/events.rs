//! Canonical structured event names used across `wamp-router`.

// Broker routing events.
pub const PUBLISH_DISPATCH: &str = "publish_dispatch";
pub const PUBLISH_ACK: &str = "publish_ack";
pub const SUBSCRIBE_OK: &str = "subscribe_ok";
pub const UNSUBSCRIBE_OK: &str = "unsubscribe_ok";
pub const UNSUBSCRIBE_NO_SUCH_SUBSCRIPTION: &str = "unsubscribe_no_such_subscription";
pub const SESSION_SUBSCRIPTIONS_REMOVED: &str = "session_subscriptions_removed";
pub const SUBSCRIPTION_INDEX_INCONSISTENT: &str = "subscription_index_inconsistent";

// Dealer routing events.
pub const REGISTER_OK: &str = "register_ok";
pub const REGISTER_PROCEDURE_EXISTS: &str = "register_procedure_exists";
pub const UNREGISTER_OK: &str = "unregister_ok";
pub const UNREGISTER_NO_SUCH_REGISTRATION: &str = "unregister_no_such_registration";
pub const CALL_DISPATCH: &str = "call_dispatch";
pub const CALL_NO_SUCH_PROCEDURE: &str = "call_no_such_procedure";
pub const CALL_REGISTRATION_MISSING: &str = "call_registration_missing";
pub const YIELD_RELAY: &str = "yield_relay";
pub const YIELD_DROPPED: &str = "yield_dropped";
pub const ERROR_RELAY: &str = "error_relay";
pub const ERROR_DROPPED: &str = "error_dropped";
pub const DISCONNECT_UNREGISTER: &str = "disconnect_unregister";
pub const DISCONNECT_CALL_CANCELED: &str = "disconnect_call_canceled";

// Session outbox events.
pub const OUTBOX_SEND_FAILED: &str = "outbox_send_failed";
pub const OUTBOX_ENQUEUE_DROPPED: &str = "outbox_enqueue_dropped";
pub const OUTBOX_CLOSED: &str = "outbox_closed";

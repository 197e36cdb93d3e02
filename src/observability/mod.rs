//! Structured logging vocabulary.
//!
//! Canonical event names and shared field values used by routing log sites,
//! split the same way the log schema is consumed: `events` for the `event`
//! field, `fields` for recurring field values.

pub(crate) mod events;
pub(crate) mod fields;

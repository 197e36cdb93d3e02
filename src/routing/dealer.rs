/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! RPC routing engine.

use crate::observability::{events, fields};
use crate::protocol::id::IdSequence;
use crate::protocol::message::{
    Call, CallResult, Error, Invocation, Message, MessageType, Register, Registered, Unregister,
    Unregistered, Yield,
};
use crate::protocol::{wamp_error, Dict, Id, Uri};
use crate::session::{Outbox, PeerKey};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

const COMPONENT: &str = "dealer";

/// One in-flight call, keyed by the caller's identity plus its own request
/// ID so two callers reusing the same request ID never collide.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct CallKey {
    caller: PeerKey,
    request: Id,
}

struct ProcedureRegistration {
    callee: Outbox,
    procedure: Uri,
}

#[derive(Clone)]
struct InvocationRecord {
    call: CallKey,
    registration: Id,
}

#[derive(Default)]
struct DealerState {
    /// Live registrations keyed by registration ID.
    procedures: HashMap<Id, ProcedureRegistration>,
    /// Unique callee index; a procedure has at most one callee.
    registrations: HashMap<Uri, Id>,
    /// Outstanding calls awaiting a result.
    calls: HashMap<CallKey, Outbox>,
    /// Reverse link from dispatched invocation to its originating call.
    invocations: HashMap<Id, InvocationRecord>,
}

/// Pairs `CALL` with `INVOCATION` and `YIELD`/`ERROR` with the reply to the
/// caller, one callee per procedure.
///
/// A single mutex protects all four indices; every operation takes it
/// exclusively. Replies and invocations go through the recipient's
/// [`Outbox`].
pub struct Dealer {
    state: Mutex<DealerState>,
    router_ids: Arc<IdSequence>,
}

impl Dealer {
    pub fn new() -> Self {
        Self::with_id_sequence(Arc::new(IdSequence::new()))
    }

    /// Creates a dealer sharing the router-scoped ID sequence with other
    /// components, so registration and invocation IDs never collide with
    /// publication IDs.
    pub fn with_id_sequence(router_ids: Arc<IdSequence>) -> Self {
        Self {
            state: Mutex::new(DealerState::default()),
            router_ids,
        }
    }

    /// Binds a callee to a procedure, replying `REGISTERED` or
    /// `wamp.error.procedure_already_exists` when the URI is taken.
    pub async fn register(&self, callee: &Outbox, register: Register) {
        let mut state = self.state.lock().await;

        if let Some(&existing) = state.registrations.get(&register.procedure) {
            warn!(
                event = events::REGISTER_PROCEDURE_EXISTS,
                component = COMPONENT,
                session_id = %callee.session_id(),
                procedure = %register.procedure,
                registration_id = %existing,
                "procedure already registered"
            );
            callee.enqueue(Message::Error(Error::for_request(
                MessageType::Register,
                register.request,
                wamp_error::PROCEDURE_ALREADY_EXISTS,
            )));
            return;
        }

        let registration = self.router_ids.next_id();
        state.procedures.insert(
            registration,
            ProcedureRegistration {
                callee: callee.clone(),
                procedure: register.procedure.clone(),
            },
        );
        state
            .registrations
            .insert(register.procedure.clone(), registration);

        info!(
            event = events::REGISTER_OK,
            component = COMPONENT,
            session_id = %callee.session_id(),
            procedure = %register.procedure,
            registration_id = %registration,
            "registered procedure"
        );

        callee.enqueue(Message::Registered(Registered {
            request: register.request,
            registration,
        }));
    }

    /// Removes a registration, replying `UNREGISTERED` or
    /// `wamp.error.no_such_registration` for unknown IDs. Callee identity is
    /// deliberately not verified.
    pub async fn unregister(&self, callee: &Outbox, unregister: Unregister) {
        let mut state = self.state.lock().await;

        match state.procedures.remove(&unregister.registration) {
            None => {
                warn!(
                    event = events::UNREGISTER_NO_SUCH_REGISTRATION,
                    component = COMPONENT,
                    session_id = %callee.session_id(),
                    registration_id = %unregister.registration,
                    "unregister for unknown registration"
                );
                callee.enqueue(Message::Error(Error::for_request(
                    MessageType::Unregister,
                    unregister.request,
                    wamp_error::NO_SUCH_REGISTRATION,
                )));
            }
            Some(entry) => {
                state.registrations.remove(&entry.procedure);
                info!(
                    event = events::UNREGISTER_OK,
                    component = COMPONENT,
                    session_id = %callee.session_id(),
                    registration_id = %unregister.registration,
                    procedure = %entry.procedure,
                    "unregistered procedure"
                );
                callee.enqueue(Message::Unregistered(Unregistered {
                    request: unregister.request,
                }));
            }
        }
    }

    /// Dispatches a call to the procedure's callee as an `INVOCATION`,
    /// recording the pending call until the callee yields.
    pub async fn call(&self, caller: &Outbox, call: Call) {
        let mut state = self.state.lock().await;

        let Some(&registration) = state.registrations.get(&call.procedure) else {
            warn!(
                event = events::CALL_NO_SUCH_PROCEDURE,
                component = COMPONENT,
                session_id = %caller.session_id(),
                procedure = %call.procedure,
                "call for unknown procedure"
            );
            caller.enqueue(Message::Error(Error::for_request(
                MessageType::Call,
                call.request,
                wamp_error::NO_SUCH_PROCEDURE,
            )));
            return;
        };

        let Some(entry) = state.procedures.get(&registration) else {
            // A registration ID without its procedure record is a core bug.
            error!(
                event = events::CALL_REGISTRATION_MISSING,
                component = COMPONENT,
                session_id = %caller.session_id(),
                procedure = %call.procedure,
                registration_id = %registration,
                "registration exists without a procedure record"
            );
            caller.enqueue(Message::Error(Error::for_request(
                MessageType::Call,
                call.request,
                wamp_error::INTERNAL_ERROR,
            )));
            return;
        };
        let callee = entry.callee.clone();

        let call_key = CallKey {
            caller: caller.peer_key().clone(),
            request: call.request,
        };
        let invocation = self.router_ids.next_id();
        state.calls.insert(call_key.clone(), caller.clone());
        state.invocations.insert(
            invocation,
            InvocationRecord {
                call: call_key,
                registration,
            },
        );

        debug!(
            event = events::CALL_DISPATCH,
            component = COMPONENT,
            session_id = %caller.session_id(),
            procedure = %call.procedure,
            call_id = %call.request,
            invocation_id = %invocation,
            "dispatched call as invocation"
        );

        callee.enqueue(Message::Invocation(Invocation {
            request: invocation,
            registration,
            details: Dict::new(),
            arguments: call.arguments,
            arguments_kw: call.arguments_kw,
        }));
    }

    /// Relays a yielded result back to the originating caller as `RESULT`.
    ///
    /// Yields naming an unknown invocation are dropped silently; the
    /// protocol forbids replying with an error to a `YIELD`.
    pub async fn yield_result(&self, callee: &Outbox, yielded: Yield) {
        let mut state = self.state.lock().await;

        let Some(record) = state.invocations.remove(&yielded.request) else {
            warn!(
                event = events::YIELD_DROPPED,
                component = COMPONENT,
                session_id = %callee.session_id(),
                invocation_id = %yielded.request,
                reason = fields::REASON_UNKNOWN_INVOCATION,
                "dropping yield"
            );
            return;
        };
        let Some(caller) = state.calls.remove(&record.call) else {
            warn!(
                event = events::YIELD_DROPPED,
                component = COMPONENT,
                session_id = %callee.session_id(),
                invocation_id = %yielded.request,
                call_id = %record.call.request,
                reason = fields::REASON_ORPHANED_CALL,
                "dropping yield"
            );
            return;
        };

        debug!(
            event = events::YIELD_RELAY,
            component = COMPONENT,
            session_id = %callee.session_id(),
            invocation_id = %yielded.request,
            call_id = %record.call.request,
            "relayed yield as result"
        );

        caller.enqueue(Message::Result(CallResult {
            request: record.call.request,
            details: Dict::new(),
            arguments: yielded.arguments,
            arguments_kw: yielded.arguments_kw,
        }));
    }

    /// Relays a callee's `ERROR` for an invocation back to the caller,
    /// retiring the pending call exactly like a yield would.
    pub async fn error(&self, callee: &Outbox, invocation_error: Error) {
        let mut state = self.state.lock().await;

        let Some(record) = state.invocations.remove(&invocation_error.request) else {
            warn!(
                event = events::ERROR_DROPPED,
                component = COMPONENT,
                session_id = %callee.session_id(),
                invocation_id = %invocation_error.request,
                reason = fields::REASON_UNKNOWN_INVOCATION,
                "dropping invocation error"
            );
            return;
        };
        let Some(caller) = state.calls.remove(&record.call) else {
            warn!(
                event = events::ERROR_DROPPED,
                component = COMPONENT,
                session_id = %callee.session_id(),
                invocation_id = %invocation_error.request,
                call_id = %record.call.request,
                reason = fields::REASON_ORPHANED_CALL,
                "dropping invocation error"
            );
            return;
        };

        debug!(
            event = events::ERROR_RELAY,
            component = COMPONENT,
            session_id = %callee.session_id(),
            invocation_id = %invocation_error.request,
            call_id = %record.call.request,
            error = %invocation_error.error,
            "relayed invocation error to caller"
        );

        caller.enqueue(Message::Error(Error {
            request_type: MessageType::Call,
            request: record.call.request,
            details: invocation_error.details,
            error: invocation_error.error,
            arguments: invocation_error.arguments,
            arguments_kw: invocation_error.arguments_kw,
        }));
    }

    /// Tears down every registration owned by the peer and cancels the
    /// invocations that were in flight toward them, so their callers get a
    /// `wamp.error.canceled` reply instead of waiting forever.
    pub async fn disconnect(&self, callee: &Outbox) {
        let mut state = self.state.lock().await;

        let owned: Vec<(Id, Uri)> = state
            .procedures
            .iter()
            .filter(|(_, entry)| entry.callee.peer_key() == callee.peer_key())
            .map(|(&registration, entry)| (registration, entry.procedure.clone()))
            .collect();

        if owned.is_empty() {
            return;
        }

        let mut removed = HashSet::with_capacity(owned.len());
        for (registration, procedure) in owned {
            state.procedures.remove(&registration);
            state.registrations.remove(&procedure);
            removed.insert(registration);
            info!(
                event = events::DISCONNECT_UNREGISTER,
                component = COMPONENT,
                session_id = %callee.session_id(),
                registration_id = %registration,
                procedure = %procedure,
                "unregistered procedure on disconnect"
            );
        }

        let stranded: Vec<(Id, InvocationRecord)> = state
            .invocations
            .iter()
            .filter(|(_, record)| removed.contains(&record.registration))
            .map(|(&invocation, record)| (invocation, record.clone()))
            .collect();

        for (invocation, record) in stranded {
            state.invocations.remove(&invocation);
            let Some(caller) = state.calls.remove(&record.call) else {
                continue;
            };
            warn!(
                event = events::DISCONNECT_CALL_CANCELED,
                component = COMPONENT,
                session_id = %callee.session_id(),
                invocation_id = %invocation,
                call_id = %record.call.request,
                "canceled in-flight call on callee disconnect"
            );
            caller.enqueue(Message::Error(Error::for_request(
                MessageType::Call,
                record.call.request,
                wamp_error::CANCELED,
            )));
        }
    }
}

impl Default for Dealer {
    fn default() -> Self {
        Self::new()
    }
}

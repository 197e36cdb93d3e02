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

//! Wrapping identifier sequences for router-assigned and per-session IDs.

use crate::protocol::{Id, MAX_REQUEST_ID};
use std::sync::atomic::{AtomicU64, Ordering};

/// A wrapping monotonic ID generator.
///
/// Values run `1..=MAX_REQUEST_ID` and wrap back to `1`; `0` is never issued.
/// One router-scoped sequence hands out routing-assigned IDs (subscriptions,
/// publications, registrations, invocations); each session owns another for
/// client request correlation.
#[derive(Debug, Default)]
pub struct IdSequence {
    last: AtomicU64,
}

impl IdSequence {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Returns the next identifier in the sequence.
    pub fn next_id(&self) -> Id {
        let mut observed = self.last.load(Ordering::Relaxed);
        loop {
            let next = if observed >= MAX_REQUEST_ID {
                1
            } else {
                observed + 1
            };
            match self
                .last
                .compare_exchange_weak(observed, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return Id(next),
                Err(current) => observed = current,
            }
        }
    }
}

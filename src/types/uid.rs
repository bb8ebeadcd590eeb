// Copyright (c) 2024 Mike Tsao

//! Identifiers for listeners, and the factories that keep them unique.

use core::sync::atomic::{AtomicUsize, Ordering};
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Identifies one listener registration on one
/// [EventBus](crate::bus::EventBus). Subscribing the same closure twice yields
/// two different ids.
#[derive(Synonym, Serialize, Deserialize, Eq, PartialEq)]
// See
// https://doc.rust-lang.org/stable/std/marker/trait.StructuralPartialEq.html
// for explanation why we derive PartialEq rather than letting Synonym do it.
#[synonym(skip(PartialEq))]
#[serde(rename_all = "kebab-case")]
pub struct ListenerId(pub usize);

/// Mints [ListenerId]s, never the same one twice.
#[derive(Debug)]
pub struct UidFactory {
    next_uid_value: AtomicUsize,
}
impl Default for UidFactory {
    fn default() -> Self {
        Self::new(1)
    }
}
impl UidFactory {
    /// Creates a new [UidFactory] starting with the given value.
    pub fn new(first_uid: usize) -> Self {
        Self {
            next_uid_value: AtomicUsize::new(first_uid),
        }
    }

    /// Generates the next unique id.
    pub fn mint_next(&self) -> ListenerId {
        ListenerId(self.next_uid_value.fetch_add(1, Ordering::Relaxed))
    }
}

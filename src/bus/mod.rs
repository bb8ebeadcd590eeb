// Copyright (c) 2024 Mike Tsao

//! A minimal push-based event bus and the operators that compose it.
//!
//! Everything that moves through the system (trigger events, parameter
//! events, sequencer steps) travels on an [EventBus]. Buses are synchronous
//! and single-threaded: [EventBus::send] finishes delivering before it
//! returns, and there's no queue, replay, or backpressure. Derived buses
//! ([EventBus::map], [EventBus::filter], [EventBus::flat_map], [merge],
//! [combine]) forward from their sources as values arrive.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{combine, merge, EventBus, TimedSender, Unsubscribe};
}

pub use derived::{combine, merge};
pub use event_bus::{EventBus, Unsubscribe};
pub use sender::TimedSender;

mod derived;
mod event_bus;
mod sender;

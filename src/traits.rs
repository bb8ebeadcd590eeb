// Copyright (c) 2024 Mike Tsao

//! The traits that define many characteristics and relationships among parts of
//! the system.

use crate::types::Seconds;
use crossbeam::channel::{Receiver, Sender};
use std::{rc::Rc, sync::Arc};

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{Clock, ProvidesService};
}

// We re-export here so that consumers of traits don't have to worry as much
// about exactly where they are in the code, but those working on the code can
// still organize them.
pub use crate::automation::ParamSink;

/// A [Clock] supplies monotonic logical time. Producers stamp events with it;
/// nothing in the core reads a clock on its own.
///
/// A clock is constructed once per session and passed explicitly to whatever
/// needs it, which lets tests substitute a deterministic one.
pub trait Clock {
    /// The current time.
    fn now(&self) -> Seconds;
}
impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Seconds {
        (**self).now()
    }
}
impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Seconds {
        (**self).now()
    }
}
impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Seconds {
        (**self).now()
    }
}

/// Service methods.
///
/// A service is something that usually runs in its own thread as a daemon and
/// that communicates with clients by crossbeam channels. It accepts Inputs and
/// produces Events.
pub trait ProvidesService<I: core::fmt::Debug, E: core::fmt::Debug> {
    /// The sender side of the Input channel. Use this to send commands to the
    /// service.
    fn sender(&self) -> &Sender<I>;

    /// A convenience method to send Inputs to the service.
    fn send_input(&self, input: I) {
        if let Err(e) = self.sender().try_send(input) {
            log::error!("While sending: {e:?}");
        }
    }

    /// The receiver side of the Event channel. Integrate this into a listener
    /// loop to respond to events.
    fn receiver(&self) -> &Receiver<E>;

    /// Hands every event that's already waiting to `f`, without blocking.
    /// Returns how many were handled.
    fn drain_events(&self, mut f: impl FnMut(E)) -> usize {
        let mut count = 0;
        while let Ok(event) = self.receiver().try_recv() {
            f(event);
            count += 1;
        }
        count
    }
}

// Copyright (c) 2024 Mike Tsao

use super::EventBus;
use crate::{
    traits::Clock,
    types::{Seconds, TimedValue},
};
use std::rc::Rc;

/// Stamps values with a [Clock] and pushes them onto a bus of [TimedValue]s.
/// This is how an external producer (a keyboard handler, a MIDI input) turns
/// "it happened" into "it happened at time t".
#[derive(Clone)]
pub struct TimedSender<V> {
    bus: EventBus<TimedValue<V>>,
    clock: Rc<dyn Clock>,
}
impl<V> core::fmt::Debug for TimedSender<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimedSender")
            .field("bus", &self.bus)
            .field("now", &self.clock.now())
            .finish()
    }
}
impl<V: 'static> TimedSender<V> {
    /// Creates a sender with a fresh bus.
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self::new_with(EventBus::default(), clock)
    }

    /// Creates a sender that feeds an existing bus.
    pub fn new_with(bus: EventBus<TimedValue<V>>, clock: Rc<dyn Clock>) -> Self {
        Self { bus, clock }
    }

    /// Sends `value` stamped with the clock's current time.
    pub fn send(&self, value: V) {
        self.send_at(value, self.clock.now());
    }

    /// Sends `value` stamped with an explicit time.
    pub fn send_at(&self, value: V, time: Seconds) {
        self.bus.send(TimedValue::new(value, time));
    }

    /// The bus that receives the stamped values.
    pub fn bus(&self) -> &EventBus<TimedValue<V>> {
        &self.bus
    }
}

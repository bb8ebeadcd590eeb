// Copyright (c) 2024 Mike Tsao

use super::{ParamEvent, ParamSink};
use crate::{
    bus::{EventBus, Unsubscribe},
    types::TimedValue,
};
use std::{cell::RefCell, rc::Rc};

/// A stream of timed parameter changes.
pub type ParamEvents = EventBus<TimedValue<ParamEvent>>;

/// Applies every event on `events` to `sink`, at the event's time.
///
/// If the sink is already borrowed when an event arrives (for example,
/// because applying one event caused another to be sent), the event is logged
/// and dropped.
pub fn connect_sink<S: ParamSink + 'static>(
    events: &ParamEvents,
    sink: Rc<RefCell<S>>,
) -> Unsubscribe {
    events.subscribe(move |tv| match sink.try_borrow_mut() {
        Ok(mut sink) => tv.value.apply(&mut *sink, tv.time),
        Err(_) => log::warn!("sink is busy; dropping {tv:?}"),
    })
}

/// Derives a stream whose events are scaled by `factor`.
pub fn scaled(events: &ParamEvents, factor: f64) -> ParamEvents {
    events.map(move |tv| tv.map(|event| event.scale(factor)))
}

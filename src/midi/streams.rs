// Copyright (c) 2024 Mike Tsao

//! Buses derived from a stream of trigger events.

use super::MidiEvent;
use crate::{
    automation::ParamEvent,
    bus::EventBus,
    types::{note_to_detune_cents, note_to_frequency_hz, MidiChannel, TimedValue},
};

/// A stream of timed trigger events, as fed by an external source.
pub type MidiEvents = EventBus<TimedValue<MidiEvent>>;

/// A stream of timed on/off states.
pub type BoolTriggers = EventBus<TimedValue<bool>>;

/// Reduces trigger events to on (`true`) and off (`false`), keeping their
/// times.
pub fn bool_trigger(events: &MidiEvents) -> BoolTriggers {
    events.flat_map(|tv| {
        let is_on = match tv.value {
            MidiEvent::On { .. } => true,
            MidiEvent::Off { .. } => false,
        };
        Some(TimedValue::new(is_on, tv.time))
    })
}

/// Returns a transform that keeps only events on `channel`.
pub fn channel_filter(channel: MidiChannel) -> impl Fn(&MidiEvents) -> MidiEvents {
    move |events: &MidiEvents| events.filter(move |tv| tv.value.channel() == channel)
}

/// Returns a transform that keeps only events for `note`.
pub fn note_filter(note: u8) -> impl Fn(&MidiEvents) -> MidiEvents {
    move |events: &MidiEvents| events.filter(move |tv| tv.value.note() == note)
}

/// Sets a detune parameter, in cents relative to A4, for each note-on.
/// Note-offs produce nothing; the parameter keeps whatever it had.
pub fn note_to_detune(events: &MidiEvents) -> EventBus<TimedValue<ParamEvent>> {
    events
        .filter(|tv| tv.value.is_trigger_on())
        .map(|tv| {
            TimedValue::new(
                ParamEvent::SetValue(note_to_detune_cents(tv.value.note())),
                tv.time,
            )
        })
}

/// Sets a frequency parameter, in Hz, for each note-on. Note-offs produce
/// nothing.
pub fn note_to_frequency(events: &MidiEvents) -> EventBus<TimedValue<ParamEvent>> {
    events
        .filter(|tv| tv.value.is_trigger_on())
        .map(|tv| {
            TimedValue::new(
                ParamEvent::SetValue(note_to_frequency_hz(tv.value.note())),
                tv.time,
            )
        })
}

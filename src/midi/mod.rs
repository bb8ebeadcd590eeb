// Copyright (c) 2024 Mike Tsao

//! The trigger model: note-on/note-off events and the streams derived from
//! them.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{bool_trigger, channel_filter, BoolTriggers, MidiEvent, MidiEvents};
}

pub use events::MidiEvent;
pub use streams::{
    bool_trigger, channel_filter, note_filter, note_to_detune, note_to_frequency, BoolTriggers,
    MidiEvents,
};

mod events;
mod streams;

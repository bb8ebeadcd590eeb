// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{ListenerId, MidiChannel, Seconds, Tempo, TimedValue};
}

pub use {
    midi::{
        note_to_detune_cents, note_to_frequency_hz, u4, u7, MidiChannel, MidiMessage,
        A4_FREQUENCY_HZ, MIDI_NOTE_A4,
    },
    time::{Seconds, Tempo},
    timed::TimedValue,
    uid::{ListenerId, UidFactory},
};

mod midi;
mod time;
mod timed;
mod uid;

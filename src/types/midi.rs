// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use synonym::Synonym;

pub use midly::{
    num::{u4, u7},
    MidiMessage,
};

/// Newtype for MIDI channel.
#[derive(Synonym, Serialize, Deserialize)]
pub struct MidiChannel(pub u8);
#[allow(missing_docs)]
impl MidiChannel {
    pub const MIN_VALUE: u8 = 0;
    pub const MAX_VALUE: u8 = 15; // inclusive
    pub const DRUM_VALUE: u8 = 10;
    pub const DRUM: Self = Self(Self::DRUM_VALUE);

    pub const fn new(value: u8) -> Self {
        Self(value)
    }
}
impl From<u4> for MidiChannel {
    fn from(value: u4) -> Self {
        Self(value.as_int())
    }
}

/// The MIDI note number of A4, the tuning reference.
pub const MIDI_NOTE_A4: u8 = 69;

/// The frequency of A4, in Hz.
pub const A4_FREQUENCY_HZ: f64 = 440.0;

/// Converts a MIDI note number to its equal-tempered frequency.
pub fn note_to_frequency_hz(note: u8) -> f64 {
    A4_FREQUENCY_HZ * 2.0f64.powf((note as f64 - MIDI_NOTE_A4 as f64) / 12.0)
}

/// Converts a MIDI note number to a detune amount in cents relative to A4.
pub fn note_to_detune_cents(note: u8) -> f64 {
    (note as f64 - MIDI_NOTE_A4 as f64) * 100.0
}

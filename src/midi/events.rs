// Copyright (c) 2024 Mike Tsao

use crate::types::{u7, MidiChannel, MidiMessage};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use strum_macros::IntoStaticStr;

/// A discrete trigger: a key went down or came up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
pub enum MidiEvent {
    /// Note-on.
    On {
        /// Which logical line this event belongs to.
        channel: MidiChannel,
        /// MIDI note number, 0..=127.
        note: u8,
        /// 0..=127.
        velocity: u8,
    },
    /// Note-off.
    Off {
        /// Which logical line this event belongs to.
        channel: MidiChannel,
        /// MIDI note number, 0..=127.
        note: u8,
        /// Release velocity, 0..=127.
        velocity: u8,
    },
}
impl MidiEvent {
    /// Convenience function to make a note-on [MidiEvent].
    pub fn on(channel: MidiChannel, note: u8, velocity: u8) -> Self {
        Self::On {
            channel,
            note,
            velocity,
        }
    }

    /// Convenience function to make a note-off [MidiEvent].
    pub fn off(channel: MidiChannel, note: u8, velocity: u8) -> Self {
        Self::Off {
            channel,
            note,
            velocity,
        }
    }

    #[allow(missing_docs)]
    pub fn channel(&self) -> MidiChannel {
        match self {
            Self::On { channel, .. } | Self::Off { channel, .. } => *channel,
        }
    }

    #[allow(missing_docs)]
    pub fn note(&self) -> u8 {
        match self {
            Self::On { note, .. } | Self::Off { note, .. } => *note,
        }
    }

    #[allow(missing_docs)]
    pub fn velocity(&self) -> u8 {
        match self {
            Self::On { velocity, .. } | Self::Off { velocity, .. } => *velocity,
        }
    }

    /// Whether this event starts a note.
    pub fn is_trigger_on(&self) -> bool {
        matches!(self, Self::On { .. })
    }

    /// Whether this event ends a note.
    pub fn is_trigger_off(&self) -> bool {
        matches!(self, Self::Off { .. })
    }

    /// Interprets a raw MIDI message arriving on `channel`. A note-on with
    /// velocity zero means note-off, as it does on the wire. Anything that
    /// isn't a note message is an error.
    pub fn try_from_message(channel: MidiChannel, message: MidiMessage) -> anyhow::Result<Self> {
        match message {
            MidiMessage::NoteOn { key, vel } if vel == u7::from(0) => {
                Ok(Self::off(channel, key.as_int(), 0))
            }
            MidiMessage::NoteOn { key, vel } => Ok(Self::on(channel, key.as_int(), vel.as_int())),
            MidiMessage::NoteOff { key, vel } => {
                Ok(Self::off(channel, key.as_int(), vel.as_int()))
            }
            _ => Err(anyhow!("{message:?} is not a note message")),
        }
    }

    /// The wire form of this event. Note and velocity are truncated to seven
    /// bits.
    pub fn to_message(&self) -> (MidiChannel, MidiMessage) {
        let key = u7::from_int_lossy(self.note());
        let vel = u7::from_int_lossy(self.velocity());
        let message = match self {
            Self::On { .. } => MidiMessage::NoteOn { key, vel },
            Self::Off { .. } => MidiMessage::NoteOff { key, vel },
        };
        (self.channel(), message)
    }
}

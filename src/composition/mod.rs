// Copyright (c) 2024 Mike Tsao

//! Patterns and the pulse that plays them.
//!
//! A pattern is a [Generator] of [SequenceItem]s, each a set of simultaneous
//! values with a duration in pattern units. Generators combine with
//! [sequence], [looped], and [merge]. A [StepDriver] walks a generator in
//! fixed pattern-time steps, converting it to clock time using the ticks of a
//! [Stepper], and a [BeatClock] produces the beats that usually drive it.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        from_items, looped, make_step_seq, sequence, BeatClock, BeatEvent, Generator,
        GeneratorFactory, SequenceItem, StepDriver, Stepper,
    };
}

pub use beats::{BeatClock, BeatEvent};
pub use generators::{
    from_items, looped, merge, sequence, Generator, GeneratorFactory, SequenceItem,
};
pub use stepper::{make_step_seq, StepDriver, Stepper};

mod beats;
mod generators;
mod stepper;

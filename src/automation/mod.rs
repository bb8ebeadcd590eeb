// Copyright (c) 2024 Mike Tsao

//! Scheduled changes to continuous parameters.
//!
//! A [ParamEvent] describes one change (jump, ramp, exponential approach, or
//! cancel). Paired with a time in a [TimedValue](crate::types::TimedValue), it
//! travels on an [EventBus](crate::bus::EventBus) until something calls
//! [ParamEvent::apply()] with a [ParamSink], which is whatever actually owns
//! the parameter. [Envelope] turns on/off triggers into ADSR-shaped batches of
//! these events, and [ParamTimeline] is a software sink that can evaluate the
//! result.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        connect_sink, Envelope, EnvelopeShape, EnvelopeSpec, EnvelopeSpecBuilder, ParamEvent,
        ParamEvents, ParamSink, ParamTimeline,
    };
}

pub use envelope::{Envelope, EnvelopeError, EnvelopeShape, EnvelopeSpec, EnvelopeSpecBuilder};
pub use events::ParamEvent;
pub use streams::{connect_sink, scaled, ParamEvents};
pub use timeline::ParamTimeline;
pub use traits::ParamSink;

mod envelope;
mod events;
mod streams;
mod timeline;
mod traits;

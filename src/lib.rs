// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Paramflow turns discrete triggers and note patterns into precisely timed
//! parameter automation.
//!
//! Everything moves on synchronous [EventBus](bus::EventBus)es of
//! [TimedValue](types::TimedValue)s. A typical chain looks like this:
//!
//! * A [Session](orchestration::Session) stamps incoming
//! [MidiEvent](midi::MidiEvent)s with a lagged [Clock](traits::Clock) and
//! sends them on its trigger bus.
//! * [channel_filter](midi::channel_filter) and
//! [bool_trigger](midi::bool_trigger) narrow that down to one line's on/off
//! states.
//! * An [Envelope](automation::Envelope) turns each on/off into a batch of
//! [ParamEvent](automation::ParamEvent)s.
//! * [connect_sink](automation::connect_sink) applies them to whatever owns the
//! parameter, through the [ParamSink](traits::ParamSink) trait.
//!
//! Patterns follow a parallel path: [composition] generators are merged and
//! walked by a [StepDriver](composition::StepDriver) that converts pattern
//! time to clock time using the session's beats.
//!
//! ```
//! use paramflow::prelude::*;
//! use std::{cell::RefCell, rc::Rc};
//!
//! let clock = Rc::new(ManualClock::new(Seconds(1.0)));
//! let session = Session::new(SessionConfig::default(), clock.clone());
//! let envelope = Envelope::new(
//!     EnvelopeSpecBuilder::default()
//!         .attack(0.01)
//!         .decay(0.1)
//!         .sustain(0.5)
//!         .release(0.2)
//!         .build()
//!         .unwrap(),
//! )
//! .unwrap();
//! let triggers = bool_trigger(&channel_filter(MidiChannel(0))(session.midi_events()));
//! let timeline = Rc::new(RefCell::new(ParamTimeline::default()));
//! let _ = connect_sink(&envelope.attach(&triggers), timeline.clone());
//!
//! session.send_midi(MidiEvent::on(MidiChannel(0), 60, 100), None);
//! assert!(timeline.borrow().value_at(Seconds(2.0)) > 0.49);
//! ```

/// A collection of imports that are useful to users of this crate. `use
/// paramflow::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        automation::prelude::*, bus::prelude::*, composition::prelude::*, midi::prelude::*,
        orchestration::prelude::*, traits::prelude::*, types::prelude::*, util::prelude::*,
    };
}

// Fundamental structures that are important enough to re-export at top level.
pub use {
    automation::{Envelope, ParamEvent},
    bus::EventBus,
    orchestration::Session,
};

pub mod automation;
pub mod bus;
pub mod composition;
pub mod midi;
pub mod orchestration;
pub mod traits;
pub mod types;
pub mod util;

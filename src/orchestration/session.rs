// Copyright (c) 2024 Mike Tsao

use crate::{
    bus::{EventBus, TimedSender},
    composition::{BeatClock, BeatEvent, Stepper},
    midi::{MidiEvent, MidiEvents},
    traits::Clock,
    types::{Seconds, Tempo, TimedValue},
    util::LaggedClock,
};
use delegate::delegate;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Settings for a [Session].
///
/// ```
/// # use paramflow::prelude::*;
/// let config = SessionConfig::from_json(r#"{"tempo": 90}"#).unwrap();
/// assert_eq!(config.tempo, Tempo(90.0));
/// assert_eq!(config.lag, Seconds(0.01));
/// ```
#[derive(Builder, Clone, Copy, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default, rename_all = "kebab-case")]
#[builder(default, setter(into))]
pub struct SessionConfig {
    /// How far ahead of the clock events are stamped by default, so that the
    /// sink has time to schedule them. Must not be negative.
    #[derivative(Default(value = "SessionConfig::DEFAULT_LAG"))]
    pub lag: Seconds,

    /// The beat clock's starting tempo.
    pub tempo: Tempo,
}
impl SessionConfig {
    /// The lag used when none (or an unusable one) is given.
    pub const DEFAULT_LAG: Seconds = Seconds(0.01);

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The root context that ties a clock to the buses everything else hangs off
/// of.
///
/// A [Session] owns the trigger bus (fed by [Session::send_midi()]), the beat
/// bus (fed by [Session::poll_beats()]), and the lagged clock that stamps
/// events. Its [Clock] implementation reports the lagged time.
pub struct Session {
    clock: Rc<LaggedClock<Rc<dyn Clock>>>,
    midi_sender: TimedSender<MidiEvent>,
    beat_events: EventBus<TimedValue<BeatEvent>>,
    beat_clock: BeatClock,
}
impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("now", &self.now())
            .field("lag", &self.lag())
            .field("beat_clock", &self.beat_clock)
            .finish()
    }
}
impl Clock for Session {
    delegate! {
        to self.clock {
            fn now(&self) -> Seconds;
        }
    }
}
impl Session {
    /// Creates a session around `clock`. A negative or non-finite lag in
    /// `config` is replaced with [SessionConfig::DEFAULT_LAG].
    pub fn new(config: SessionConfig, clock: Rc<dyn Clock>) -> Self {
        let lag = if config.lag.is_valid_duration() {
            config.lag
        } else {
            log::warn!(
                "lag {} is unusable; using {}",
                config.lag,
                SessionConfig::DEFAULT_LAG
            );
            SessionConfig::DEFAULT_LAG
        };
        let clock = Rc::new(LaggedClock::new(clock, lag));
        let midi_sender = TimedSender::new(Rc::clone(&clock) as Rc<dyn Clock>);
        Self {
            clock,
            midi_sender,
            beat_events: Default::default(),
            beat_clock: BeatClock::new(config.tempo),
        }
    }

    delegate! {
        to self.clock {
            /// How far ahead of the underlying clock [Session::now()] runs.
            pub fn lag(&self) -> Seconds;
        }
        to self.beat_clock {
            #[allow(missing_docs)]
            pub fn tempo(&self) -> Tempo;
            /// Changes the tempo, starting with the next beat.
            pub fn set_tempo(&mut self, tempo: Tempo);
            /// How often [Session::poll_beats()] should be called.
            pub fn poll_interval(&self) -> Seconds;
        }
    }

    /// The lagged time. Events sent without an explicit time get this one.
    pub fn now(&self) -> Seconds {
        Clock::now(self)
    }

    /// The trigger bus. Subscribe to it (or derive from it) to react to
    /// note-on and note-off.
    pub fn midi_events(&self) -> &MidiEvents {
        self.midi_sender.bus()
    }

    /// A sender that stamps trigger events with [Session::now()].
    pub fn midi_sender(&self) -> &TimedSender<MidiEvent> {
        &self.midi_sender
    }

    /// Sends `event` on the trigger bus, at `at` if given, otherwise at
    /// [Session::now()].
    pub fn send_midi(&self, event: MidiEvent, at: Option<Seconds>) {
        match at {
            Some(time) => self.midi_sender.send_at(event, time),
            None => self.midi_sender.send(event),
        }
    }

    /// The beat bus.
    pub fn beat_events(&self) -> &EventBus<TimedValue<BeatEvent>> {
        &self.beat_events
    }

    /// Asks the beat clock whether a beat is due, using the underlying
    /// (unlagged) time, and sends it on the beat bus if so.
    pub fn poll_beats(&mut self) -> Option<TimedValue<BeatEvent>> {
        let beat = self.beat_clock.poll(self.clock.inner().now())?;
        self.beat_events.send(beat);
        Some(beat)
    }

    /// Derives a [Stepper] that ticks once per beat. Drive a pattern with it
    /// using a step of a quarter note (0.25 pattern units).
    pub fn stepper(&self) -> Stepper {
        self.beat_events
            .map(|beat| TimedValue::new(beat.value.duration, beat.time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        composition::{from_items, make_step_seq, SequenceItem},
        types::MidiChannel,
        util::ManualClock,
    };
    use float_cmp::approx_eq;
    use std::cell::RefCell;

    fn manual_session(config: SessionConfig) -> (Rc<ManualClock>, Session) {
        let clock = Rc::new(ManualClock::new(Seconds(1.0)));
        let session = Session::new(config, Rc::clone(&clock) as Rc<dyn Clock>);
        (clock, session)
    }

    #[test]
    fn config_defaults_and_builder() {
        let config = SessionConfig::default();
        assert_eq!(config.lag, Seconds(0.01));
        assert_eq!(config.tempo, Tempo(120.0));

        let config = SessionConfigBuilder::default()
            .tempo(Tempo(96.0))
            .build()
            .unwrap();
        assert_eq!(config.lag, SessionConfig::DEFAULT_LAG);
        assert_eq!(config.tempo, Tempo(96.0));

        let config = SessionConfig::from_json(r#"{"lag": 0.05, "tempo": 140.5}"#).unwrap();
        assert_eq!(config.lag, Seconds(0.05));
        assert_eq!(config.tempo, Tempo(140.5));
        assert!(SessionConfig::from_json("{not json").is_err());
    }

    #[test]
    fn negative_lag_falls_back() {
        let (_, session) = manual_session(SessionConfig {
            lag: Seconds(-0.5),
            ..Default::default()
        });
        assert_eq!(session.lag(), SessionConfig::DEFAULT_LAG);
    }

    #[test]
    fn send_midi_defaults_to_lagged_now() {
        let (clock, session) = manual_session(SessionConfig {
            lag: Seconds(0.25),
            ..Default::default()
        });
        let tracker: Rc<RefCell<Vec<TimedValue<MidiEvent>>>> = Default::default();
        {
            let tracker = Rc::clone(&tracker);
            let _ = session
                .midi_events()
                .subscribe(move |tv| tracker.borrow_mut().push(*tv));
        }

        let on = MidiEvent::on(MidiChannel(0), 60, 100);
        session.send_midi(on, None);
        clock.advance(Seconds(1.0));
        session.send_midi(on, Some(Seconds(7.0)));
        session.midi_sender().send(MidiEvent::off(MidiChannel(0), 60, 0));

        let tracker = tracker.borrow();
        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker[0].time, Seconds(1.25));
        assert_eq!(tracker[1].time, Seconds(7.0));
        assert_eq!(tracker[2].time, Seconds(2.25));
        assert!(approx_eq!(f64, session.now().0, 2.25));
    }

    #[test]
    fn beats_drive_a_pattern() {
        let (clock, mut session) = manual_session(SessionConfig::default());
        let notes = make_step_seq(
            from_items(vec![
                SequenceItem::new(vec![60u8], 0.25),
                SequenceItem::new(vec![64u8], 0.25),
            ])(0),
            &session.stepper(),
            0.25,
        );
        let tracker: Rc<RefCell<Vec<TimedValue<Vec<u8>>>>> = Default::default();
        {
            let tracker = Rc::clone(&tracker);
            let _ = notes.subscribe(move |tv| tracker.borrow_mut().push(tv.clone()));
        }

        assert!(approx_eq!(f64, session.poll_interval().0, 0.25));
        let first = session.poll_beats().unwrap();
        assert_eq!(first.time, Seconds(1.0), "beats use the unlagged clock");
        clock.advance(session.poll_interval());
        let second = session.poll_beats().unwrap();
        assert_eq!(second.time, Seconds(1.5));
        assert!(session.poll_beats().is_none());

        session.set_tempo(Tempo(60.0));
        assert_eq!(session.tempo(), Tempo(60.0));

        assert_eq!(
            *tracker.borrow(),
            vec![
                TimedValue::new(vec![60], Seconds(1.0)),
                TimedValue::new(vec![64], Seconds(1.5)),
            ]
        );
    }
}

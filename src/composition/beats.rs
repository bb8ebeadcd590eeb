// Copyright (c) 2024 Mike Tsao

use crate::types::{Seconds, Tempo, TimedValue};
use serde::{Deserialize, Serialize};

/// One beat of the session's pulse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BeatEvent {
    /// Counts up from 1.
    pub index: usize,
    /// How long this beat lasts, given the tempo when it was scheduled.
    pub duration: Seconds,
}

/// Schedules beats one beat ahead of time.
///
/// Call [BeatClock::poll()] at least every [BeatClock::poll_interval()]. It
/// returns the next beat once that beat is less than a beat away. A beat
/// that's already late (because polling stalled) is moved up to "now" so that
/// nothing gets scheduled in the past; later beats follow on from there.
#[derive(Clone, Debug)]
pub struct BeatClock {
    tempo: Tempo,
    last: TimedValue<BeatEvent>,
    skipped: usize,
}
impl Default for BeatClock {
    fn default() -> Self {
        Self::new(Tempo::default())
    }
}
impl BeatClock {
    #[allow(missing_docs)]
    pub fn new(tempo: Tempo) -> Self {
        Self {
            tempo,
            last: Default::default(),
            skipped: Default::default(),
        }
    }

    #[allow(missing_docs)]
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Changes the tempo. Beats already handed out keep their durations.
    pub fn set_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo;
    }

    /// How often to call [BeatClock::poll()]: half a beat.
    pub fn poll_interval(&self) -> Seconds {
        self.tempo.beat_duration() / 2.0
    }

    /// How many beats had to be moved because they were already late.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// The most recent beat handed out, if any.
    pub fn last_beat(&self) -> Option<TimedValue<BeatEvent>> {
        (self.last.value.index > 0).then_some(self.last)
    }

    /// Returns the next beat if it's due within one beat of `now`.
    pub fn poll(&mut self, now: Seconds) -> Option<TimedValue<BeatEvent>> {
        let duration = self.tempo.beat_duration();
        let index = self.last.value.index + 1;
        let mut time = self.last.time + self.last.value.duration;
        if time < now {
            // The very first beat has nothing to be late relative to.
            if index > 1 {
                log::warn!("beat {index} was due at {time}, but it's already {now}; skipped a beat?");
                self.skipped += 1;
            }
            time = now;
        }
        if time < now + duration {
            self.last = TimedValue::new(BeatEvent { index, duration }, time);
            Some(self.last)
        } else {
            None
        }
    }
}

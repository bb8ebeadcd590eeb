// Copyright (c) 2024 Mike Tsao

//! [Clock] implementations.

use crate::{traits::Clock, types::Seconds};
use std::{cell::Cell, time::Instant};

/// A clock that moves only when told to. Good for tests and for offline
/// rendering, where "now" is whatever the renderer says it is.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Seconds>,
}
impl Clock for ManualClock {
    fn now(&self) -> Seconds {
        self.now.get()
    }
}
impl ManualClock {
    /// Creates a clock that reads `start` until it's moved.
    pub fn new(start: Seconds) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jumps to `time`. Going backward is allowed; callers that need
    /// monotonicity should use [ManualClock::advance].
    pub fn set(&self, time: Seconds) {
        self.now.set(time);
    }

    /// Moves forward by `delta`. Negative deltas are ignored.
    pub fn advance(&self, delta: Seconds) {
        if delta.0 > 0.0 {
            self.now.set(self.now.get() + delta);
        }
    }
}

/// Wall-clock time since the clock was created, from the OS monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}
impl Clock for SystemClock {
    fn now(&self) -> Seconds {
        Seconds(self.start.elapsed().as_secs_f64())
    }
}

/// Reports another clock's time plus a fixed lag, so that events stamped with
/// it land far enough in the future for the sink to schedule them.
#[derive(Debug)]
pub struct LaggedClock<C: Clock> {
    inner: C,
    lag: Seconds,
}
impl<C: Clock> Clock for LaggedClock<C> {
    fn now(&self) -> Seconds {
        self.inner.now() + self.lag
    }
}
impl<C: Clock> LaggedClock<C> {
    #[allow(missing_docs)]
    pub fn new(inner: C, lag: Seconds) -> Self {
        Self { inner, lag }
    }

    /// The fixed offset added to the inner clock.
    pub fn lag(&self) -> Seconds {
        self.lag
    }

    /// The clock without the lag.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

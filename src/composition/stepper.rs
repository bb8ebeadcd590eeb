// Copyright (c) 2024 Mike Tsao

use super::Generator;
use crate::{
    bus::EventBus,
    types::{Seconds, TimedValue},
};
use std::cell::RefCell;

/// A stream of stepper ticks. Each tick's value is how long the step lasts,
/// and its time is when the step starts.
pub type Stepper = EventBus<TimedValue<Seconds>>;

/// Converts pattern time into clock time, one step at a time.
///
/// Each tick covers the pattern-time window `[cursor, cursor + step)`. Every
/// item that starts inside the window is emitted, scheduled proportionally
/// within the tick's duration. Rests are emitted too, as empty batches.
pub struct StepDriver<T> {
    generator: Generator<T>,
    step: f64,

    // Start of the pattern-time window that the next tick covers.
    cursor: f64,

    // Where the next item from the generator starts, in pattern time.
    next_item_start: f64,

    is_done: bool,
}
impl<T> core::fmt::Debug for StepDriver<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StepDriver")
            .field("step", &self.step)
            .field("cursor", &self.cursor)
            .field("next_item_start", &self.next_item_start)
            .field("is_done", &self.is_done)
            .finish()
    }
}
impl<T> StepDriver<T> {
    /// A sixteenth of a pattern unit.
    pub const DEFAULT_STEP: f64 = 1.0 / 16.0;

    /// A single tick won't emit more than this many items. Only a generator
    /// with runs of zero-length items can reach it.
    pub const MAX_ITEMS_PER_TICK: usize = 1024;

    /// Creates a driver advancing `step` pattern units per tick. A step that
    /// isn't a positive finite number is replaced by [StepDriver::DEFAULT_STEP].
    pub fn new(generator: Generator<T>, step: f64) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            log::warn!("step {step} is unusable; using {}", Self::DEFAULT_STEP);
            Self::DEFAULT_STEP
        };
        Self {
            generator,
            step,
            cursor: 0.0,
            next_item_start: 0.0,
            is_done: false,
        }
    }

    #[allow(missing_docs)]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Whether the generator has run out. A finished driver ignores ticks.
    pub fn is_done(&self) -> bool {
        self.is_done
    }

    /// Advances by one step that starts at `time` and lasts `duration`,
    /// returning the batches that fall inside it.
    pub fn tick(&mut self, duration: Seconds, time: Seconds) -> Vec<TimedValue<Vec<T>>> {
        let mut batches = Vec::default();
        if self.is_done {
            return batches;
        }
        let window_end = self.cursor + self.step;
        while self.next_item_start < window_end {
            if batches.len() >= Self::MAX_ITEMS_PER_TICK {
                log::warn!(
                    "more than {} items in one step; deferring the rest",
                    Self::MAX_ITEMS_PER_TICK
                );
                break;
            }
            let Some(item) = self.generator.next() else {
                log::debug!("generator finished at pattern time {}", self.next_item_start);
                self.is_done = true;
                break;
            };
            // Items deferred from an earlier step start at this step's time.
            let offset = ((self.next_item_start - self.cursor) / self.step).max(0.0);
            batches.push(TimedValue::new(item.values, time + duration * offset));
            self.next_item_start += item.duration;
        }
        self.cursor = window_end;
        batches
    }
}

/// Drives `generator` from `stepper`, returning a bus of timed batches.
///
/// Dispose the returned bus to detach it from the stepper.
pub fn make_step_seq<T: 'static>(
    generator: Generator<T>,
    stepper: &Stepper,
    step: f64,
) -> EventBus<TimedValue<Vec<T>>> {
    let driver = RefCell::new(StepDriver::new(generator, step));
    stepper.flat_map(move |tick| driver.borrow_mut().tick(tick.value, tick.time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{from_items, looped, SequenceItem};
    use float_cmp::approx_eq;
    use std::rc::Rc;

    fn sixteenths(notes: &[u8]) -> Vec<SequenceItem<u8>> {
        notes
            .iter()
            .map(|n| SequenceItem::new(vec![*n], 1.0 / 16.0))
            .collect()
    }

    #[test]
    fn one_item_per_matching_step() {
        let mut driver = StepDriver::new(
            from_items(sixteenths(&[1, 2, 3]))(0),
            StepDriver::<u8>::DEFAULT_STEP,
        );
        let a = driver.tick(Seconds(0.125), Seconds(10.0));
        assert_eq!(a, vec![TimedValue::new(vec![1], Seconds(10.0))]);
        let b = driver.tick(Seconds(0.125), Seconds(10.125));
        assert_eq!(b, vec![TimedValue::new(vec![2], Seconds(10.125))]);
        let c = driver.tick(Seconds(0.125), Seconds(10.25));
        assert_eq!(c, vec![TimedValue::new(vec![3], Seconds(10.25))]);
        assert!(!driver.is_done());

        // The next pull finds nothing, and then the driver goes quiet.
        assert!(driver.tick(Seconds(0.125), Seconds(10.375)).is_empty());
        assert!(driver.is_done());
        assert!(driver.tick(Seconds(0.125), Seconds(10.5)).is_empty());
    }

    #[test]
    fn short_items_are_spread_within_a_step() {
        let items = vec![
            SequenceItem::new(vec![1], 1.0 / 32.0),
            SequenceItem::new(vec![2], 1.0 / 32.0),
        ];
        let mut driver = StepDriver::new(from_items(items)(0), 1.0 / 16.0);
        let batches = driver.tick(Seconds(1.0), Seconds(4.0));
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].time, Seconds(4.0));
        assert!(approx_eq!(f64, batches[1].time.0, 4.5));
    }

    #[test]
    fn long_items_leave_steps_empty() {
        let items = vec![
            SequenceItem::new(vec![1], 0.25),
            SequenceItem::rest(0.0625),
            SequenceItem::new(vec![2], 0.0625),
        ];
        let mut driver = StepDriver::new(from_items(items)(0), 0.0625);
        let mut per_tick = Vec::default();
        for i in 0..6 {
            per_tick.push(
                driver
                    .tick(Seconds(0.1), Seconds(i as f64 * 0.1))
                    .len(),
            );
        }
        assert_eq!(per_tick, vec![1, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn bad_step_falls_back_to_default() {
        let driver = StepDriver::new(from_items(sixteenths(&[1]))(0), 0.0);
        assert_eq!(driver.step(), StepDriver::<u8>::DEFAULT_STEP);
    }

    #[test]
    fn zero_length_items_are_capped_per_tick() {
        let zero = from_items(vec![SequenceItem::new(vec![0u8], 0.0)]);
        let mut driver = StepDriver::new(looped(zero, None)(0), 1.0 / 16.0);
        let batches = driver.tick(Seconds(1.0), Seconds(0.0));
        assert_eq!(batches.len(), StepDriver::<u8>::MAX_ITEMS_PER_TICK);
        assert!(!driver.is_done());
    }

    #[test]
    fn deferred_items_land_at_the_next_tick() {
        let mut items = vec![SequenceItem::new(vec![0u8], 0.0); 1030];
        items.push(SequenceItem::new(vec![1], 1.0 / 16.0));
        let mut driver = StepDriver::new(from_items(items)(0), 1.0 / 16.0);

        let first = driver.tick(Seconds(0.125), Seconds(0.0));
        assert_eq!(first.len(), StepDriver::<u8>::MAX_ITEMS_PER_TICK);

        let second = driver.tick(Seconds(0.125), Seconds(1.0));
        assert_eq!(second.len(), 7);
        assert!(
            second.iter().all(|batch| batch.time == Seconds(1.0)),
            "nothing should be stamped before the tick that emits it"
        );
        assert_eq!(second.last().map(|batch| batch.value.clone()), Some(vec![1]));
    }

    #[test]
    fn step_seq_on_a_bus() {
        let stepper = Stepper::default();
        let out = make_step_seq(from_items(sixteenths(&[60, 62]))(0), &stepper, 1.0 / 16.0);
        let tracker: Rc<RefCell<Vec<TimedValue<Vec<u8>>>>> = Default::default();
        {
            let tracker = Rc::clone(&tracker);
            let _ = out.subscribe(move |tv| tracker.borrow_mut().push(tv.clone()));
        }
        for i in 0..4 {
            stepper.send(TimedValue::new(Seconds(0.5), Seconds(i as f64 * 0.5)));
        }
        assert_eq!(
            *tracker.borrow(),
            vec![
                TimedValue::new(vec![60], Seconds(0.0)),
                TimedValue::new(vec![62], Seconds(0.5)),
            ]
        );

        out.dispose();
        assert!(!stepper.has_listeners());
    }
}

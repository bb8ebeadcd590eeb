// Copyright (c) 2024 Mike Tsao

use super::{ParamEvent, ParamSink};
use crate::types::{Seconds, TimedValue};
use serde::{Deserialize, Serialize};

/// The shape of the parameter between two scheduled points.
#[derive(Clone, Copy, Debug)]
enum Curve {
    Hold(f64),
    Target {
        start: Seconds,
        from: f64,
        target: f64,
        time_constant: Seconds,
    },
}
impl Curve {
    fn at(&self, time: Seconds) -> f64 {
        match *self {
            Curve::Hold(value) => value,
            Curve::Target {
                start,
                from,
                target,
                time_constant,
            } => {
                if time_constant.0 <= 0.0 {
                    target
                } else if time < start {
                    from
                } else {
                    target + (from - target) * (-(time - start).0 / time_constant.0).exp()
                }
            }
        }
    }
}

/// A software [ParamSink] that records what it's asked to do and can tell you
/// the parameter's value at any time. Useful for tests, offline rendering, and
/// for checking that a chain of streams produces the envelope you expect.
///
/// Scheduled changes are kept in time order. Changes at the same time keep the
/// order they arrived in.
///
/// A [ParamEvent::LinearRamp] starts from wherever the previous change left the
/// parameter at that change's time. For an exponential approach, that's the
/// value the approach started from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParamTimeline {
    initial: f64,
    events: Vec<TimedValue<ParamEvent>>,
}
impl ParamTimeline {
    /// Creates a timeline whose value is `initial` until something changes it.
    pub fn new(initial: f64) -> Self {
        Self {
            initial,
            events: Default::default(),
        }
    }

    /// The scheduled changes, in time order. Never contains
    /// [ParamEvent::Cancel]; cancels edit the list instead.
    pub fn events(&self) -> &[TimedValue<ParamEvent>] {
        &self.events
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Evaluates the parameter at `time`.
    pub fn value_at(&self, time: Seconds) -> f64 {
        let mut curve = Curve::Hold(self.initial);
        let mut anchor = Seconds::zero();
        for event in self.events.iter() {
            if event.time > time {
                // A ramp that ends in the future is already under way.
                if let ParamEvent::LinearRamp(end) = event.value {
                    let span = (event.time - anchor).0;
                    if span > 0.0 {
                        let from = curve.at(anchor);
                        let fraction = ((time - anchor).0 / span).clamp(0.0, 1.0);
                        return from + (end - from) * fraction;
                    }
                }
                break;
            }
            let held = curve.at(event.time);
            curve = match event.value {
                ParamEvent::SetValue(value) | ParamEvent::LinearRamp(value) => Curve::Hold(value),
                ParamEvent::ApproachTarget {
                    target,
                    time_constant,
                } => Curve::Target {
                    start: event.time,
                    from: held,
                    target,
                    time_constant,
                },
                ParamEvent::Cancel => Curve::Hold(held),
            };
            anchor = event.time;
        }
        curve.at(time)
    }

    fn insert(&mut self, event: ParamEvent, time: Seconds) {
        let index = self.events.partition_point(|e| e.time <= time);
        self.events.insert(index, TimedValue::new(event, time));
    }
}
impl ParamSink for ParamTimeline {
    fn set_value_at_time(&mut self, value: f64, time: Seconds) {
        self.insert(ParamEvent::SetValue(value), time);
    }

    fn linear_ramp_to_value_at_time(&mut self, value: f64, time: Seconds) {
        self.insert(ParamEvent::LinearRamp(value), time);
    }

    fn set_target_at_time(&mut self, target: f64, start: Seconds, time_constant: Seconds) {
        self.insert(ParamEvent::approach(target, time_constant), start);
    }

    fn cancel_scheduled_values(&mut self, time: Seconds) {
        self.events.retain(|e| e.time < time);
    }

    fn cancel_and_hold_at_time(&mut self, time: Seconds) -> bool {
        let held = self.value_at(time);
        let is_mid_ramp = self
            .events
            .iter()
            .find(|e| e.time >= time)
            .is_some_and(|e| e.time > time && matches!(e.value, ParamEvent::LinearRamp(_)));
        self.cancel_scheduled_values(time);

        // A ramp that was under way keeps its shape up to the hold point.
        if is_mid_ramp {
            self.linear_ramp_to_value_at_time(held, time);
        } else {
            self.set_value_at_time(held, time);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn starts_at_initial_value() {
        let timeline = ParamTimeline::new(0.25);
        assert!(timeline.is_empty());
        assert_eq!(timeline.value_at(Seconds(100.0)), 0.25);
    }

    #[test]
    fn set_value_jumps() {
        let mut timeline = ParamTimeline::default();
        timeline.set_value_at_time(1.0, Seconds(1.0));
        timeline.set_value_at_time(0.5, Seconds(2.0));
        assert_eq!(timeline.value_at(Seconds(0.5)), 0.0);
        assert_eq!(timeline.value_at(Seconds(1.0)), 1.0);
        assert_eq!(timeline.value_at(Seconds(1.999)), 1.0);
        assert_eq!(timeline.value_at(Seconds(2.0)), 0.5);
    }

    #[test]
    fn linear_ramp_interpolates_from_previous_point() {
        let mut timeline = ParamTimeline::default();
        timeline.set_value_at_time(0.0, Seconds(1.0));
        timeline.linear_ramp_to_value_at_time(1.0, Seconds(2.0));
        assert!(approx_eq!(f64, timeline.value_at(Seconds(1.0)), 0.0));
        assert!(approx_eq!(f64, timeline.value_at(Seconds(1.5)), 0.5));
        assert!(approx_eq!(f64, timeline.value_at(Seconds(1.75)), 0.75));
        assert!(approx_eq!(f64, timeline.value_at(Seconds(3.0)), 1.0));
    }

    #[test]
    fn approach_target_decays_exponentially() {
        let mut timeline = ParamTimeline::default();
        timeline.set_value_at_time(1.0, Seconds(0.0));
        timeline.set_target_at_time(0.0, Seconds(1.0), Seconds(0.5));
        assert_eq!(timeline.value_at(Seconds(1.0)), 1.0);
        assert!(approx_eq!(
            f64,
            timeline.value_at(Seconds(1.5)),
            (-1.0f64).exp(),
            epsilon = 1e-12
        ));
        assert!(approx_eq!(
            f64,
            timeline.value_at(Seconds(2.0)),
            (-2.0f64).exp(),
            epsilon = 1e-12
        ));

        // A zero time constant is a jump.
        timeline.set_target_at_time(0.75, Seconds(3.0), Seconds::zero());
        assert_eq!(timeline.value_at(Seconds(3.0)), 0.75);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut timeline = ParamTimeline::default();
        timeline.set_value_at_time(1.0, Seconds(1.0));
        timeline.set_value_at_time(2.0, Seconds(1.0));
        timeline.set_value_at_time(0.5, Seconds(0.5));
        assert_eq!(
            timeline.events(),
            &[
                TimedValue::new(ParamEvent::SetValue(0.5), Seconds(0.5)),
                TimedValue::new(ParamEvent::SetValue(1.0), Seconds(1.0)),
                TimedValue::new(ParamEvent::SetValue(2.0), Seconds(1.0)),
            ]
        );
        assert_eq!(timeline.value_at(Seconds(1.0)), 2.0);
    }

    #[test]
    fn cancel_drops_later_events() {
        let mut timeline = ParamTimeline::default();
        timeline.set_value_at_time(1.0, Seconds(1.0));
        timeline.set_value_at_time(2.0, Seconds(2.0));
        timeline.set_value_at_time(3.0, Seconds(3.0));
        timeline.cancel_scheduled_values(Seconds(2.0));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.value_at(Seconds(5.0)), 1.0);
    }

    #[test]
    fn cancel_and_hold_freezes_mid_ramp() {
        let mut timeline = ParamTimeline::default();
        timeline.set_value_at_time(0.0, Seconds(0.0));
        timeline.linear_ramp_to_value_at_time(1.0, Seconds(1.0));
        assert!(timeline.cancel_and_hold_at_time(Seconds(0.25)));
        assert!(approx_eq!(f64, timeline.value_at(Seconds(0.25)), 0.25));
        assert!(approx_eq!(f64, timeline.value_at(Seconds(10.0)), 0.25));

        // Cancel through apply() uses hold because the timeline supports it.
        timeline.linear_ramp_to_value_at_time(1.0, Seconds(1.25));
        ParamEvent::Cancel.apply(&mut timeline, Seconds(0.75));
        assert!(approx_eq!(f64, timeline.value_at(Seconds(2.0)), 0.625));
    }
}

// Copyright (c) 2024 Mike Tsao

use super::ParamSink;
use crate::types::Seconds;
use serde::{Deserialize, Serialize};
use strum_macros::IntoStaticStr;

/// One scheduled change to a continuous parameter.
///
/// A [ParamEvent] says *what* should happen; the time at which it happens
/// travels alongside it in a [TimedValue](crate::types::TimedValue). Nothing
/// happens until a consumer calls [ParamEvent::apply()] with a [ParamSink].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
pub enum ParamEvent {
    /// Jump to the value.
    SetValue(f64),
    /// Arrive at the value, moving linearly from the previous scheduled point.
    LinearRamp(f64),
    /// Start moving exponentially toward `target`. After one `time_constant`
    /// about 63% of the distance is covered.
    ApproachTarget {
        #[allow(missing_docs)]
        target: f64,
        #[allow(missing_docs)]
        time_constant: Seconds,
    },
    /// Drop everything scheduled from this point on, holding the current
    /// value.
    Cancel,
}
impl ParamEvent {
    /// Schedules this event on `sink` at `time`.
    ///
    /// [ParamEvent::Cancel] asks the sink to cancel and hold. Sinks that can't
    /// hold fall back to a plain cancel.
    pub fn apply<S: ParamSink + ?Sized>(&self, sink: &mut S, time: Seconds) {
        match *self {
            ParamEvent::SetValue(value) => sink.set_value_at_time(value, time),
            ParamEvent::LinearRamp(value) => sink.linear_ramp_to_value_at_time(value, time),
            ParamEvent::ApproachTarget {
                target,
                time_constant,
            } => sink.set_target_at_time(target, time, time_constant),
            ParamEvent::Cancel => {
                if !sink.cancel_and_hold_at_time(time) {
                    sink.cancel_scheduled_values(time);
                }
            }
        }
    }

    /// Returns a copy with its value (or target) multiplied by `factor`. Time
    /// constants and [ParamEvent::Cancel] are unchanged.
    pub fn scale(&self, factor: f64) -> Self {
        match *self {
            ParamEvent::SetValue(value) => ParamEvent::SetValue(value * factor),
            ParamEvent::LinearRamp(value) => ParamEvent::LinearRamp(value * factor),
            ParamEvent::ApproachTarget {
                target,
                time_constant,
            } => ParamEvent::ApproachTarget {
                target: target * factor,
                time_constant,
            },
            ParamEvent::Cancel => ParamEvent::Cancel,
        }
    }

    /// Convenience constructor for [ParamEvent::ApproachTarget].
    pub fn approach(target: f64, time_constant: Seconds) -> Self {
        ParamEvent::ApproachTarget {
            target,
            time_constant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct CallRecorder {
        calls: Vec<String>,
        can_hold: bool,
    }
    impl ParamSink for CallRecorder {
        fn set_value_at_time(&mut self, value: f64, time: Seconds) {
            self.calls.push(format!("set {value} {time}"));
        }
        fn linear_ramp_to_value_at_time(&mut self, value: f64, time: Seconds) {
            self.calls.push(format!("ramp {value} {time}"));
        }
        fn set_target_at_time(&mut self, target: f64, start: Seconds, time_constant: Seconds) {
            self.calls
                .push(format!("target {target} {start} {time_constant}"));
        }
        fn cancel_scheduled_values(&mut self, time: Seconds) {
            self.calls.push(format!("cancel {time}"));
        }
        fn cancel_and_hold_at_time(&mut self, time: Seconds) -> bool {
            if self.can_hold {
                self.calls.push(format!("hold {time}"));
            }
            self.can_hold
        }
    }

    #[test]
    fn scale() {
        assert_eq!(
            ParamEvent::LinearRamp(2.0).scale(3.0),
            ParamEvent::LinearRamp(6.0)
        );
        assert_eq!(ParamEvent::SetValue(0.5).scale(4.0), ParamEvent::SetValue(2.0));
        assert_eq!(ParamEvent::Cancel.scale(7.0), ParamEvent::Cancel);
        assert_eq!(
            ParamEvent::approach(0.25, Seconds(0.1)).scale(2.0),
            ParamEvent::approach(0.5, Seconds(0.1)),
            "time constant shouldn't scale"
        );
    }

    #[test]
    fn apply_dispatches_to_sink() {
        let mut sink = CallRecorder {
            can_hold: true,
            ..Default::default()
        };
        ParamEvent::SetValue(1.0).apply(&mut sink, Seconds(0.5));
        ParamEvent::LinearRamp(2.0).apply(&mut sink, Seconds(1.0));
        ParamEvent::approach(0.0, Seconds(0.25)).apply(&mut sink, Seconds(2.0));
        ParamEvent::Cancel.apply(&mut sink, Seconds(3.0));
        assert_eq!(
            sink.calls,
            vec!["set 1 0.5", "ramp 2 1", "target 0 2 0.25", "hold 3"]
        );
    }

    #[test]
    fn cancel_falls_back_when_hold_unsupported() {
        let mut sink = CallRecorder::default();
        ParamEvent::Cancel.apply(&mut sink, Seconds(3.0));
        assert_eq!(sink.calls, vec!["cancel 3"]);
    }

    #[test]
    fn variant_names() {
        let name: &'static str = ParamEvent::Cancel.into();
        assert_eq!(name, "Cancel");
    }
}

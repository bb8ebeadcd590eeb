// Copyright (c) 2024 Mike Tsao

use crate::types::Seconds;

/// Something with a continuous parameter that accepts scheduled changes. This
/// is the contract an audio parameter (or anything else that interpolates a
/// value over time) exposes to the automation system.
///
/// Times are absolute, in the same clock domain that stamped the events.
#[allow(unused_variables)]
pub trait ParamSink {
    /// Jump to `value` at `time`.
    fn set_value_at_time(&mut self, value: f64, time: Seconds);

    /// Move linearly from the previous scheduled point so that the parameter
    /// reaches `value` at `time`.
    fn linear_ramp_to_value_at_time(&mut self, value: f64, time: Seconds);

    /// Starting at `start`, approach `target` exponentially with the given
    /// time constant.
    fn set_target_at_time(&mut self, target: f64, start: Seconds, time_constant: Seconds);

    /// Drop every change scheduled at or after `time`.
    fn cancel_scheduled_values(&mut self, time: Seconds);

    /// Drop every change scheduled at or after `time`, holding the value the
    /// parameter has at `time`. Returns false if the sink can't do this, in
    /// which case the caller should use
    /// [ParamSink::cancel_scheduled_values()] instead.
    fn cancel_and_hold_at_time(&mut self, time: Seconds) -> bool {
        false
    }
}

// Copyright (c) 2024 Mike Tsao

use super::Seconds;
use serde::{Deserialize, Serialize};

/// A value paired with the absolute time at which it should take effect.
///
/// [TimedValue] is immutable once built. Transformations produce new values
/// rather than editing in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimedValue<V> {
    /// The payload.
    pub value: V,
    /// When the payload takes effect.
    pub time: Seconds,
}
impl<V> TimedValue<V> {
    #[allow(missing_docs)]
    pub fn new(value: V, time: Seconds) -> Self {
        Self { value, time }
    }

    /// Transforms the payload, keeping the time.
    pub fn map<W>(self, f: impl FnOnce(V) -> W) -> TimedValue<W> {
        TimedValue {
            value: f(self.value),
            time: self.time,
        }
    }

    /// Returns the same payload scheduled `offset` later.
    pub fn delayed(self, offset: Seconds) -> Self {
        Self {
            value: self.value,
            time: self.time + offset,
        }
    }

    /// Splits into the `(value, time)` tuple form.
    pub fn into_parts(self) -> (V, Seconds) {
        (self.value, self.time)
    }
}
impl<V> From<(V, Seconds)> for TimedValue<V> {
    fn from((value, time): (V, Seconds)) -> Self {
        Self { value, time }
    }
}

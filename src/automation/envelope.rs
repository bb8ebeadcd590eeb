// Copyright (c) 2024 Mike Tsao

use super::ParamEvent;
use crate::{
    bus::EventBus,
    midi::BoolTriggers,
    types::{Seconds, TimedValue},
};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

/// Reasons an [EnvelopeSpec] can't be used.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EnvelopeError {
    /// A duration was negative, infinite, or NaN.
    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    InvalidDuration {
        #[allow(missing_docs)]
        field: &'static str,
        #[allow(missing_docs)]
        value: f64,
    },
    /// Sustain is a level, not a time.
    #[error("sustain must be a finite level in 0..=1 (got {0})")]
    InvalidSustain(f64),
    #[error("max must be finite (got {0})")]
    #[allow(missing_docs)]
    InvalidMax(f64),
    /// The builder wasn't given a required field.
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0}")]
    #[allow(missing_docs)]
    Other(String),
}
impl From<EnvelopeSpecBuilderError> for EnvelopeError {
    fn from(value: EnvelopeSpecBuilderError) -> Self {
        match value {
            EnvelopeSpecBuilderError::UninitializedField(field) => Self::MissingField(field),
            EnvelopeSpecBuilderError::ValidationError(message) => Self::Other(message),
        }
    }
}

/// How the envelope moves between its stages.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum EnvelopeShape {
    /// Exponential approaches whose time constants are a quarter of each
    /// stage's duration. The stage durations are therefore "mostly there"
    /// times rather than exact arrival times.
    #[default]
    Exponential,
    /// Straight-line ramps that arrive exactly at the end of each stage.
    Linear,
}

/// Configuration for an [Envelope].
///
/// ```
/// # use paramflow::prelude::*;
/// let spec = EnvelopeSpecBuilder::default()
///     .attack(0.01)
///     .decay(0.1)
///     .sustain(0.8)
///     .release(0.5)
///     .build()
///     .unwrap();
/// assert_eq!(spec.max, 1.0);
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[builder(build_fn(private, name = "build_from_builder"), setter(into))]
pub struct EnvelopeSpec {
    /// How long it takes to go from silence to `max`.
    pub attack: Seconds,
    /// How long it takes to fall from `max` to the sustain level.
    pub decay: Seconds,
    /// The held level, as a fraction of `max`.
    pub sustain: f64,
    /// How long it takes to fall to zero after the trigger ends.
    pub release: Seconds,
    /// The peak level.
    #[builder(default = "1.0")]
    #[serde(default = "EnvelopeSpec::default_max")]
    pub max: f64,
    /// Shifts the attack (not the release) later by this much.
    #[builder(default)]
    #[serde(default)]
    pub delay_offset: Seconds,
    /// How the envelope moves between stages.
    #[builder(default)]
    #[serde(default)]
    pub shape: EnvelopeShape,
}
impl EnvelopeSpec {
    fn default_max() -> f64 {
        1.0
    }

    /// Checks that every field is usable, naming the first one that isn't.
    pub fn validate(&self) -> Result<(), EnvelopeError> {
        for (field, value) in [
            ("attack", self.attack),
            ("decay", self.decay),
            ("release", self.release),
            ("delay_offset", self.delay_offset),
        ] {
            if !value.is_valid_duration() {
                return Err(EnvelopeError::InvalidDuration {
                    field,
                    value: value.0,
                });
            }
        }
        if !self.sustain.is_finite() || !(0.0..=1.0).contains(&self.sustain) {
            return Err(EnvelopeError::InvalidSustain(self.sustain));
        }
        if !self.max.is_finite() {
            return Err(EnvelopeError::InvalidMax(self.max));
        }
        Ok(())
    }
}
impl EnvelopeSpecBuilder {
    /// Builds the [EnvelopeSpec], rejecting values that [Envelope] can't use.
    pub fn build(&self) -> Result<EnvelopeSpec, EnvelopeError> {
        let spec = self.build_from_builder()?;
        spec.validate()?;
        Ok(spec)
    }
}

/// Turns on/off triggers into batches of [ParamEvent]s that trace an ADSR
/// contour.
///
/// An [Envelope] keeps no state between triggers. Every transition produces a
/// batch, even if the previous one is still playing out; each batch starts
/// with [ParamEvent::Cancel] so the sink drops whatever was left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    spec: EnvelopeSpec,
}
impl TryFrom<EnvelopeSpec> for Envelope {
    type Error = EnvelopeError;

    fn try_from(spec: EnvelopeSpec) -> Result<Self, Self::Error> {
        Self::new(spec)
    }
}
impl Envelope {
    /// Creates an envelope, after checking that `spec` is usable.
    pub fn new(spec: EnvelopeSpec) -> Result<Self, EnvelopeError> {
        spec.validate()?;
        Ok(Self { spec })
    }

    #[allow(missing_docs)]
    pub fn spec(&self) -> &EnvelopeSpec {
        &self.spec
    }

    /// The events for one trigger transition, in the order the sink should
    /// receive them.
    pub fn batch(&self, trigger: &TimedValue<bool>) -> Vec<TimedValue<ParamEvent>> {
        let s = &self.spec;
        let t = trigger.time;
        match (s.shape, trigger.value) {
            (EnvelopeShape::Exponential, true) => {
                let start = t + s.delay_offset;
                vec![
                    TimedValue::new(ParamEvent::Cancel, start),
                    TimedValue::new(ParamEvent::approach(s.max, s.attack / 4.0), start),
                    TimedValue::new(
                        ParamEvent::approach(s.sustain * s.max, s.decay / 4.0),
                        start + s.decay,
                    ),
                ]
            }
            (EnvelopeShape::Exponential, false) => vec![
                TimedValue::new(ParamEvent::Cancel, t),
                TimedValue::new(ParamEvent::approach(0.0, s.release / 4.0), t),
            ],
            (EnvelopeShape::Linear, true) => {
                let start = t + s.delay_offset;
                vec![
                    TimedValue::new(ParamEvent::Cancel, start),
                    TimedValue::new(ParamEvent::LinearRamp(s.max), start + s.attack),
                    TimedValue::new(
                        ParamEvent::LinearRamp(s.sustain * s.max),
                        start + s.attack + s.decay,
                    ),
                ]
            }
            (EnvelopeShape::Linear, false) => vec![
                TimedValue::new(ParamEvent::Cancel, t),
                TimedValue::new(ParamEvent::LinearRamp(0.0), t + s.release),
            ],
        }
    }

    /// Derives a stream of envelope events from a stream of triggers. Each
    /// trigger's batch is delivered in order before the next trigger is
    /// handled.
    pub fn attach(&self, triggers: &BoolTriggers) -> EventBus<TimedValue<ParamEvent>> {
        let envelope = *self;
        triggers.flat_map(move |trigger| envelope.batch(trigger))
    }
}

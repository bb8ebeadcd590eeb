// Copyright (c) 2024 Mike Tsao

//! Buses that forward from other buses.
//!
//! Every operator here returns a new [EventBus] wired to its source(s). The
//! source keeps the new bus alive for as long as the forwarding registration
//! exists; [EventBus::dispose] cuts it.

use super::EventBus;
use anyhow::ensure;
use std::{cell::RefCell, rc::Rc};

impl<A: 'static> EventBus<A> {
    /// For each value `a`, forwards every element of `f(a)` in order. An empty
    /// result forwards nothing.
    pub fn flat_map<B, I>(&self, f: impl Fn(&A) -> I + 'static) -> EventBus<B>
    where
        B: 'static,
        I: IntoIterator<Item = B>,
    {
        let derived = EventBus::<B>::default();
        let target = derived.clone();
        let unsubscribe = self.subscribe(move |a| {
            for b in f(a) {
                target.send(b);
            }
        });
        derived.adopt_upstream(unsubscribe);
        derived
    }

    /// Forwards `f(a)` for each `a`.
    pub fn map<B: 'static>(&self, f: impl Fn(&A) -> B + 'static) -> EventBus<B> {
        self.flat_map(move |a| Some(f(a)))
    }

    /// Forwards `a` only if `pred(a)` holds.
    pub fn filter(&self, pred: impl Fn(&A) -> bool + 'static) -> EventBus<A>
    where
        A: Clone,
    {
        self.flat_map(move |a| pred(a).then(|| a.clone()))
    }
}

/// Forwards every value from every input.
pub fn merge<T: Clone + 'static>(inputs: &[EventBus<T>]) -> EventBus<T> {
    let merged = EventBus::<T>::default();
    for input in inputs {
        let target = merged.clone();
        merged.adopt_upstream(input.subscribe(move |v| target.send(v.clone())));
    }
    merged
}

/// Remembers the latest value from each input, starting from `defaults`, and
/// whenever any input fires, emits `f` applied to all of them.
///
/// [EventBus::dispose] on the result tears down all the input registrations
/// at once.
pub fn combine<T, R>(
    inputs: &[EventBus<T>],
    defaults: Vec<T>,
    f: impl Fn(&[T]) -> R + 'static,
) -> anyhow::Result<EventBus<R>>
where
    T: Clone + 'static,
    R: 'static,
{
    ensure!(
        inputs.len() == defaults.len(),
        "combine() needs one default per input, but got {} inputs and {} defaults",
        inputs.len(),
        defaults.len()
    );

    let combined = EventBus::<R>::default();
    let latest = Rc::new(RefCell::new(defaults));
    let f = Rc::new(f);
    for (i, input) in inputs.iter().enumerate() {
        let latest = Rc::clone(&latest);
        let f = Rc::clone(&f);
        let target = combined.clone();
        combined.adopt_upstream(input.subscribe(move |v| {
            let r = {
                let mut latest = latest.borrow_mut();
                latest[i] = v.clone();
                f(&latest)
            };
            target.send(r);
        }));
    }
    Ok(combined)
}

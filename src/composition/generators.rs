// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Zero or more simultaneous values that last `duration` pattern units. An
/// item with no values is a rest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SequenceItem<T> {
    #[allow(missing_docs)]
    pub values: Vec<T>,
    /// In pattern units. With the default step of 1/16, one unit is a whole
    /// note.
    pub duration: f64,
}
impl<T> SequenceItem<T> {
    #[allow(missing_docs)]
    pub fn new(values: Vec<T>, duration: f64) -> Self {
        Self { values, duration }
    }

    /// An item with no values.
    pub fn rest(duration: f64) -> Self {
        Self::new(Vec::default(), duration)
    }
}
impl<T> From<(Vec<T>, f64)> for SequenceItem<T> {
    fn from((values, duration): (Vec<T>, f64)) -> Self {
        Self::new(values, duration)
    }
}

/// A lazy, single-pass source of [SequenceItem]s. Once it returns [None], it's
/// done for good.
pub type Generator<T> = Box<dyn Iterator<Item = SequenceItem<T>>>;

/// Builds a fresh [Generator]. The argument is a repetition index, which
/// [looped] uses to tell each repetition apart; other factories may ignore
/// it.
pub type GeneratorFactory<T> = Rc<dyn Fn(usize) -> Generator<T>>;

/// Yields `items` once.
pub fn from_items<T: Clone + 'static>(items: Vec<SequenceItem<T>>) -> GeneratorFactory<T> {
    Rc::new(move |_: usize| -> Generator<T> { Box::new(items.clone().into_iter()) })
}

/// Plays each factory's generator to exhaustion, in order.
pub fn sequence<T: 'static>(factories: Vec<GeneratorFactory<T>>) -> GeneratorFactory<T> {
    Rc::new(move |repetition: usize| -> Generator<T> {
        Box::new(
            factories
                .clone()
                .into_iter()
                .flat_map(move |factory| factory(repetition)),
        )
    })
}

/// Repeats `factory` `count` times, or forever if `count` is [None]. A
/// repetition that yields nothing ends the loop.
///
/// Repetition `i` of outer repetition `r` is built with index `i + r * count`,
/// so nested loops number their repetitions consecutively.
pub fn looped<T: 'static>(
    factory: GeneratorFactory<T>,
    count: Option<usize>,
) -> GeneratorFactory<T> {
    Rc::new(move |outer: usize| -> Generator<T> {
        Box::new(Looped {
            factory: Rc::clone(&factory),
            count,
            outer,
            index: 0,
            current: None,
            has_yielded: false,
            is_done: false,
        })
    })
}

struct Looped<T> {
    factory: GeneratorFactory<T>,
    count: Option<usize>,
    outer: usize,
    index: usize,
    current: Option<Generator<T>>,

    // Whether the current repetition has produced anything yet.
    has_yielded: bool,
    is_done: bool,
}
impl<T> Iterator for Looped<T> {
    type Item = SequenceItem<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.is_done {
            if let Some(generator) = self.current.as_mut() {
                if let Some(item) = generator.next() {
                    self.has_yielded = true;
                    return Some(item);
                }
                if !self.has_yielded {
                    log::debug!("loop repetition {} was empty; ending loop", self.index - 1);
                    self.is_done = true;
                    break;
                }
            }
            if self.count.is_some_and(|count| self.index >= count) {
                self.is_done = true;
                break;
            }
            let repetition = self.index + self.outer * self.count.unwrap_or_default();
            self.current = Some((self.factory)(repetition));
            self.has_yielded = false;
            self.index += 1;
        }
        self.current = None;
        None
    }
}

/// Plays several generators at once, interleaving their items by elapsed
/// time.
///
/// Each step pulls from every generator whose elapsed time is the smallest,
/// emitting their values together with a duration that reaches the next
/// point where some generator is due. As soon as any generator runs out, the
/// whole merge ends, and the values pulled during that step are dropped.
pub fn merge<T: 'static>(factories: Vec<GeneratorFactory<T>>) -> GeneratorFactory<T> {
    Rc::new(move |repetition: usize| -> Generator<T> {
        let generators: Vec<Generator<T>> = factories
            .iter()
            .map(|factory| factory(repetition))
            .collect();
        Box::new(Merge {
            elapsed: vec![0.0; generators.len()],
            generators,
            is_done: false,
        })
    })
}

struct Merge<T> {
    generators: Vec<Generator<T>>,
    elapsed: Vec<f64>,
    is_done: bool,
}
impl<T> Iterator for Merge<T> {
    type Item = SequenceItem<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done || self.generators.is_empty() {
            return None;
        }
        let min_t = self.elapsed.iter().copied().fold(f64::INFINITY, f64::min);
        let mut values = Vec::default();
        for (generator, elapsed) in self.generators.iter_mut().zip(self.elapsed.iter_mut()) {
            if *elapsed != min_t {
                continue;
            }
            let Some(item) = generator.next() else {
                self.is_done = true;
                return None;
            };
            values.extend(item.values);
            *elapsed += item.duration;
        }
        let duration = self
            .elapsed
            .iter()
            .map(|t| t - min_t)
            .fold(f64::INFINITY, f64::min);
        Some(SequenceItem::new(values, duration))
    }
}

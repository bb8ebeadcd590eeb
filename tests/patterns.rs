// Copyright (c) 2024 Mike Tsao

use paramflow::{composition::merge, prelude::*};
use std::{cell::RefCell, rc::Rc};

// Rest
const RR: u8 = 255;

fn note_sequence(notes: &[u8], duration: f64) -> GeneratorFactory<u8> {
    from_items(
        notes
            .iter()
            .map(|&n| {
                if n == RR {
                    SequenceItem::rest(duration)
                } else {
                    SequenceItem::new(vec![n], duration)
                }
            })
            .collect(),
    )
}

// Demonstrates a two-voice pattern played from session beats: a bass line in
// quarter notes against a melody in eighths.
#[test]
fn demo_pattern_from_beats() {
    let _ = env_logger::builder().is_test(true).try_init();

    let clock = Rc::new(ManualClock::new(Seconds(0.0)));
    let mut session = Session::new(
        SessionConfigBuilder::default()
            .tempo(Tempo(120.0))
            .build()
            .unwrap(),
        clock.clone(),
    );

    let pattern = merge(vec![
        looped(note_sequence(&[36, 43], 0.25), Some(2)),
        note_sequence(&[60, 62, RR, 65, 67, 69, 71, 72], 0.125),
    ]);
    let notes = make_step_seq(pattern(0), &session.stepper(), 0.25);
    let tracker: Rc<RefCell<Vec<TimedValue<Vec<u8>>>>> = Default::default();
    {
        let tracker = Rc::clone(&tracker);
        let _ = notes.subscribe(move |tv| tracker.borrow_mut().push(tv.clone()));
    }

    // Run the beat loop the way a timer would, for three seconds.
    while clock.now() < Seconds(3.0) {
        let _ = session.poll_beats();
        clock.advance(session.poll_interval());
    }

    let tracker = tracker.borrow();
    let played: Vec<(Vec<u8>, f64)> = tracker
        .iter()
        .map(|tv| (tv.value.clone(), tv.time.0))
        .collect();
    assert_eq!(
        played,
        vec![
            (vec![36, 60], 0.0),
            (vec![62], 0.25),
            (vec![43], 0.5),
            (vec![65], 0.75),
            (vec![36, 67], 1.0),
            (vec![69], 1.25),
            (vec![43, 71], 1.5),
            (vec![72], 1.75),
        ]
    );
}

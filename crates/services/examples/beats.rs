// Copyright (c) 2024 Mike Tsao

//! Prints beats from a [BeatService] as they're delivered to a session's beat
//! bus.

use clap::Parser;
use paramflow::prelude::*;
use paramflow_services::prelude::*;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Beats per minute
    #[arg(short, long, default_value_t = 120.0)]
    bpm: f64,

    /// How many beats to print before quitting
    #[arg(short = 'n', long, default_value_t = 8)]
    beats: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let tempo = Tempo(args.bpm);

    let service = BeatService::new_with(tempo)?;
    let session = Session::new(
        SessionConfigBuilder::default().tempo(tempo).build()?,
        Rc::new(service.clock()),
    );
    let _ = session.beat_events().subscribe(|beat| {
        println!(
            "beat {:>3} at {:>8.3}s, lasting {:.3}s",
            beat.value.index, beat.time.0, beat.value.duration.0
        );
    });

    let mut received = 0;
    while received < args.beats {
        match service.receiver().recv()? {
            BeatServiceEvent::Beat(beat) => {
                session.beat_events().send(beat);
                received += 1;
            }
            BeatServiceEvent::Quit => break,
        }
    }

    service.send_input(BeatServiceInput::Quit);
    while let Ok(event) = service.receiver().recv() {
        if let BeatServiceEvent::Quit = event {
            break;
        }
    }
    Ok(())
}

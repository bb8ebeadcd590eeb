// Copyright (c) 2024 Mike Tsao

//! Provides a steady pulse of beats from the system clock.

use crossbeam::channel::{Receiver, Sender};
use paramflow::prelude::*;
use std::time::Duration;

/// The client controls the beat thread through [BeatServiceInput] messages.
#[derive(Clone, Debug)]
pub enum BeatServiceInput {
    /// Changes the tempo, starting with the next beat.
    SetTempo(Tempo),

    /// The app is ready to quit, so the service should end.
    Quit,
}

/// The service reports through [BeatServiceEvent] messages.
#[derive(Clone, Debug)]
pub enum BeatServiceEvent {
    /// The next beat, stamped in the time domain of [BeatService::clock()].
    /// It arrives up to one beat before it's due.
    Beat(TimedValue<BeatEvent>),

    /// The service has processed [BeatServiceInput::Quit] (or lost its
    /// client), and the thread is about to end.
    Quit,
}

/// Runs a [BeatClock] against a [SystemClock] in its own thread.
///
/// The thread wakes up at the beat clock's poll interval (or sooner, if an
/// input arrives) and sends any beat that has come due. Drain
/// [ProvidesService::receiver()] on the session's thread and forward the beats
/// onto its bus.
#[derive(Debug)]
pub struct BeatService {
    inputs: CrossbeamChannel<BeatServiceInput>,
    events: CrossbeamChannel<BeatServiceEvent>,
    clock: SystemClock,
}
impl ProvidesService<BeatServiceInput, BeatServiceEvent> for BeatService {
    fn sender(&self) -> &Sender<BeatServiceInput> {
        &self.inputs.sender
    }

    fn receiver(&self) -> &Receiver<BeatServiceEvent> {
        &self.events.receiver
    }
}
impl BeatService {
    /// Starts the beat thread at `tempo`.
    pub fn new_with(tempo: Tempo) -> anyhow::Result<Self> {
        let r = Self {
            inputs: Default::default(),
            events: Default::default(),
            clock: SystemClock::default(),
        };
        r.spawn_thread(tempo)?;
        Ok(r)
    }

    /// The clock the beats are stamped with. It's [Copy], so clients can use
    /// their own copy to compare beat times with "now".
    pub fn clock(&self) -> SystemClock {
        self.clock
    }

    fn spawn_thread(&self, tempo: Tempo) -> anyhow::Result<()> {
        let mut daemon = BeatServiceDaemon {
            receiver: self.inputs.receiver.clone(),
            sender: self.events.sender.clone(),
            clock: self.clock,
            beat_clock: BeatClock::new(tempo),
        };
        std::thread::Builder::new()
            .name("beat-service".to_string())
            .spawn(move || daemon.execute())?;
        Ok(())
    }
}

struct BeatServiceDaemon {
    receiver: Receiver<BeatServiceInput>,
    sender: Sender<BeatServiceEvent>,
    clock: SystemClock,
    beat_clock: BeatClock,
}
impl BeatServiceDaemon {
    fn execute(&mut self) {
        let receiver = self.receiver.clone();
        loop {
            if let Some(beat) = self.beat_clock.poll(self.clock.now()) {
                if self.sender.send(BeatServiceEvent::Beat(beat)).is_err() {
                    log::debug!("beat service lost its client");
                    break;
                }
            }
            let timeout = Duration::from_secs_f64(self.beat_clock.poll_interval().0);
            crossbeam::channel::select! {
                recv(receiver) -> input => match input {
                    Ok(BeatServiceInput::SetTempo(tempo)) => {
                        log::debug!("tempo is now {tempo}");
                        self.beat_clock.set_tempo(tempo);
                    }
                    Ok(BeatServiceInput::Quit) | Err(_) => break,
                },
                default(timeout) => {}
            }
        }
        if self.beat_clock.skipped() > 0 {
            log::warn!("{} beats were late", self.beat_clock.skipped());
        }
        let _ = self.sender.send(BeatServiceEvent::Quit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::assert_gt;

    #[test]
    fn beats_arrive_in_order_until_quit() {
        let service = BeatService::new_with(Tempo(600.0)).unwrap();
        let mut beats = Vec::default();
        while beats.len() < 3 {
            match service.receiver().recv_timeout(Duration::from_secs(5)) {
                Ok(BeatServiceEvent::Beat(beat)) => beats.push(beat),
                other => panic!("expected a beat, got {other:?}"),
            }
        }
        assert_eq!(
            beats.iter().map(|b| b.value.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        for pair in beats.windows(2) {
            assert_gt!(pair[1].time.0, pair[0].time.0);
        }

        service.send_input(BeatServiceInput::SetTempo(Tempo(300.0)));
        service.send_input(BeatServiceInput::Quit);
        loop {
            match service.receiver().recv_timeout(Duration::from_secs(5)) {
                Ok(BeatServiceEvent::Quit) => break,
                Ok(BeatServiceEvent::Beat(_)) => continue,
                Err(e) => panic!("service didn't quit: {e:?}"),
            }
        }
    }

    #[test]
    fn nonsense_tempo_keeps_the_thread_alive() {
        let service = BeatService::new_with(Tempo(f64::NAN)).unwrap();
        match service.receiver().recv_timeout(Duration::from_secs(5)) {
            Ok(BeatServiceEvent::Beat(beat)) => assert_eq!(beat.value.index, 1),
            other => panic!("expected a beat, got {other:?}"),
        }
        service.send_input(BeatServiceInput::Quit);
        loop {
            match service.receiver().recv_timeout(Duration::from_secs(5)) {
                Ok(BeatServiceEvent::Quit) => break,
                Ok(BeatServiceEvent::Beat(_)) => continue,
                Err(e) => panic!("service didn't quit: {e:?}"),
            }
        }
    }
}

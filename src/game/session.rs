use rand::Rng;
use tracing::{info, warn};

use crate::core::scheduler::TimerQueue;
use crate::core::timebase::Tick;
use crate::game::events::{Broadcast, TimerPayload};
use crate::game::pad::{PadColor, PadRegistry};
use crate::game::player::SequencePlayer;
use crate::game::sequence::{random_sequence, reference_sequence};
use crate::game::validator::ProgressTracker;

/// Where the session is in its round cycle. Pad hits are only validated
/// while awaiting input; during intro playback they sound but do not count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    PlayingIntro,
    AwaitingInput,
}

/// Orchestrates round starts on the authority: first trigger plays the
/// fixed reference melody, later triggers roll a fresh random one. Each
/// trigger also rolls the per-pad colors and re-arms the validator.
pub struct SessionCoordinator {
    state: SessionState,
    started: bool,
    generation: u64,
    sequence_length: f64,
    possible_durations: Vec<f64>,
}

impl SessionCoordinator {
    pub fn new(sequence_length: f64, possible_durations: Vec<f64>) -> Self {
        Self {
            state: SessionState::Idle,
            started: false,
            generation: 0,
            sequence_length,
            possible_durations,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start the session or the next round. A trigger while the intro is
    /// still playing is ignored outright: no new sequence, no new timers.
    pub fn on_trigger<R: Rng + ?Sized>(
        &mut self,
        now: Tick,
        registry: &mut PadRegistry,
        validator: &mut ProgressTracker,
        player: &SequencePlayer,
        timers: &mut TimerQueue<TimerPayload>,
        rng: &mut R,
    ) -> Vec<Broadcast> {
        if self.state == SessionState::PlayingIntro {
            warn!("trigger ignored while a sequence is playing");
            return Vec::new();
        }

        self.generation += 1;
        let mut broadcasts = Vec::new();

        // Roll colors on the authority and apply locally; the broadcast
        // carries the full assignment so replicas end up identical.
        let mut assignments = Vec::with_capacity(registry.len());
        for id in registry.ids() {
            let color = PadColor::random(rng);
            let _ = registry.set_color(&id, color);
            assignments.push((id, color));
        }
        broadcasts.push(Broadcast::PadColors {
            generation: self.generation,
            assignments,
        });

        let sequence = if !self.started {
            self.started = true;
            info!("session starting");
            registry.sync_all();
            reference_sequence()
        } else {
            random_sequence(
                &registry.ids(),
                &self.possible_durations,
                self.sequence_length,
                rng,
            )
        };

        if sequence.is_empty() {
            warn!(
                generation = self.generation,
                "generated an empty sequence, round not started"
            );
            return broadcasts;
        }

        validator.arm_round(sequence.pad_ids(), self.generation, timers);
        player.schedule(
            &sequence,
            now,
            self.generation,
            self.sequence_length,
            timers,
        );
        self.state = SessionState::PlayingIntro;

        broadcasts.push(Broadcast::RoundStarted {
            generation: self.generation,
            expected_len: sequence.len(),
        });
        info!(
            generation = self.generation,
            steps = sequence.len(),
            "round playback started"
        );
        broadcasts
    }

    /// Called when the intro-playback timer for `generation` fires.
    pub fn input_reenabled(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.state = SessionState::AwaitingInput;
        info!(generation, "input re-enabled");
        true
    }
}

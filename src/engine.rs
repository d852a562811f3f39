use crossbeam_channel::Receiver;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::core::scheduler::TimerQueue;
use crate::core::timebase::{Tick, Timebase};
use crate::game::events::{Broadcast, InputEvent, TimerPayload};
use crate::game::pad::{PadId, PadRegistry};
use crate::game::participant::BroadcastHub;
use crate::game::player::SequencePlayer;
use crate::game::session::{SessionCoordinator, SessionState};
use crate::game::validator::ProgressTracker;

/// The authority: owns every piece of mutable session state and is the
/// single serialization point for inputs and timer callbacks. Replicas see
/// the session only through the broadcast hub.
///
/// The engine is driven from outside: feed it inputs with
/// [`handle_input`](Self::handle_input) and move time forward with
/// [`advance_to`](Self::advance_to). Between calls nothing runs, which is
/// what makes the timeout-versus-play race deterministic.
pub struct GameEngine {
    time: Timebase,
    now: Tick,
    registry: PadRegistry,
    coordinator: SessionCoordinator,
    validator: ProgressTracker,
    player: SequencePlayer,
    timers: TimerQueue<TimerPayload>,
    hub: BroadcastHub,
    rng: StdRng,
}

impl GameEngine {
    pub fn new(config: &GameConfig, registry: PadRegistry) -> Self {
        let time = Timebase {
            tick_hz: config.engine.tick_hz,
        };
        let rng = match config.engine.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            time,
            now: 0,
            registry,
            coordinator: SessionCoordinator::new(
                config.session.sequence_length,
                config.session.possible_durations.clone(),
            ),
            validator: ProgressTracker::new(config.session.response_timeout),
            player: SequencePlayer::new(time),
            timers: TimerQueue::new(),
            hub: BroadcastHub::new(),
            rng,
        }
    }

    pub fn subscribe(&mut self) -> Receiver<Broadcast> {
        self.hub.subscribe()
    }

    pub fn timebase(&self) -> Timebase {
        self.time
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn session_state(&self) -> SessionState {
        self.coordinator.state()
    }

    pub fn generation(&self) -> u64 {
        self.coordinator.generation()
    }

    pub fn expected(&self) -> &[PadId] {
        self.validator.expected()
    }

    pub fn streak_len(&self) -> usize {
        self.validator.streak_len()
    }

    pub fn completed_len(&self) -> usize {
        self.validator.completed_len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Handle one debounced input event at the current tick.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::TriggerHit => {
                let broadcasts = self.coordinator.on_trigger(
                    self.now,
                    &mut self.registry,
                    &mut self.validator,
                    &self.player,
                    &mut self.timers,
                    &mut self.rng,
                );
                for broadcast in &broadcasts {
                    self.hub.publish(broadcast);
                }
            }
            InputEvent::PadHit { pad } => {
                // A hit always sounds the pad, whether or not it counts.
                if let Err(err) = self.registry.play(&pad, None) {
                    warn!(%err, "pad hit on unknown pad");
                    return;
                }

                match self.coordinator.state() {
                    SessionState::AwaitingInput => {
                        match self.validator.validate_play(
                            &pad,
                            self.now,
                            self.time,
                            &mut self.timers,
                        ) {
                            Ok(outcome) => {
                                self.hub.publish(&Broadcast::Play {
                                    generation: self.validator.generation(),
                                    outcome,
                                });
                            }
                            Err(err) => warn!(%err, pad = %pad, "play not validated"),
                        }
                    }
                    SessionState::PlayingIntro => {
                        debug!(pad = %pad, "hit during intro playback, not validated");
                    }
                    SessionState::Idle => {
                        debug!(pad = %pad, "hit before session start, not validated");
                    }
                }
            }
        }
    }

    /// Drain every queued input event, in arrival order. Hosts that
    /// collect inputs on other threads connect them here.
    pub fn drain_inputs(&mut self, rx: &Receiver<InputEvent>) {
        for event in rx.try_iter() {
            self.handle_input(event);
        }
    }

    /// Advance the clock to `tick`, firing every due timer in deadline
    /// order. Timer callbacks run here and nowhere else.
    pub fn advance_to(&mut self, tick: Tick) {
        while let Some(entry) = self.timers.pop_due(tick) {
            self.now = entry.deadline;
            let generation = entry.handle.generation;
            match entry.payload {
                TimerPayload::PlayStep { pad, duration } => {
                    if let Err(err) = self.registry.play(&pad, Some(duration)) {
                        warn!(%err, "scheduled step skipped");
                    }
                }
                TimerPayload::ReenableInput => {
                    if !self.coordinator.input_reenabled(generation) {
                        debug!(generation, "stale input re-enable ignored");
                    }
                }
                TimerPayload::StepTimeout => {
                    if let Err(err) = self.validator.handle_timeout(generation) {
                        debug!(%err, "step timeout discarded");
                    }
                }
            }
        }
        if tick > self.now {
            self.now = tick;
        }
    }

    /// Next tick at which a timer wants to run, for pacing loops.
    pub fn next_deadline(&self) -> Option<Tick> {
        self.timers.next_deadline()
    }
}

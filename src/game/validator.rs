use tracing::{debug, info, warn};

use crate::core::scheduler::{TimerHandle, TimerQueue};
use crate::core::timebase::{Tick, Timebase};
use crate::error::GameError;
use crate::game::events::{PlayOutcome, TimerPayload, Verdict};
use crate::game::pad::PadId;

/// Authoritative progress state machine for one session.
///
/// Owns the expected sequence and both progress lists; nothing else mutates
/// them. `tracked` is the current unbroken streak and resets on any wrong
/// play or timeout. `completed` is the furthest validated position and only
/// resets when a round starts or is won, so a broken streak does not move
/// the progress bar backwards.
pub struct ProgressTracker {
    expected: Vec<PadId>,
    tracked: Vec<PadId>,
    completed: Vec<PadId>,
    generation: u64,
    response_timeout: f64,
    timeout: Option<TimerHandle>,
}

impl ProgressTracker {
    pub fn new(response_timeout: f64) -> Self {
        Self {
            expected: Vec::new(),
            tracked: Vec::new(),
            completed: Vec::new(),
            generation: 0,
            response_timeout,
            timeout: None,
        }
    }

    /// Atomically replace the expected sequence for a new round. Clears
    /// both progress lists and cancels any timeout left over from the
    /// previous round.
    pub fn arm_round(
        &mut self,
        expected: Vec<PadId>,
        generation: u64,
        timers: &mut TimerQueue<TimerPayload>,
    ) {
        if let Some(handle) = self.timeout.take() {
            timers.cancel(handle);
        }
        self.expected = expected;
        self.tracked.clear();
        self.completed.clear();
        self.generation = generation;
        debug!(
            generation,
            expected_len = self.expected.len(),
            "round armed"
        );
    }

    pub fn expected(&self) -> &[PadId] {
        &self.expected
    }

    pub fn streak_len(&self) -> usize {
        self.tracked.len()
    }

    pub fn completed_len(&self) -> usize {
        self.completed.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_armed(&self) -> bool {
        !self.expected.is_empty()
    }

    /// Validate one played pad against the expected sequence.
    ///
    /// Runs on the authority only; the returned outcome is what gets
    /// broadcast. Errors are absorbed by the caller, never fatal.
    pub fn validate_play(
        &mut self,
        pad: &PadId,
        now: Tick,
        time: Timebase,
        timers: &mut TimerQueue<TimerPayload>,
    ) -> Result<PlayOutcome, GameError> {
        if self.expected.is_empty() {
            return Err(GameError::NoActiveRound);
        }

        let position = self.tracked.len();
        debug_assert!(position < self.expected.len());

        if *pad == self.expected[position] {
            // Serialization order decides the race: the play is being
            // handled, so the pending timeout must not fire afterwards.
            if let Some(handle) = self.timeout.take() {
                timers.cancel(handle);
            }

            self.completed.push(pad.clone());
            self.tracked.push(pad.clone());

            if self.completed.len() == self.expected.len() {
                info!(generation = self.generation, "round won");
                self.completed.clear();
                self.tracked.clear();
                return Ok(self.outcome(pad, Verdict::Won));
            }

            let deadline = time.after(now, self.response_timeout);
            self.timeout = Some(timers.arm(deadline, self.generation, TimerPayload::StepTimeout));
            debug!(pad = %pad, position, "correct pad played");
            Ok(self.outcome(pad, Verdict::Correct))
        } else {
            warn!(pad = %pad, position, expected = %self.expected[position], "wrong pad played");
            self.tracked.clear();
            Ok(self.outcome(pad, Verdict::Wrong))
        }
    }

    /// Handle a fired step timeout. Stale generations are rejected so a
    /// callback armed in a previous round cannot clear fresh progress.
    pub fn handle_timeout(&mut self, fired_generation: u64) -> Result<(), GameError> {
        if fired_generation != self.generation {
            return Err(GameError::StaleTimer {
                fired: fired_generation,
                current: self.generation,
            });
        }
        self.timeout = None;
        info!(generation = self.generation, "response timeout, streak reset");
        self.tracked.clear();
        Ok(())
    }

    fn outcome(&self, pad: &PadId, verdict: Verdict) -> PlayOutcome {
        PlayOutcome {
            pad: pad.clone(),
            verdict,
            streak_len: self.tracked.len(),
            completed_len: self.completed.len(),
            expected_len: self.expected.len(),
        }
    }
}

use tracing::debug;

use crate::core::scheduler::TimerQueue;
use crate::core::timebase::{Tick, Timebase};
use crate::game::events::TimerPayload;
use crate::game::sequence::Sequence;

/// Schedules a sequence for playback as fire-and-forget timers.
///
/// Every step is armed immediately at its cumulative offset from the start
/// of playback; audible order comes from the offsets being monotonically
/// increasing, not from arming order. A final timer re-enables input after
/// the configured sequence length.
pub struct SequencePlayer {
    time: Timebase,
}

impl SequencePlayer {
    pub fn new(time: Timebase) -> Self {
        Self { time }
    }

    /// Arm playback of `sequence` starting at `now`. Returns the tick at
    /// which input is re-enabled.
    pub fn schedule(
        &self,
        sequence: &Sequence,
        now: Tick,
        generation: u64,
        input_reenable_after: f64,
        timers: &mut TimerQueue<TimerPayload>,
    ) -> Tick {
        let mut offset = 0.0;
        for step in sequence.steps() {
            timers.arm(
                self.time.after(now, offset),
                generation,
                TimerPayload::PlayStep {
                    pad: step.pad.clone(),
                    duration: step.duration,
                },
            );
            // Cumulative: each step starts when all earlier ones have ended.
            offset += step.duration;
        }

        let reenable_at = self.time.after(now, input_reenable_after);
        timers.arm(reenable_at, generation, TimerPayload::ReenableInput);

        debug!(
            steps = sequence.len(),
            total = sequence.total_duration(),
            "sequence scheduled"
        );
        reenable_at
    }
}

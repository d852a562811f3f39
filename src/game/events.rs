use serde::{Deserialize, Serialize};

use crate::game::pad::{PadColor, PadId};

/// Discrete inputs delivered to the engine, one event per physical press
/// (debouncing happens upstream).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PadHit { pad: PadId },
    TriggerHit,
}

/// Outcome of validating one played pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Matched the next expected pad; the streak advanced.
    Correct,
    /// Matched the final expected pad; the round is won.
    Won,
    /// Wrong pad (or a pad unknown at this position); the streak reset.
    Wrong,
}

/// Snapshot accompanying every validation broadcast. Counts are absolute
/// post-validation values, so applying the same message twice is a no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub pad: PadId,
    pub verdict: Verdict,
    pub streak_len: usize,
    pub completed_len: usize,
    pub expected_len: usize,
}

/// Authority-to-replica messages. Delivery is reliable and ordered per
/// subscriber; payloads carry state snapshots rather than deltas so
/// replicas can apply them idempotently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Broadcast {
    /// A new round exists. Announces the sequence's length, not its content.
    RoundStarted {
        generation: u64,
        expected_len: usize,
    },
    /// The full per-pad color assignment for this round.
    PadColors {
        generation: u64,
        assignments: Vec<(PadId, PadColor)>,
    },
    /// Result of one validated play.
    Play {
        generation: u64,
        outcome: PlayOutcome,
    },
}

/// Payloads carried by armed timers inside the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum TimerPayload {
    /// Sound one scheduled sequence step.
    PlayStep { pad: PadId, duration: f64 },
    /// Intro playback is over; accept player input again.
    ReenableInput,
    /// The group took too long to play the next correct pad.
    StepTimeout,
}

use rand::Rng;
use tracing::debug;

use crate::game::pad::PadId;

/// Tolerance for the budget accounting below. Accumulated subtraction can
/// leave the remainder a hair under the smallest duration when it should be
/// exactly equal, so every comparison goes through this epsilon.
pub const DURATION_EPSILON: f64 = 1e-9;

/// One scheduled step: which pad, and for how long it sounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub pad: PadId,
    pub duration: f64,
}

/// Ordered list of samples making up one round's melody, stored in playback
/// order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sequence {
    steps: Vec<Sample>,
}

impl Sequence {
    pub fn from_steps(steps: Vec<Sample>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Sample] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_duration(&self) -> f64 {
        self.steps.iter().map(|step| step.duration).sum()
    }

    /// The expected-play projection: pad ids in playback order.
    pub fn pad_ids(&self) -> Vec<PadId> {
        self.steps.iter().map(|step| step.pad.clone()).collect()
    }
}

/// The fixed first-round melody ("Misty Mountains"), 9.6 seconds total.
pub fn reference_sequence() -> Sequence {
    let steps = [
        ("Pad_TopLeftRightPads", 2.4),
        ("Pad_BottomRightRightPads", 0.8),
        ("Pad_BottomLeftRightPads", 0.8),
        ("Pad_CenterCenterRightPads", 0.4),
        ("Pad_TopCenterLeftPads", 0.4),
        ("Pad_CenterCenterRightPads", 0.8),
        ("Pad_BottomLeftRightPads", 0.8),
        ("Pad_TopLeftRightPads", 1.6),
        ("Pad_CenterCenterLeftPads", 0.8),
        ("Pad_TopLeftLeftPads", 0.8),
    ];
    Sequence::from_steps(
        steps
            .into_iter()
            .map(|(pad, duration)| Sample {
                pad: PadId::new(pad),
                duration,
            })
            .collect(),
    )
}

/// Draw a random melody under a total-duration budget.
///
/// Picks a uniformly random pad and duration per step and accepts the pick
/// only while it fits the remaining budget; stops once not even the
/// smallest duration fits. The result is non-empty whenever `budget`
/// covers the smallest duration and `pads` is non-empty, and its total
/// never exceeds `budget` (within [`DURATION_EPSILON`]).
pub fn random_sequence<R: Rng + ?Sized>(
    pads: &[PadId],
    durations: &[f64],
    budget: f64,
    rng: &mut R,
) -> Sequence {
    let mut steps = Vec::new();

    let min_duration = durations
        .iter()
        .copied()
        .filter(|d| d.is_finite() && *d > 0.0)
        .fold(f64::INFINITY, f64::min);
    if pads.is_empty() || !min_duration.is_finite() || !budget.is_finite() {
        return Sequence::from_steps(steps);
    }

    let mut remaining = budget;
    while remaining + DURATION_EPSILON >= min_duration {
        let pad = &pads[rng.random_range(0..pads.len())];
        let duration = durations[rng.random_range(0..durations.len())];
        if !(duration.is_finite() && duration > 0.0) {
            continue;
        }

        if duration <= remaining + DURATION_EPSILON {
            remaining -= duration;
            debug!(pad = %pad, duration, remaining, "accepted random sample");
            steps.push(Sample {
                pad: pad.clone(),
                duration,
            });
        }
    }

    Sequence::from_steps(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn reference_sequence_sums_to_default_budget() {
        let seq = reference_sequence();
        assert_eq!(seq.len(), 10);
        assert!((seq.total_duration() - 9.6).abs() < 1e-12);
        assert_eq!(seq.pad_ids()[0], PadId::new("Pad_TopLeftRightPads"));
        assert_eq!(seq.pad_ids()[9], PadId::new("Pad_TopLeftLeftPads"));
    }

    #[test]
    fn empty_inputs_yield_empty_sequence() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let durations = [0.4];
        assert!(random_sequence(&[], &durations, 9.6, &mut rng).is_empty());

        let pads = [PadId::new("a")];
        assert!(random_sequence(&pads, &[], 9.6, &mut rng).is_empty());
        assert!(random_sequence(&pads, &durations, 0.2, &mut rng).is_empty());
    }
}

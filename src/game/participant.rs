use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::game::events::{Broadcast, Verdict};
use crate::game::pad::{PadColor, PadId};

/// Fan-out side of the authority/replica split. The authority owns all
/// mutable session state; subscribers only ever receive [`Broadcast`]
/// messages, delivered reliably and in order per subscriber.
pub struct BroadcastHub {
    subscribers: Vec<Sender<Broadcast>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<Broadcast> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, broadcast: &Broadcast) {
        self.subscribers.retain(|tx| {
            if tx.send(broadcast.clone()).is_err() {
                warn!("dropping disconnected broadcast subscriber");
                false
            } else {
                true
            }
        });
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only replica state, rebuilt purely from broadcasts.
#[derive(Clone, Debug, Default)]
pub struct ReplicaView {
    pub generation: u64,
    pub expected_len: usize,
    pub streak_len: usize,
    pub completed_len: usize,
    pub colors: HashMap<PadId, PadColor>,
    pub last_verdict: Option<Verdict>,
    pub rounds_won: u64,
}

/// A non-authoritative participant. Applies snapshots from the authority;
/// never feeds anything back.
pub struct Replica {
    view: ReplicaView,
}

impl Replica {
    pub fn new() -> Self {
        Self {
            view: ReplicaView::default(),
        }
    }

    pub fn view(&self) -> &ReplicaView {
        &self.view
    }

    /// Apply one broadcast. Messages carry absolute state, so re-applying
    /// the latest message leaves the view unchanged; messages from an older
    /// generation than the current one are ignored.
    pub fn apply(&mut self, broadcast: &Broadcast) {
        match broadcast {
            Broadcast::RoundStarted {
                generation,
                expected_len,
            } => {
                if *generation < self.view.generation {
                    debug!(generation, "ignoring stale round announcement");
                    return;
                }
                self.view.generation = *generation;
                self.view.expected_len = *expected_len;
                self.view.streak_len = 0;
                self.view.completed_len = 0;
                self.view.last_verdict = None;
            }
            Broadcast::PadColors {
                generation,
                assignments,
            } => {
                if *generation < self.view.generation {
                    debug!(generation, "ignoring stale color assignment");
                    return;
                }
                for (pad, color) in assignments {
                    self.view.colors.insert(pad.clone(), *color);
                }
            }
            Broadcast::Play {
                generation,
                outcome,
            } => {
                if *generation < self.view.generation {
                    debug!(generation, "ignoring stale validation result");
                    return;
                }
                self.view.generation = *generation;
                self.view.expected_len = outcome.expected_len;
                self.view.streak_len = outcome.streak_len;
                self.view.completed_len = outcome.completed_len;
                if outcome.verdict == Verdict::Won && self.view.last_verdict != Some(Verdict::Won) {
                    self.view.rounds_won += 1;
                }
                self.view.last_verdict = Some(outcome.verdict);
            }
        }
    }
}

impl Default for Replica {
    fn default() -> Self {
        Self::new()
    }
}

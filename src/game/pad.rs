use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GameError;

/// Stable pad identifier, unique within a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PadId(String);

impl PadId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PadId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// RGBA pad color, rolled once per round on the authority and broadcast so
/// every participant sees the same assignment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PadColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl PadColor {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.random_range(0.0..1.0),
            g: rng.random_range(0.0..1.0),
            b: rng.random_range(0.0..1.0),
            a: rng.random_range(0.0..1.0),
        }
    }
}

/// Playback side of a pad. The core only ever calls out through this trait;
/// the hosting application decides what a pad actually does (audio voice,
/// network RPC, test recorder).
pub trait PadSink: Send {
    /// Trigger the pad's cue, for `duration` seconds when given, or for the
    /// cue's natural length on a manual press.
    fn play(&mut self, duration: Option<f64>);

    /// One-time preparation at session start (sample upload, voice warmup).
    fn sync(&mut self) {}

    fn set_color(&mut self, _color: PadColor) {}
}

/// Maps pad ids to their sinks. Registration order is preserved so color
/// assignment and layout iteration are deterministic under a seeded RNG.
pub struct PadRegistry {
    pads: Vec<(PadId, Box<dyn PadSink>)>,
}

impl PadRegistry {
    pub fn new() -> Self {
        Self { pads: Vec::new() }
    }

    /// Register a sink, replacing any previous sink under the same id.
    pub fn register(&mut self, id: PadId, sink: Box<dyn PadSink>) {
        self.pads.retain(|(existing, _)| *existing != id);
        self.pads.push((id, sink));
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    pub fn contains(&self, id: &PadId) -> bool {
        self.pads.iter().any(|(existing, _)| existing == id)
    }

    pub fn ids(&self) -> Vec<PadId> {
        self.pads.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn play(&mut self, id: &PadId, duration: Option<f64>) -> Result<(), GameError> {
        match self.pads.iter_mut().find(|(existing, _)| existing == id) {
            Some((_, sink)) => {
                sink.play(duration);
                Ok(())
            }
            None => Err(GameError::UnknownPad(id.clone())),
        }
    }

    pub fn set_color(&mut self, id: &PadId, color: PadColor) -> Result<(), GameError> {
        match self.pads.iter_mut().find(|(existing, _)| existing == id) {
            Some((_, sink)) => {
                sink.set_color(color);
                Ok(())
            }
            None => Err(GameError::UnknownPad(id.clone())),
        }
    }

    pub fn sync_all(&mut self) {
        for (id, sink) in self.pads.iter_mut() {
            debug!(pad = %id, "syncing pad");
            sink.sync();
        }
    }
}

impl Default for PadRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink that only logs, for headless runs.
pub struct LoggingSink {
    id: PadId,
}

impl LoggingSink {
    pub fn new(id: PadId) -> Self {
        Self { id }
    }
}

impl PadSink for LoggingSink {
    fn play(&mut self, duration: Option<f64>) {
        debug!(pad = %self.id, ?duration, "pad played");
    }

    fn set_color(&mut self, color: PadColor) {
        debug!(pad = %self.id, r = color.r, g = color.g, b = color.b, "pad recolored");
    }
}

/// The standard table: two 3x3 grids (Left and Right hand), 18 pads total,
/// named `Pad_<Row><Column><Side>Pads`.
pub fn default_pad_layout() -> Vec<PadId> {
    let rows = ["Top", "Center", "Bottom"];
    let columns = ["Left", "Center", "Right"];
    let sides = ["Left", "Right"];

    let mut ids = Vec::with_capacity(rows.len() * columns.len() * sides.len());
    for side in sides {
        for row in rows {
            for column in columns {
                ids.push(PadId::new(format!("Pad_{row}{column}{side}Pads")));
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSink(u32);

    impl PadSink for CountingSink {
        fn play(&mut self, _duration: Option<f64>) {
            self.0 += 1;
        }
    }

    #[test]
    fn register_replaces_same_id() {
        let mut registry = PadRegistry::new();
        registry.register(PadId::new("a"), Box::new(CountingSink(0)));
        registry.register(PadId::new("a"), Box::new(CountingSink(0)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn play_unknown_pad_is_an_error() {
        let mut registry = PadRegistry::new();
        let err = registry.play(&PadId::new("ghost"), Some(0.4)).unwrap_err();
        assert!(matches!(err, crate::error::GameError::UnknownPad(_)));
    }

    #[test]
    fn default_layout_has_18_unique_pads() {
        let ids = default_pad_layout();
        assert_eq!(ids.len(), 18);
        let mut unique = ids.clone();
        unique.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        unique.dedup();
        assert_eq!(unique.len(), 18);
        assert!(ids.contains(&PadId::new("Pad_TopLeftRightPads")));
        assert!(ids.contains(&PadId::new("Pad_CenterCenterLeftPads")));
    }
}

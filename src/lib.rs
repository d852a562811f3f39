//! Engine-agnostic core of the MadPads rhythm game.
//!
//! One authoritative [`GameEngine`] owns the session: it generates pad
//! sequences (fixed reference melody first, random under a duration budget
//! afterwards), schedules their playback as fire-and-forget timers, and
//! validates every played pad against the expected order, with a per-step
//! response timeout. Non-authoritative participants subscribe to the
//! engine's broadcasts and rebuild a read-only view from the snapshots.
//!
//! The engine is driven cooperatively: the host feeds it input events and
//! advances its tick clock. There are no background threads inside the
//! core, so validation, timeouts and round changes are serialized by
//! construction.

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod game;

pub use config::GameConfig;
pub use engine::GameEngine;
pub use error::GameError;
pub use game::pad::{PadId, PadRegistry, PadSink};

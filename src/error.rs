use crate::game::pad::PadId;

/// Error values surfaced by the core. None of these abort a session: the
/// engine absorbs every variant, logs it, and the round continues as if a
/// wrong pad had been played (or nothing happened at all).
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// A sequence or play referenced a pad id the registry does not know.
    #[error("unknown pad '{0}'")]
    UnknownPad(PadId),

    /// A validation call arrived while no expected sequence was armed.
    #[error("no active round")]
    NoActiveRound,

    /// A timer callback from an earlier round reached the current one.
    #[error("stale timer from generation {fired} (current {current})")]
    StaleTimer { fired: u64, current: u64 },
}

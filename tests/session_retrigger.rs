use madpads::config::GameConfig;
use madpads::engine::GameEngine;
use madpads::game::events::{Broadcast, InputEvent};
use madpads::game::pad::{default_pad_layout, LoggingSink, PadRegistry};
use madpads::game::session::SessionState;

fn build_engine(seed: u64) -> GameEngine {
    let mut registry = PadRegistry::new();
    for id in default_pad_layout() {
        registry.register(id.clone(), Box::new(LoggingSink::new(id)));
    }
    let mut config = GameConfig::default();
    config.engine.seed = Some(seed);
    GameEngine::new(&config, registry)
}

#[test]
fn trigger_while_playing_is_a_no_op() {
    let mut engine = build_engine(5);
    let broadcasts = engine.subscribe();

    engine.handle_input(InputEvent::TriggerHit);
    let expected_before = engine.expected().to_vec();
    let timers_before = engine.pending_timers();
    let generation_before = engine.generation();
    // Drain the first round's announcements.
    let first_round: Vec<_> = broadcasts.try_iter().collect();
    assert!(!first_round.is_empty());

    // Mid-intro trigger.
    engine.advance_to(1_000);
    engine.handle_input(InputEvent::TriggerHit);

    assert_eq!(engine.expected(), expected_before.as_slice());
    assert_eq!(engine.generation(), generation_before);
    assert_eq!(
        engine.pending_timers(),
        timers_before - 1,
        "only the one due step fired; nothing new was scheduled"
    );
    assert!(
        broadcasts.try_iter().count() == 0,
        "an ignored trigger must not broadcast"
    );
}

#[test]
fn second_trigger_starts_a_fresh_random_round() {
    let mut engine = build_engine(5);
    let broadcasts = engine.subscribe();

    engine.handle_input(InputEvent::TriggerHit);
    engine.advance_to(9_600);
    assert_eq!(engine.session_state(), SessionState::AwaitingInput);

    // Make some progress in round one, then restart.
    let first = engine.expected()[0].clone();
    engine.handle_input(InputEvent::PadHit { pad: first });
    assert_eq!(engine.completed_len(), 1);
    let _ = broadcasts.try_iter().count();

    engine.handle_input(InputEvent::TriggerHit);

    assert_eq!(engine.generation(), 2);
    assert_eq!(engine.session_state(), SessionState::PlayingIntro);
    // Progress from the previous round is gone.
    assert_eq!(engine.streak_len(), 0);
    assert_eq!(engine.completed_len(), 0);
    assert!(!engine.expected().is_empty());

    let announcements: Vec<_> = broadcasts.try_iter().collect();
    assert!(announcements.iter().any(|b| matches!(
        b,
        Broadcast::RoundStarted { generation: 2, .. }
    )));
    assert!(announcements
        .iter()
        .any(|b| matches!(b, Broadcast::PadColors { .. })));

    // The new round's intro plays out and input comes back.
    engine.advance_to(9_600 + 2_000 + 9_600);
    assert_eq!(engine.session_state(), SessionState::AwaitingInput);
}

use madpads::config::GameConfig;
use madpads::engine::GameEngine;
use madpads::game::events::{Broadcast, InputEvent, Verdict};
use madpads::game::pad::{default_pad_layout, LoggingSink, PadRegistry};
use madpads::game::participant::Replica;

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
fn all_replicas_see_the_same_pad_colors() {
    let mut engine = build_engine(9);
    let rx_a = engine.subscribe();
    let rx_b = engine.subscribe();

    engine.handle_input(InputEvent::TriggerHit);

    let mut replica_a = Replica::new();
    let mut replica_b = Replica::new();
    for broadcast in rx_a.try_iter() {
        replica_a.apply(&broadcast);
    }
    for broadcast in rx_b.try_iter() {
        replica_b.apply(&broadcast);
    }

    assert_eq!(replica_a.view().colors.len(), 18);
    assert_eq!(replica_a.view().colors, replica_b.view().colors);
    assert_eq!(replica_a.view().expected_len, 10);
    assert_eq!(replica_a.view().generation, 1);
}

#[test]
fn progress_snapshots_converge_and_reapply_idempotently() {
    let mut engine = build_engine(9);
    let rx = engine.subscribe();
    let mut replica = Replica::new();

    engine.handle_input(InputEvent::TriggerHit);
    engine.advance_to(9_600);

    let expected = engine.expected().to_vec();
    engine.handle_input(InputEvent::PadHit {
        pad: expected[0].clone(),
    });
    engine.handle_input(InputEvent::PadHit {
        pad: expected[1].clone(),
    });

    let messages: Vec<_> = rx.try_iter().collect();
    for broadcast in &messages {
        replica.apply(broadcast);
    }
    assert_eq!(replica.view().streak_len, engine.streak_len());
    assert_eq!(replica.view().completed_len, engine.completed_len());
    assert_eq!(replica.view().last_verdict, Some(Verdict::Correct));

    // Re-applying the final message must not change anything.
    let before = replica.view().clone();
    if let Some(last) = messages.last() {
        replica.apply(last);
    }
    let after = replica.view();
    assert_eq!(after.streak_len, before.streak_len);
    assert_eq!(after.completed_len, before.completed_len);
    assert_eq!(after.rounds_won, before.rounds_won);
    assert_eq!(after.colors, before.colors);
}

#[test]
fn stale_generation_broadcasts_are_ignored() {
    let mut engine = build_engine(9);
    let rx = engine.subscribe();
    let mut replica = Replica::new();

    engine.handle_input(InputEvent::TriggerHit);
    engine.advance_to(9_600);
    let round_one: Vec<_> = rx.try_iter().collect();

    engine.handle_input(InputEvent::TriggerHit);
    for broadcast in rx.try_iter() {
        replica.apply(&broadcast);
    }
    assert_eq!(replica.view().generation, 2);
    let expected_len = replica.view().expected_len;

    // A late-arriving round-one message must not roll the view back.
    if let Some(first) = round_one.first() {
        replica.apply(first);
    }
    assert_eq!(replica.view().generation, 2);
    assert_eq!(replica.view().expected_len, expected_len);
}

#[test]
fn winning_a_round_is_counted_once() {
    let mut engine = build_engine(9);
    let rx = engine.subscribe();
    let mut replica = Replica::new();

    engine.handle_input(InputEvent::TriggerHit);
    engine.advance_to(9_600);

    let expected = engine.expected().to_vec();
    let mut now = 9_600;
    for pad in &expected {
        engine.advance_to(now);
        engine.handle_input(InputEvent::PadHit { pad: pad.clone() });
        now += 500;
    }

    let messages: Vec<_> = rx.try_iter().collect();
    for broadcast in &messages {
        replica.apply(broadcast);
    }
    assert_eq!(replica.view().rounds_won, 1);
    assert_eq!(replica.view().last_verdict, Some(Verdict::Won));
    assert_eq!(replica.view().completed_len, 0);

    // The Won snapshot is idempotent too.
    if let Some(last) = messages.last() {
        replica.apply(last);
    }
    assert_eq!(replica.view().rounds_won, 1);
}

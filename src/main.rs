// Headless demo: runs an authoritative session in real time with a bot
// playing back the expected sequence (and occasionally flubbing a step).
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::bounded;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use madpads::cli::Args;
use madpads::config::GameConfig;
use madpads::engine::GameEngine;
use madpads::game::events::InputEvent;
use madpads::game::pad::{default_pad_layout, LoggingSink, PadRegistry};
use madpads::game::participant::Replica;
use madpads::game::session::SessionState;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = GameConfig::load_or_default(&args.config);
    if args.seed.is_some() {
        config.engine.seed = args.seed;
    }

    let mut registry = PadRegistry::new();
    for id in default_pad_layout() {
        registry.register(id.clone(), Box::new(LoggingSink::new(id)));
    }

    let mut engine = GameEngine::new(&config, registry);
    let broadcasts = engine.subscribe();
    let mut replica = Replica::new();
    let (input_tx, input_rx) = bounded::<InputEvent>(64);

    let stop_flag = Arc::new(AtomicBool::new(false));
    {
        let stop = stop_flag.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .expect("install ctrl-c handler");
    }

    let mut bot_rng = match config.engine.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let mistake_chance = args.mistake_chance.clamp(0.0, 1.0);
    let time = engine.timebase();
    let started = Instant::now();
    let target_rounds = u64::from(args.rounds);
    let mut rounds_seen = 0u64;
    let mut next_play_at = None;

    info!(rounds = args.rounds, "demo session starting");
    let _ = input_tx.send(InputEvent::TriggerHit);

    loop {
        if stop_flag.load(Ordering::SeqCst) {
            info!("interrupted, stopping");
            break;
        }

        let now_tick = time.sec_to_tick(started.elapsed().as_secs_f64());
        engine.advance_to(now_tick);
        engine.drain_inputs(&input_rx);

        for broadcast in broadcasts.try_iter() {
            replica.apply(&broadcast);
        }

        let wins = replica.view().rounds_won;
        if wins >= target_rounds {
            info!(wins, "all demo rounds won");
            break;
        }
        if wins > rounds_seen {
            rounds_seen = wins;
            info!(wins, "round won, triggering the next one");
            let _ = input_tx.send(InputEvent::TriggerHit);
            next_play_at = None;
            std::thread::sleep(Duration::from_millis(10));
            continue;
        }

        if engine.session_state() == SessionState::AwaitingInput {
            let due = next_play_at.map_or(true, |t| now_tick >= t);
            if due && !engine.expected().is_empty() {
                let position = engine.streak_len();
                let pad = if bot_rng.random_bool(mistake_chance) {
                    let layout = default_pad_layout();
                    layout[bot_rng.random_range(0..layout.len())].clone()
                } else {
                    engine.expected()[position].clone()
                };
                let _ = input_tx.send(InputEvent::PadHit { pad });
                engine.drain_inputs(&input_rx);
                next_play_at = Some(time.after(now_tick, args.play_interval));
            }
        } else {
            next_play_at = None;
        }

        std::thread::sleep(Duration::from_millis(10));
    }

    let view = replica.view();
    info!(
        rounds_won = view.rounds_won,
        progress = view.completed_len,
        "demo finished"
    );
}

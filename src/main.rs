//! Duel Core headless runner
//!
//! Plays a CPU-vs-CPU match to completion and prints a JSON summary.
//!
//! Usage: `duel-core [seed] [config.json]`

use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;

use duel_core::consts::TICK_RATE;
use duel_core::sim::{CharacterSnapshot, MatchEvent, MatchSession, TickInput, Winner};
use duel_core::{ConfigError, Difficulty, MatchConfig};

/// Give up after five simulated minutes
const MAX_TICKS: u64 = TICK_RATE as u64 * 300;

#[derive(Debug, Serialize)]
struct Summary {
    arena: String,
    seed: u64,
    ticks: u64,
    seconds: f32,
    winner: Option<Winner>,
    first_won: Option<bool>,
    hits: u32,
    blocked: u32,
    specials: u32,
    longest_combo: u32,
    fighters: [CharacterSnapshot; 2],
}

fn parse_args() -> Result<MatchConfig, ConfigError> {
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .map(|s| s.parse::<u64>().map_err(|_| ConfigError::InvalidSeed(s)))
        .transpose()?;
    let mut config = match args.next() {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    for slot in &mut config.cpu {
        slot.get_or_insert(Difficulty::Normal);
    }
    Ok(config)
}

fn main() -> Result<(), ConfigError> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    let config = parse_args()?;
    log::info!("Duel Core (headless) starting, seed {}", config.seed);

    let first_won = Rc::new(Cell::new(None));
    let result = first_won.clone();
    let mut session = MatchSession::new(&config, move |won| result.set(Some(won)));

    let (mut hits, mut blocked, mut specials, mut longest_combo) = (0, 0, 0, 0);
    while !session.is_over() && session.current_tick() < MAX_TICKS {
        for event in session.tick([TickInput::default(); 2]) {
            match event {
                MatchEvent::AttackLanded {
                    blocked: true, ..
                } => blocked += 1,
                MatchEvent::AttackLanded { combo_count, .. } => {
                    hits += 1;
                    longest_combo = longest_combo.max(combo_count);
                }
                MatchEvent::SpecialActivated { .. } => specials += 1,
                _ => {}
            }
        }
    }
    if !session.is_over() {
        log::warn!("Match hit the {} tick limit without a knockout", MAX_TICKS);
    }

    let ticks = session.current_tick();
    let summary = Summary {
        arena: session.arena().to_string(),
        seed: config.seed,
        ticks,
        seconds: ticks as f32 / TICK_RATE as f32,
        winner: session.winner(),
        first_won: first_won.get(),
        hits,
        blocked,
        specials,
        longest_combo,
        fighters: session.snapshots(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

use std::path::PathBuf;

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;
use tinustris_engine::{
    Behavior, GameConfig, GameState, GeneratorSeed, Input, InputState, OnePlayerEngine,
};

use crate::util;

/// Chance per frame that the button masher presses each input.
const PRESS_NUMERATOR: u32 = 1;
const PRESS_DENOMINATOR: u32 = 6;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Game configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Rule preset, overriding the configuration
    #[arg(long)]
    behavior: Option<Behavior>,
    /// Starting level, overriding the configuration
    #[arg(long)]
    start_level: Option<u32>,
    /// Seed of the piece sequence (16 hex digits)
    #[arg(long)]
    tetromino_seed: Option<GeneratorSeed>,
    /// Seed of the garbage gap sequence (16 hex digits)
    #[arg(long)]
    gap_seed: Option<GeneratorSeed>,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Seed of the random button masher; without it no input is given
    #[arg(long)]
    input_seed: Option<GeneratorSeed>,
    /// Write the final state as JSON
    #[arg(long)]
    json: bool,
    /// Output file path for the JSON report
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport<'a> {
    config: &'a GameConfig,
    input_seed: Option<GeneratorSeed>,
    frames: u64,
    state: &'a GameState,
}

/// Scripted stand-in for a player.
#[derive(Debug)]
enum Player {
    Idle,
    Masher(Pcg32),
}

impl Player {
    fn new(seed: Option<GeneratorSeed>) -> Self {
        match seed {
            Some(seed) => Self::Masher(Pcg32::seed_from_u64(seed.value())),
            None => Self::Idle,
        }
    }

    fn input(&mut self) -> InputState {
        match self {
            Self::Idle => InputState::NONE,
            Self::Masher(rng) => Input::ALL
                .into_iter()
                .filter(|_| rng.random_ratio(PRESS_NUMERATOR, PRESS_DENOMINATOR))
                .collect(),
        }
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        config,
        behavior,
        start_level,
        tetromino_seed,
        gap_seed,
        frames,
        input_seed,
        json,
        output,
    } = arg;

    let mut config = util::read_config_file(config.as_deref())?;
    if let Some(behavior) = behavior {
        config.behavior = *behavior;
    }
    if let Some(start_level) = start_level {
        config.start_level = *start_level;
    }
    // Resolve random seeds up front so that the run can be reproduced.
    let mut rng = rand::rng();
    config.tetromino_seed = (*tetromino_seed)
        .or(config.tetromino_seed)
        .or_else(|| Some(rng.random()));
    config.gap_seed = (*gap_seed).or(config.gap_seed).or_else(|| Some(rng.random()));

    if config.start_level != 0 && !config.behavior.start_level_supported() {
        eprintln!(
            "{} ignores the starting level {}",
            config.behavior.name(),
            config.start_level
        );
    }

    eprintln!("Simulating {} ({})...", config.behavior.name(), config.behavior);
    if let Some(seed) = config.tetromino_seed {
        eprintln!("  tetromino seed: {seed}");
    }
    if let Some(seed) = config.gap_seed {
        eprintln!("  gap seed:       {seed}");
    }

    let engine = OnePlayerEngine::from_config(&config);
    let mut player = Player::new(*input_seed);
    let mut state = engine.init_game_state();
    let mut simulated = 0;
    while simulated < *frames && !state.is_game_over() {
        state = engine.compute_next_state(&state, &player.input());
        simulated += 1;
    }

    eprintln!("{state}");
    eprintln!("Frames:    {simulated}");
    eprintln!("Pieces:    {}", state.block_counter() + 1);
    eprintln!("Lines:     {}", state.lines());
    eprintln!("Level:     {}", state.level());
    eprintln!("Game over: {}", state.is_game_over());

    if *json {
        let report = SimulationReport {
            config: &config,
            input_seed: *input_seed,
            frames: simulated,
            state: &state,
        };
        util::save_json(&report, output.clone())?;
    }

    Ok(())
}

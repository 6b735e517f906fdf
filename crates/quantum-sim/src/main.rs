mod host;
mod walker;

use std::fmt;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use quantum_core::dimension::Dimension;
use quantum_core::events::GameEvent;
use quantum_jumper::config::JumperConfig;
use quantum_jumper::level::{LevelError, LevelLayout};
use quantum_jumper::procgen::generate_level;
use quantum_jumper::transition::TransitionError;
use quantum_jumper::QuantumJumper;

use host::HeadlessHost;
use walker::Walker;

/// Simulated frame length.
const FRAME_MS: u64 = 100;
/// Hard stop so a walker stuck between restarts still terminates.
const MAX_FRAMES: u32 = 5_000;

#[derive(Debug)]
enum SimError {
    Usage(String),
    Level(LevelError),
    Transition(TransitionError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(msg) => write!(f, "{msg}"),
            Self::Level(e) => write!(f, "{e}"),
            Self::Transition(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<LevelError> for SimError {
    fn from(e: LevelError) -> Self {
        Self::Level(e)
    }
}

impl From<TransitionError> for SimError {
    fn from(e: TransitionError) -> Self {
        Self::Transition(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "detail")]
enum Outcome {
    Completed,
    GameOver,
    SceneRequested(String),
    OutOfFrames,
}

#[derive(Debug, Serialize)]
struct Summary {
    levels_loaded: Vec<String>,
    frames: u32,
    elapsed_ms: u64,
    score: u32,
    lives: u32,
    final_dimension: Option<Dimension>,
    dimension_switches: u32,
    coins: u32,
    bonus_points: u32,
    powerups: u32,
    portals: u32,
    outcome: Outcome,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match layouts_from_args(&args).and_then(run) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("Failed to encode summary: {e}");
                std::process::exit(1);
            },
        },
        Err(e) => {
            eprintln!("quantum-sim: {e}");
            std::process::exit(2);
        },
    }
}

/// `quantum-sim` plays the campaign, `quantum-sim <level>` one built-in
/// level, `quantum-sim --seed N` a generated bonus level.
fn layouts_from_args(args: &[String]) -> Result<Vec<LevelLayout>, SimError> {
    match args {
        [] => Ok(LevelLayout::builtin_campaign()?),
        [flag, seed] if flag == "--seed" => {
            let seed = seed
                .parse::<u64>()
                .map_err(|_| SimError::Usage(format!("invalid seed {seed:?}")))?;
            Ok(vec![generate_level(seed)])
        },
        [key] => Ok(vec![LevelLayout::builtin(key)?]),
        _ => {
            let keys: Vec<&str> = LevelLayout::builtin_keys().collect();
            Err(SimError::Usage(format!(
                "usage: quantum-sim [{} | --seed N]",
                keys.join(" | ")
            )))
        },
    }
}

fn run(layouts: Vec<LevelLayout>) -> Result<Summary, SimError> {
    let config = JumperConfig::load();
    let host = HeadlessHost::new(config.cell_size);
    let mut scene = QuantumJumper::new(host, config, layouts);

    let mut summary = Summary {
        levels_loaded: Vec::new(),
        frames: 0,
        elapsed_ms: 0,
        score: 0,
        lives: 0,
        final_dimension: None,
        dimension_switches: 0,
        coins: 0,
        bonus_points: 0,
        powerups: 0,
        portals: 0,
        outcome: Outcome::OutOfFrames,
    };

    let loaded = scene.create(0)?;
    record(&mut summary, &loaded);
    let mut walker = Walker::enter(&scene);

    while summary.frames < MAX_FRAMES {
        let Some(w) = walker.as_mut() else {
            break;
        };
        scene.host_mut().advance(FRAME_MS);
        summary.frames += 1;

        let mut events = Vec::new();
        let report = match w.step(&mut scene, &mut events) {
            Some(report) => report,
            None => {
                summary.outcome = Outcome::Completed;
                break;
            },
        };
        events.extend(scene.update(&report));
        record(&mut summary, &events);

        if scene.is_game_over() {
            summary.outcome = Outcome::GameOver;
            break;
        }
        if let Some(name) = events.iter().find_map(|e| match e {
            GameEvent::SceneRequested { name } => Some(name.clone()),
            _ => None,
        }) {
            summary.outcome = Outcome::SceneRequested(name);
            break;
        }
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::LevelLoaded { .. }))
        {
            walker = Walker::enter(&scene);
        }
    }

    summary.elapsed_ms = u64::from(summary.frames) * FRAME_MS;
    summary.score = scene.player().score;
    summary.lives = scene.player().lives;
    summary.final_dimension = scene.current_dimension();
    tracing::info!(
        frames = summary.frames,
        score = summary.score,
        bodies = scene.host().body_count(),
        visible = scene.host().visible_count(),
        "Simulation finished"
    );
    scene.teardown();
    Ok(summary)
}

fn record(summary: &mut Summary, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::DimensionChanged { .. } => summary.dimension_switches += 1,
            GameEvent::CoinCollected { bonus, .. } => {
                summary.coins += 1;
                summary.bonus_points += bonus;
            },
            GameEvent::PowerupCollected { .. } => summary.powerups += 1,
            GameEvent::PortalActivated { .. } => summary.portals += 1,
            GameEvent::LevelLoaded { name, .. } => summary.levels_loaded.push(name.clone()),
            _ => {},
        }
    }
}

//! sim-harness: run a headless session with a simple autopilot.
//!
//! Usage:
//!   sim-harness [--ticks N] [--seed N] [--mode classic|rescue] [--store path.json] [--config session.json]
//!
//! Prints the final statistics as JSON on stdout. Set `RUST_LOG` for
//! engine logs.

use std::path::{Path, PathBuf};
use std::process;

use tankrescue_core::commands::PlayerCommand;
use tankrescue_core::config::SessionConfig;
use tankrescue_core::constants::FRAME_MS;
use tankrescue_core::enums::{PlayerState, RevivalOutcome, SessionMode};
use tankrescue_core::events::GameEvent;
use tankrescue_core::state::SessionSnapshot;
use tankrescue_core::types::Position;

use tankrescue_progression::store::{JsonFileStore, KeyValueStore, MemoryStore};
use tankrescue_sim::GameSession;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h" || a == "help") {
        print_usage();
        return;
    }

    let mut config = match parse_path(&args, "--config") {
        Some(path) => load_config(&path),
        None => SessionConfig::default(),
    };
    if let Some(seed) = parse_number(&args, "--seed") {
        config.seed = seed;
    }
    if let Some(mode) = parse_mode(&args) {
        config.mode = mode;
    }
    if config.epoch_secs == 0 {
        config.epoch_secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
    }
    let ticks = parse_number(&args, "--ticks").unwrap_or(3600);

    let store: Box<dyn KeyValueStore> = match parse_path(&args, "--store") {
        Some(path) => match JsonFileStore::open(&path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                eprintln!("Error opening store {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => Box::new(MemoryStore::new()),
    };

    let mut session = GameSession::with_store(config.clone(), store);
    if let Err(e) = session.start() {
        eprintln!("Error starting session: {e}");
        process::exit(1);
    }

    let mut snapshot = session.tick(FRAME_MS);
    for _ in 0..ticks {
        session.queue_commands(autopilot(&snapshot));
        snapshot = session.tick(FRAME_MS);
    }

    session.submit_score();
    let events = session.drain_events();
    let kills = count(&events, |e| matches!(e, GameEvent::EnemyKilled { .. }));
    let deaths = count(&events, |e| matches!(e, GameEvent::PlayerDied { .. }));
    let resets = count(&events, |e| matches!(e, GameEvent::SessionReset));
    tracing::info!(
        ticks,
        seed = config.seed,
        mode = ?session.mode(),
        kills,
        deaths,
        resets,
        "run finished"
    );

    let report = serde_json::json!({
        "stats": session.stats(),
        "best": session.best_rank(),
        "rescue_unlocked": session.is_unlocked(SessionMode::Rescue),
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error encoding report: {e}");
            process::exit(1);
        }
    }

    if let Err(e) = session.flush_store() {
        eprintln!("Error writing store: {e}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "sim-harness: headless TANKRESCUE session runner\n\
         \n\
           --ticks <N>        Ticks to run at 60 Hz (default: 3600)\n\
           --seed <N>         RNG seed (overrides the config file)\n\
           --mode <mode>      classic or rescue\n\
           --store <path>     JSON file for persistent progression\n\
           --config <path>    SessionConfig as JSON\n"
    );
}

// --- Autopilot ---

/// Steer toward the nearest pilot (or enemy when none) and keep firing.
/// Asks for a revival, accepting it immediately, whenever dead.
fn autopilot(snapshot: &SessionSnapshot) -> Vec<PlayerCommand> {
    match snapshot.player.state {
        PlayerState::Dead { .. } => {
            return vec![
                PlayerCommand::RequestRevival,
                PlayerCommand::ResolveRevival {
                    outcome: RevivalOutcome::Granted,
                },
            ];
        }
        PlayerState::Reviving => return Vec::new(),
        PlayerState::Alive { .. } => {}
    }

    let me = snapshot.player.position;
    let pilot = nearest(me, snapshot.pilots.iter().map(|p| p.position));
    let enemy = nearest(me, snapshot.enemies.iter().map(|e| e.position));

    let mut commands = Vec::new();
    if let Some(target) = pilot.or(enemy) {
        commands.push(PlayerCommand::Move {
            angle_deg: me.bearing_to(&target),
            strength: 1.0,
        });
    }
    if enemy.is_some() {
        commands.push(PlayerCommand::Fire);
    }
    commands
}

fn nearest(from: Position, candidates: impl Iterator<Item = Position>) -> Option<Position> {
    candidates.min_by(|a, b| from.distance_to(a).total_cmp(&from.distance_to(b)))
}

fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

// --- Arguments ---

fn load_config(path: &Path) -> SessionConfig {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error reading config {}: {e}", path.display());
            process::exit(1);
        }
    };
    match serde_json::from_str(&json) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error parsing config {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_path(args: &[String], flag: &str) -> Option<PathBuf> {
    flag_value(args, flag).map(PathBuf::from)
}

fn parse_number(args: &[String], flag: &str) -> Option<u64> {
    let raw = flag_value(args, flag)?;
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            eprintln!("Error: {flag} expects a number, got {raw}");
            process::exit(1);
        }
    }
}

fn parse_mode(args: &[String]) -> Option<SessionMode> {
    match flag_value(args, "--mode")? {
        "classic" => Some(SessionMode::Classic),
        "rescue" => Some(SessionMode::Rescue),
        other => {
            eprintln!("Error: unknown mode {other}");
            process::exit(1);
        }
    }
}

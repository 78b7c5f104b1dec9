//! Replay Log Example
//!
//! Parses a battle log, prints its metrics as JSON, then replays it through
//! the simulator and lists every hit whose damage the simulator disagrees
//! with.
//!
//! Usage: cargo run --example replay_log -- <battle.log> [catalogue.json]

use std::env;
use std::fs;
use std::process;

use anyhow::{Context, Result};
use mayhem_protocol::parse_battle_log;
use mayhem_replay::{BattleLoader, Catalogue, LogReplay, compute};

#[tokio::main]
async fn main() -> Result<()> {
    mayhem_session::telemetry::init();

    let mut args = env::args().skip(1);
    let Some(log_path) = args.next() else {
        eprintln!("Usage: replay_log <battle.log> [catalogue.json]");
        process::exit(1);
    };

    let catalogue = match args.next() {
        Some(path) => Catalogue::load(&path).with_context(|| format!("loading catalogue {}", path))?,
        None => Catalogue::new(),
    };
    let loader = BattleLoader::new(catalogue.shared())
        .with_rules(mayhem_session::SessionConfig::from_env().rules);

    let content = fs::read_to_string(&log_path).with_context(|| format!("reading {}", log_path))?;
    let parsed = parse_battle_log(&content).with_context(|| format!("parsing {}", log_path))?;
    tracing::info!(
        game_mode = %parsed.game_mode,
        turns = parsed.turns.len(),
        won = parsed.result.won,
        "parsed battle log"
    );
    let mut battle = loader.load(&parsed)?;

    let metrics = compute(&parsed);
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    let report = LogReplay.run(&parsed, &mut battle);

    println!();
    println!(
        "Replayed {} turns ({} skipped), simulated outcome: {}",
        report.applied, report.skipped, report.outcome
    );
    if let Some(stop) = &report.stopped {
        println!("Stopped on turn {} ({} {}): {}", stop.turn, stop.actor, stop.skill_id, stop.reason);
    }

    if report.divergences.is_empty() {
        println!("No damage divergences");
    } else {
        println!("Damage divergences:");
        for d in &report.divergences {
            let simulated = d
                .simulated
                .map(|v| v.to_string())
                .unwrap_or_else(|| "no hit".to_string());
            println!(
                "  turn {:>3}  {} -> {} ({}): logged {}, simulated {}",
                d.turn, d.actor, d.target, d.skill_id, d.logged, simulated
            );
        }
    }

    Ok(())
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line host that drives a Firewall Defence session.
//!
//! The host owns the clock: it advances a manual clock by a fixed step and
//! feeds each reading to the world, then prints a summary or the final
//! snapshot as JSON.

mod scenario;
mod tower_arg;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use firewall_defence_core::{
    Clock, Command, Event, ManualClock, RunState, SessionSnapshot, Timestamp,
};
use firewall_defence_world::{self as world, query, World, DEFAULT_SEED};

use crate::{
    scenario::{Scenario, ScriptedTower},
    tower_arg::TowerArg,
};

const DEFAULT_TICKS: u64 = 2_400;
const DEFAULT_TICK_MS: u64 = 50;

/// Runs a headless Firewall Defence session.
#[derive(Debug, Parser)]
#[command(name = "firewall-defence", version)]
struct Args {
    /// Seed for every random draw in the session.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ticks to simulate unless the session ends earlier.
    #[arg(long)]
    ticks: Option<u64>,
    /// Simulated milliseconds between two ticks.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,
    /// TOML scenario describing seed, placements and pinned events.
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Tower placed before the first tick, as `kind@x,y`. Repeatable.
    #[arg(long = "tower")]
    towers: Vec<TowerArg>,
    /// Print the final snapshot as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

/// Fully resolved run parameters.
#[derive(Debug)]
struct RunConfig {
    seed: u64,
    ticks: u64,
    tick: Duration,
    towers: Vec<ScriptedTower>,
    scenario: Scenario,
}

impl RunConfig {
    /// Merges command-line arguments over the optional scenario file.
    fn resolve(args: &Args) -> Result<Self> {
        let scenario = match &args.scenario {
            Some(path) => scenario::load(path)?,
            None => Scenario::default(),
        };

        let tick_ms = args
            .tick_ms
            .or(scenario.tick_ms)
            .unwrap_or(DEFAULT_TICK_MS);
        if tick_ms == 0 {
            anyhow::bail!("--tick-ms must be positive");
        }

        let mut towers: Vec<ScriptedTower> = args
            .towers
            .iter()
            .map(|arg| ScriptedTower {
                tick: 0,
                kind: arg.kind,
                position: arg.position,
            })
            .collect();
        towers.extend(scenario.towers.iter().copied());
        towers.sort_by_key(|tower| tower.tick);

        Ok(Self {
            seed: args.seed.or(scenario.seed).unwrap_or(DEFAULT_SEED),
            ticks: args.ticks.or(scenario.ticks).unwrap_or(DEFAULT_TICKS),
            tick: Duration::from_millis(tick_ms),
            towers,
            scenario,
        })
    }
}

/// Tallies of the events observed during a run.
#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    ticks: u64,
    waves_spawned: u32,
    waves_cleared: u32,
    kills: u32,
    escapes: u32,
    rejected_placements: u32,
    global_events: u32,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::WaveSpawned { .. } => self.waves_spawned += 1,
                Event::WaveCleared { .. } => self.waves_cleared += 1,
                Event::EnemyKilled { .. } => self.kills += 1,
                Event::EnemyEscaped { .. } => self.escapes += 1,
                Event::TowerPlacementRejected { kind, reason, .. } => {
                    log::warn!("placement of {kind} rejected: {reason:?}");
                    self.rejected_placements += 1;
                }
                Event::GlobalEventActivated { .. } => self.global_events += 1,
                _ => {}
            }
        }
    }
}

fn run(config: &RunConfig) -> (SessionSnapshot, Tally) {
    let mut world = World::with_seed(config.seed);
    let mut clock = ManualClock::starting_at(Timestamp::ZERO);
    let mut events = Vec::new();
    let mut tally = Tally::default();

    world::apply(&mut world, Command::Start, &mut events);
    for pinned in &config.scenario.events {
        world::apply(
            &mut world,
            Command::ScheduleGlobalEvent {
                kind: pinned.kind,
                wave: pinned.wave,
            },
            &mut events,
        );
    }

    let mut pending = config.towers.iter().peekable();
    for tick in 0..config.ticks {
        while let Some(tower) = pending.next_if(|tower| tower.tick <= tick) {
            world::apply(
                &mut world,
                Command::PlaceTower {
                    kind: tower.kind,
                    position: tower.position,
                },
                &mut events,
            );
        }

        world::apply(&mut world, Command::Advance { now: clock.now() }, &mut events);
        clock.advance(config.tick);
        tally.ticks += 1;

        tally.record(&events);
        events.clear();
        if query::run_state(&world) == RunState::GameOver {
            break;
        }
    }

    (query::snapshot(&world), tally)
}

fn print_summary(snapshot: &SessionSnapshot, tally: &Tally) {
    println!("state:        {:?}", snapshot.run_state);
    println!("ticks:        {}", tally.ticks);
    println!("wave:         {}", snapshot.wave);
    println!("health:       {:.1}/{:.0}", snapshot.health, snapshot.max_health);
    println!("coins:        {}", snapshot.coins);
    println!("score:        {}", snapshot.score);
    println!("towers:       {}", snapshot.towers.len());
    println!("enemies:      {}", snapshot.enemies.len());
    println!(
        "waves:        {} spawned, {} cleared",
        tally.waves_spawned, tally.waves_cleared
    );
    println!("kills:        {}", tally.kills);
    println!("escapes:      {}", tally.escapes);
    println!("rejected:     {}", tally.rejected_placements);
    println!("events:       {}", tally.global_events);
}

/// Entry point for the Firewall Defence command-line interface.
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = RunConfig::resolve(&args)?;
    log::info!(
        "running {} ticks of {} ms with seed {:#x}",
        config.ticks,
        config.tick.as_millis(),
        config.seed
    );

    let (snapshot, tally) = run(&config);
    if args.json {
        let json = serde_json::to_string_pretty(&snapshot)
            .context("failed to serialize session snapshot")?;
        println!("{json}");
    } else {
        print_summary(&snapshot, &tally);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> RunConfig {
        let args = Args::try_parse_from(std::iter::once("firewall-defence").chain(args.iter().copied()))
            .expect("arguments parse");
        RunConfig::resolve(&args).expect("config resolves")
    }

    #[test]
    fn command_line_defaults_apply_without_scenario() {
        let config = config(&[]);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.ticks, DEFAULT_TICKS);
        assert_eq!(config.tick, Duration::from_millis(DEFAULT_TICK_MS));
        assert!(config.towers.is_empty());
    }

    #[test]
    fn repeated_tower_flags_are_collected() {
        let config = config(&["--tower", "proxy@100,100", "--tower", "chain@300,200"]);
        assert_eq!(config.towers.len(), 2);
        assert!(config.towers.iter().all(|tower| tower.tick == 0));
    }

    #[test]
    fn malformed_tower_flag_is_a_parse_error() {
        let result = Args::try_parse_from(["firewall-defence", "--tower", "proxy@100"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_tick_length_is_rejected() {
        let args = Args::try_parse_from(["firewall-defence", "--tick-ms", "0"]).expect("parses");
        assert!(RunConfig::resolve(&args).is_err());
    }

    #[test]
    fn identical_configs_produce_identical_runs() {
        let config = config(&["--seed", "17", "--ticks", "900", "--tower", "antivirus@150,200"]);
        let (first, first_tally) = run(&config);
        let (second, second_tally) = run(&config);
        assert_eq!(first, second);
        assert_eq!(first_tally, second_tally);
        assert!(first_tally.waves_spawned >= 1);
    }
}

//! Versioned TOML scenario files describing a scripted session.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use firewall_defence_core::{GlobalEventKind, Position, TowerKind};
use serde::Deserialize;

const SUPPORTED_SCENARIO_VERSION: u32 = 1;

/// Scripted session loaded from disk.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Scenario {
    pub(crate) seed: Option<u64>,
    pub(crate) ticks: Option<u64>,
    pub(crate) tick_ms: Option<u64>,
    pub(crate) towers: Vec<ScriptedTower>,
    pub(crate) events: Vec<ScriptedEvent>,
}

/// Tower placement attempted once the given tick is reached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ScriptedTower {
    pub(crate) tick: u64,
    pub(crate) kind: TowerKind,
    pub(crate) position: Position,
}

/// Global event pinned to a wave right after the session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScriptedEvent {
    pub(crate) kind: GlobalEventKind,
    pub(crate) wave: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    version: u32,
    seed: Option<u64>,
    ticks: Option<u64>,
    tick_ms: Option<u64>,
    #[serde(default)]
    towers: Vec<TowerEntry>,
    #[serde(default)]
    events: Vec<EventEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TowerEntry {
    kind: String,
    x: f32,
    y: f32,
    #[serde(default)]
    tick: u64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventEntry {
    kind: GlobalEventKind,
    wave: u32,
}

/// Reads and validates the scenario stored at `path`.
pub(crate) fn load(path: &Path) -> Result<Scenario> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid scenario {}", path.display()))
}

/// Parses scenario TOML contents.
pub(crate) fn parse(contents: &str) -> Result<Scenario> {
    let file: ScenarioFile =
        toml::from_str(contents).context("failed to parse scenario toml contents")?;
    if file.version != SUPPORTED_SCENARIO_VERSION {
        bail!(
            "unsupported scenario version {}; expected {}",
            file.version,
            SUPPORTED_SCENARIO_VERSION
        );
    }
    if file.tick_ms == Some(0) {
        bail!("scenario tick_ms must be positive");
    }

    let mut towers = Vec::with_capacity(file.towers.len());
    for entry in file.towers {
        let kind = entry
            .kind
            .parse::<TowerKind>()
            .with_context(|| format!("scenario tower at ({}, {})", entry.x, entry.y))?;
        towers.push(ScriptedTower {
            tick: entry.tick,
            kind,
            position: Position::new(entry.x, entry.y),
        });
    }
    towers.sort_by_key(|tower| tower.tick);

    let events = file
        .events
        .into_iter()
        .map(|entry| ScriptedEvent {
            kind: entry.kind,
            wave: entry.wave,
        })
        .collect();

    Ok(Scenario {
        seed: file.seed,
        ticks: file.ticks,
        tick_ms: file.tick_ms,
        towers,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_scenario() {
        let scenario = parse(
            r#"
            version = 1
            seed = 42
            ticks = 600
            tick_ms = 25

            [[towers]]
            kind = "proxy"
            x = 200.0
            y = 150.0
            tick = 40

            [[towers]]
            kind = "Firewall"
            x = 320.0
            y = 200.0

            [[events]]
            kind = "flood"
            wave = 2
            "#,
        )
        .expect("scenario parses");

        assert_eq!(scenario.seed, Some(42));
        assert_eq!(scenario.tick_ms, Some(25));
        assert_eq!(
            scenario.towers.iter().map(|tower| tower.kind).collect::<Vec<_>>(),
            vec![TowerKind::Firewall, TowerKind::Proxy],
            "towers are ordered by tick",
        );
        assert_eq!(
            scenario.events,
            vec![ScriptedEvent {
                kind: GlobalEventKind::Flood,
                wave: 2,
            }]
        );
    }

    #[test]
    fn rejects_unsupported_version() {
        let error = parse("version = 2").expect_err("version 2 is unsupported");
        assert!(error.to_string().contains("unsupported scenario version 2"));
    }

    #[test]
    fn rejects_unknown_tower_kind() {
        let error = parse(
            r#"
            version = 1
            [[towers]]
            kind = "laser"
            x = 100.0
            y = 100.0
            "#,
        )
        .expect_err("unknown kind");
        assert!(format!("{error:#}").contains("unknown tower kind `laser`"));
    }

    #[test]
    fn rejects_zero_tick_length() {
        assert!(parse("version = 1\ntick_ms = 0").is_err());
    }
}

//! Static configuration tables consulted by every simulation system.
//!
//! Nothing in this module is mutated at runtime. Per-kind behaviour is keyed
//! by closed enums whose stat bundles are resolved through `const fn`
//! lookups, so adding a kind forces every table to be extended.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the playable board measured in world units.
pub const BOARD_WIDTH: f32 = 800.0;
/// Height of the playable board measured in world units.
pub const BOARD_HEIGHT: f32 = 400.0;
/// Margin kept free of towers along every board edge.
pub const EDGE_MARGIN: f32 = 25.0;
/// Minimum centre-to-centre distance between two towers.
pub const MIN_TOWER_SPACING: f32 = 45.0;

/// Horizontal coordinate at which wave enemies enter the board.
pub const SPAWN_OFFSET_X: f32 = -20.0;
/// Vertical margin excluded from spawn positions at the top and bottom.
pub const SPAWN_MARGIN_Y: f32 = 30.0;
/// Base number of enemies in every wave before the wave number is added.
pub const WAVE_ENEMY_COUNT_BASE: u32 = 5;
/// Delay between a wave being cleared (or the session starting) and the next spawn.
pub const WAVE_SPAWN_DELAY: Duration = Duration::from_millis(3_000);
/// Number of waves that share one escalation step.
pub const ESCALATION_STEP_WAVES: u32 = 5;
/// Additional health fraction granted per escalation step.
pub const ESCALATION_HEALTH_BONUS: f32 = 0.2;
/// Additional speed fraction granted per escalation step.
pub const ESCALATION_SPEED_BONUS: f32 = 0.1;

/// Earliest wave at which the boss may appear.
pub const BOSS_MIN_WAVE: u32 = 3;
/// Probability of drawing the boss when it is eligible.
pub const BOSS_CHANCE: f64 = 0.15;
/// Maximum number of bosses alive (or queued) at once.
pub const BOSS_CAP: usize = 1;
/// Special enemy draws in the order they are attempted: kind, minimum wave, probability.
pub const SPECIAL_SPAWN_TABLE: [(EnemyKind, u32, f64); 3] = [
    (EnemyKind::Shielded, 2, 0.10),
    (EnemyKind::Voltage, 3, 0.15),
    (EnemyKind::Replicator, 4, 0.25),
];

/// Radius within which enemies strike towers continuously.
pub const MELEE_RADIUS: f32 = 30.0;
/// Fraction of an enemy's tower damage applied per tick while in melee.
pub const MELEE_DAMAGE_FACTOR: f32 = 0.1;
/// Damage dealt to the player when an enemy leaves the board on the far side.
pub const ESCAPE_DAMAGE: f32 = 10.0;

/// Radius around a dying disruptor in which towers are disabled.
pub const DISABLE_RADIUS: f32 = 120.0;
/// Length of the disable window applied by a dying disruptor.
pub const DISABLE_DURATION: Duration = Duration::from_millis(3_000);

/// Number of copies produced by an original replicator on death.
pub const REPLICA_COUNT: usize = 2;
/// Fraction of the parent's max health inherited by each copy.
pub const REPLICA_HEALTH_FACTOR: f32 = 0.6;
/// Multiplier applied to the parent's speed for each copy.
pub const REPLICA_SPEED_FACTOR: f32 = 1.2;
/// Fraction of the parent's reward granted by each copy.
pub const REPLICA_REWARD_FACTOR: f32 = 0.4;
/// Maximum positional jitter applied to copies on either axis.
pub const REPLICA_JITTER: f32 = 20.0;

/// Player health at the start of a session and the regeneration ceiling.
pub const MAX_HEALTH: f32 = 100.0;
/// Health restored per regeneration interval while at least one tower stands.
pub const REGEN_AMOUNT: f32 = 0.5;
/// Cadence of health regeneration.
pub const REGEN_INTERVAL: Duration = Duration::from_millis(2_000);
/// Health restored when a wave is cleared.
pub const WAVE_CLEAR_HEAL: f32 = 20.0;

/// Coins available when a session starts.
pub const STARTING_COINS: u32 = 150;
/// Coins granted per passive income interval.
pub const PASSIVE_INCOME: u32 = 5;
/// Cadence of passive income.
pub const PASSIVE_INCOME_INTERVAL: Duration = Duration::from_millis(1_000);
/// Passive income only accrues while coins are at or below this balance.
pub const PASSIVE_INCOME_LIMIT: u32 = 1_000;
/// Cadence of interest payments.
pub const INTEREST_INTERVAL: Duration = Duration::from_millis(10_000);
/// Interest rate applied to the capped balance.
pub const INTEREST_RATE: f64 = 0.02;
/// Largest balance that earns interest.
pub const MAX_INTEREST_BASE: u32 = 1_000;
/// Flat coin bonus for clearing a wave.
pub const WAVE_BONUS: u32 = 50;
/// Scalar applied to an enemy's reward at the moment of its death.
pub const KILL_BONUS_MULTIPLIER: f32 = 1.0;
/// Score granted per point of enemy reward.
pub const SCORE_PER_REWARD: u64 = 2;

/// Number of waves a blocked global event is pushed back.
pub const EVENT_DEFERRAL_WAVES: u32 = 2;
/// Spawn count multiplier while the flood event is live.
pub const FLOOD_COUNT_MULTIPLIER: f32 = 2.0;
/// Spawn health multiplier while the flood event is live.
pub const FLOOD_HEALTH_MULTIPLIER: f32 = 0.6;

/// Lifetime of transient visual effects kept in the session snapshot.
pub const EFFECT_LIFETIME: Duration = Duration::from_millis(400);

/// Types of towers that can be placed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Sturdy wall that soaks enemy attacks.
    Firewall,
    /// Fast-firing single-target tower.
    Antivirus,
    /// Cheap tower with a wide range.
    Proxy,
    /// Area tower that slows every enemy inside its range.
    Slowdown,
    /// Tower that strikes several enemies per shot.
    Chain,
}

/// Immutable stat bundle describing a tower kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Coins required to place the tower.
    pub cost: u32,
    /// Damage applied to each target per shot.
    pub damage: f32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Minimum time between two shots.
    pub cooldown: Duration,
    /// Health of a freshly placed tower.
    pub health: f32,
    /// Number of enemies struck per shot, present only for multi-target towers.
    pub chain_target_count: Option<u32>,
    /// Speed multiplier applied to enemies in range, present only for slowing towers.
    pub slow_factor: Option<f32>,
}

impl TowerKind {
    /// Every tower kind in menu order.
    pub const ALL: [TowerKind; 5] = [
        TowerKind::Firewall,
        TowerKind::Antivirus,
        TowerKind::Proxy,
        TowerKind::Slowdown,
        TowerKind::Chain,
    ];

    /// Returns the stat bundle for the tower kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::Firewall => TowerStats {
                cost: 50,
                damage: 10.0,
                range: 100.0,
                cooldown: Duration::from_millis(1_000),
                health: 300.0,
                chain_target_count: None,
                slow_factor: None,
            },
            Self::Antivirus => TowerStats {
                cost: 75,
                damage: 15.0,
                range: 120.0,
                cooldown: Duration::from_millis(400),
                health: 100.0,
                chain_target_count: None,
                slow_factor: None,
            },
            Self::Proxy => TowerStats {
                cost: 40,
                damage: 8.0,
                range: 160.0,
                cooldown: Duration::from_millis(800),
                health: 80.0,
                chain_target_count: None,
                slow_factor: None,
            },
            Self::Slowdown => TowerStats {
                cost: 60,
                damage: 5.0,
                range: 110.0,
                cooldown: Duration::from_millis(1_000),
                health: 100.0,
                chain_target_count: None,
                slow_factor: Some(0.4),
            },
            Self::Chain => TowerStats {
                cost: 100,
                damage: 12.0,
                range: 130.0,
                cooldown: Duration::from_millis(900),
                health: 120.0,
                chain_target_count: Some(3),
                slow_factor: None,
            },
        }
    }

    /// Canonical lowercase name used by configuration files and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Firewall => "firewall",
            Self::Antivirus => "antivirus",
            Self::Proxy => "proxy",
            Self::Slowdown => "slowdown",
            Self::Chain => "chain",
        }
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TowerKind {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or(ParseKindError::UnknownTower(normalized))
    }
}

/// Types of enemies that can appear on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Fast melee attacker.
    Worm,
    /// Slow, durable ranged attacker.
    Trojan,
    /// Weak enemy that arrives in numbers.
    Swarm,
    /// Boss enemy; at most one is alive at a time.
    Spider,
    /// Enemy whose shield absorbs whole hits.
    Shielded,
    /// Disruptor that disables nearby towers when it dies.
    Voltage,
    /// Enemy that splits into copies when an original dies.
    Replicator,
}

/// Immutable stat bundle describing an enemy kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Base health before wave scaling.
    pub health: f32,
    /// Base movement per tick before wave scaling.
    pub speed: f32,
    /// Coins granted on death before the kill bonus multiplier.
    pub reward: u32,
    /// Damage dealt to towers by a ranged attack; melee deals a fraction per tick.
    pub tower_damage: f32,
    /// Reach of the ranged attack; zero or below the melee radius disables it.
    pub attack_range: f32,
    /// Minimum time between two ranged attacks.
    pub attack_cooldown: Duration,
    /// Number of hits absorbed before health is touched.
    pub shield: u32,
}

impl EnemyKind {
    /// Every enemy kind.
    pub const ALL: [EnemyKind; 7] = [
        EnemyKind::Worm,
        EnemyKind::Trojan,
        EnemyKind::Swarm,
        EnemyKind::Spider,
        EnemyKind::Shielded,
        EnemyKind::Voltage,
        EnemyKind::Replicator,
    ];

    /// Kinds drawn uniformly when no boss or special kind was selected.
    pub const ORDINARY: [EnemyKind; 3] = [EnemyKind::Worm, EnemyKind::Trojan, EnemyKind::Swarm];

    /// Returns the stat bundle for the enemy kind.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Worm => EnemyStats {
                health: 30.0,
                speed: 1.5,
                reward: 10,
                tower_damage: 5.0,
                attack_range: 0.0,
                attack_cooldown: Duration::from_millis(1_000),
                shield: 0,
            },
            Self::Trojan => EnemyStats {
                health: 80.0,
                speed: 0.6,
                reward: 20,
                tower_damage: 15.0,
                attack_range: 120.0,
                attack_cooldown: Duration::from_millis(2_000),
                shield: 0,
            },
            Self::Swarm => EnemyStats {
                health: 15.0,
                speed: 1.2,
                reward: 5,
                tower_damage: 2.0,
                attack_range: 0.0,
                attack_cooldown: Duration::from_millis(1_000),
                shield: 0,
            },
            Self::Spider => EnemyStats {
                health: 400.0,
                speed: 0.4,
                reward: 100,
                tower_damage: 30.0,
                attack_range: 150.0,
                attack_cooldown: Duration::from_millis(1_500),
                shield: 0,
            },
            Self::Shielded => EnemyStats {
                health: 60.0,
                speed: 0.8,
                reward: 25,
                tower_damage: 5.0,
                attack_range: 0.0,
                attack_cooldown: Duration::from_millis(1_000),
                shield: 3,
            },
            Self::Voltage => EnemyStats {
                health: 50.0,
                speed: 1.0,
                reward: 30,
                tower_damage: 8.0,
                attack_range: 80.0,
                attack_cooldown: Duration::from_millis(2_500),
                shield: 0,
            },
            Self::Replicator => EnemyStats {
                health: 40.0,
                speed: 0.9,
                reward: 15,
                tower_damage: 4.0,
                attack_range: 0.0,
                attack_cooldown: Duration::from_millis(1_000),
                shield: 0,
            },
        }
    }

    /// Canonical lowercase name used by logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Worm => "worm",
            Self::Trojan => "trojan",
            Self::Swarm => "swarm",
            Self::Spider => "spider",
            Self::Shielded => "shielded",
            Self::Voltage => "voltage",
            Self::Replicator => "replicator",
        }
    }

    /// Reports whether the kind is the capped boss.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Spider)
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnemyKind {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or(ParseKindError::UnknownEnemy(normalized))
    }
}

/// Timed world-scope modifiers and one-shot effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalEventKind {
    /// Clears every tower on the board when it activates.
    DiskWipe,
    /// Doubles wave size while weakening each spawned enemy.
    Flood,
}

/// Scheduling and conflict parameters for a global event kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalEventDefinition {
    /// Kind described by the definition.
    pub kind: GlobalEventKind,
    /// How long the event stays active once started.
    pub duration: Duration,
    /// Fewest waves between two occurrences.
    pub min_wave_interval: u32,
    /// Most waves between two occurrences.
    pub max_wave_interval: u32,
    /// Activation precedence; higher values activate first.
    pub priority: u32,
    /// Other kinds allowed to be active at the same time.
    pub coexists_with: &'static [GlobalEventKind],
}

impl GlobalEventDefinition {
    /// Reports whether this definition allows `other` to run alongside it.
    #[must_use]
    pub fn allows(&self, other: GlobalEventKind) -> bool {
        self.coexists_with.contains(&other)
    }
}

/// Global event definitions ordered by descending priority.
pub const GLOBAL_EVENTS: [GlobalEventDefinition; 2] = [
    GlobalEventDefinition {
        kind: GlobalEventKind::DiskWipe,
        duration: Duration::from_millis(5_000),
        min_wave_interval: 8,
        max_wave_interval: 12,
        priority: 100,
        coexists_with: &[],
    },
    GlobalEventDefinition {
        kind: GlobalEventKind::Flood,
        duration: Duration::from_millis(30_000),
        min_wave_interval: 2,
        max_wave_interval: 5,
        priority: 50,
        coexists_with: &[],
    },
];

impl GlobalEventKind {
    /// Every global event kind in priority order.
    pub const ALL: [GlobalEventKind; 2] = [GlobalEventKind::DiskWipe, GlobalEventKind::Flood];

    /// Returns the definition associated with the kind.
    #[must_use]
    pub const fn definition(self) -> GlobalEventDefinition {
        match self {
            Self::DiskWipe => GLOBAL_EVENTS[0],
            Self::Flood => GLOBAL_EVENTS[1],
        }
    }

    /// Canonical lowercase name used by logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DiskWipe => "disk_wipe",
            Self::Flood => "flood",
        }
    }
}

impl fmt::Display for GlobalEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors produced when parsing kind names from configuration text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseKindError {
    /// The provided name does not match any tower kind.
    #[error("unknown tower kind `{0}`")]
    UnknownTower(String),
    /// The provided name does not match any enemy kind.
    #[error("unknown enemy kind `{0}`")]
    UnknownEnemy(String),
}

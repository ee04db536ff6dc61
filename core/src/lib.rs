#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Firewall Defence engine.
//!
//! This crate defines the message surface that connects hosts, the
//! authoritative world, and pure systems. Hosts submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. Rendering collaborators only ever observe a [`SessionSnapshot`].

pub mod config;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use config::{
    EnemyKind, EnemyStats, GlobalEventDefinition, GlobalEventKind, ParseKindError, TowerKind,
    TowerStats,
};

/// Point in simulated time measured in whole milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Origin of simulated time.
    pub const ZERO: Timestamp = Timestamp(0);

    /// Creates a timestamp from a millisecond count.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Millisecond count represented by the timestamp.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Returns the timestamp shifted forward by `duration`, saturating at the maximum.
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }

    /// Time elapsed since `earlier`, or zero when `earlier` lies in the future.
    #[must_use]
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    /// Reports whether at least `interval` elapsed since `last`.
    ///
    /// A missing `last` timestamp is always due.
    #[must_use]
    pub fn is_due(self, last: Option<Timestamp>, interval: Duration) -> bool {
        last.map_or(true, |last| self.saturating_duration_since(last) >= interval)
    }
}

/// Source of the current simulated time supplied by the host.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Clock that only moves when told to, used by headless hosts and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Timestamp,
}

impl ManualClock {
    /// Creates a clock frozen at the provided time.
    #[must_use]
    pub const fn starting_at(now: Timestamp) -> Self {
        Self { now }
    }

    /// Moves the clock forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}

/// Location on the board expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate; enemies travel toward increasing values.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the enemy identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Monotonic allocator for enemy identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyIdAllocator {
    next: u32,
}

impl EnemyIdAllocator {
    /// Creates an allocator whose first identifier is zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Hands out the next unused identifier.
    pub fn allocate(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// A placed tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    /// Identifier allocated by the world.
    pub id: TowerId,
    /// Kind of tower that was placed.
    pub kind: TowerKind,
    /// Centre of the tower.
    pub position: Position,
    /// Remaining health; the tower is destroyed at or below zero.
    pub health: f32,
    /// Health the tower was placed with.
    pub max_health: f32,
    /// Damage applied to each target per shot.
    pub damage: f32,
    /// Targeting radius.
    pub range: f32,
    /// Minimum time between shots.
    pub cooldown: Duration,
    /// Time of the most recent shot.
    pub last_shot_at: Option<Timestamp>,
    /// The tower skips firing while the current time is before this instant.
    pub disabled_until: Option<Timestamp>,
    /// Targets per shot for multi-target towers.
    pub chain_target_count: Option<u32>,
    /// Speed multiplier applied to enemies in range by slowing towers.
    pub slow_factor: Option<f32>,
}

impl Tower {
    /// Creates a tower of `kind` with its configured stats.
    #[must_use]
    pub fn new(id: TowerId, kind: TowerKind, position: Position) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            position,
            health: stats.health,
            max_health: stats.health,
            damage: stats.damage,
            range: stats.range,
            cooldown: stats.cooldown,
            last_shot_at: None,
            disabled_until: None,
            chain_target_count: stats.chain_target_count,
            slow_factor: stats.slow_factor,
        }
    }

    /// Reports whether the tower still stands.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Reports whether a disruptor has disabled the tower at `now`.
    #[must_use]
    pub fn is_disabled(&self, now: Timestamp) -> bool {
        self.disabled_until.is_some_and(|until| now < until)
    }

    /// Reports whether the tower's cooldown has elapsed at `now`.
    #[must_use]
    pub fn is_ready(&self, now: Timestamp) -> bool {
        now.is_due(self.last_shot_at, self.cooldown)
    }

    /// Number of enemies the tower strikes per shot.
    #[must_use]
    pub fn targets_per_shot(&self) -> usize {
        self.chain_target_count
            .map_or(1, |count| usize::try_from(count).unwrap_or(usize::MAX))
    }

    /// Reports whether `position` lies inside the tower's range.
    #[must_use]
    pub fn covers(&self, position: Position) -> bool {
        self.position.distance_to(position) <= self.range
    }
}

/// An enemy advancing across the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Identifier allocated at spawn time.
    pub id: EnemyId,
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Current location.
    pub position: Position,
    /// Remaining health; the enemy dies at or below zero.
    pub health: f32,
    /// Health the enemy spawned with.
    pub max_health: f32,
    /// Effective movement per tick.
    pub speed: f32,
    /// Movement per tick when unaffected by slows.
    pub base_speed: f32,
    /// Coins granted on death before the kill bonus multiplier.
    pub reward: u32,
    /// Hits still absorbed by the shield.
    pub shield: u32,
    /// Shield charges the enemy spawned with.
    pub max_shield: u32,
    /// Current slow multiplier; 1 means unaffected.
    pub slow_multiplier: f32,
    /// Time of the most recent ranged attack.
    pub last_attack_at: Option<Timestamp>,
    /// Set only on wave-spawned replicators; copies never replicate.
    pub is_original: bool,
}

impl Enemy {
    /// Creates an enemy of `kind` with scaled health and speed.
    ///
    /// Reward and shield come from the kind's stat bundle; `is_original`
    /// starts unset.
    #[must_use]
    pub fn new(id: EnemyId, kind: EnemyKind, position: Position, health: f32, speed: f32) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            position,
            health,
            max_health: health,
            speed,
            base_speed: speed,
            reward: stats.reward,
            shield: stats.shield,
            max_shield: stats.shield,
            slow_multiplier: 1.0,
            last_attack_at: None,
            is_original: false,
        }
    }

    /// Reports whether the enemy is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Reports whether the enemy kind carries a shield at all.
    #[must_use]
    pub fn has_shield(&self) -> bool {
        self.max_shield > 0
    }

    /// Remaining shield as a fraction of the initial charge.
    #[must_use]
    pub fn shield_fraction(&self) -> f32 {
        if !self.has_shield() {
            return 0.0;
        }
        self.shield as f32 / self.max_shield as f32
    }

    /// Reports whether a slowing tower currently affects the enemy.
    #[must_use]
    pub fn is_slowed(&self) -> bool {
        self.slow_multiplier < 1.0
    }
}

/// Multipliers contributed by live global events to wave spawning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventMultipliers {
    /// Scales the number of enemies in a wave.
    pub count: f32,
    /// Scales the health of spawned enemies.
    pub health: f32,
    /// Scales the speed of spawned enemies. No current event sets it.
    pub speed: f32,
}

impl EventMultipliers {
    /// Multipliers that leave spawning untouched.
    pub const NEUTRAL: EventMultipliers = EventMultipliers {
        count: 1.0,
        health: 1.0,
        speed: 1.0,
    };
}

impl Default for EventMultipliers {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// A global event currently shaping the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveGlobalEvent {
    /// Kind of event.
    pub kind: GlobalEventKind,
    /// Time the event activated.
    pub started_at: Timestamp,
    /// Wave during which the event activated.
    pub start_wave: u32,
    /// How long the event lasts.
    pub duration: Duration,
}

impl ActiveGlobalEvent {
    /// Reports whether the event still applies at `now`.
    #[must_use]
    pub fn is_live(&self, now: Timestamp) -> bool {
        now < self.started_at.saturating_add(self.duration)
    }

    /// Reports whether the event has run its full duration at `now`.
    #[must_use]
    pub fn has_expired(&self, now: Timestamp) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }
}

/// A global event waiting for its target wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledGlobalEvent {
    /// Kind of event.
    pub kind: GlobalEventKind,
    /// Wave at which activation will be attempted.
    pub wave: u32,
}

/// Lifecycle of a game session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    /// Waiting for the host to start the session.
    #[default]
    NotStarted,
    /// Simulation advances on every `Advance` command.
    Running,
    /// The player ran out of health; terminal until reset.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a fresh session, scheduling the first wave.
    Start,
    /// Discards the session and returns to the not-started state.
    Reset,
    /// Requests placement of a tower centred at `position`.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Requested tower centre.
        position: Position,
    },
    /// Pins the pending schedule entry of a global event kind to `wave`.
    ScheduleGlobalEvent {
        /// Kind of event to schedule.
        kind: GlobalEventKind,
        /// Wave at which activation is attempted.
        wave: u32,
    },
    /// Runs one simulation step at the provided time.
    Advance {
        /// Current time supplied by the host clock.
        now: Timestamp,
    },
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The session is not running.
    InvalidMode,
    /// The player cannot afford the tower.
    InsufficientFunds,
    /// The position lies inside the board's edge margin.
    OutOfBounds,
    /// The position lies too close to an existing tower.
    TooClose,
}

/// Transient effect kinds surfaced to rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// An enemy landed a ranged attack on a tower.
    RangedHit,
    /// A shield absorbed a tower hit.
    ShieldBlock,
    /// A dying disruptor disabled nearby towers.
    Disable,
}

/// A short-lived visual effect; not part of gameplay invariants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualEffect {
    /// Kind of effect.
    pub kind: EffectKind,
    /// Where the effect occurred.
    pub position: Position,
    /// When the effect was emitted.
    pub created_at: Timestamp,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The session transitioned into the running state.
    SessionStarted,
    /// The session was discarded.
    SessionReset,
    /// A tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower placed.
        kind: TowerKind,
        /// Centre of the tower.
        position: Position,
        /// Coins spent on the tower.
        cost: u32,
    },
    /// A tower placement request was rejected; no state changed.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Requested centre.
        position: Position,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// A tower's health dropped to zero and it was removed.
    TowerDestroyed {
        /// Identifier of the destroyed tower.
        tower: TowerId,
        /// Kind of the destroyed tower.
        kind: TowerKind,
    },
    /// A wave of enemies entered the board.
    WaveSpawned {
        /// Wave number.
        wave: u32,
        /// Number of enemies spawned.
        enemies: usize,
    },
    /// An enemy reached the far edge and hurt the player.
    EnemyEscaped {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
        /// Damage dealt to the player.
        damage: f32,
    },
    /// An enemy landed a ranged attack on a tower.
    TowerStruck {
        /// Tower that was hit.
        tower: TowerId,
        /// Enemy that attacked.
        enemy: EnemyId,
        /// Damage applied.
        damage: f32,
    },
    /// An enemy's shield absorbed a tower hit.
    ShieldBlocked {
        /// Enemy whose shield absorbed the hit.
        enemy: EnemyId,
        /// Tower that fired.
        tower: TowerId,
        /// Shield charges left after the block.
        remaining: u32,
    },
    /// A tower killed an enemy.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Kind of the enemy that died.
        kind: EnemyKind,
        /// Tower that landed the killing blow.
        tower: TowerId,
        /// Coins granted for the kill.
        reward: u32,
    },
    /// An original replicator split into copies.
    EnemyReplicated {
        /// The replicator that died.
        parent: EnemyId,
        /// Identifiers of the copies.
        copies: Vec<EnemyId>,
    },
    /// A dying disruptor disabled towers.
    TowersDisabled {
        /// Towers that were disabled.
        towers: Vec<TowerId>,
        /// Time at which the towers resume firing.
        until: Timestamp,
    },
    /// A global event activated.
    GlobalEventActivated {
        /// Kind of event.
        kind: GlobalEventKind,
        /// Wave at which it activated.
        wave: u32,
    },
    /// A global event was blocked by an active event and pushed back.
    GlobalEventDeferred {
        /// Kind of event.
        kind: GlobalEventKind,
        /// Wave at which activation will be retried.
        wave: u32,
    },
    /// An active global event was displaced by a higher-priority one.
    GlobalEventPruned {
        /// Kind of the displaced event.
        kind: GlobalEventKind,
    },
    /// A global event ran its full duration.
    GlobalEventExpired {
        /// Kind of event.
        kind: GlobalEventKind,
    },
    /// The disk-wipe event removed every tower.
    TowersWiped {
        /// Number of towers removed.
        count: usize,
    },
    /// Every enemy of a wave was removed and the next wave was scheduled.
    WaveCleared {
        /// Wave that was cleared.
        wave: u32,
        /// Coins granted for clearing it.
        bonus: u32,
    },
    /// The player ran out of health.
    GameOver {
        /// Wave reached.
        wave: u32,
        /// Final score.
        score: u64,
    },
}

/// Cumulative economy figures for the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyLedger {
    /// Coins currently available.
    pub coins: u32,
    /// Every coin ever credited.
    pub cumulative_earned: u64,
    /// Every coin ever spent.
    pub cumulative_spent: u64,
    /// Coins credited by interest alone.
    pub cumulative_interest: u64,
}

/// Bookkeeping counters for the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Enemies killed by towers.
    pub kills: u32,
    /// Towers placed.
    pub towers_built: u32,
    /// Health lost to escaping enemies.
    pub health_lost: f32,
}

/// Read-only snapshot of the entire session handed to rendering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Lifecycle state.
    pub run_state: RunState,
    /// Current wave number; zero before the session starts.
    pub wave: u32,
    /// Player health.
    pub health: f32,
    /// Player health ceiling.
    pub max_health: f32,
    /// Coins available.
    pub coins: u32,
    /// Score.
    pub score: u64,
    /// Towers in placement order.
    pub towers: Vec<Tower>,
    /// Enemies in collection order.
    pub enemies: Vec<Enemy>,
    /// Global events currently active.
    pub active_events: Vec<ActiveGlobalEvent>,
    /// Global events waiting for their wave, ascending by wave.
    pub scheduled_events: Vec<ScheduledGlobalEvent>,
    /// Economy ledger.
    pub economy: EconomyLedger,
    /// Bookkeeping counters.
    pub stats: SessionStats,
    /// Recent visual effects.
    pub effects: Vec<VisualEffect>,
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Firewall Defence.
//!
//! Hosts mutate the world exclusively through [`apply`] and read it through
//! the [`query`] module. All randomness comes from a ChaCha stream seeded at
//! construction, so two worlds built from the same seed and fed the same
//! commands stay identical.

mod tick;

use firewall_defence_core::{
    config::{MAX_HEALTH, WAVE_SPAWN_DELAY},
    Command, Enemy, EnemyIdAllocator, Event, PlacementError, Position, RunState, SessionStats,
    Timestamp, Tower, TowerId, TowerKind, VisualEffect,
};
use firewall_defence_system_economy::Economy;
use firewall_defence_system_enemy_attacks::EnemyAttacks;
use firewall_defence_system_global_events::GlobalEventScheduler;
use firewall_defence_system_movement::Movement;
use firewall_defence_system_placement as placement;
use firewall_defence_system_spawning::WaveSpawner;
use firewall_defence_system_tower_combat::TowerCombat;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed used by [`World::new`].
pub const DEFAULT_SEED: u64 = 0x5eed_f1a3_0d3f_e4c3;

/// When the next wave enters the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpawnTimer {
    /// No wave is pending.
    Idle,
    /// A wave is pending and its delay starts on the next advance.
    Anchoring,
    /// A wave enters once the time reaches the stored instant.
    Due(Timestamp),
}

/// Pure systems driven by the tick pipeline.
#[derive(Debug, Default)]
struct Systems {
    spawner: WaveSpawner,
    movement: Movement,
    enemy_attacks: EnemyAttacks,
    tower_combat: TowerCombat,
}

/// Represents the authoritative Firewall Defence session state.
#[derive(Debug)]
pub struct World {
    seed: u64,
    rng: ChaCha8Rng,
    run_state: RunState,
    wave: u32,
    health: f32,
    score: u64,
    towers: Vec<Tower>,
    next_tower_id: u32,
    enemies: Vec<Enemy>,
    enemy_ids: EnemyIdAllocator,
    economy: Economy,
    global_events: GlobalEventScheduler,
    stats: SessionStats,
    effects: Vec<VisualEffect>,
    spawn: SpawnTimer,
    anchored: bool,
    last_regen_at: Option<Timestamp>,
    systems: Systems,
}

impl World {
    /// Creates a not-started session seeded with [`DEFAULT_SEED`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a not-started session whose randomness derives from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            run_state: RunState::NotStarted,
            wave: 0,
            health: MAX_HEALTH,
            score: 0,
            towers: Vec::new(),
            next_tower_id: 0,
            enemies: Vec::new(),
            enemy_ids: EnemyIdAllocator::new(),
            economy: Economy::new(),
            global_events: GlobalEventScheduler::new(),
            stats: SessionStats::default(),
            effects: Vec::new(),
            spawn: SpawnTimer::Idle,
            anchored: false,
            last_regen_at: None,
            systems: Systems::default(),
        }
    }

    /// Discards session progress while keeping the random stream running.
    fn reset(&mut self) {
        let seed = self.seed;
        let rng = self.rng.clone();
        *self = Self::with_seed(seed);
        self.rng = rng;
    }

    fn start(&mut self, out_events: &mut Vec<Event>) {
        if self.run_state != RunState::NotStarted {
            log::debug!("start ignored in {:?}", self.run_state);
            return;
        }

        self.run_state = RunState::Running;
        self.wave = 1;
        self.spawn = SpawnTimer::Anchoring;
        log::info!("session started with seed {:#x}", self.seed);
        out_events.push(Event::SessionStarted);
    }

    fn place_tower(&mut self, kind: TowerKind, position: Position) -> Result<Tower, PlacementError> {
        if self.run_state != RunState::Running {
            return Err(PlacementError::InvalidMode);
        }

        placement::validate(position, kind, &self.towers, self.economy.coins())?;
        if !self.economy.try_spend(kind.stats().cost) {
            return Err(PlacementError::InsufficientFunds);
        }

        let tower = Tower::new(TowerId::new(self.next_tower_id), kind, position);
        self.next_tower_id = self.next_tower_id.wrapping_add(1);
        self.stats.towers_built += 1;
        self.towers.push(tower.clone());
        Ok(tower)
    }

    /// Removes every tower, returning how many were standing.
    fn wipe_towers(&mut self) -> usize {
        let count = self.towers.len();
        self.towers.clear();
        count
    }

    /// Reports whether an event pinned to `wave` can still be activated.
    ///
    /// The current wave qualifies only until the first advance, because
    /// activation runs once when a wave begins.
    fn accepts_event_for(&self, wave: u32) -> bool {
        wave > self.wave || (wave == self.wave && !self.anchored)
    }

    fn schedule_next_wave(&mut self, now: Timestamp) {
        self.spawn = SpawnTimer::Due(now.saturating_add(WAVE_SPAWN_DELAY));
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands never fail: a command that is invalid in the current state is a
/// no-op, except tower placement which reports its rejection as an event.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => world.start(out_events),
        Command::Reset => {
            world.reset();
            log::info!("session reset");
            out_events.push(Event::SessionReset);
        }
        Command::PlaceTower { kind, position } => match world.place_tower(kind, position) {
            Ok(tower) => {
                log::debug!("placed {kind} at ({}, {})", position.x, position.y);
                out_events.push(Event::TowerPlaced {
                    tower: tower.id,
                    kind,
                    position,
                    cost: kind.stats().cost,
                });
            }
            Err(reason) => {
                log::debug!("rejected {kind} at ({}, {}): {reason:?}", position.x, position.y);
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    position,
                    reason,
                });
            }
        },
        Command::ScheduleGlobalEvent { kind, wave } => {
            if world.run_state != RunState::Running || !world.accepts_event_for(wave) {
                log::warn!("cannot schedule {kind} for wave {wave}");
                return;
            }
            world.global_events.pin(kind, wave);
        }
        Command::Advance { now } => {
            if world.run_state == RunState::Running {
                tick::advance(world, now, out_events);
            }
        }
    }
}

/// Requests a tower placement and reports whether it was accepted.
pub fn place_tower(
    world: &mut World,
    kind: TowerKind,
    position: Position,
    out_events: &mut Vec<Event>,
) -> bool {
    let first = out_events.len();
    apply(world, Command::PlaceTower { kind, position }, out_events);
    out_events[first..]
        .iter()
        .any(|event| matches!(event, Event::TowerPlaced { .. }))
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use firewall_defence_core::{
        ActiveGlobalEvent, EconomyLedger, Enemy, RunState, SessionSnapshot, Tower,
    };

    use super::World;

    /// Seed the session's random stream was created from.
    #[must_use]
    pub fn seed(world: &World) -> u64 {
        world.seed
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn run_state(world: &World) -> RunState {
        world.run_state
    }

    /// Current wave number; zero before the session starts.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Player health.
    #[must_use]
    pub fn health(world: &World) -> f32 {
        world.health
    }

    /// Coins available for placement.
    #[must_use]
    pub fn coins(world: &World) -> u32 {
        world.economy.coins()
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Towers in placement order.
    #[must_use]
    pub fn towers(world: &World) -> &[Tower] {
        &world.towers
    }

    /// Enemies in collection order.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// Global events currently active.
    #[must_use]
    pub fn active_global_events(world: &World) -> &[ActiveGlobalEvent] {
        world.global_events.active()
    }

    /// Cumulative economy figures.
    #[must_use]
    pub fn economy(world: &World) -> EconomyLedger {
        world.economy.ledger()
    }

    /// Captures an owned snapshot of everything rendering needs.
    #[must_use]
    pub fn snapshot(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            run_state: world.run_state,
            wave: world.wave,
            health: world.health,
            max_health: super::MAX_HEALTH,
            coins: world.economy.coins(),
            score: world.score,
            towers: world.towers.clone(),
            enemies: world.enemies.clone(),
            active_events: world.global_events.active().to_vec(),
            scheduled_events: world.global_events.scheduled().to_vec(),
            economy: world.economy.ledger(),
            stats: world.stats,
            effects: world.effects.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_world_waits_for_start() {
        let world = World::with_seed(3);
        assert_eq!(query::run_state(&world), RunState::NotStarted);
        assert_eq!(query::wave(&world), 0);
        assert_eq!(query::health(&world), MAX_HEALTH);
        assert_eq!(world.spawn, SpawnTimer::Idle);
    }

    #[test]
    fn start_only_applies_once() {
        let mut world = World::with_seed(3);
        let mut events = Vec::new();
        apply(&mut world, Command::Start, &mut events);
        apply(&mut world, Command::Start, &mut events);

        assert_eq!(events, vec![Event::SessionStarted]);
        assert_eq!(world.spawn, SpawnTimer::Anchoring);
    }

    #[test]
    fn disk_wipe_on_wave_clear_prunes_flood_and_clears_towers() {
        use firewall_defence_core::{EnemyId, EnemyKind, GlobalEventKind};

        let mut world = World::with_seed(21);
        let mut events = Vec::new();
        apply(&mut world, Command::Start, &mut events);
        apply(
            &mut world,
            Command::ScheduleGlobalEvent {
                kind: GlobalEventKind::Flood,
                wave: 1,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Advance {
                now: Timestamp::ZERO,
            },
            &mut events,
        );
        assert!(events.contains(&Event::GlobalEventActivated {
            kind: GlobalEventKind::Flood,
            wave: 1,
        }));

        assert!(place_tower(
            &mut world,
            TowerKind::Proxy,
            Position::new(200.0, 200.0),
            &mut events
        ));
        assert!(place_tower(
            &mut world,
            TowerKind::Firewall,
            Position::new(400.0, 120.0),
            &mut events
        ));
        apply(
            &mut world,
            Command::ScheduleGlobalEvent {
                kind: GlobalEventKind::DiskWipe,
                wave: 2,
            },
            &mut events,
        );

        world.enemies.push(Enemy::new(
            EnemyId::new(500),
            EnemyKind::Worm,
            Position::new(799.0, 380.0),
            30.0,
            1.5,
        ));
        events.clear();
        apply(
            &mut world,
            Command::Advance {
                now: Timestamp::from_millis(50),
            },
            &mut events,
        );

        assert_eq!(query::wave(&world), 2);
        assert!(events.contains(&Event::GlobalEventPruned {
            kind: GlobalEventKind::Flood
        }));
        assert!(events.contains(&Event::GlobalEventActivated {
            kind: GlobalEventKind::DiskWipe,
            wave: 2,
        }));
        assert!(events.contains(&Event::TowersWiped { count: 2 }));
        assert!(query::towers(&world).is_empty());
        let active: Vec<GlobalEventKind> = query::active_global_events(&world)
            .iter()
            .map(|event| event.kind)
            .collect();
        assert_eq!(active, vec![GlobalEventKind::DiskWipe]);
    }

    #[test]
    fn reset_keeps_the_random_stream_position() {
        let mut world = World::with_seed(9);
        let fresh = World::with_seed(9).rng;
        let _ = rand::RngCore::next_u32(&mut world.rng);
        let mut events = Vec::new();
        apply(&mut world, Command::Reset, &mut events);

        assert_ne!(world.rng, fresh);
        assert_eq!(world.seed, 9);
    }
}

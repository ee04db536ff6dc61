#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower fire resolution and enemy death effects.
//!
//! Towers fire in placement order. Damage lands immediately, so a later tower
//! never targets an enemy an earlier tower already killed this tick. Dead
//! enemies stay in the collection until the pass ends; replicated copies are
//! appended after they are pruned.

use firewall_defence_core::{
    config::{
        DISABLE_DURATION, DISABLE_RADIUS, KILL_BONUS_MULTIPLIER, REPLICA_COUNT,
        REPLICA_HEALTH_FACTOR, REPLICA_JITTER, REPLICA_REWARD_FACTOR, REPLICA_SPEED_FACTOR,
        SCORE_PER_REWARD,
    },
    EffectKind, Enemy, EnemyIdAllocator, EnemyKind, Event, Position, Timestamp, Tower,
    VisualEffect,
};
use firewall_defence_system_tower_targeting::TowerTargeting;
use rand::Rng;

/// Rewards produced by one combat pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombatOutcome {
    /// Enemies killed.
    pub kills: u32,
    /// Coins owed for those kills.
    pub coins: u32,
    /// Score owed for those kills.
    pub score: u64,
}

/// Mutable state touched by a combat pass.
#[derive(Debug)]
pub struct Battlefield<'a> {
    /// Towers in placement order.
    pub towers: &'a mut [Tower],
    /// Enemies in collection order.
    pub enemies: &'a mut Vec<Enemy>,
    /// Allocator for replicated copies.
    pub ids: &'a mut EnemyIdAllocator,
    /// Effect buffer consumed by rendering.
    pub effects: &'a mut Vec<VisualEffect>,
}

/// Tower combat system resolving every ready tower's shot.
#[derive(Debug, Default)]
pub struct TowerCombat {
    targeting: TowerTargeting,
    targets: Vec<usize>,
    spawned: Vec<Enemy>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets every ready tower fire once at `now`.
    ///
    /// Disabled towers and towers still cooling down are skipped. A tower
    /// with nothing in range keeps its cooldown untouched.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        field: Battlefield<'_>,
        now: Timestamp,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) -> CombatOutcome {
        let Battlefield {
            towers,
            enemies,
            ids,
            effects,
        } = field;
        let mut outcome = CombatOutcome::default();
        self.spawned.clear();

        for index in 0..towers.len() {
            let shooter = &towers[index];
            if !shooter.is_alive() || shooter.is_disabled(now) || !shooter.is_ready(now) {
                continue;
            }

            self.targets.clear();
            self.targets
                .extend_from_slice(self.targeting.select(shooter, enemies));
            if self.targets.is_empty() {
                continue;
            }

            let tower_id = shooter.id;
            let damage = shooter.damage;
            towers[index].last_shot_at = Some(now);

            for &target in &self.targets {
                let enemy = &mut enemies[target];

                if enemy.shield > 0 {
                    enemy.shield -= 1;
                    effects.push(VisualEffect {
                        kind: EffectKind::ShieldBlock,
                        position: enemy.position,
                        created_at: now,
                    });
                    out.push(Event::ShieldBlocked {
                        enemy: enemy.id,
                        tower: tower_id,
                        remaining: enemy.shield,
                    });
                    continue;
                }

                enemy.health -= damage;
                if enemy.is_alive() {
                    continue;
                }

                let reward = kill_reward(enemy.reward);
                outcome.kills += 1;
                outcome.coins = outcome.coins.saturating_add(reward);
                outcome.score += u64::from(enemy.reward) * SCORE_PER_REWARD;
                out.push(Event::EnemyKilled {
                    enemy: enemy.id,
                    kind: enemy.kind,
                    tower: tower_id,
                    reward,
                });

                let dead = enemy.clone();
                match dead.kind {
                    EnemyKind::Replicator if dead.is_original => {
                        replicate(&dead, ids, rng, &mut self.spawned, out);
                    }
                    EnemyKind::Voltage => {
                        disable_towers(towers, dead.position, now, effects, out);
                    }
                    _ => {}
                }
            }
        }

        enemies.retain(Enemy::is_alive);
        enemies.append(&mut self.spawned);
        outcome
    }
}

/// Coins granted for killing an enemy worth `reward`.
#[must_use]
pub fn kill_reward(reward: u32) -> u32 {
    (reward as f32 * KILL_BONUS_MULTIPLIER).floor() as u32
}

/// Builds one weakened, faster, non-replicating copy of `parent`.
///
/// The copy starts at the parent's current speed scaled up, so a slow in
/// effect carries over until movement re-evaluates it against the scaled
/// base speed.
pub fn replica_of<R: Rng + ?Sized>(
    parent: &Enemy,
    ids: &mut EnemyIdAllocator,
    rng: &mut R,
) -> Enemy {
    let health = (parent.max_health * REPLICA_HEALTH_FACTOR).floor().max(1.0);
    let speed = parent.speed * REPLICA_SPEED_FACTOR;
    let position = Position::new(
        parent.position.x + rng.gen_range(-REPLICA_JITTER..=REPLICA_JITTER),
        parent.position.y + rng.gen_range(-REPLICA_JITTER..=REPLICA_JITTER),
    );

    let mut copy = Enemy::new(ids.allocate(), parent.kind, position, health, speed);
    copy.base_speed = parent.base_speed * REPLICA_SPEED_FACTOR;
    copy.reward = (parent.reward as f32 * REPLICA_REWARD_FACTOR).floor() as u32;
    copy.is_original = false;
    copy
}

fn replicate<R: Rng + ?Sized>(
    parent: &Enemy,
    ids: &mut EnemyIdAllocator,
    rng: &mut R,
    spawned: &mut Vec<Enemy>,
    out: &mut Vec<Event>,
) {
    let mut copies = Vec::with_capacity(REPLICA_COUNT);
    for _ in 0..REPLICA_COUNT {
        let copy = replica_of(parent, ids, rng);
        copies.push(copy.id);
        spawned.push(copy);
    }
    log::debug!("replicator {} split into {}", parent.id.get(), copies.len());
    out.push(Event::EnemyReplicated {
        parent: parent.id,
        copies,
    });
}

fn disable_towers(
    towers: &mut [Tower],
    origin: Position,
    now: Timestamp,
    effects: &mut Vec<VisualEffect>,
    out: &mut Vec<Event>,
) {
    let until = now.saturating_add(DISABLE_DURATION);
    let mut disabled = Vec::new();
    for tower in towers
        .iter_mut()
        .filter(|tower| tower.position.distance_to(origin) <= DISABLE_RADIUS)
    {
        tower.disabled_until = Some(until);
        disabled.push(tower.id);
    }

    effects.push(VisualEffect {
        kind: EffectKind::Disable,
        position: origin,
        created_at: now,
    });
    if !disabled.is_empty() {
        log::debug!("{} towers disabled until {}", disabled.len(), until.as_millis());
        out.push(Event::TowersDisabled {
            towers: disabled,
            until,
        });
    }
}

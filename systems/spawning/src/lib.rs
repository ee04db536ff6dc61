#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave spawner that turns a wave number into a batch of enemies.
//!
//! All randomness flows through the caller-supplied [`Rng`], so a seeded
//! generator reproduces the exact same wave composition.

use firewall_defence_core::{
    config::{
        BOARD_HEIGHT, BOSS_CAP, BOSS_CHANCE, BOSS_MIN_WAVE, ESCALATION_HEALTH_BONUS,
        ESCALATION_SPEED_BONUS, ESCALATION_STEP_WAVES, SPAWN_MARGIN_Y, SPAWN_OFFSET_X,
        SPECIAL_SPAWN_TABLE, WAVE_ENEMY_COUNT_BASE,
    },
    Enemy, EnemyIdAllocator, EnemyKind, EventMultipliers, Position,
};
use rand::Rng;

/// Configuration parameters required to construct the wave spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    base_count: u32,
    spawn_x: f32,
    board_height: f32,
    margin_y: f32,
}

impl Config {
    /// Creates a configuration with an explicit base count and spawn geometry.
    #[must_use]
    pub const fn new(base_count: u32, spawn_x: f32, board_height: f32, margin_y: f32) -> Self {
        Self {
            base_count,
            spawn_x,
            board_height,
            margin_y,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            WAVE_ENEMY_COUNT_BASE,
            SPAWN_OFFSET_X,
            BOARD_HEIGHT,
            SPAWN_MARGIN_Y,
        )
    }
}

/// Stat scaling applied to every enemy of a wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveScaling {
    /// Combined multiplier applied to base health.
    pub health: f32,
    /// Combined multiplier applied to base speed.
    pub speed: f32,
}

impl WaveScaling {
    /// Computes the scaling for `wave` under the provided event multipliers.
    #[must_use]
    pub fn for_wave(wave: u32, multipliers: EventMultipliers) -> Self {
        let step = (wave / ESCALATION_STEP_WAVES) as f32;
        let wave_multiplier = step + 1.0;
        let health_boost = 1.0 + step * ESCALATION_HEALTH_BONUS;
        let speed_boost = 1.0 + step * ESCALATION_SPEED_BONUS;
        Self {
            health: wave_multiplier * health_boost * multipliers.health,
            speed: speed_boost * multipliers.speed,
        }
    }
}

/// Pure system that produces the enemies of a wave.
#[derive(Clone, Debug, Default)]
pub struct WaveSpawner {
    config: Config,
}

impl WaveSpawner {
    /// Creates a new spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Number of enemies a wave contains under the provided multipliers.
    #[must_use]
    pub fn wave_size(&self, wave: u32, multipliers: EventMultipliers) -> usize {
        let base = self.config.base_count.saturating_add(wave) as f32;
        (base * multipliers.count).floor().max(0.0) as usize
    }

    /// Produces the enemies for `wave`.
    ///
    /// `current` holds the enemies already on the board; it only matters for
    /// the boss cap, which counts both living bosses and bosses queued
    /// earlier in the same batch.
    pub fn spawn_wave<R: Rng + ?Sized>(
        &self,
        wave: u32,
        current: &[Enemy],
        multipliers: EventMultipliers,
        ids: &mut EnemyIdAllocator,
        rng: &mut R,
    ) -> Vec<Enemy> {
        let count = self.wave_size(wave, multipliers);
        let scaling = WaveScaling::for_wave(wave, multipliers);
        let mut bosses = current
            .iter()
            .filter(|enemy| enemy.kind.is_boss() && enemy.is_alive())
            .count();

        let mut batch = Vec::with_capacity(count);
        for _ in 0..count {
            let kind = select_kind(wave, bosses, rng);
            if kind.is_boss() {
                bosses += 1;
                log::debug!("wave {wave}: boss queued");
            }

            let stats = kind.stats();
            let health = (stats.health * scaling.health).floor().max(1.0);
            let speed = stats.speed * scaling.speed;
            let position = self.spawn_position(rng);

            let mut enemy = Enemy::new(ids.allocate(), kind, position, health, speed);
            enemy.is_original = kind == EnemyKind::Replicator;
            batch.push(enemy);
        }

        batch
    }

    fn spawn_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let low = self.config.margin_y;
        let high = (self.config.board_height - self.config.margin_y).max(low);
        Position::new(self.config.spawn_x, rng.gen_range(low..=high))
    }
}

fn select_kind<R: Rng + ?Sized>(wave: u32, bosses: usize, rng: &mut R) -> EnemyKind {
    if wave >= BOSS_MIN_WAVE && bosses < BOSS_CAP && rng.gen_bool(BOSS_CHANCE) {
        return EnemyKind::Spider;
    }

    for (kind, min_wave, chance) in SPECIAL_SPAWN_TABLE {
        if wave >= min_wave && rng.gen_bool(chance) {
            return kind;
        }
    }

    EnemyKind::ORDINARY[rng.gen_range(0..EnemyKind::ORDINARY.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use firewall_defence_core::config::{FLOOD_COUNT_MULTIPLIER, FLOOD_HEALTH_MULTIPLIER};

    #[test]
    fn escalation_steps_every_five_waves() {
        let neutral = EventMultipliers::NEUTRAL;
        assert_eq!(WaveScaling::for_wave(4, neutral).health, 1.0);

        let fifth = WaveScaling::for_wave(5, neutral);
        assert!((fifth.health - 2.4).abs() < 1e-6);
        assert!((fifth.speed - 1.1).abs() < 1e-6);
    }

    #[test]
    fn flood_doubles_wave_size_and_weakens_health() {
        let spawner = WaveSpawner::default();
        let flood = EventMultipliers {
            count: FLOOD_COUNT_MULTIPLIER,
            health: FLOOD_HEALTH_MULTIPLIER,
            speed: 1.0,
        };
        assert_eq!(spawner.wave_size(3, EventMultipliers::NEUTRAL), 8);
        assert_eq!(spawner.wave_size(3, flood), 16);
        assert!((WaveScaling::for_wave(3, flood).health - 0.6).abs() < 1e-6);
    }
}

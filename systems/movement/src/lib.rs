#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that advances enemies across the board.
//!
//! Enemies ignore towers for pathing and walk straight toward increasing x.
//! Slowing towers scale the effective speed of every enemy inside their
//! range; leaving the range restores the base speed.

use firewall_defence_core::{
    config::{BOARD_WIDTH, ESCAPE_DAMAGE},
    Enemy, Event, Tower,
};

/// Result of a movement pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MovementOutcome {
    /// Enemies that crossed the far edge.
    pub escaped: usize,
    /// Damage those enemies deal to the player.
    pub damage: f32,
}

/// Pure system applying slows, movement and boundary exits.
#[derive(Debug, Default)]
pub struct Movement {
    survivors: Vec<Enemy>,
}

impl Movement {
    /// Creates a new movement system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves every enemy one tick and removes those that escaped or died.
    ///
    /// Escaped enemies grant no reward. The collection keeps its relative
    /// order.
    pub fn handle(
        &mut self,
        enemies: &mut Vec<Enemy>,
        towers: &[Tower],
        out: &mut Vec<Event>,
    ) -> MovementOutcome {
        let mut outcome = MovementOutcome::default();
        self.survivors.clear();
        self.survivors.reserve(enemies.len());

        for mut enemy in enemies.drain(..) {
            apply_slow(&mut enemy, towers);
            enemy.position.x += enemy.speed;

            if enemy.position.x > BOARD_WIDTH {
                outcome.escaped += 1;
                outcome.damage += ESCAPE_DAMAGE;
                log::debug!("enemy {} escaped", enemy.id.get());
                out.push(Event::EnemyEscaped {
                    enemy: enemy.id,
                    damage: ESCAPE_DAMAGE,
                });
                continue;
            }

            if !enemy.is_alive() {
                continue;
            }

            self.survivors.push(enemy);
        }

        enemies.append(&mut self.survivors);
        outcome
    }
}

/// Strongest slow among the living slowing towers covering `enemy`, if any.
#[must_use]
pub fn slow_for(enemy: &Enemy, towers: &[Tower]) -> Option<f32> {
    towers
        .iter()
        .filter(|tower| tower.is_alive() && tower.covers(enemy.position))
        .filter_map(|tower| tower.slow_factor)
        .reduce(f32::min)
}

fn apply_slow(enemy: &mut Enemy, towers: &[Tower]) {
    let multiplier = slow_for(enemy, towers).unwrap_or(1.0);
    enemy.slow_multiplier = multiplier;
    enemy.speed = enemy.base_speed * multiplier;
}

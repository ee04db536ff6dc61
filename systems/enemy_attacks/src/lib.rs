#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy attacks against towers.
//!
//! Every enemy grinds down towers it touches on every tick. Enemies with an
//! attack range additionally strike one tower further away whenever their
//! attack cooldown has elapsed.

use firewall_defence_core::{
    config::{MELEE_DAMAGE_FACTOR, MELEE_RADIUS},
    EffectKind, Enemy, Event, Timestamp, Tower, VisualEffect,
};

/// Pure system resolving enemy attacks for one tick.
#[derive(Debug, Default)]
pub struct EnemyAttacks;

impl EnemyAttacks {
    /// Creates the enemy attack system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Applies melee and ranged damage from every enemy to the towers.
    ///
    /// Towers are not removed here; a tower reduced to zero health is pruned
    /// by the caller before towers fire.
    pub fn handle(
        &mut self,
        enemies: &mut [Enemy],
        towers: &mut [Tower],
        now: Timestamp,
        effects: &mut Vec<VisualEffect>,
        out: &mut Vec<Event>,
    ) {
        for enemy in enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
            let stats = enemy.kind.stats();

            let melee = stats.tower_damage * MELEE_DAMAGE_FACTOR;
            for tower in towers.iter_mut().filter(|tower| tower.is_alive()) {
                if tower.position.distance_to(enemy.position) <= MELEE_RADIUS {
                    tower.health -= melee;
                }
            }

            if stats.attack_range <= 0.0 || !now.is_due(enemy.last_attack_at, stats.attack_cooldown)
            {
                continue;
            }

            let Some(tower) = towers.iter_mut().find(|tower| {
                let distance = tower.position.distance_to(enemy.position);
                tower.is_alive() && distance > MELEE_RADIUS && distance <= stats.attack_range
            }) else {
                continue;
            };

            tower.health -= stats.tower_damage;
            enemy.last_attack_at = Some(now);
            effects.push(VisualEffect {
                kind: EffectKind::RangedHit,
                position: tower.position,
                created_at: now,
            });
            out.push(Event::TowerStruck {
                tower: tower.id,
                enemy: enemy.id,
                damage: stats.tower_damage,
            });
        }
    }
}

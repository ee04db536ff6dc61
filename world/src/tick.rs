//! Fixed-order simulation step run on every `Advance` command.

use firewall_defence_core::{
    config::{EFFECT_LIFETIME, MAX_HEALTH, REGEN_AMOUNT, REGEN_INTERVAL, WAVE_CLEAR_HEAL},
    Event, GlobalEventKind, RunState, Timestamp,
};
use firewall_defence_system_tower_combat::Battlefield;

use crate::{SpawnTimer, World};

/// Runs one step of the running session at `now`.
pub(crate) fn advance(world: &mut World, now: Timestamp, out: &mut Vec<Event>) {
    anchor(world, now, out);
    spawn_due_wave(world, now, out);
    let had_enemies = !world.enemies.is_empty();

    regenerate(world, now);
    let payout = world.economy.tick(now);
    if payout.passive > 0 || payout.interest > 0 {
        log::debug!(
            "economy paid {} passive and {} interest",
            payout.passive,
            payout.interest
        );
    }

    let moved = world
        .systems
        .movement
        .handle(&mut world.enemies, &world.towers, out);
    if moved.damage > 0.0 {
        world.health = (world.health - moved.damage).max(0.0);
        world.stats.health_lost += moved.damage;
    }

    world.systems.enemy_attacks.handle(
        &mut world.enemies,
        &mut world.towers,
        now,
        &mut world.effects,
        out,
    );

    world.towers.retain(|tower| {
        if tower.is_alive() {
            return true;
        }
        log::debug!("tower {} destroyed", tower.id.get());
        out.push(Event::TowerDestroyed {
            tower: tower.id,
            kind: tower.kind,
        });
        false
    });

    let combat = world.systems.tower_combat.handle(
        Battlefield {
            towers: &mut world.towers,
            enemies: &mut world.enemies,
            ids: &mut world.enemy_ids,
            effects: &mut world.effects,
        },
        now,
        &mut world.rng,
        out,
    );
    world.economy.credit(combat.coins);
    world.score += combat.score;
    world.stats.kills += combat.kills;

    world.global_events.expire(now, out);
    world
        .effects
        .retain(|effect| now < effect.created_at.saturating_add(EFFECT_LIFETIME));

    if world.health <= 0.0 {
        world.run_state = RunState::GameOver;
        log::info!("game over on wave {} with score {}", world.wave, world.score);
        out.push(Event::GameOver {
            wave: world.wave,
            score: world.score,
        });
        return;
    }

    if had_enemies && world.enemies.is_empty() {
        clear_wave(world, now, out);
    }
}

/// Starts the session timers on the first advance after `Start`.
fn anchor(world: &mut World, now: Timestamp, out: &mut Vec<Event>) {
    if world.anchored {
        return;
    }
    world.anchored = true;
    world.last_regen_at = Some(now);
    if world.spawn == SpawnTimer::Anchoring {
        world.schedule_next_wave(now);
    }
    begin_wave(world, now, out);
}

fn spawn_due_wave(world: &mut World, now: Timestamp, out: &mut Vec<Event>) {
    let SpawnTimer::Due(at) = world.spawn else {
        return;
    };
    if now < at {
        return;
    }

    let multipliers = world.global_events.multipliers(now);
    let batch = world.systems.spawner.spawn_wave(
        world.wave,
        &world.enemies,
        multipliers,
        &mut world.enemy_ids,
        &mut world.rng,
    );
    world.spawn = SpawnTimer::Idle;

    log::info!("wave {} spawned {} enemies", world.wave, batch.len());
    out.push(Event::WaveSpawned {
        wave: world.wave,
        enemies: batch.len(),
    });
    world.enemies.extend(batch);
}

fn regenerate(world: &mut World, now: Timestamp) {
    if !now.is_due(world.last_regen_at, REGEN_INTERVAL) {
        return;
    }
    world.last_regen_at = Some(now);
    if !world.towers.is_empty() {
        world.health = (world.health + REGEN_AMOUNT).min(MAX_HEALTH);
    }
}

fn clear_wave(world: &mut World, now: Timestamp, out: &mut Vec<Event>) {
    let cleared = world.wave;
    let bonus = world.economy.grant_wave_bonus();
    world.health = (world.health + WAVE_CLEAR_HEAL).min(MAX_HEALTH);
    log::info!("wave {cleared} cleared");
    out.push(Event::WaveCleared {
        wave: cleared,
        bonus,
    });

    world.wave += 1;
    begin_wave(world, now, out);
    world.schedule_next_wave(now);
}

/// Runs the global event scheduler for the current wave and applies the
/// one-shot effects of whatever activated.
fn begin_wave(world: &mut World, now: Timestamp, out: &mut Vec<Event>) {
    let activated = world
        .global_events
        .on_wave(world.wave, now, &mut world.rng, out);
    if activated.contains(&GlobalEventKind::DiskWipe) {
        let count = world.wipe_towers();
        log::warn!("disk wipe removed {count} towers");
        out.push(Event::TowersWiped { count });
    }
}

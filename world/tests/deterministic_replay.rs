use firewall_defence_core::{
    config::{BOARD_HEIGHT, BOARD_WIDTH, EDGE_MARGIN, MAX_HEALTH, MIN_TOWER_SPACING, STARTING_COINS},
    Command, Event, Position, SessionSnapshot, Timestamp, TowerKind,
};
use firewall_defence_world::{self as world, query, World};
use proptest::prelude::*;

const TICK_MS: u64 = 50;

fn script() -> Vec<(u64, Command)> {
    vec![
        (0, Command::Start),
        (
            0,
            Command::PlaceTower {
                kind: TowerKind::Antivirus,
                position: Position::new(150.0, 200.0),
            },
        ),
        (
            10,
            Command::PlaceTower {
                kind: TowerKind::Slowdown,
                position: Position::new(260.0, 120.0),
            },
        ),
        (
            400,
            Command::PlaceTower {
                kind: TowerKind::Chain,
                position: Position::new(420.0, 260.0),
            },
        ),
        (
            900,
            Command::PlaceTower {
                kind: TowerKind::Firewall,
                position: Position::new(600.0, 200.0),
            },
        ),
    ]
}

fn replay(seed: u64, ticks: u64) -> (Vec<SessionSnapshot>, Vec<Event>) {
    let mut world = World::with_seed(seed);
    let mut events = Vec::new();
    let mut snapshots = Vec::new();
    let script = script();

    for tick in 0..ticks {
        for (_, command) in script.iter().filter(|(at, _)| *at == tick) {
            world::apply(&mut world, command.clone(), &mut events);
        }
        world::apply(
            &mut world,
            Command::Advance {
                now: Timestamp::from_millis(tick * TICK_MS),
            },
            &mut events,
        );
        if tick % 100 == 0 {
            snapshots.push(query::snapshot(&world));
        }
    }
    snapshots.push(query::snapshot(&world));
    (snapshots, events)
}

#[test]
fn same_seed_and_script_replay_identically() {
    let first = replay(0x00C0_FFEE, 4_000);
    let second = replay(0x00C0_FFEE, 4_000);

    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
}

#[test]
fn different_seeds_diverge() {
    let (first, _) = replay(1, 200);
    let (second, _) = replay(2, 200);

    let ys = |snapshots: &[SessionSnapshot]| -> Vec<f32> {
        snapshots
            .last()
            .map(|snapshot| snapshot.enemies.iter().map(|enemy| enemy.position.y).collect())
            .unwrap_or_default()
    };
    assert_ne!(ys(&first), ys(&second));
}

#[derive(Clone, Debug)]
enum Step {
    Place(TowerKind, f32, f32),
    Wait(u64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..TowerKind::ALL.len(), 0.0f32..BOARD_WIDTH, 0.0f32..BOARD_HEIGHT)
            .prop_map(|(kind, x, y)| Step::Place(TowerKind::ALL[kind], x, y)),
        (1u64..200).prop_map(Step::Wait),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn session_invariants_hold_for_any_script(steps in prop::collection::vec(step(), 1..24)) {
        let mut world = World::with_seed(11);
        let mut events = Vec::new();
        world::apply(&mut world, Command::Start, &mut events);
        let mut tick = 0u64;

        for step in steps {
            match step {
                Step::Place(kind, x, y) => {
                    let _ = world::place_tower(&mut world, kind, Position::new(x, y), &mut events);
                }
                Step::Wait(ticks) => {
                    for _ in 0..ticks {
                        world::apply(
                            &mut world,
                            Command::Advance { now: Timestamp::from_millis(tick * TICK_MS) },
                            &mut events,
                        );
                        tick += 1;
                    }
                }
            }

            let snapshot = query::snapshot(&world);
            prop_assert!(snapshot.health >= 0.0 && snapshot.health <= MAX_HEALTH);
            prop_assert_eq!(
                u64::from(STARTING_COINS) + snapshot.economy.cumulative_earned
                    - snapshot.economy.cumulative_spent,
                u64::from(snapshot.coins)
            );
            for (index, tower) in snapshot.towers.iter().enumerate() {
                prop_assert!(tower.position.x >= EDGE_MARGIN);
                prop_assert!(tower.position.x <= BOARD_WIDTH - EDGE_MARGIN);
                prop_assert!(tower.position.y >= EDGE_MARGIN);
                prop_assert!(tower.position.y <= BOARD_HEIGHT - EDGE_MARGIN);
                for other in &snapshot.towers[index + 1..] {
                    prop_assert!(tower.position.distance_to(other.position) >= MIN_TOWER_SPACING);
                }
            }
            let bosses = snapshot
                .enemies
                .iter()
                .filter(|enemy| enemy.kind.is_boss())
                .count();
            prop_assert!(bosses <= 1);
            prop_assert!(snapshot
                .scheduled_events
                .windows(2)
                .all(|pair| pair[0].wave <= pair[1].wave));
        }
    }
}

use firewall_defence_core::{Enemy, EnemyId, EnemyKind, Position, Tower, TowerId, TowerKind};
use firewall_defence_system_tower_targeting::TowerTargeting;

fn enemy(id: u32, x: f32, y: f32) -> Enemy {
    Enemy::new(EnemyId::new(id), EnemyKind::Swarm, Position::new(x, y), 15.0, 1.2)
}

#[test]
fn chain_tower_takes_up_to_three_first_encountered_enemies() {
    let tower = Tower::new(TowerId::new(0), TowerKind::Chain, Position::new(400.0, 200.0));
    let enemies = vec![
        enemy(0, 390.0, 200.0),
        enemy(1, 100.0, 200.0),
        enemy(2, 500.0, 250.0),
        enemy(3, 300.0, 150.0),
        enemy(4, 401.0, 201.0),
    ];
    let mut targeting = TowerTargeting::new();

    let selected = targeting.select(&tower, &enemies).to_vec();

    assert_eq!(selected, vec![0, 2, 3], "nearest enemy 4 is beyond the target count");
}

#[test]
fn range_boundary_is_inclusive() {
    let tower = Tower::new(TowerId::new(0), TowerKind::Firewall, Position::new(400.0, 200.0));
    let enemies = vec![enemy(0, 300.0, 200.0), enemy(1, 299.0, 200.0)];
    let mut targeting = TowerTargeting::new();

    assert_eq!(targeting.select(&tower, &enemies).to_vec(), vec![0]);
    assert_eq!(targeting.select(&tower, &enemies[1..]).len(), 0);
}

#[test]
fn empty_board_selects_nothing() {
    let tower = Tower::new(TowerId::new(0), TowerKind::Proxy, Position::new(400.0, 200.0));
    let mut targeting = TowerTargeting::new();
    assert!(targeting.select(&tower, &[]).is_empty());
}

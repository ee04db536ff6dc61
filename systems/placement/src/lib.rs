#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement rules deciding whether a tower may be built at a position.
//!
//! Towers only exclude a circle around their centre; there is no footprint
//! and no path-blocking check, because enemies walk straight across the
//! board regardless of where towers stand.

use firewall_defence_core::{
    config::{BOARD_HEIGHT, BOARD_WIDTH, EDGE_MARGIN, MIN_TOWER_SPACING},
    PlacementError, Position, Tower, TowerKind,
};

/// Reports whether a tower of `kind` may be placed at `position`.
#[must_use]
pub fn can_place(position: Position, kind: TowerKind, towers: &[Tower], coins: u32) -> bool {
    validate(position, kind, towers, coins).is_ok()
}

/// Checks a placement request, reporting the first rule it violates.
///
/// Funds are checked before geometry so an unaffordable request is reported
/// as such wherever the cursor is.
pub fn validate(
    position: Position,
    kind: TowerKind,
    towers: &[Tower],
    coins: u32,
) -> Result<(), PlacementError> {
    if coins < kind.stats().cost {
        return Err(PlacementError::InsufficientFunds);
    }

    if !within_margin(position) {
        return Err(PlacementError::OutOfBounds);
    }

    if towers
        .iter()
        .any(|tower| tower.position.distance_to(position) < MIN_TOWER_SPACING)
    {
        return Err(PlacementError::TooClose);
    }

    Ok(())
}

fn within_margin(position: Position) -> bool {
    let x_range = EDGE_MARGIN..=BOARD_WIDTH - EDGE_MARGIN;
    let y_range = EDGE_MARGIN..=BOARD_HEIGHT - EDGE_MARGIN;
    x_range.contains(&position.x) && y_range.contains(&position.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use firewall_defence_core::TowerId;

    #[test]
    fn margin_boundary_is_inclusive() {
        assert!(within_margin(Position::new(EDGE_MARGIN, EDGE_MARGIN)));
        assert!(within_margin(Position::new(
            BOARD_WIDTH - EDGE_MARGIN,
            BOARD_HEIGHT - EDGE_MARGIN
        )));
        assert!(!within_margin(Position::new(EDGE_MARGIN - 0.5, 200.0)));
        assert!(!within_margin(Position::new(400.0, BOARD_HEIGHT - EDGE_MARGIN + 0.5)));
    }

    #[test]
    fn funds_are_reported_before_geometry() {
        let towers = vec![Tower::new(TowerId::new(0), TowerKind::Proxy, Position::new(5.0, 5.0))];
        assert_eq!(
            validate(Position::new(5.0, 5.0), TowerKind::Chain, &towers, 0),
            Err(PlacementError::InsufficientFunds)
        );
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Target selection for towers.
//!
//! Targets are picked in enemy collection order ("first encountered"), not
//! by distance. Multi-target towers take up to their configured count; all
//! other towers take the first living enemy inside their range.

use firewall_defence_core::{Enemy, Tower};

/// Tower targeting system that reuses a scratch buffer between towers.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    selected: Vec<usize>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the enemies `tower` strikes with its next shot.
    ///
    /// Returns indices into `enemies`, in collection order. The slice stays
    /// valid until the next call.
    pub fn select(&mut self, tower: &Tower, enemies: &[Enemy]) -> &[usize] {
        self.selected.clear();
        let limit = tower.targets_per_shot();
        self.selected.extend(
            enemies
                .iter()
                .enumerate()
                .filter(|(_, enemy)| enemy.is_alive() && tower.covers(enemy.position))
                .map(|(index, _)| index)
                .take(limit),
        );
        &self.selected
    }
}

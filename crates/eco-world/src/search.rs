//! Nearest-resource queries over the grid.
//!
//! Both searches scan every cell in row-major order and keep the first entity
//! at the smallest Euclidean distance: a later candidate replaces the current
//! best only when it is strictly closer. Results are snapshots; re-query after
//! any grid mutation.

use crate::entity::{Entity, EntityId};
use crate::grid::Grid;
use eco_core::Position;

fn find_closest<F>(grid: &Grid, from: Position, qualifies: F) -> Option<Position>
where
    F: Fn(&Entity) -> bool,
{
    let mut best: Option<(f64, Position)> = None;

    for entity in grid.iter().filter(|entity| qualifies(*entity)) {
        let position = entity.position();
        let distance = from.distance_to(&position);
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, position)),
        }
    }

    best.map(|(_, position)| position)
}

/// Nearest tree that still has food
pub fn find_closest_food(grid: &Grid, from: Position) -> Option<Position> {
    find_closest(grid, from, |entity| {
        matches!(entity, Entity::Tree(tree) if tree.has_food())
    })
}

/// Nearest creature that has never mated, anywhere on the grid.
///
/// `exclude` skips one creature, normally the one asking, which would
/// otherwise always find itself at distance zero.
pub fn find_closest_mate(grid: &Grid, from: Position, exclude: Option<EntityId>) -> Option<Position> {
    find_closest(grid, from, |entity| match entity {
        Entity::Creature(creature) => !creature.has_mated && Some(creature.id) != exclude,
        Entity::Tree(_) => false,
    })
}

//! Per-cell feeding and mating rules.

use crate::entity::{Entity, EntityId};
use crate::grid::Grid;
use eco_core::{Error, Position, Result};

fn energy_of(entity: &Entity) -> f64 {
    entity.as_creature().map_or(0.0, |creature| creature.energy)
}

/// Feed the creatures at `pos` from the trees in that cell.
///
/// Creatures eat in descending energy order, ties going to whoever arrived
/// first. Each creature in the cell takes one food unit until the cell's trees
/// are bare, including creatures fed by an earlier distribution. Returns the
/// number of food units handed out.
pub fn distribute_food(grid: &mut Grid, pos: Position) -> Result<usize> {
    let cell = grid.cell_mut(pos)?;

    let mut queue: Vec<usize> = cell
        .iter()
        .enumerate()
        .filter(|(_, entity)| entity.as_creature().is_some())
        .map(|(slot, _)| slot)
        .collect();
    // sort_by is stable, so equal energies keep arrival order
    queue.sort_by(|&a, &b| energy_of(&cell[b]).total_cmp(&energy_of(&cell[a])));

    let mut eaten = 0;
    for slot in queue {
        let Some(tree) = cell
            .iter_mut()
            .filter_map(Entity::as_tree_mut)
            .find(|tree| tree.has_food())
        else {
            break;
        };
        tree.take_food();

        if let Some(creature) = cell[slot].as_creature_mut() {
            creature.fed = true;
            eaten += 1;
        }
    }

    Ok(eaten)
}

/// Pair the creature `id` at `pos` with the first other unmated creature in
/// the same cell. Both become permanently mated and an offspring with
/// `offspring_energy` is spawned in the cell. At most one pairing happens per
/// call; returns the offspring's id.
pub fn mate(
    grid: &mut Grid,
    pos: Position,
    id: EntityId,
    offspring_energy: f64,
) -> Result<Option<EntityId>> {
    let cell = grid.cell_mut(pos)?;

    let mover = cell
        .iter()
        .position(|entity| matches!(entity, Entity::Creature(creature) if creature.id == id))
        .ok_or_else(|| Error::NotFound(format!("creature {} at {}", id, pos)))?;
    if cell[mover].as_creature().is_some_and(|creature| creature.has_mated) {
        return Ok(None);
    }

    let partner = cell.iter().position(|entity| {
        matches!(entity, Entity::Creature(creature) if creature.id != id && !creature.has_mated)
    });
    let Some(partner) = partner else {
        return Ok(None);
    };

    for slot in [mover, partner] {
        if let Some(creature) = cell[slot].as_creature_mut() {
            creature.has_mated = true;
        }
    }

    let offspring = grid.spawn_creature(pos, offspring_energy)?;
    Ok(Some(offspring))
}

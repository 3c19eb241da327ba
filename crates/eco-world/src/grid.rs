//! Square grid of cells, each holding an ordered list of entities.

use crate::entity::{Creature, Entity, EntityId, Tree};
use eco_core::{Error, MovementRule, Position, Result};
use serde::{Deserialize, Serialize};

/// A bounded (non-wrapping) square grid.
///
/// Cells are stored row-major with `x` as the major axis, so every iteration
/// visits `(0, 0), (0, 1), ..., (0, n-1), (1, 0), ...`. Searches rely on this
/// order for tie-breaking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    size: i32,
    cells: Vec<Vec<Entity>>,
    next_id: u64,
}

impl Grid {
    /// Create an empty `size x size` grid
    pub fn new(size: i32) -> Self {
        let cell_count = (size.max(0) as usize).pow(2);
        Self {
            size: size.max(0),
            cells: vec![Vec::new(); cell_count],
            next_id: 0,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    fn index(&self, pos: Position) -> Result<usize> {
        if !pos.in_bounds(self.size) {
            return Err(Error::OutOfBounds {
                position: pos,
                grid_size: self.size,
            });
        }
        Ok(cell_index(pos, self.size))
    }

    #[cfg(test)]
    fn index_to_pos(&self, index: usize) -> Position {
        let size = self.size as usize;
        Position::new((index / size) as i32, (index % size) as i32)
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Entities at `pos`, in arrival order
    pub fn cell(&self, pos: Position) -> Result<&[Entity]> {
        let index = self.index(pos)?;
        Ok(&self.cells[index])
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> Result<&mut Vec<Entity>> {
        let index = self.index(pos)?;
        Ok(&mut self.cells[index])
    }

    /// Append an entity to the cell matching its stored position
    pub(crate) fn insert(&mut self, entity: Entity) -> Result<()> {
        let index = self.index(entity.position())?;
        self.cells[index].push(entity);
        Ok(())
    }

    pub fn spawn_creature(&mut self, pos: Position, energy: f64) -> Result<EntityId> {
        self.index(pos)?;
        let id = self.allocate_id();
        self.insert(Creature::new(id, pos, energy).into())?;
        Ok(id)
    }

    pub fn spawn_tree(&mut self, pos: Position, food: u32) -> Result<EntityId> {
        self.index(pos)?;
        let id = self.allocate_id();
        self.insert(Tree::new(id, pos, food).into())?;
        Ok(id)
    }

    /// Remove an entity by identity from the cell at `pos`
    pub fn remove(&mut self, pos: Position, id: EntityId) -> Result<Entity> {
        let cell = self.cell_mut(pos)?;
        let slot = cell
            .iter()
            .position(|entity| entity.id() == id)
            .ok_or_else(|| Error::NotFound(format!("entity {} at {}", id, pos)))?;
        Ok(cell.remove(slot))
    }

    /// Move an entity from `from` to `to`, keeping its stored position in
    /// step with the cell it lives in. The entity arrives last in the new cell.
    pub fn relocate(&mut self, from: Position, id: EntityId, to: Position) -> Result<()> {
        let target = self.index(to)?;
        if from == to {
            if self.cell(from)?.iter().any(|entity| entity.id() == id) {
                return Ok(());
            }
            return Err(Error::NotFound(format!("entity {} at {}", id, from)));
        }

        let mut entity = self.remove(from, id)?;
        entity.set_position(to);
        self.cells[target].push(entity);
        Ok(())
    }

    /// Move a creature, paying the travelled distance out of its energy.
    ///
    /// Under [`MovementRule::Gated`] a trip longer than the creature's energy
    /// is refused and `Ok(false)` is returned with nothing changed.
    pub fn move_creature(
        &mut self,
        from: Position,
        id: EntityId,
        to: Position,
        rule: MovementRule,
    ) -> Result<bool> {
        self.index(to)?;
        let creature = self
            .creature_mut(from, id)
            .ok_or_else(|| Error::NotFound(format!("creature {} at {}", id, from)))?;

        if rule == MovementRule::Gated && !creature.can_reach(&to) {
            return Ok(false);
        }

        let distance = creature.distance_to(&to);
        creature.energy -= distance;
        self.relocate(from, id, to)?;
        Ok(true)
    }

    pub fn creature(&self, pos: Position, id: EntityId) -> Option<&Creature> {
        self.cell(pos)
            .ok()?
            .iter()
            .filter_map(Entity::as_creature)
            .find(|creature| creature.id == id)
    }

    pub(crate) fn creature_mut(&mut self, pos: Position, id: EntityId) -> Option<&mut Creature> {
        self.cell_mut(pos)
            .ok()?
            .iter_mut()
            .filter_map(Entity::as_creature_mut)
            .find(|creature| creature.id == id)
    }

    /// All entities in row-major cell order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.cells.iter().flatten()
    }

    pub fn creatures(&self) -> impl Iterator<Item = &Creature> + '_ {
        self.iter().filter_map(Entity::as_creature)
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> + '_ {
        self.iter().filter_map(Entity::as_tree)
    }

    pub fn creature_count(&self) -> usize {
        self.creatures().count()
    }

    pub fn tree_count(&self) -> usize {
        self.trees().count()
    }

    /// Remove every tree regardless of remaining food; returns how many were removed
    pub fn remove_trees(&mut self) -> usize {
        let mut removed = 0;
        for cell in &mut self.cells {
            let before = cell.len();
            cell.retain(|entity| !matches!(entity, Entity::Tree(_)));
            removed += before - cell.len();
        }
        removed
    }

    /// Restore every creature's energy and clear its fed flag
    pub fn reset_creatures(&mut self, energy: f64) {
        for creature in self
            .cells
            .iter_mut()
            .flatten()
            .filter_map(Entity::as_creature_mut)
        {
            creature.reset(energy);
        }
    }

    /// Per-cell display scalar: creature count plus 0.5 when a tree is present.
    /// Indexed as `heat[x][y]`.
    pub fn heat_map(&self) -> Vec<Vec<f64>> {
        self.cells
            .chunks(self.size.max(1) as usize)
            .map(|column| {
                column
                    .iter()
                    .map(|cell| {
                        let creatures = cell.iter().filter(|e| e.as_creature().is_some()).count();
                        let tree = if cell.iter().any(|e| e.as_tree().is_some()) {
                            0.5
                        } else {
                            0.0
                        };
                        creatures as f64 + tree
                    })
                    .collect()
            })
            .collect()
    }

    /// Serialize a frozen copy of the grid
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a grid from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Row-major slot of an in-bounds position
fn cell_index(pos: Position, size: i32) -> usize {
    pos.x as usize * size as usize + pos.y as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10);
        assert_eq!(grid.size(), 10);
        assert_eq!(grid.cells.len(), 100);
        assert_eq!(grid.iter().count(), 0);
    }

    #[test]
    fn test_row_major_order() {
        let mut grid = Grid::new(3);
        grid.spawn_creature(Position::new(1, 0), 10.0).unwrap();
        grid.spawn_creature(Position::new(0, 2), 10.0).unwrap();
        grid.spawn_creature(Position::new(0, 1), 10.0).unwrap();

        let order: Vec<Position> = grid.creatures().map(|c| c.position()).collect();
        assert_eq!(
            order,
            vec![Position::new(0, 1), Position::new(0, 2), Position::new(1, 0)]
        );
        assert_eq!(grid.index_to_pos(5), Position::new(1, 2));
    }

    #[test]
    fn test_cell_index_on_large_grid() {
        let size = 50_000;
        let corner = Position::new(size - 1, size - 1);
        assert_eq!(cell_index(corner, size), 2_499_999_999);
        assert_eq!(cell_index(Position::new(1, 0), size), 50_000);
    }

    #[test]
    fn test_bounds_checked() {
        let mut grid = Grid::new(5);
        let err = grid.spawn_creature(Position::new(5, 0), 10.0).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { grid_size: 5, .. }));
        assert!(grid.spawn_tree(Position::new(0, -1), 3).is_err());
        assert!(grid.cell(Position::new(-1, 2)).is_err());
    }

    #[test]
    fn test_remove_by_identity() {
        let mut grid = Grid::new(5);
        let pos = Position::new(2, 2);
        let a = grid.spawn_creature(pos, 10.0).unwrap();
        let b = grid.spawn_creature(pos, 10.0).unwrap();

        let removed = grid.remove(pos, a).unwrap();
        assert_eq!(removed.id(), a);
        assert_eq!(grid.cell(pos).unwrap().len(), 1);
        assert_eq!(grid.cell(pos).unwrap()[0].id(), b);

        assert!(matches!(grid.remove(pos, a), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_relocate_keeps_position_in_sync() {
        let mut grid = Grid::new(5);
        let from = Position::new(0, 0);
        let to = Position::new(3, 4);
        let id = grid.spawn_creature(from, 10.0).unwrap();
        grid.spawn_creature(to, 10.0).unwrap();

        grid.relocate(from, id, to).unwrap();

        assert!(grid.cell(from).unwrap().is_empty());
        let cell = grid.cell(to).unwrap();
        assert_eq!(cell.len(), 2);
        assert_eq!(cell[1].id(), id);
        for (index, cell) in grid.cells.iter().enumerate() {
            for entity in cell {
                assert_eq!(entity.position(), grid.index_to_pos(index));
            }
        }
    }

    #[test]
    fn test_relocate_out_of_bounds_leaves_grid_untouched() {
        let mut grid = Grid::new(5);
        let from = Position::new(1, 1);
        let id = grid.spawn_creature(from, 10.0).unwrap();

        assert!(grid.relocate(from, id, Position::new(9, 9)).is_err());
        assert!(grid.creature(from, id).is_some());
    }

    #[test]
    fn test_gated_move() {
        let mut grid = Grid::new(10);
        let from = Position::new(2, 3);
        let id = grid.spawn_creature(from, 15.0).unwrap();

        let to = Position::new(5, 6);
        assert!(grid.move_creature(from, id, to, MovementRule::Gated).unwrap());
        let creature = grid.creature(to, id).unwrap();
        assert_eq!(creature.position(), to);
        assert!((creature.energy - (15.0 - 18f64.sqrt())).abs() < 1e-12);

        grid.creature_mut(to, id).unwrap().energy = 1.0;
        assert!(!grid.move_creature(to, id, from, MovementRule::Gated).unwrap());
        let creature = grid.creature(to, id).unwrap();
        assert_eq!(creature.position(), to);
        assert_eq!(creature.energy, 1.0);
    }

    #[test]
    fn test_unconditional_move() {
        let mut grid = Grid::new(10);
        let from = Position::new(0, 0);
        let id = grid.spawn_creature(from, 1.0).unwrap();

        let to = Position::new(0, 3);
        assert!(grid.move_creature(from, id, to, MovementRule::Unconditional).unwrap());
        assert_eq!(grid.creature(to, id).unwrap().energy, -2.0);
    }

    #[test]
    fn test_remove_trees_and_reset() {
        let mut grid = Grid::new(4);
        grid.spawn_tree(Position::new(0, 0), 3).unwrap();
        grid.spawn_tree(Position::new(0, 0), 0).unwrap();
        grid.spawn_tree(Position::new(3, 3), 1).unwrap();
        let id = grid.spawn_creature(Position::new(0, 0), 2.0).unwrap();
        grid.creature_mut(Position::new(0, 0), id).unwrap().fed = true;

        assert_eq!(grid.remove_trees(), 3);
        assert_eq!(grid.tree_count(), 0);

        grid.reset_creatures(10.0);
        let creature = grid.creature(Position::new(0, 0), id).unwrap();
        assert_eq!(creature.energy, 10.0);
        assert!(!creature.fed);
    }

    #[test]
    fn test_heat_map() {
        let mut grid = Grid::new(3);
        grid.spawn_creature(Position::new(1, 2), 10.0).unwrap();
        grid.spawn_creature(Position::new(1, 2), 10.0).unwrap();
        grid.spawn_tree(Position::new(1, 2), 3).unwrap();
        grid.spawn_tree(Position::new(0, 0), 3).unwrap();

        let heat = grid.heat_map();
        assert_eq!(heat.len(), 3);
        assert_eq!(heat[1][2], 2.5);
        assert_eq!(heat[0][0], 0.5);
        assert_eq!(heat[2][2], 0.0);
    }

    #[test]
    fn test_snapshot_bytes() {
        let mut grid = Grid::new(4);
        grid.spawn_creature(Position::new(1, 1), 10.0).unwrap();
        grid.spawn_tree(Position::new(2, 3), 3).unwrap();

        let restored = Grid::from_bytes(&grid.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.size(), 4);
        assert_eq!(restored.creature_count(), 1);
        assert_eq!(restored.tree_count(), 1);
    }

    proptest! {
        #[test]
        fn relocations_keep_cells_consistent(
            starts in prop::collection::vec((0i32..6, 0i32..6), 1..12),
            moves in prop::collection::vec((0usize..12, 0i32..6, 0i32..6), 0..40),
        ) {
            let mut grid = Grid::new(6);
            let mut placed: Vec<(EntityId, Position)> = starts
                .iter()
                .map(|&(x, y)| {
                    let pos = Position::new(x, y);
                    (grid.spawn_creature(pos, 10.0).unwrap(), pos)
                })
                .collect();

            for (pick, x, y) in moves {
                let slot = pick % placed.len();
                let (id, from) = placed[slot];
                let to = Position::new(x, y);
                grid.relocate(from, id, to).unwrap();
                placed[slot] = (id, to);
            }

            prop_assert_eq!(grid.creature_count(), placed.len());
            for (id, pos) in &placed {
                prop_assert!(grid.creature(*pos, *id).is_some());
            }
            for (index, cell) in grid.cells.iter().enumerate() {
                for entity in cell {
                    prop_assert_eq!(entity.position(), grid.index_to_pos(index));
                }
            }
        }
    }
}

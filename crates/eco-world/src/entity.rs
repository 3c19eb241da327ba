//! Entities that occupy grid cells.

use eco_core::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an entity, unique within the grid that allocated it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A mobile agent that needs one food unit per turn to survive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: EntityId,
    position: Position,
    pub energy: f64,
    /// Received food during the current turn
    pub fed: bool,
    /// Set on the first successful pairing and never cleared
    pub has_mated: bool,
}

impl Creature {
    pub fn new(id: EntityId, position: Position, energy: f64) -> Self {
        Self {
            id,
            position,
            energy,
            fed: false,
            has_mated: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn distance_to(&self, target: &Position) -> f64 {
        self.position.distance_to(target)
    }

    /// Whether the energy budget covers a trip to `target`
    pub fn can_reach(&self, target: &Position) -> bool {
        self.distance_to(target) <= self.energy
    }

    /// Start a new epoch with a full energy budget and an empty stomach
    pub fn reset(&mut self, energy: f64) {
        self.energy = energy;
        self.fed = false;
    }
}

impl fmt::Display for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Creature({}, {}, {})",
            self.position.x, self.position.y, self.energy
        )
    }
}

/// A stationary food source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub id: EntityId,
    position: Position,
    pub food: u32,
}

impl Tree {
    pub fn new(id: EntityId, position: Position, food: u32) -> Self {
        Self { id, position, food }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn has_food(&self) -> bool {
        self.food > 0
    }

    /// Hand out one food unit; false once the tree is bare
    pub fn take_food(&mut self) -> bool {
        if self.food == 0 {
            return false;
        }
        self.food -= 1;
        true
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tree({}, {}, {})", self.position.x, self.position.y, self.food)
    }
}

/// Occupant of a grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Creature(Creature),
    Tree(Tree),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Creature(creature) => creature.id,
            Entity::Tree(tree) => tree.id,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Entity::Creature(creature) => creature.position,
            Entity::Tree(tree) => tree.position,
        }
    }

    /// Only the grid may change a stored entity's position
    pub(crate) fn set_position(&mut self, position: Position) {
        match self {
            Entity::Creature(creature) => creature.position = position,
            Entity::Tree(tree) => tree.position = position,
        }
    }

    pub fn as_creature(&self) -> Option<&Creature> {
        match self {
            Entity::Creature(creature) => Some(creature),
            Entity::Tree(_) => None,
        }
    }

    pub fn as_creature_mut(&mut self) -> Option<&mut Creature> {
        match self {
            Entity::Creature(creature) => Some(creature),
            Entity::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Entity::Tree(tree) => Some(tree),
            Entity::Creature(_) => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut Tree> {
        match self {
            Entity::Tree(tree) => Some(tree),
            Entity::Creature(_) => None,
        }
    }
}

impl From<Creature> for Entity {
    fn from(creature: Creature) -> Self {
        Entity::Creature(creature)
    }
}

impl From<Tree> for Entity {
    fn from(tree: Tree) -> Self {
        Entity::Tree(tree)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Creature(creature) => creature.fmt(f),
            Entity::Tree(tree) => tree.fmt(f),
        }
    }
}

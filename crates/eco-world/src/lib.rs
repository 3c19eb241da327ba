//! World simulation engine.
//!
//! This module implements the 2D grid ecosystem where creatures compete for
//! food from trees, starve, and pair up to reproduce.

pub mod entity;
pub mod grid;
pub mod interactions;
pub mod placement;
pub mod search;
pub mod simulation;
pub mod sink;

pub use entity::{Creature, Entity, EntityId, Tree};
pub use grid::Grid;
pub use placement::{PositionSource, ScriptedPositions, UniformPositions};
pub use search::{find_closest_food, find_closest_mate};
pub use simulation::{Simulation, SimulationState};
pub use sink::{CsvStatsSink, MemoryStatsSink, StatsSink};

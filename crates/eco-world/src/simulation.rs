//! Turn engine: movement, feeding, death, mating and the epoch reset.

use crate::entity::EntityId;
use crate::grid::Grid;
use crate::interactions;
use crate::placement::{PositionSource, UniformPositions};
use crate::search::{find_closest_food, find_closest_mate};
use crate::sink::{CsvStatsSink, StatsSink};
use eco_core::{Error, Position, Result, SimConfig, TurnStats};
use std::fmt;
use tracing::{debug, info, instrument, trace};
use uuid::Uuid;

/// Lifecycle of a simulation instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Idle,
    Running,
    Completed,
}

pub struct Simulation<S: StatsSink = CsvStatsSink, P: PositionSource = UniformPositions> {
    id: Uuid,
    config: SimConfig,
    grid: Grid,
    sink: S,
    positions: P,
    state: SimulationState,
    population: usize,
    current_turn: u64,
    food_eaten: usize,
    new_creatures: usize,
}

impl Simulation<CsvStatsSink, UniformPositions> {
    /// Simulation writing to `config.stats_path` and placing entities with a
    /// generator seeded from `config.seed`
    pub fn from_config(config: SimConfig) -> Result<Self> {
        let sink = CsvStatsSink::new(&config.stats_path);
        let positions = UniformPositions::new(config.seed);
        Self::new(config, sink, positions)
    }
}

impl<S: StatsSink, P: PositionSource> Simulation<S, P> {
    pub fn new(config: SimConfig, sink: S, positions: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            grid: Grid::new(config.grid_size),
            config,
            sink,
            positions,
            state: SimulationState::Idle,
            population: 0,
            current_turn: 0,
            food_eaten: 0,
            new_creatures: 0,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn current_turn(&self) -> u64 {
        self.current_turn
    }

    pub fn food_eaten(&self) -> usize {
        self.food_eaten
    }

    pub fn new_creatures(&self) -> usize {
        self.new_creatures
    }

    /// Run a whole simulation of `turns` turns
    #[instrument(skip(self), fields(sim_id = %self.id))]
    pub fn start(&mut self, turns: u64) -> Result<()> {
        info!(
            grid_size = self.config.grid_size,
            start_population = self.config.start_population,
            num_trees = self.config.num_trees,
            "Starting simulation for {} turns",
            turns
        );

        self.begin()?;
        while self.current_turn <= turns {
            self.step()?;
        }
        self.state = SimulationState::Completed;

        info!(
            event = "simulation_complete",
            final_turn = self.current_turn,
            population = self.population,
            "Simulation finished"
        );
        Ok(())
    }

    /// Write the statistics header, place the initial population and trees,
    /// and log turn 0. Afterwards [`Simulation::step`] may be called once per turn.
    pub fn begin(&mut self) -> Result<()> {
        if self.state != SimulationState::Idle {
            return Err(Error::InvalidState(format!(
                "simulation already started ({:?})",
                self.state
            )));
        }

        self.sink.write_header()?;
        for _ in 0..self.config.start_population {
            let pos = self.positions.next_position(self.config.grid_size);
            self.place_creature(pos)?;
        }
        self.plant_trees()?;
        self.record_turn()?;

        self.state = SimulationState::Running;
        self.current_turn = 1;
        Ok(())
    }

    /// Execute one turn and return the row it logged
    pub fn step(&mut self) -> Result<TurnStats> {
        if self.state != SimulationState::Running {
            return Err(Error::InvalidState(format!(
                "cannot step a simulation in state {:?}",
                self.state
            )));
        }

        // Creatures that move or are born during the pass are not revisited
        let snapshot: Vec<(Position, EntityId)> = self
            .grid
            .creatures()
            .map(|creature| (creature.position(), creature.id))
            .collect();

        for (pos, id) in snapshot {
            self.process_creature(pos, id)?;
        }

        self.current_turn += 1;
        let stats = self.record_turn()?;
        self.reset()?;
        Ok(stats)
    }

    fn process_creature(&mut self, start: Position, id: EntityId) -> Result<()> {
        let rule = self.config.movement;
        let mut pos = start;

        if let Some(food) = find_closest_food(&self.grid, pos) {
            if self.grid.move_creature(pos, id, food, rule)? {
                pos = food;
            }
        }

        self.feed_cell(pos)?;

        let (fed, has_mated) = self
            .grid
            .creature(pos, id)
            .map(|creature| (creature.fed, creature.has_mated))
            .ok_or_else(|| Error::NotFound(format!("creature {} at {}", id, pos)))?;
        if !fed {
            self.grid.remove(pos, id)?;
            self.population -= 1;
            trace!(
                event = "creature_death",
                creature_id = %id,
                x = pos.x,
                y = pos.y,
                turn = self.current_turn,
                "Creature starved"
            );
            return Ok(());
        }

        if has_mated {
            return Ok(());
        }

        if let Some(mate_pos) = find_closest_mate(&self.grid, pos, Some(id)) {
            if self.grid.move_creature(pos, id, mate_pos, rule)? {
                self.mate_at(mate_pos, id)?;
            }
        }

        Ok(())
    }

    /// Place a creature with the default energy, keeping `population` in step
    pub fn place_creature(&mut self, pos: Position) -> Result<EntityId> {
        let id = self.grid.spawn_creature(pos, self.config.default_energy)?;
        self.population += 1;
        Ok(id)
    }

    pub fn place_tree(&mut self, pos: Position) -> Result<EntityId> {
        self.grid.spawn_tree(pos, self.config.tree_food)
    }

    fn plant_trees(&mut self) -> Result<()> {
        for _ in 0..self.config.num_trees {
            let pos = self.positions.next_position(self.config.grid_size);
            self.place_tree(pos)?;
        }
        Ok(())
    }

    /// Run food distribution on one cell, counting the units eaten
    pub fn feed_cell(&mut self, pos: Position) -> Result<usize> {
        let eaten = interactions::distribute_food(&mut self.grid, pos)?;
        self.food_eaten += eaten;
        Ok(eaten)
    }

    /// Try to pair creature `id` with a cellmate at `pos`, counting any birth
    pub fn mate_at(&mut self, pos: Position, id: EntityId) -> Result<Option<EntityId>> {
        let offspring = interactions::mate(&mut self.grid, pos, id, self.config.default_energy)?;
        if let Some(child) = offspring {
            self.population += 1;
            self.new_creatures += 1;
            trace!(
                event = "creature_birth",
                parent_id = %id,
                creature_id = %child,
                x = pos.x,
                y = pos.y,
                turn = self.current_turn,
                "Creatures mated"
            );
        }
        Ok(offspring)
    }

    /// Epoch boundary: restore creatures, clear every tree, zero the per-turn
    /// counters, and plant a fresh batch of trees. Mate flags survive.
    pub fn reset(&mut self) -> Result<()> {
        self.grid.reset_creatures(self.config.default_energy);
        let removed = self.grid.remove_trees();
        self.food_eaten = 0;
        self.new_creatures = 0;
        self.plant_trees()?;
        trace!(removed_trees = removed, turn = self.current_turn, "Epoch reset");
        Ok(())
    }

    fn record_turn(&mut self) -> Result<TurnStats> {
        let stats = TurnStats::new(self.population, self.food_eaten, self.new_creatures);
        self.sink.append(&stats)?;
        debug!(
            event = "turn_summary",
            turn = self.current_turn,
            population = stats.population,
            food_eaten = stats.food_eaten,
            new_creatures = stats.new_creatures,
            "Turn recorded"
        );
        Ok(stats)
    }
}

impl<S: StatsSink, P: PositionSource> fmt::Display for Simulation<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.population, self.config.stats_path, self.current_turn
        )
    }
}

//! Sources of coordinates for placing creatures and trees.

use eco_core::Position;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Supplies positions for new entities. No de-duplication is implied.
pub trait PositionSource {
    fn next_position(&mut self, grid_size: i32) -> Position;
}

/// Independent uniform x and y in `[0, grid_size)`
pub struct UniformPositions {
    rng: ChaCha8Rng,
}

impl UniformPositions {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PositionSource for UniformPositions {
    fn next_position(&mut self, grid_size: i32) -> Position {
        let x = self.rng.gen_range(0..grid_size);
        let y = self.rng.gen_range(0..grid_size);
        Position::new(x, y)
    }
}

/// Replays a fixed list of positions, cycling when exhausted.
/// An empty list yields the origin.
pub struct ScriptedPositions {
    positions: Vec<Position>,
    cursor: usize,
}

impl ScriptedPositions {
    pub fn new(positions: Vec<Position>) -> Self {
        Self {
            positions,
            cursor: 0,
        }
    }
}

impl PositionSource for ScriptedPositions {
    fn next_position(&mut self, _grid_size: i32) -> Position {
        if self.positions.is_empty() {
            return Position::new(0, 0);
        }
        let position = self.positions[self.cursor % self.positions.len()];
        self.cursor += 1;
        position
    }
}

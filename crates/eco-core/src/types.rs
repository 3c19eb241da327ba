//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// 2D integer coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Component-wise average. Not necessarily a grid coordinate, so the
    /// result stays fractional; use [`Position::midpoint_cell`] to re-enter the grid.
    pub fn midpoint(&self, other: &Position) -> (f64, f64) {
        (
            (f64::from(self.x) + f64::from(other.x)) / 2.0,
            (f64::from(self.y) + f64::from(other.y)) / 2.0,
        )
    }

    /// Midpoint rounded down to the containing cell
    pub fn midpoint_cell(&self, other: &Position) -> Position {
        let (x, y) = self.midpoint(other);
        Position::new(x.floor() as i32, y.floor() as i32)
    }

    /// Whether the position lies within `[0, grid_size)` on both axes
    pub fn in_bounds(&self, grid_size: i32) -> bool {
        (0..grid_size).contains(&self.x) && (0..grid_size).contains(&self.y)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, other: Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// How engine-issued moves treat a creature's energy budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementRule {
    /// A move longer than the creature's energy is refused
    Gated,
    /// Moves always happen; energy may go negative
    #[default]
    Unconditional,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_position_arithmetic() {
        let p1 = Position::new(1, 2);
        let p2 = Position::new(3, 4);
        assert_eq!(p1 + p2, Position::new(4, 6));
        assert_eq!(p1 - p2, Position::new(-2, -2));
    }

    #[test]
    fn test_distance() {
        let p1 = Position::new(1, 2);
        let p2 = Position::new(3, 4);
        assert!((p1.distance_to(&p2) - 8f64.sqrt()).abs() < 1e-12);
        assert_eq!(Position::new(0, 0).distance_to(&Position::new(3, 4)), 5.0);
    }

    #[test]
    fn test_midpoint() {
        let p1 = Position::new(1, 2);
        let p2 = Position::new(3, 4);
        assert_eq!(p1.midpoint(&p2), (2.0, 3.0));

        let odd = Position::new(0, 0).midpoint(&Position::new(1, 3));
        assert_eq!(odd, (0.5, 1.5));
        assert_eq!(
            Position::new(0, 0).midpoint_cell(&Position::new(1, 3)),
            Position::new(0, 1)
        );
    }

    #[test]
    fn test_in_bounds() {
        assert!(Position::new(0, 0).in_bounds(10));
        assert!(Position::new(9, 9).in_bounds(10));
        assert!(!Position::new(10, 0).in_bounds(10));
        assert!(!Position::new(0, -1).in_bounds(10));
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(1, 2).to_string(), "(1, 2)");
    }

    fn coord() -> impl Strategy<Value = i32> {
        -10_000i32..10_000
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(ax in coord(), ay in coord(), bx in coord(), by in coord()) {
            let p = Position::new(ax, ay);
            let q = Position::new(bx, by);
            prop_assert_eq!(p.distance_to(&q), q.distance_to(&p));
        }

        #[test]
        fn midpoint_is_symmetric(ax in coord(), ay in coord(), bx in coord(), by in coord()) {
            let p = Position::new(ax, ay);
            let q = Position::new(bx, by);
            prop_assert_eq!(p.midpoint(&q), q.midpoint(&p));
        }

        #[test]
        fn add_then_sub_is_identity(ax in coord(), ay in coord(), bx in coord(), by in coord()) {
            let p = Position::new(ax, ay);
            let q = Position::new(bx, by);
            prop_assert_eq!((p + q) - q, p);
        }
    }
}

//! Move orders produced by the planner.

use super::location::{Direction, Location};

/// Move the unit standing on `location` one step in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveOrder {
    pub location: Location,
    pub direction: Direction,
}

impl MoveOrder {
    pub const fn new(location: Location, direction: Direction) -> Self {
        MoveOrder {
            location,
            direction,
        }
    }
}

//! Multi-turn unit commitments.
//!
//! A goal binds whichever unit stands on its current point to a precomputed
//! path, a strategy tag and an early-exit condition. Units have no identity
//! across turns, so the planner re-attaches goals by coordinate.

use std::collections::VecDeque;

use super::strategy::Strategy;
use crate::world::{Location, Tile, WorldState};

/// Reasons a strategy handler could not produce a goal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GoalError {
    #[error("no path from {from} to {to}")]
    NoPath { from: Location, to: Location },

    #[error("no target for {}", .0.name())]
    NoTarget(Strategy),

    #[error("goal path is empty")]
    EmptyPath,

    #[error("turn budget too low to search")]
    OutOfTime,
}

/// Condition under which a goal is abandoned before its path runs out.
///
/// Evaluated purely against the snapshot, so checking it twice in one turn
/// always agrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Never,
    Always,
    /// The food at this cell has been eaten.
    FoodGone(Location),
    /// No enemy stands on this cell any more.
    EnemyGone(Location),
    /// Some unit now occupies this cell, or it turned out to be water.
    CellOccupied(Location),
}

impl Termination {
    pub fn is_met(&self, world: &WorldState) -> bool {
        match *self {
            Termination::Never => false,
            Termination::Always => true,
            Termination::FoodGone(loc) => !world.has_food(loc),
            Termination::EnemyGone(loc) => !world.has_enemy(loc),
            Termination::CellOccupied(loc) => !world.is_unoccupied(loc),
        }
    }
}

/// A unit's commitment to walk a path toward a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub start_point: Location,
    pub current_point: Location,
    pub strategy: Strategy,
    pub termination: Termination,
    /// Set when a unit this turn was matched to the goal.
    pub unit_exists: bool,
    pub current_step: usize,
    start_path: Vec<Tile>,
    remaining: VecDeque<Tile>,
}

impl Goal {
    /// Builds a goal from a path whose first cell is the start point.
    pub fn new(
        start_point: Location,
        path: Vec<Tile>,
        termination: Termination,
        strategy: Strategy,
    ) -> Result<Self, GoalError> {
        if path.is_empty() {
            return Err(GoalError::EmptyPath);
        }
        let mut remaining: VecDeque<Tile> = path.iter().copied().collect();
        remaining.pop_front();

        Ok(Goal {
            start_point,
            current_point: start_point,
            strategy,
            termination,
            unit_exists: true,
            current_step: 0,
            start_path: path,
            remaining,
        })
    }

    /// The last cell of the original path.
    pub fn end_point(&self) -> Location {
        // `new` rejects empty paths.
        self.start_path
            .last()
            .map(|t| t.location)
            .unwrap_or(self.start_point)
    }

    pub fn start_path(&self) -> &[Tile] {
        &self.start_path
    }

    pub fn remaining(&self) -> &VecDeque<Tile> {
        &self.remaining
    }

    /// The next committed cell, if any.
    pub fn next_step(&self) -> Option<Location> {
        self.remaining.front().map(|t| t.location)
    }

    /// Consumes the next committed cell after the unit moved to `to`.
    pub fn advance(&mut self, to: Location) -> Option<Tile> {
        let step = self.remaining.pop_front();
        self.current_point = to;
        self.current_step += 1;
        step
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// True if the goal should be dropped: out of steps, its early-exit
    /// condition holds, or the next committed cell turned out to be water.
    pub fn is_terminated(&self, world: &WorldState) -> bool {
        match self.next_step() {
            None => true,
            Some(next) => !world.is_passable(next) || self.termination.is_met(world),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loc, open_world};

    fn straight_path(world: &WorldState, cells: &[(usize, usize)]) -> Vec<Tile> {
        cells.iter().map(|&(r, c)| world.tile(loc(r, c))).collect()
    }

    #[test]
    fn start_cell_is_pre_consumed() {
        let w = open_world(10, 10);
        let path = straight_path(&w, &[(0, 0), (0, 1), (0, 2), (0, 3)]);
        let mut goal = Goal::new(loc(0, 0), path, Termination::Never, Strategy::Scout).unwrap();
        assert_eq!(goal.remaining().len(), 3);
        assert_eq!(goal.end_point(), loc(0, 3));
        assert_eq!(goal.next_step(), Some(loc(0, 1)));
        assert!(!goal.is_terminated(&w));

        for col in 1..=3 {
            let step = goal.advance(loc(0, col)).unwrap();
            assert_eq!(step.location, loc(0, col));
        }
        assert_eq!(goal.current_point, loc(0, 3));
        assert_eq!(goal.current_step, 3);
        assert!(goal.is_exhausted());
        assert!(goal.is_terminated(&w));
        assert_eq!(goal.start_path().len(), 4);
    }

    #[test]
    fn water_on_the_next_step_terminates() {
        let mut w = open_world(10, 10);
        let path = straight_path(&w, &[(0, 0), (0, 1), (0, 2)]);
        let goal = Goal::new(loc(0, 0), path, Termination::Never, Strategy::Scout).unwrap();
        assert!(!goal.is_terminated(&w));
        w.add_water(loc(0, 1));
        assert!(goal.is_terminated(&w));
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = Goal::new(loc(0, 0), Vec::new(), Termination::Never, Strategy::Scout);
        assert_eq!(err.unwrap_err(), GoalError::EmptyPath);
    }

    #[test]
    fn food_gone_fires_when_food_removed() {
        let mut w = open_world(10, 10);
        w.add_food(loc(3, 3));
        let t = Termination::FoodGone(loc(3, 3));
        assert!(!t.is_met(&w));
        w.remove_food(loc(3, 3));
        assert!(t.is_met(&w));
        assert!(t.is_met(&w));
    }

    #[test]
    fn enemy_gone_and_cell_occupied() {
        let mut w = open_world(10, 10);
        w.add_unit(loc(1, 1), 2);
        assert!(!Termination::EnemyGone(loc(1, 1)).is_met(&w));
        assert!(Termination::EnemyGone(loc(1, 2)).is_met(&w));
        assert!(Termination::CellOccupied(loc(1, 1)).is_met(&w));
        assert!(!Termination::CellOccupied(loc(1, 2)).is_met(&w));
    }

    #[test]
    fn fixed_terminations() {
        let w = open_world(4, 4);
        assert!(Termination::Always.is_met(&w));
        assert!(!Termination::Never.is_met(&w));
    }
}

//! Path computation for goal construction.
//!
//! Two modes: a cheap greedy wrap-aware walk for targets beyond what a unit
//! can see (obstacle detail there is unknown anyway), and a bounded A* over
//! visible walkable cells for everything closer.

pub mod astar;

use crate::world::{Location, Tile, WorldState};

/// Chooses between the greedy walk and the local search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathProvider {
    pub perception_radius: usize,
    pub node_limit: usize,
}

impl PathProvider {
    /// A provider with an explicit radius and A* node cap.
    pub const fn new(perception_radius: usize, node_limit: usize) -> Self {
        PathProvider {
            perception_radius,
            node_limit,
        }
    }

    /// A provider whose perception radius is the world's view radius.
    pub fn for_world(world: &WorldState, node_limit: usize) -> Self {
        PathProvider::new(world.settings.view_radius(), node_limit)
    }

    /// True when either axis delta exceeds the perception radius.
    pub fn is_long_range(&self, world: &WorldState, from: Location, to: Location) -> bool {
        let size = world.size();
        size.row_delta(from, to) > self.perception_radius
            || size.col_delta(from, to) > self.perception_radius
    }

    /// Ordered tiles from `from` to `to` inclusive, or `None` if the local
    /// search cannot reach the target.
    pub fn find_path(&self, world: &WorldState, from: Location, to: Location) -> Option<Vec<Tile>> {
        if self.is_long_range(world, from, to) {
            Some(world.greedy_path(from, to))
        } else {
            astar::find_path(world, from, to, self.node_limit)
        }
    }
}

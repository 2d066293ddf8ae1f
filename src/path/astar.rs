//! Bounded A* over the visible toroidal grid.
//!
//! Intermediate cells must be walkable (land or food, no unit). The target
//! only has to be passable, so a path may end on an enemy's cell. The search
//! gives up after expanding `node_limit` cells.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::world::{Location, Tile, WorldState, ALL_DIRECTIONS};

/// Entry in the open set.
#[derive(Debug, Clone, Copy)]
struct PathNode {
    location: Location,
    f_cost: usize,
    h_cost: usize,
    seq: u64,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap: lowest f, then lowest h, then oldest.
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a shortest walkable path from `start` to `goal`, both included.
///
/// Returns `None` if the goal is impassable, unreachable, or the node limit
/// is hit first.
pub fn find_path(
    world: &WorldState,
    start: Location,
    goal: Location,
    node_limit: usize,
) -> Option<Vec<Tile>> {
    if start == goal {
        return Some(vec![world.tile(start)]);
    }
    if !world.is_passable(goal) {
        return None;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<Location, Location> = HashMap::new();
    let mut g_scores: HashMap<Location, usize> = HashMap::new();
    let mut seq = 0u64;
    let mut expanded = 0usize;

    g_scores.insert(start, 0);
    let h = world.distance(start, goal);
    open_set.push(PathNode {
        location: start,
        f_cost: h,
        h_cost: h,
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.location == goal {
            return Some(reconstruct_path(world, &came_from, goal));
        }

        let current_g = g_scores
            .get(&current.location)
            .copied()
            .unwrap_or(usize::MAX);
        // Stale heap entry.
        if current.f_cost > current_g.saturating_add(current.h_cost) {
            continue;
        }

        expanded += 1;
        if expanded > node_limit {
            return None;
        }

        for dir in ALL_DIRECTIONS {
            let neighbor = world.destination(current.location, dir);
            if neighbor != goal && !world.is_walkable(neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(usize::MAX);
            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.location);
                g_scores.insert(neighbor, tentative_g);

                let h_cost = world.distance(neighbor, goal);
                seq += 1;
                open_set.push(PathNode {
                    location: neighbor,
                    f_cost: tentative_g + h_cost,
                    h_cost,
                    seq,
                });
            }
        }
    }

    None
}

fn reconstruct_path(
    world: &WorldState,
    came_from: &HashMap<Location, Location>,
    mut current: Location,
) -> Vec<Tile> {
    let mut path = vec![world.tile(current)];
    while let Some(&prev) = came_from.get(&current) {
        path.push(world.tile(prev));
        current = prev;
    }
    path.reverse();
    path
}

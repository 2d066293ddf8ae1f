//! Shared fixtures for unit tests.

use crate::world::{GameSettings, Location, WorldState};

/// A world of the given size with every cell already seen as land.
pub(crate) fn open_world(rows: usize, cols: usize) -> WorldState {
    let mut w = WorldState::new(GameSettings {
        rows,
        cols,
        turn_time_ms: 10_000,
        ..GameSettings::default()
    });
    for idx in 0..w.size().area() {
        let loc = w.size().location_at(idx);
        w.mark_seen(loc);
    }
    w
}

pub(crate) fn loc(row: usize, col: usize) -> Location {
    Location::new(row, col)
}

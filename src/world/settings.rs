//! Game parameters announced by the judge during turn 0.

use std::time::Duration;

use super::location::MapSize;

/// Static parameters of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub load_time_ms: u64,
    pub turn_time_ms: u64,
    pub rows: usize,
    pub cols: usize,
    pub turns: u32,
    pub view_radius2: u32,
    pub attack_radius2: u32,
    pub spawn_radius2: u32,
    pub player_seed: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            load_time_ms: 3000,
            turn_time_ms: 1000,
            rows: 0,
            cols: 0,
            turns: 1000,
            view_radius2: 77,
            attack_radius2: 5,
            spawn_radius2: 1,
            player_seed: 0,
        }
    }
}

impl GameSettings {
    /// Applies a `key value` settings line. Returns false for unknown keys.
    pub fn apply(&mut self, key: &str, value: i64) -> bool {
        let v = value.max(0);
        match key {
            "loadtime" => self.load_time_ms = v as u64,
            "turntime" => self.turn_time_ms = v as u64,
            "rows" => self.rows = v as usize,
            "cols" => self.cols = v as usize,
            "turns" => self.turns = v as u32,
            "viewradius2" => self.view_radius2 = v as u32,
            "attackradius2" => self.attack_radius2 = v as u32,
            "spawnradius2" => self.spawn_radius2 = v as u32,
            "player_seed" => self.player_seed = value as u64,
            _ => return false,
        }
        true
    }

    /// Map dimensions announced by the judge.
    pub const fn map_size(&self) -> MapSize {
        MapSize::new(self.rows, self.cols)
    }

    /// The per-turn time budget.
    pub const fn turn_time(&self) -> Duration {
        Duration::from_millis(self.turn_time_ms)
    }

    /// Largest whole number of cells a unit can see along one axis.
    pub fn view_radius(&self) -> usize {
        (self.view_radius2 as f64).sqrt().floor() as usize
    }
}

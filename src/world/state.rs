//! Per-turn world snapshot.
//!
//! Holds the persistent terrain grid (water is never forgotten), the current
//! turn's unit rosters and food, and the geometry helpers every planner
//! component uses. Transient markers from the previous turn are cleared by
//! [`WorldState::start_new_turn`] before the judge's updates are folded in.

use std::time::{Duration, Instant};

use super::location::{Direction, Location, MapSize};
use super::settings::GameSettings;
use super::tile::{Tile, TileType};

/// A unit on the map this turn. Team 0 is us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unit {
    pub location: Location,
    pub team: u32,
}

/// Complete, queryable map state for one turn.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub settings: GameSettings,
    pub turn: u32,
    pub my_units: Vec<Unit>,
    pub enemy_units: Vec<Unit>,
    pub food: Vec<Location>,
    pub dead: Vec<Location>,
    size: MapSize,
    map: Vec<TileType>,
    seen: Vec<bool>,
    turn_start: Instant,
}

impl WorldState {
    /// Creates a fully unseen map for the given settings.
    pub fn new(settings: GameSettings) -> Self {
        let size = settings.map_size();
        WorldState {
            settings,
            turn: 0,
            my_units: Vec::new(),
            enemy_units: Vec::new(),
            food: Vec::new(),
            dead: Vec::new(),
            size,
            map: vec![TileType::Unseen; size.area()],
            seen: vec![false; size.area()],
            turn_start: Instant::now(),
        }
    }

    /// The map dimensions.
    pub const fn size(&self) -> MapSize {
        self.size
    }

    /// Wraps a raw coordinate onto this map.
    pub fn wrap(&self, row: i64, col: i64) -> Location {
        self.size.wrap(row, col)
    }

    // --- Ingestion -------------------------------------------------------

    /// Clears units, food and death markers from the previous turn and
    /// restarts the turn clock.
    pub fn start_new_turn(&mut self, turn: u32) {
        self.turn = turn;
        self.turn_start = Instant::now();

        let stale: Vec<Location> = self
            .my_units
            .iter()
            .chain(self.enemy_units.iter())
            .map(|u| u.location)
            .chain(self.dead.iter().copied())
            .chain(self.food.iter().copied())
            .collect();
        for loc in stale {
            self.set(loc, TileType::Land);
        }

        self.my_units.clear();
        self.enemy_units.clear();
        self.dead.clear();
        self.food.clear();
    }

    /// Places a unit; team 0 is ours.
    pub fn add_unit(&mut self, location: Location, team: u32) {
        let unit = Unit { location, team };
        if team == 0 {
            self.set(location, TileType::FriendlyUnit);
            self.my_units.push(unit);
        } else {
            self.set(location, TileType::EnemyUnit);
            self.enemy_units.push(unit);
        }
    }

    /// Records food at `location`. Duplicate reports are ignored.
    pub fn add_food(&mut self, location: Location) {
        self.set(location, TileType::Food);
        if !self.food.contains(&location) {
            self.food.push(location);
        }
    }

    /// Forgets food the judge says is gone.
    pub fn remove_food(&mut self, location: Location) {
        // A unit may already stand where the food was.
        if self.tile_type(location) == TileType::Food {
            self.set(location, TileType::Land);
        }
        self.food.retain(|f| *f != location);
    }

    /// Marks a cell as water for the rest of the game.
    pub fn add_water(&mut self, location: Location) {
        self.set(location, TileType::Water);
    }

    /// Records a unit that died this turn.
    pub fn add_dead(&mut self, location: Location) {
        // Food can spawn where a unit just died; only overwrite land.
        if self.tile_type(location) == TileType::Land {
            self.set(location, TileType::Dead);
        }
        self.dead.push(location);
    }

    /// Marks every cell inside a friendly unit's view radius as seen,
    /// turning never-seen cells into land.
    pub fn update_visibility(&mut self) {
        let radius2 = self.settings.view_radius2 as i64;
        let radius = self.settings.view_radius() as i64;
        let centers: Vec<Location> = self.my_units.iter().map(|u| u.location).collect();
        for center in centers {
            for dr in -radius..=radius {
                for dc in -radius..=radius {
                    if dr * dr + dc * dc > radius2 {
                        continue;
                    }
                    let loc = self.wrap(center.row as i64 + dr, center.col as i64 + dc);
                    self.mark_seen(loc);
                }
            }
        }
    }

    /// Records a cell as observed. Unseen cells become land.
    pub fn mark_seen(&mut self, location: Location) {
        let idx = self.size.index(location);
        self.seen[idx] = true;
        if self.map[idx] == TileType::Unseen {
            self.map[idx] = TileType::Land;
        }
    }

    fn set(&mut self, location: Location, tile_type: TileType) {
        debug_assert!(self.size.contains(location), "{} is off the map", location);
        let idx = self.size.index(location);
        self.map[idx] = tile_type;
        if tile_type != TileType::Unseen {
            self.seen[idx] = true;
        }
    }

    // --- Queries ---------------------------------------------------------

    /// What currently occupies `location`.
    pub fn tile_type(&self, location: Location) -> TileType {
        self.map[self.size.index(location)]
    }

    /// The cell at `location` with its contents.
    pub fn tile(&self, location: Location) -> Tile {
        Tile::new(self.tile_type(location), location)
    }

    /// True if the cell has ever been observed.
    pub fn was_seen(&self, location: Location) -> bool {
        self.seen[self.size.index(location)]
    }

    /// True unless the cell is water.
    pub fn is_passable(&self, location: Location) -> bool {
        self.tile_type(location) != TileType::Water
    }

    /// True if the cell is passable and no unit stands on it.
    pub fn is_unoccupied(&self, location: Location) -> bool {
        let t = self.tile_type(location);
        t != TileType::Water && !t.is_unit()
    }

    /// True for land or food with no unit on it.
    pub fn is_walkable(&self, location: Location) -> bool {
        self.tile(location).is_walkable()
    }

    /// True if food lies at `location`.
    pub fn has_food(&self, location: Location) -> bool {
        self.tile_type(location) == TileType::Food
    }

    /// True if an enemy unit stands at `location`.
    pub fn has_enemy(&self, location: Location) -> bool {
        self.tile_type(location) == TileType::EnemyUnit
    }

    // --- Geometry --------------------------------------------------------

    /// Toroidal Manhattan distance.
    pub fn distance(&self, a: Location, b: Location) -> usize {
        self.size.row_delta(a, b) + self.size.col_delta(a, b)
    }

    /// Toroidal squared Euclidean distance, the metric radii are given in.
    pub fn distance2(&self, a: Location, b: Location) -> usize {
        let dr = self.size.row_delta(a, b);
        let dc = self.size.col_delta(a, b);
        dr * dr + dc * dc
    }

    /// The cell one step from `location` in `direction`.
    pub fn destination(&self, location: Location, direction: Direction) -> Location {
        let (dr, dc) = direction.delta();
        self.wrap(location.row as i64 + dr, location.col as i64 + dc)
    }

    /// Ranks the one or two directions that most directly close the gap
    /// from `from` to `to`.
    ///
    /// Each axis contributes the direct direction when it is no longer than
    /// going around, and the wrap-around direction when that is no longer
    /// than going direct; a tie contributes both, wrap-around first. Row
    /// directions precede column directions. When both axes differ only the
    /// best candidate of each is kept, so the result never exceeds two.
    pub fn directions_towards(&self, from: Location, to: Location) -> Vec<Direction> {
        let rows = axis_candidates(
            from.row,
            to.row,
            self.size.rows,
            Direction::North,
            Direction::South,
        );
        let cols = axis_candidates(
            from.col,
            to.col,
            self.size.cols,
            Direction::West,
            Direction::East,
        );
        match (rows.first(), cols.first()) {
            (Some(&r), Some(&c)) => vec![r, c],
            (Some(_), None) => rows,
            (None, Some(_)) => cols,
            (None, None) => Vec::new(),
        }
    }

    /// A cheap wrap-aware path that always takes the first ranked direction.
    /// Obstacles are ignored.
    pub fn greedy_path(&self, from: Location, to: Location) -> Vec<Tile> {
        let steps = self.distance(from, to);
        let mut path = Vec::with_capacity(steps + 1);
        let mut current = from;
        path.push(self.tile(current));
        for _ in 0..steps {
            let Some(&dir) = self.directions_towards(current, to).first() else {
                break;
            };
            current = self.destination(current, dir);
            path.push(self.tile(current));
        }
        path
    }

    // --- Clock -----------------------------------------------------------

    /// Time left in this turn's budget, saturating at zero.
    pub fn time_remaining(&self) -> Duration {
        self.settings
            .turn_time()
            .saturating_sub(self.turn_start.elapsed())
    }
}

/// Candidate directions along one axis. `toward_lower` decreases the
/// coordinate, `toward_higher` increases it.
fn axis_candidates(
    from: usize,
    to: usize,
    len: usize,
    toward_lower: Direction,
    toward_higher: Direction,
) -> Vec<Direction> {
    if from == to {
        return Vec::new();
    }
    let (direct, direct_dir, wrap_dir) = if from < to {
        (to - from, toward_higher, toward_lower)
    } else {
        (from - to, toward_lower, toward_higher)
    };
    let around = len - direct;

    let mut out = Vec::with_capacity(2);
    if around <= direct {
        out.push(wrap_dir);
    }
    if direct <= around {
        out.push(direct_dir);
    }
    out
}

//! World model: the grid, unit rosters and toroidal geometry for one turn.

pub mod location;
pub mod order;
pub mod settings;
pub mod state;
pub mod tile;

pub use location::{Direction, Location, MapSize, ALL_DIRECTIONS};
pub use order::MoveOrder;
pub use settings::GameSettings;
pub use state::{Unit, WorldState};
pub use tile::{Tile, TileType};

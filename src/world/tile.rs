//! Cell contents.

use super::location::Location;

/// What occupies a cell in the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileType {
    Land,
    Food,
    Water,
    FriendlyUnit,
    EnemyUnit,
    /// A unit died here this turn.
    Dead,
    /// Never inside any friendly unit's view radius.
    Unseen,
}

impl TileType {
    pub const fn is_unit(self) -> bool {
        matches!(self, TileType::FriendlyUnit | TileType::EnemyUnit)
    }
}

/// A cell together with its contents at the time it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub tile_type: TileType,
    pub location: Location,
}

impl Tile {
    pub const fn new(tile_type: TileType, location: Location) -> Self {
        Tile {
            tile_type,
            location,
        }
    }

    /// True if a unit could step onto this cell: land or food, nobody on it.
    pub const fn is_walkable(&self) -> bool {
        matches!(self.tile_type, TileType::Land | TileType::Food)
    }
}

mod index;

pub use index::{world_to_cell, CellCoord, CellIndex, TileHandle};

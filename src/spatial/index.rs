use macroquad::prelude::*;
use std::collections::HashMap;

/// Index of a placement inside its [`WorldMap`](crate::WorldMap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileHandle(pub u32);

/// Integer address of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl CellCoord {
    /// Cell at column `x`, row `y`.
    pub fn new(x: i32, y: i32) -> Self {
        CellCoord { x, y }
    }
}

/// Cell containing a world-space point for a grid of `grid` pixels.
#[inline]
pub fn world_to_cell(p: Vec2, grid: Vec2) -> CellCoord {
    CellCoord {
        x: (p.x / grid.x).floor() as i32,
        y: (p.y / grid.y).floor() as i32,
    }
}

/// Placements per `(gx, gy)`, bottom-first.
#[derive(Debug, Clone, Default)]
pub struct CellIndex {
    cells: HashMap<CellCoord, Vec<TileHandle>>,
    len: u32,
}

impl CellIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next placement to the stack at `cell` and returns its handle.
    pub fn push(&mut self, cell: CellCoord) -> TileHandle {
        let handle = TileHandle(self.len);
        self.len += 1;
        self.cells.entry(cell).or_default().push(handle);
        handle
    }

    /// Handles stacked at `cell`, bottom-first.
    pub fn stack(&self, cell: CellCoord) -> &[TileHandle] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of placements indexed.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// `true` before the first push.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_keep_insertion_order() {
        let mut index = CellIndex::new();
        let a = index.push(CellCoord::new(1, 1));
        index.push(CellCoord::new(0, 0));
        let b = index.push(CellCoord::new(1, 1));

        assert_eq!(index.stack(CellCoord::new(1, 1)), &[a, b]);
        assert!(index.stack(CellCoord::new(5, 5)).is_empty());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn world_to_cell_floors_negative_points() {
        let grid = vec2(32.0, 32.0);
        assert_eq!(world_to_cell(vec2(31.9, 32.0), grid), CellCoord::new(0, 1));
        assert_eq!(world_to_cell(vec2(-0.5, -33.0), grid), CellCoord::new(-1, -2));
    }
}

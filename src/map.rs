use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use macroquad::prelude::*;
use tracing::debug;

use crate::direction::Direction;
use crate::error::MapError;
use crate::spatial::{world_to_cell, CellCoord, CellIndex, TileHandle};
use crate::tileset::{TileCatalog, TileDefinition, TileLayer};

/// Default grid cell size in pixels.
pub const DEFAULT_GRID: f32 = 32.0;

/// Reference to a definition: tileset image plus the definition's source `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileRef {
    /// Tileset image id.
    pub image: String,
    /// Source x of the definition.
    pub x: i32,
    /// Source y of the definition.
    pub y: i32,
}

impl TileRef {
    /// Shorthand constructor.
    pub fn new(image: impl Into<String>, x: i32, y: i32) -> Self {
        TileRef {
            image: image.into(),
            x,
            y,
        }
    }
}

/// A tile reference put on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlacedTile {
    /// Column.
    pub gx: i32,
    /// Row of the cell the tile stands on.
    pub gy: i32,
    /// Elevation; the tile is drawn `gz` rows above its cell.
    pub gz: i32,
    /// What is placed.
    pub tile: TileRef,
}

impl PlacedTile {
    /// Places `tile` at `(gx, gy, gz)`.
    pub fn new(tile: TileRef, gx: i32, gy: i32, gz: i32) -> Self {
        PlacedTile { gx, gy, gz, tile }
    }

    /// Row the tile is drawn on.
    #[inline]
    pub fn row(&self) -> i32 {
        self.gy - self.gz
    }
}

/// Rectangle of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridRect {
    /// Leftmost column.
    pub x: i32,
    /// Topmost row.
    pub y: i32,
    /// Columns covered.
    pub width: i32,
    /// Rows covered.
    pub height: i32,
}

impl GridRect {
    /// `true` for the rect of a map without tiles.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Sort key of the fixed tile draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DrawKey {
    /// Ground before object.
    pub layer: TileLayer,
    /// Effective row, `gy - gz`.
    pub row: i32,
    /// Column.
    pub gx: i32,
    /// Insertion index, makes the order strict.
    pub handle: TileHandle,
}

/// A placement together with its resolved definition.
#[derive(Debug, Clone, Copy)]
pub struct MapTile<'m> {
    /// Index of the placement.
    pub handle: TileHandle,
    /// The placement.
    pub placed: &'m PlacedTile,
    /// Its definition.
    pub def: &'m TileDefinition,
}

impl MapTile<'_> {
    /// Draw order key of this tile.
    pub fn draw_key(&self) -> DrawKey {
        DrawKey {
            layer: self.def.layer,
            row: self.placed.row(),
            gx: self.placed.gx,
            handle: self.handle,
        }
    }
}

/// Compares two tiles in draw order.
pub fn compare_draw(a: &MapTile<'_>, b: &MapTile<'_>) -> Ordering {
    a.draw_key().cmp(&b.draw_key())
}

/// Collects placements and catalogs, then validates them into a [`WorldMap`].
#[derive(Debug, Clone)]
pub struct WorldMapBuilder {
    grid: Vec2,
    catalogs: HashMap<String, Arc<TileCatalog>>,
    tiles: Vec<PlacedTile>,
}

impl Default for WorldMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldMapBuilder {
    /// Empty builder with a 32×32 grid.
    pub fn new() -> Self {
        WorldMapBuilder {
            grid: vec2(DEFAULT_GRID, DEFAULT_GRID),
            catalogs: HashMap::new(),
            tiles: Vec::new(),
        }
    }

    /// Sets the cell size in pixels.
    pub fn grid(&mut self, width: f32, height: f32) -> &mut Self {
        self.grid = vec2(width, height);
        self
    }

    /// Makes a catalog available for resolving references to its image.
    pub fn catalog(&mut self, catalog: Arc<TileCatalog>) -> &mut Self {
        self.catalogs.insert(catalog.image().to_owned(), catalog);
        self
    }

    /// Appends a tile to the stack at `(gx, gy)`. Duplicates are kept.
    pub fn place(&mut self, tile: TileRef, gx: i32, gy: i32, gz: i32) -> &mut Self {
        self.tiles.push(PlacedTile::new(tile, gx, gy, gz));
        self
    }

    /// Appends an already built placement.
    pub fn push(&mut self, placed: PlacedTile) -> &mut Self {
        self.tiles.push(placed);
        self
    }

    /// Drops every placement for which `f` returns `false`.
    pub fn retain(&mut self, f: impl FnMut(&PlacedTile) -> bool) -> &mut Self {
        self.tiles.retain(f);
        self
    }

    /// Resolves every placement and fixes the draw order.
    ///
    /// Fails on the first unresolved reference; nothing is returned in that case.
    pub fn build(&self) -> Result<WorldMap, MapError> {
        let mut defs = Vec::with_capacity(self.tiles.len());
        for placed in &self.tiles {
            let def = self
                .catalogs
                .get(&placed.tile.image)
                .and_then(|c| c.get(placed.tile.x, placed.tile.y))
                .ok_or_else(|| MapError::UnresolvedTile {
                    image: placed.tile.image.clone(),
                    x: placed.tile.x,
                    y: placed.tile.y,
                    gx: placed.gx,
                    gy: placed.gy,
                    gz: placed.gz,
                })?;
            defs.push(*def);
        }

        let mut index = CellIndex::new();
        for placed in &self.tiles {
            index.push(CellCoord::new(placed.gx, placed.gy));
        }

        let mut map = WorldMap {
            grid: self.grid,
            catalogs: self.catalogs.clone(),
            tiles: self.tiles.clone(),
            defs,
            index,
            draw_order: Vec::new(),
            bounds: GridRect::default(),
        };
        map.draw_order = map.sorted_handles();
        map.bounds = map.compute_bounds();

        debug!(
            tiles = map.tiles.len(),
            catalogs = map.catalogs.len(),
            "built world map"
        );
        Ok(map)
    }
}

/// Immutable grid of stacked tiles.
///
/// Edits go through [`WorldMap::place`] or [`WorldMap::to_builder`] and yield a
/// new map, so a map being drawn never changes under the renderer.
#[derive(Debug, Clone)]
pub struct WorldMap {
    grid: Vec2,
    catalogs: HashMap<String, Arc<TileCatalog>>,
    tiles: Vec<PlacedTile>,
    defs: Vec<TileDefinition>,
    index: CellIndex,
    draw_order: Vec<TileHandle>,
    bounds: GridRect,
}

impl WorldMap {
    /// Starts a new map.
    pub fn builder() -> WorldMapBuilder {
        WorldMapBuilder::new()
    }

    /// Builder holding this map's catalogs, grid and placements.
    pub fn to_builder(&self) -> WorldMapBuilder {
        WorldMapBuilder {
            grid: self.grid,
            catalogs: self.catalogs.clone(),
            tiles: self.tiles.clone(),
        }
    }

    /// New snapshot with one more tile on the stack at `(gx, gy)`.
    pub fn place(&self, tile: TileRef, gx: i32, gy: i32, gz: i32) -> Result<WorldMap, MapError> {
        self.to_builder().place(tile, gx, gy, gz).build()
    }

    /// Cell size in pixels.
    pub fn grid(&self) -> Vec2 {
        self.grid
    }

    /// Every placement in insertion order, including non-existing ones.
    pub fn placements(&self) -> &[PlacedTile] {
        &self.tiles
    }

    /// Catalog registered for `image`.
    pub fn catalog(&self, image: &str) -> Option<&Arc<TileCatalog>> {
        self.catalogs.get(image)
    }

    /// All catalogs this map resolves against.
    pub fn catalogs(&self) -> impl Iterator<Item = &Arc<TileCatalog>> + '_ {
        self.catalogs.values()
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// `true` without placements.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    fn tile(&self, handle: TileHandle) -> MapTile<'_> {
        let i = handle.0 as usize;
        MapTile {
            handle,
            placed: &self.tiles[i],
            def: &self.defs[i],
        }
    }

    /// Placement and definition behind `handle`.
    pub fn get(&self, handle: TileHandle) -> Option<MapTile<'_>> {
        ((handle.0 as usize) < self.tiles.len()).then(|| self.tile(handle))
    }

    /// Existing tiles stacked at `(gx, gy)`, bottom-first.
    pub fn stack_at(&self, gx: i32, gy: i32) -> impl Iterator<Item = MapTile<'_>> + '_ {
        self.index
            .stack(CellCoord::new(gx, gy))
            .iter()
            .map(move |h| self.tile(*h))
            .filter(|t| t.def.existing)
    }

    /// Placements stacked at `(gx, gy)`, bottom-first.
    pub fn tiles_at(&self, gx: i32, gy: i32) -> Vec<&PlacedTile> {
        self.stack_at(gx, gy).map(|t| t.placed).collect()
    }

    /// Existing tiles in the fixed draw order: layer, effective row, column.
    pub fn draw_order(&self) -> impl Iterator<Item = MapTile<'_>> + '_ {
        self.draw_order
            .iter()
            .map(move |h| self.tile(*h))
            .filter(|t| t.def.existing)
    }

    /// Whether entering `(gx, gy)` while moving `dir` is stopped by a wall
    /// facing the mover.
    pub fn is_blocked(&self, gx: i32, gy: i32, dir: Direction) -> bool {
        let facing = dir.opposite();
        self.stack_at(gx, gy).any(|t| t.def.edges.on_side(facing))
    }

    /// Whether leaving `(gx, gy)` while moving `dir` is stopped by a wall on
    /// that side of the cell.
    pub fn is_exit_blocked(&self, gx: i32, gy: i32, dir: Direction) -> bool {
        self.stack_at(gx, gy).any(|t| t.def.edges.on_side(dir))
    }

    /// Grid rectangle spanning every existing tile.
    pub fn bounding_rect(&self) -> GridRect {
        self.bounds
    }

    /// World extent in pixels measured from the origin, used to clamp cameras.
    pub fn pixel_size(&self) -> Vec2 {
        if self.bounds.is_empty() {
            return Vec2::ZERO;
        }
        let right = (self.bounds.x + self.bounds.width).max(0) as f32;
        let bottom = (self.bounds.y + self.bounds.height).max(0) as f32;
        vec2(right * self.grid.x, bottom * self.grid.y)
    }

    /// Screen position of the top-left corner of column `gx`, row `row`.
    pub fn screen_point(&self, gx: i32, row: i32) -> Vec2 {
        vec2(gx as f32 * self.grid.x, row as f32 * self.grid.y)
    }

    /// Where a placement is drawn.
    pub fn tile_rect(&self, placed: &PlacedTile) -> Rect {
        let p = self.screen_point(placed.gx, placed.row());
        Rect::new(p.x, p.y, self.grid.x, self.grid.y)
    }

    /// Cell containing a world-space point.
    pub fn cell_at(&self, point: Vec2) -> CellCoord {
        world_to_cell(point, self.grid)
    }

    fn sorted_handles(&self) -> Vec<TileHandle> {
        let mut handles: Vec<TileHandle> = (0..self.tiles.len() as u32).map(TileHandle).collect();
        handles.sort_by_key(|h| self.tile(*h).draw_key());
        handles
    }

    fn compute_bounds(&self) -> GridRect {
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        let mut any = false;

        for (placed, def) in self.tiles.iter().zip(&self.defs) {
            if !def.existing {
                continue;
            }
            any = true;
            min_x = min_x.min(placed.gx);
            min_y = min_y.min(placed.row()).min(placed.gy);
            max_x = max_x.max(placed.gx);
            max_y = max_y.max(placed.gy).max(placed.row());
        }

        if !any {
            return GridRect::default();
        }
        GridRect {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<TileCatalog> {
        Arc::new(
            TileCatalog::load(
                "t.png",
                r#"{"tiles":[
                    {"x":0,"y":0,"w":32,"h":32},
                    {"x":32,"y":0,"w":32,"h":32,"layer":"object","r":true},
                    {"x":64,"y":0,"w":32,"h":32,"layer":"object","u":true,"l":true},
                    {"x":96,"y":0,"w":32,"h":32,"layer":"object","r":true,"existing":false}
                ]}"#,
            )
            .expect("catalog"),
        )
    }

    fn grass() -> TileRef {
        TileRef::new("t.png", 0, 0)
    }

    #[test]
    fn empty_map_has_empty_bounds() {
        let map = WorldMap::builder().catalog(catalog()).build().expect("build");
        assert!(map.bounding_rect().is_empty());
        assert_eq!(map.pixel_size(), Vec2::ZERO);
        assert_eq!(map.draw_order().count(), 0);
    }

    #[test]
    fn bounds_cover_raised_rows() {
        let map = WorldMap::builder()
            .catalog(catalog())
            .place(grass(), 2, 3, 0)
            .place(grass(), 4, 5, 2)
            .build()
            .expect("build");
        assert_eq!(
            map.bounding_rect(),
            GridRect {
                x: 2,
                y: 3,
                width: 3,
                height: 3
            }
        );
    }

    #[test]
    fn stacks_are_bottom_first_and_not_deduplicated() {
        let wall = TileRef::new("t.png", 32, 0);
        let map = WorldMap::builder()
            .catalog(catalog())
            .place(grass(), 1, 1, 0)
            .place(wall.clone(), 1, 1, 0)
            .place(wall.clone(), 1, 1, 0)
            .build()
            .expect("build");
        let refs: Vec<_> = map.tiles_at(1, 1).into_iter().map(|p| p.tile.clone()).collect();
        assert_eq!(refs, vec![grass(), wall.clone(), wall]);
    }

    #[test]
    fn is_blocked_uses_the_wall_facing_the_mover() {
        let map = WorldMap::builder()
            .catalog(catalog())
            .place(TileRef::new("t.png", 64, 0), 0, 0, 0)
            .build()
            .expect("build");
        assert!(map.is_blocked(0, 0, Direction::Right));
        assert!(map.is_blocked(0, 0, Direction::Down));
        assert!(!map.is_blocked(0, 0, Direction::Left));
        assert!(!map.is_blocked(0, 0, Direction::Up));
        assert!(map.is_exit_blocked(0, 0, Direction::Left));
        assert!(map.is_exit_blocked(0, 0, Direction::Up));
    }

    #[test]
    fn non_existing_tiles_are_invisible_to_queries() {
        let ghost = TileRef::new("t.png", 96, 0);
        let map = WorldMap::builder()
            .catalog(catalog())
            .place(ghost, 7, 7, 0)
            .build()
            .expect("build");
        assert!(map.tiles_at(7, 7).is_empty());
        assert!(!map.is_blocked(7, 7, Direction::Left));
        assert!(map.bounding_rect().is_empty());
        assert_eq!(map.draw_order().count(), 0);
        assert_eq!(map.placements().len(), 1);
    }

    #[test]
    fn unresolved_reference_fails_the_whole_build() {
        let err = WorldMap::builder()
            .catalog(catalog())
            .place(grass(), 0, 0, 0)
            .place(TileRef::new("t.png", 999, 0), 3, 4, 1)
            .build()
            .expect_err("unresolved");
        match err {
            MapError::UnresolvedTile { x, gx, gy, gz, .. } => {
                assert_eq!((x, gx, gy, gz), (999, 3, 4, 1));
            }
            other => panic!("expected UnresolvedTile, got {other:?}"),
        }

        let err = WorldMap::builder()
            .place(grass(), 0, 0, 0)
            .build()
            .expect_err("catalog missing");
        assert!(matches!(err, MapError::UnresolvedTile { .. }));
    }

    #[test]
    fn place_returns_a_new_snapshot() {
        let map = WorldMap::builder().catalog(catalog()).build().expect("build");
        let edited = map.place(grass(), 0, 0, 0).expect("place");
        assert!(map.is_empty());
        assert_eq!(edited.len(), 1);
        assert!(map.place(TileRef::new("nope.png", 0, 0), 0, 0, 0).is_err());
    }

    #[test]
    fn tile_rect_uses_effective_row() {
        let map = WorldMap::builder()
            .catalog(catalog())
            .grid(16.0, 16.0)
            .place(grass(), 2, 5, 1)
            .build()
            .expect("build");
        let placed = &map.placements()[0];
        assert_eq!(map.tile_rect(placed), Rect::new(32.0, 64.0, 16.0, 16.0));
        assert_eq!(map.cell_at(vec2(33.0, 80.0)), CellCoord::new(2, 5));
    }
}

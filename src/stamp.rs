use std::collections::HashSet;
use std::sync::Arc;

use macroquad::prelude::*;
use tracing::debug;

use crate::error::MapError;
use crate::map::{PlacedTile, TileRef, WorldMap};
use crate::tileset::{TileCatalog, TileLayer};

/// Multi-tile brush cut from a tileset selection.
///
/// Offsets are relative to the bottom-left cell of the selection, so `gy` is
/// zero or negative and a tile with stacking offset `z` is raised by `z`.
#[derive(Debug, Clone)]
pub struct Stamp {
    catalog: Arc<TileCatalog>,
    tiles: Vec<PlacedTile>,
}

impl Stamp {
    /// Builds a stamp from definitions of `catalog` selected by source `(x, y)`.
    pub fn from_selection(
        catalog: Arc<TileCatalog>,
        selection: &[(i32, i32)],
        grid: Vec2,
    ) -> Result<Self, MapError> {
        let mut defs = Vec::with_capacity(selection.len());
        for &(x, y) in selection {
            defs.push(*catalog.lookup(x, y)?);
        }

        let min_x = defs.iter().map(|d| d.src.x).min().unwrap_or(0);
        let max_y = defs.iter().map(|d| d.src.y).max().unwrap_or(0);
        let tiles = defs
            .iter()
            .map(|d| {
                let gx = ((d.src.x - min_x) as f32 / grid.x).floor() as i32;
                let gy = ((d.src.y - max_y) as f32 / grid.y).floor() as i32 + d.z;
                PlacedTile::new(TileRef::new(catalog.image(), d.src.x, d.src.y), gx, gy, d.z)
            })
            .collect();

        Ok(Stamp { catalog, tiles })
    }

    /// Relative placements.
    pub fn tiles(&self) -> &[PlacedTile] {
        &self.tiles
    }

    /// Catalog the stamp's references resolve against.
    pub fn catalog(&self) -> &Arc<TileCatalog> {
        &self.catalog
    }

    /// New map with the stamp put down at `(gx, gy)`.
    ///
    /// Existing tiles sharing cell, elevation and layer with a stamped tile are
    /// replaced; everything else stays stacked as before.
    pub fn apply(&self, map: &WorldMap, gx: i32, gy: i32) -> Result<WorldMap, MapError> {
        let layer_of = |t: &TileRef, catalog: Option<&Arc<TileCatalog>>| -> Option<TileLayer> {
            catalog.and_then(|c| c.get(t.x, t.y)).map(|d| d.layer)
        };

        let mut covered = HashSet::new();
        let mut placed = Vec::with_capacity(self.tiles.len());
        for t in &self.tiles {
            let layer = layer_of(&t.tile, Some(&self.catalog)).unwrap_or_default();
            let at = PlacedTile::new(t.tile.clone(), gx + t.gx, gy + t.gy, t.gz);
            covered.insert((at.gx, at.gy, at.gz, layer));
            placed.push(at);
        }

        let mut builder = map.to_builder();
        builder.catalog(self.catalog.clone());
        builder.retain(|p| match layer_of(&p.tile, map.catalog(&p.tile.image)) {
            Some(layer) => !covered.contains(&(p.gx, p.gy, p.gz, layer)),
            None => true,
        });
        for p in placed {
            builder.push(p);
        }
        let out = builder.build()?;
        debug!(
            gx,
            gy,
            stamped = self.tiles.len(),
            replaced = map.len() + self.tiles.len() - out.len(),
            "applied stamp"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE: &str = r#"{"tiles":[
        {"x":64,"y":0,"w":32,"h":32,"z":1,"layer":"object","top":true},
        {"x":64,"y":32,"w":32,"h":32,"layer":"object","l":true,"r":true},
        {"x":96,"y":32,"w":32,"h":32,"layer":"object"},
        {"x":0,"y":0,"w":32,"h":32}
    ]}"#;

    fn catalog() -> Arc<TileCatalog> {
        Arc::new(TileCatalog::load("tree.png", TREE).expect("metadata"))
    }

    #[test]
    fn offsets_hang_from_the_bottom_left() {
        let stamp =
            Stamp::from_selection(catalog(), &[(64, 0), (64, 32), (96, 32)], vec2(32.0, 32.0))
                .expect("selection");
        let offsets: Vec<_> = stamp.tiles().iter().map(|t| (t.gx, t.gy, t.gz)).collect();
        assert_eq!(offsets, vec![(0, 0, 1), (0, 0, 0), (1, 0, 0)]);
    }

    #[test]
    fn unknown_selection_fails() {
        let err = Stamp::from_selection(catalog(), &[(5, 5)], vec2(32.0, 32.0)).unwrap_err();
        assert!(matches!(err, MapError::TileNotFound { x: 5, y: 5, .. }));
    }

    #[test]
    fn applying_replaces_same_layer_tiles_only() {
        let cat = catalog();
        let map = WorldMap::builder()
            .catalog(cat.clone())
            .place(TileRef::new("tree.png", 0, 0), 3, 4, 0)
            .place(TileRef::new("tree.png", 96, 32), 3, 4, 0)
            .build()
            .expect("map");

        let stamp = Stamp::from_selection(cat, &[(64, 32)], vec2(32.0, 32.0)).expect("selection");
        let out = stamp.apply(&map, 3, 4).expect("apply");

        let refs: Vec<_> = out.tiles_at(3, 4).iter().map(|p| (p.tile.x, p.tile.y)).collect();
        assert_eq!(refs, vec![(0, 0), (64, 32)]);
        assert_eq!(map.len(), 2);
    }
}

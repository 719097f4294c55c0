use std::collections::HashMap;

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::direction::Direction;
use crate::error::MapError;
use crate::raw::{RawTileRecord, RawTileset};

/// Authoring layer a tile belongs to.
///
/// Ground tiles never occlude actors; object tiles are interleaved with them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TileLayer {
    /// Floor, drawn before everything else.
    #[default]
    Ground,
    /// Scenery that actors can walk behind.
    Object,
}

/// Per-edge block flags of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeFlags {
    /// Wall on the left edge.
    pub left: bool,
    /// Wall on the right edge.
    pub right: bool,
    /// Wall on the top edge.
    pub up: bool,
    /// Wall on the bottom edge.
    pub down: bool,
}

impl EdgeFlags {
    /// Flag of the edge lying on `side`.
    pub fn on_side(self, side: Direction) -> bool {
        match side {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }
}

/// Pixel rectangle inside a tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRect {
    /// Left.
    pub x: i32,
    /// Top.
    pub y: i32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl SourceRect {
    /// As a macroquad float rect.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x as f32, self.y as f32, self.w as f32, self.h as f32)
    }
}

/// One tile of a tileset. Immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileDefinition {
    /// Where the tile's pixels are in the tileset image.
    pub src: SourceRect,
    /// Stacking offset used when stamping multi-tile objects.
    pub z: i32,
    /// Block flags.
    pub edges: EdgeFlags,
    /// Authoring layer.
    pub layer: TileLayer,
    /// `false` keeps the tile in its cell but hides it from every query.
    pub existing: bool,
    /// Always drawn over actors in stacked compositing.
    pub always_on_top: bool,
}

impl From<&RawTileRecord> for TileDefinition {
    fn from(r: &RawTileRecord) -> Self {
        TileDefinition {
            src: SourceRect {
                x: r.x,
                y: r.y,
                w: r.w,
                h: r.h,
            },
            z: r.z,
            edges: EdgeFlags {
                left: r.l,
                right: r.r,
                up: r.u,
                down: r.d,
            },
            layer: r.layer,
            existing: r.existing,
            always_on_top: r.top,
        }
    }
}

impl From<&TileDefinition> for RawTileRecord {
    fn from(t: &TileDefinition) -> Self {
        RawTileRecord {
            x: t.src.x,
            y: t.src.y,
            w: t.src.w,
            h: t.src.h,
            z: t.z,
            l: t.edges.left,
            r: t.edges.right,
            u: t.edges.up,
            d: t.edges.down,
            layer: t.layer,
            existing: t.existing,
            top: t.always_on_top,
        }
    }
}

/// Tile definitions of one tileset image, addressed by their source `(x, y)`.
#[derive(Debug, Clone)]
pub struct TileCatalog {
    image: String,
    tiles: HashMap<(i32, i32), TileDefinition>,
    order: Vec<(i32, i32)>,
}

impl TileCatalog {
    /// Parses the tileset metadata attached to `image`.
    pub fn load(image: &str, metadata: &str) -> Result<Self, MapError> {
        let raw: RawTileset =
            serde_json::from_str(metadata).map_err(|source| MapError::Json {
                source_name: image.to_owned(),
                source,
            })?;
        let catalog = Self::from_definitions(image, raw.tiles.iter().map(TileDefinition::from));
        debug!(image, tiles = catalog.len(), "parsed tileset metadata");
        Ok(catalog)
    }

    /// Builds a catalog from already parsed definitions.
    ///
    /// A later definition at the same `(x, y)` replaces an earlier one.
    pub fn from_definitions(
        image: &str,
        defs: impl IntoIterator<Item = TileDefinition>,
    ) -> Self {
        let mut tiles = HashMap::new();
        let mut order = Vec::new();
        for def in defs {
            let key = (def.src.x, def.src.y);
            if tiles.insert(key, def).is_none() {
                order.push(key);
            }
        }
        TileCatalog {
            image: image.to_owned(),
            tiles,
            order,
        }
    }

    /// Id of the tileset image this catalog describes.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Definition whose source rect starts at `(x, y)`.
    pub fn lookup(&self, x: i32, y: i32) -> Result<&TileDefinition, MapError> {
        self.get(x, y).ok_or_else(|| MapError::TileNotFound {
            image: self.image.clone(),
            x,
            y,
        })
    }

    /// Like [`lookup`](Self::lookup) without the error.
    pub fn get(&self, x: i32, y: i32) -> Option<&TileDefinition> {
        self.tiles.get(&(x, y))
    }

    /// Definitions in metadata order.
    pub fn iter(&self) -> impl Iterator<Item = &TileDefinition> + '_ {
        self.order.iter().filter_map(move |k| self.tiles.get(k))
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// `true` when the tileset defines no tiles.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Serializes back into the metadata document.
    pub fn to_metadata(&self) -> String {
        let raw = RawTileset {
            tiles: self.iter().map(RawTileRecord::from).collect(),
        };
        // Plain structs with string keys always serialize.
        serde_json::to_string(&raw).unwrap_or_default()
    }
}

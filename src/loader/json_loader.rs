use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use macroquad::prelude::*;
use tracing::{debug, info, warn};

use crate::error::MapError;
use crate::loader::assets::AssetSource;
use crate::loader::png_meta;
use crate::map::{TileRef, WorldMap, DEFAULT_GRID};
use crate::raw::{RawMap, RawPlacedTile, RawTileRef};
use crate::render::TextureCache;
use crate::tileset::TileCatalog;

fn is_png(name: &str) -> bool {
    name.rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Text of a metadata document: the `Comment` chunk of a PNG, or the bytes
/// themselves for anything else.
fn metadata_text(name: &str, bytes: Vec<u8>) -> Result<String, MapError> {
    if is_png(name) {
        return png_meta::read_comment(name, &bytes);
    }
    String::from_utf8(bytes).map_err(|_| MapError::format(name, "metadata is not UTF-8"))
}

/// Loads tilesets and maps from an [`AssetSource`], caching catalogs by image.
///
/// The cache lives as long as the loader; [`clear`](Self::clear) empties it.
pub struct MapLoader<S> {
    source: S,
    grid: Vec2,
    catalogs: HashMap<String, Arc<TileCatalog>>,
}

impl<S: AssetSource> MapLoader<S> {
    /// Loader reading from `source`, building maps with a 32×32 grid.
    pub fn new(source: S) -> Self {
        MapLoader {
            source,
            grid: vec2(DEFAULT_GRID, DEFAULT_GRID),
            catalogs: HashMap::new(),
        }
    }

    /// Grid used for maps built by this loader.
    pub fn with_grid(mut self, grid: Vec2) -> Self {
        self.grid = grid;
        self
    }

    /// The backing asset source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of cached catalogs.
    pub fn cached(&self) -> usize {
        self.catalogs.len()
    }

    /// Forgets every cached catalog.
    pub fn clear(&mut self) {
        debug!(dropped = self.catalogs.len(), "cleared tileset cache");
        self.catalogs.clear();
    }

    /// Catalog of `image`, read and parsed on first use.
    pub fn load_tileset(&mut self, image: &str) -> Result<Arc<TileCatalog>, MapError> {
        if let Some(cat) = self.catalogs.get(image) {
            return Ok(cat.clone());
        }
        let bytes = self.source.read(image)?;
        let text = metadata_text(image, bytes)?;
        let cat = Arc::new(TileCatalog::load(image, &text)?);
        info!(image, tiles = cat.len(), "loaded tileset");
        self.catalogs.insert(image.to_owned(), cat.clone());
        Ok(cat)
    }

    /// Reads and decodes the named map document.
    pub fn load_map(&mut self, name: &str) -> Result<WorldMap, MapError> {
        let bytes = self.source.read(name)?;
        let text = metadata_text(name, bytes)?;
        let map = decode_map(&text, name, self)?;
        info!(name, tiles = map.len(), "loaded map");
        Ok(map)
    }

    /// Uploads the image of every catalog `map` uses into `textures`.
    ///
    /// Needs a live macroquad context.
    pub fn load_textures(&self, map: &WorldMap, textures: &mut TextureCache) -> Result<(), MapError> {
        for cat in map.catalogs() {
            if textures.contains(cat.image()) {
                continue;
            }
            if !is_png(cat.image()) {
                warn!(image = cat.image(), "tileset has no image to upload");
                continue;
            }
            let bytes = self.source.read(cat.image())?;
            textures.load(cat.image(), &bytes)?;
        }
        Ok(())
    }
}

/// Decodes a map document, loading each referenced tileset through `loader`.
///
/// Every placement is resolved before a map is returned.
pub fn decode_map<S: AssetSource>(
    json: &str,
    source_name: &str,
    loader: &mut MapLoader<S>,
) -> Result<WorldMap, MapError> {
    let raw: RawMap = serde_json::from_str(json).map_err(|source| MapError::Json {
        source_name: source_name.to_owned(),
        source,
    })?;

    let images: BTreeSet<&str> = raw.tiles.iter().map(|t| t.tileref.img.as_str()).collect();
    let mut builder = WorldMap::builder();
    builder.grid(loader.grid.x, loader.grid.y);
    for image in images {
        builder.catalog(loader.load_tileset(image)?);
    }
    for t in raw.tiles {
        let RawTileRef { img, x, y } = t.tileref;
        builder.place(TileRef::new(img, x, y), t.gx, t.gy, t.gz);
    }
    builder.build()
}

/// Encodes every placement of `map`, in insertion order.
pub fn encode_map(map: &WorldMap) -> String {
    let raw = RawMap {
        tiles: map
            .placements()
            .iter()
            .map(|p| RawPlacedTile {
                gx: p.gx,
                gy: p.gy,
                gz: p.gz,
                tileref: RawTileRef {
                    img: p.tile.image.clone(),
                    x: p.tile.x,
                    y: p.tile.y,
                },
            })
            .collect(),
    };
    // Only integers and strings; serialization cannot fail.
    serde_json::to_string(&raw).unwrap_or_default()
}

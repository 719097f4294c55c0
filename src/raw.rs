//! Serde shapes of the tileset and map metadata documents.

use serde::{Deserialize, Serialize};

use crate::tileset::TileLayer;

fn default_true() -> bool {
    true
}

fn is_true(v: &bool) -> bool {
    *v
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawTileset {
    pub tiles: Vec<RawTileRecord>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawTileRecord {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub z: i32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub l: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub r: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub u: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub d: bool,
    #[serde(default)]
    pub layer: TileLayer,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub existing: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub top: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawMap {
    pub tiles: Vec<RawPlacedTile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawPlacedTile {
    pub gx: i32,
    pub gy: i32,
    #[serde(default)]
    pub gz: i32,
    pub tileref: RawTileRef,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct RawTileRef {
    pub img: String,
    pub x: i32,
    pub y: i32,
}

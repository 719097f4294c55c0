#![warn(missing_docs)]

//! Stacked 2D tile world for Macroquad: tilesets with per-edge walls, a grid
//! map with elevation, depth compositing of tiles and actors, grid-stepped
//! movement and a follow camera.

mod actor;
mod animator;
mod camera;
mod collision;
mod config;
mod direction;
mod error;
mod input;
mod loader {
    pub mod assets;
    pub mod json_loader;
    pub mod png_meta;
}
mod map;
mod motion;
mod raw;
mod render;
mod spatial;
mod sprite;
mod stamp;
mod tileset;

pub use actor::{Actor, ActorId, ActorList, Areaable, Pivotable, Playable};
pub use animator::FrameAnimator;
pub use camera::{CameraScope, FollowCamera};
pub use collision::{CollisionDecisionMaker, MapCollision};
pub use config::StageConfig;
pub use direction::Direction;
pub use error::MapError;
pub use input::{DirectionKeys, KeyPreset, KeyState, Keyboard, MacroquadKeyboard};
pub use loader::assets::{AssetSource, DirAssets, MemoryAssets};
pub use loader::json_loader::{decode_map, encode_map, MapLoader};
pub use loader::png_meta::{read_comment, COMMENT_KEYWORD};
pub use map::{
    compare_draw, DrawKey, GridRect, MapTile, PlacedTile, TileRef, WorldMap, WorldMapBuilder,
    DEFAULT_GRID,
};
pub use motion::{GridMotionController, MotionConfig, MotionState, Movement, StepListener};
pub use render::{
    clip_blit, footprint_row, is_visible, padded_view, Canvas, CompositeMode, DepthCompositor,
    DrawItem, MacroquadCanvas, TextureCache,
};
pub use spatial::{world_to_cell, CellCoord, CellIndex, TileHandle};
pub use sprite::{BlockSprite, CharSprite};
pub use stamp::Stamp;
pub use tileset::{EdgeFlags, SourceRect, TileCatalog, TileDefinition, TileLayer};

// tests/map_tests.rs

use std::sync::Arc;

use macroquad::prelude::*;
use macroquad_tile_world::{
    compare_draw, Direction, GridRect, MapError, TileCatalog, TileLayer, TileRef, WorldMap,
};

const TILES: &str = r#"
{"tiles":[
  {"x":0,"y":0,"w":32,"h":32},
  {"x":32,"y":0,"w":32,"h":32,"layer":"object"},
  {"x":64,"y":0,"w":32,"h":32,"layer":"object","r":true},
  {"x":96,"y":0,"w":32,"h":32,"layer":"object","z":1,"top":true}
]}
"#;

fn catalog() -> Arc<TileCatalog> {
    Arc::new(TileCatalog::load("world.png", TILES).expect("tileset metadata"))
}

fn t(x: i32) -> TileRef {
    TileRef::new("world.png", x, 0)
}

fn sample_map() -> WorldMap {
    WorldMap::builder()
        .catalog(catalog())
        .place(t(32), 3, 2, 0)
        .place(t(0), 3, 2, 0)
        .place(t(0), 0, 0, 0)
        .place(t(96), 1, 3, 1)
        .place(t(32), 1, 2, 0)
        .place(t(64), 0, 2, 0)
        .place(t(0), 2, 4, 0)
        .place(t(32), 1, 2, 0)
        .build()
        .expect("valid map")
}

#[test]
fn draw_order_is_a_strict_total_order() {
    let map = sample_map();
    let tiles: Vec<_> = map.draw_order().collect();
    assert_eq!(tiles.len(), map.len());

    for (i, a) in tiles.iter().enumerate() {
        for (j, b) in tiles.iter().enumerate() {
            assert_eq!(compare_draw(a, b), i.cmp(&j), "tiles {i} and {j}");
        }
    }
}

#[test]
fn draw_order_is_ground_then_rows_then_columns() {
    let map = sample_map();
    let keys: Vec<_> = map
        .draw_order()
        .map(|t| (t.def.layer, t.placed.row(), t.placed.gx))
        .collect();
    assert_eq!(
        keys,
        vec![
            (TileLayer::Ground, 0, 0),
            (TileLayer::Ground, 2, 3),
            (TileLayer::Ground, 4, 2),
            (TileLayer::Object, 2, 0),
            (TileLayer::Object, 2, 1),
            (TileLayer::Object, 2, 1),
            (TileLayer::Object, 2, 1),
            (TileLayer::Object, 2, 3),
        ]
    );
}

#[test]
fn rebuilding_gives_the_same_order() {
    let map = sample_map();
    let again = map.to_builder().build().expect("rebuild");
    let a: Vec<_> = map.draw_order().map(|t| t.handle).collect();
    let b: Vec<_> = again.draw_order().map(|t| t.handle).collect();
    assert_eq!(a, b);
}

#[test]
fn left_is_blocked_when_any_tile_in_the_stack_walls_its_right_edge() {
    let map = WorldMap::builder()
        .catalog(catalog())
        .place(t(0), 5, 5, 0)
        .place(t(32), 5, 5, 0)
        .build()
        .unwrap();
    assert!(!map.is_blocked(5, 5, Direction::Left));

    let walled = map.place(t(64), 5, 5, 0).unwrap();
    assert!(walled.is_blocked(5, 5, Direction::Left));
    assert!(!walled.is_blocked(5, 5, Direction::Right));
    // The earlier snapshot is untouched.
    assert!(!map.is_blocked(5, 5, Direction::Left));
}

#[test]
fn bounds_and_pixel_size_follow_every_placement() {
    let map = sample_map();
    assert_eq!(
        map.bounding_rect(),
        GridRect {
            x: 0,
            y: 0,
            width: 4,
            height: 5
        }
    );
    assert_eq!(map.pixel_size(), vec2(128.0, 160.0));
}

#[test]
fn raised_tiles_draw_above_their_cell() {
    let map = sample_map();
    let raised = map
        .placements()
        .iter()
        .find(|p| p.gz == 1)
        .expect("raised tile");
    assert_eq!(map.tile_rect(raised), Rect::new(32.0, 64.0, 32.0, 32.0));
    assert_eq!(map.tiles_at(1, 3).len(), 1);
}

#[test]
fn any_unresolved_reference_rejects_the_map() {
    let err = WorldMap::builder()
        .catalog(catalog())
        .place(t(0), 0, 0, 0)
        .place(TileRef::new("world.png", 0, 32), 2, 2, 0)
        .build()
        .unwrap_err();
    match err {
        MapError::UnresolvedTile { image, x, y, .. } => {
            assert_eq!((image.as_str(), x, y), ("world.png", 0, 32));
        }
        other => panic!("expected UnresolvedTile, got {:?}", other),
    }
}

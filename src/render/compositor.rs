use macroquad::prelude::*;
use serde::Deserialize;
use tracing::warn;

use crate::actor::{ActorId, ActorList};
use crate::map::WorldMap;
use crate::render::cull::{is_visible, padded_view};
use crate::render::Canvas;
use crate::spatial::TileHandle;
use crate::tileset::TileLayer;

/// How tiles and actors are interleaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMode {
    /// Walk tiles in map draw order and slip actors in before the first object
    /// tile whose top is at or below their feet.
    #[default]
    RowInterleave,
    /// Draw cell stacks row by row with actors after their row, then redraw
    /// always-on-top tiles over everything.
    Stacked,
}

/// One step of a composed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawItem {
    /// Blit a map tile at `dst` (world space).
    Tile {
        /// Placement being drawn.
        handle: TileHandle,
        /// Destination rect.
        dst: Rect,
    },
    /// Let an actor draw itself.
    Actor(ActorId),
}

/// Row an actor stands in: the row whose band contains its bottom edge.
///
/// A bottom edge lying exactly on a row boundary belongs to the row above it.
#[inline]
pub fn footprint_row(bottom: f32, tile_h: f32) -> i32 {
    (bottom / tile_h).ceil() as i32 - 1
}

/// Draws a [`WorldMap`] and the actors on it in one depth-correct pass.
#[derive(Debug, Clone, Default)]
pub struct DepthCompositor {
    mode: CompositeMode,
    view: Option<Rect>,
}

impl DepthCompositor {
    /// Compositor using `mode`.
    pub fn new(mode: CompositeMode) -> Self {
        DepthCompositor { mode, view: None }
    }

    /// Active mode.
    pub fn mode(&self) -> CompositeMode {
        self.mode
    }

    /// Limits tile drawing to `view` (world space); `None` draws everything.
    pub fn set_view(&mut self, view: Option<Rect>) {
        self.view = view;
    }

    /// Snapshot of the actors as (bottom edge, id), sorted bottom-up.
    fn sorted_actors(actors: &ActorList) -> Vec<(f32, ActorId)> {
        let mut pending: Vec<(f32, ActorId)> = actors
            .iter()
            .map(|(id, a)| (a.footprint().bottom(), id))
            .collect();
        pending.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        pending
    }

    /// Computes the draw sequence for a frame without touching a canvas.
    pub fn plan(&self, map: &WorldMap, actors: &ActorList) -> Vec<DrawItem> {
        let view = self.view.map(|v| padded_view(v, map.grid()));
        let pending = Self::sorted_actors(actors);
        let mut out = Vec::with_capacity(map.len() + pending.len());
        match self.mode {
            CompositeMode::RowInterleave => row_interleave(map, &pending, view, &mut out),
            CompositeMode::Stacked => stacked(map, &pending, view, &mut out),
        }
        out
    }

    /// Draws the map and actors onto `canvas`.
    pub fn render(&self, map: &WorldMap, actors: &ActorList, canvas: &mut dyn Canvas) {
        for item in self.plan(map, actors) {
            match item {
                DrawItem::Tile { handle, dst } => {
                    let Some(tile) = map.get(handle) else {
                        warn!(?handle, "planned tile is missing from the map");
                        continue;
                    };
                    canvas.blit(&tile.placed.tile.image, tile.def.src.to_rect(), dst);
                }
                DrawItem::Actor(id) => {
                    if let Some(actor) = actors.get(id) {
                        actor.draw(canvas);
                    }
                }
            }
        }
    }
}

fn row_interleave(
    map: &WorldMap,
    pending: &[(f32, ActorId)],
    view: Option<Rect>,
    out: &mut Vec<DrawItem>,
) {
    let mut next = 0;
    for tile in map.draw_order() {
        let dst = map.tile_rect(tile.placed);
        if tile.def.layer == TileLayer::Object {
            while next < pending.len() && pending[next].0 <= dst.y {
                out.push(DrawItem::Actor(pending[next].1));
                next += 1;
            }
        }
        if is_visible(view, dst) {
            out.push(DrawItem::Tile {
                handle: tile.handle,
                dst,
            });
        }
    }
    out.extend(pending[next..].iter().map(|(_, id)| DrawItem::Actor(*id)));
}

fn stacked(
    map: &WorldMap,
    pending: &[(f32, ActorId)],
    view: Option<Rect>,
    out: &mut Vec<DrawItem>,
) {
    let bounds = map.bounding_rect();
    let tile_h = map.grid().y;
    let rows = bounds.y..bounds.y + bounds.height;
    let cols = bounds.x..bounds.x + bounds.width;

    let push_row = |y: i32, on_top: bool, out: &mut Vec<DrawItem>| {
        for x in cols.clone() {
            for tile in map.stack_at(x, y) {
                if tile.def.always_on_top != on_top {
                    continue;
                }
                let dst = map.tile_rect(tile.placed);
                if is_visible(view, dst) {
                    out.push(DrawItem::Tile {
                        handle: tile.handle,
                        dst,
                    });
                }
            }
        }
    };

    let mut next = 0;
    for y in rows.clone() {
        push_row(y, false, out);
        while next < pending.len() && footprint_row(pending[next].0, tile_h) <= y {
            out.push(DrawItem::Actor(pending[next].1));
            next += 1;
        }
    }
    out.extend(pending[next..].iter().map(|(_, id)| DrawItem::Actor(*id)));

    for y in rows {
        push_row(y, true, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_row_puts_boundary_in_upper_row() {
        assert_eq!(footprint_row(32.0, 32.0), 0);
        assert_eq!(footprint_row(32.5, 32.0), 1);
        assert_eq!(footprint_row(64.0, 32.0), 1);
        assert_eq!(footprint_row(0.0, 32.0), -1);
    }
}

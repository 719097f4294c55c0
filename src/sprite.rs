use macroquad::prelude::*;

use crate::actor::{Actor, Areaable, Pivotable, Playable};
use crate::animator::FrameAnimator;
use crate::direction::Direction;
use crate::render::Canvas;

/// Character from an RPG Maker style sheet: blocks of 3 walk frames by 4
/// facing rows (down, left, right, up), up to 8 characters per sheet in a
/// 4×2 block layout.
#[derive(Debug, Clone)]
pub struct CharSprite {
    sheet: String,
    char_index: u32,
    frame_size: Vec2,
    cell: Vec2,
    pos: Vec2,
    facing: Direction,
    animator: FrameAnimator,
}

impl CharSprite {
    /// Character `char_index` of `sheet`, standing on cells of `cell` pixels.
    pub fn new(sheet: &str, char_index: u32, frame_size: Vec2, cell: Vec2) -> Self {
        CharSprite {
            sheet: sheet.to_owned(),
            char_index: char_index.min(7),
            frame_size,
            cell,
            pos: Vec2::ZERO,
            facing: Direction::Down,
            animator: FrameAnimator::new(200.0, 1, vec![0, 1, 2, 1]),
        }
    }

    /// Places the sprite on grid cell `(gx, gy)`.
    pub fn at_cell(mut self, gx: i32, gy: i32) -> Self {
        self.pos = vec2(gx as f32 * self.cell.x, gy as f32 * self.cell.y);
        self
    }

    fn facing_row(&self) -> u32 {
        match self.facing {
            Direction::Down => 0,
            Direction::Left => 1,
            Direction::Right => 2,
            Direction::Up => 3,
        }
    }

    /// Source rect of the frame currently shown.
    pub fn source_rect(&self) -> Rect {
        let block_col = self.char_index % 4;
        let block_row = self.char_index / 4;
        let col = block_col * 3 + self.animator.frame() as u32;
        let row = block_row * 4 + self.facing_row();
        Rect::new(
            col as f32 * self.frame_size.x,
            row as f32 * self.frame_size.y,
            self.frame_size.x,
            self.frame_size.y,
        )
    }

    /// Where the frame is drawn: centred on the cell, feet on its bottom edge.
    pub fn dest_rect(&self) -> Rect {
        Rect::new(
            self.pos.x - (self.frame_size.x - self.cell.x) / 2.0,
            self.pos.y - (self.frame_size.y - self.cell.y),
            self.frame_size.x,
            self.frame_size.y,
        )
    }
}

impl Actor for CharSprite {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    fn update(&mut self, ms: f32) {
        self.animator.update(ms);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.blit(&self.sheet, self.source_rect(), self.dest_rect());
    }

    fn as_areaable(&self) -> Option<&dyn Areaable> {
        Some(self)
    }

    fn as_pivotable_mut(&mut self) -> Option<&mut dyn Pivotable> {
        Some(self)
    }

    fn as_playable_mut(&mut self) -> Option<&mut dyn Playable> {
        Some(self)
    }
}

impl Areaable for CharSprite {
    fn area(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.cell.x, self.cell.y)
    }
}

impl Pivotable for CharSprite {
    fn set_direction(&mut self, dir: Direction) {
        self.facing = dir;
    }

    fn direction(&self) -> Direction {
        self.facing
    }
}

impl Playable for CharSprite {
    fn play(&mut self) {
        self.animator.play();
    }

    fn stop(&mut self) {
        self.animator.stop();
    }

    fn is_playing(&self) -> bool {
        self.animator.is_playing()
    }
}

/// Solid rectangle covering one cell. Handy for prototypes and debugging.
#[derive(Debug, Clone)]
pub struct BlockSprite {
    pos: Vec2,
    size: Vec2,
    color: Color,
}

impl BlockSprite {
    /// Block of `size` pixels at `pos`.
    pub fn new(pos: Vec2, size: Vec2, color: Color) -> Self {
        BlockSprite { pos, size, color }
    }
}

impl Actor for BlockSprite {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.area(), self.color);
    }

    fn as_areaable(&self) -> Option<&dyn Areaable> {
        Some(self)
    }
}

impl Areaable for BlockSprite {
    fn area(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

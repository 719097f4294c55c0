use std::collections::HashMap;

use macroquad::prelude::*;
use tracing::{debug, warn};

use crate::error::MapError;

/// Immediate-mode drawing surface the compositor and actors draw onto.
pub trait Canvas {
    /// Shifts everything drawn afterwards by `delta`.
    fn translate(&mut self, delta: Vec2);

    /// Accumulated translation.
    fn translation(&self) -> Vec2;

    /// Restricts drawing to `clip` (screen space), or lifts the restriction.
    fn set_clip(&mut self, clip: Option<Rect>);

    /// Copies `src` of the named image into `dst`.
    fn blit(&mut self, image: &str, src: Rect, dst: Rect);

    /// Fills a solid rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

/// Textures by image id, owned by whoever loads the world.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, Texture2D>,
}

impl TextureCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `bytes` and stores the texture under `image`.
    ///
    /// Needs a live macroquad context.
    pub fn load(&mut self, image: &str, bytes: &[u8]) -> Result<(), MapError> {
        let decoded = Image::from_file_with_format(bytes, None)
            .map_err(|e| MapError::format(image, e.to_string()))?;
        let tex = Texture2D::from_image(&decoded);
        tex.set_filter(FilterMode::Nearest);
        self.insert(image, tex);
        Ok(())
    }

    /// Stores an existing texture.
    pub fn insert(&mut self, image: &str, tex: Texture2D) {
        debug!(image, "cached texture");
        self.textures.insert(image.to_owned(), tex);
    }

    /// Texture for `image`.
    pub fn get(&self, image: &str) -> Option<&Texture2D> {
        self.textures.get(image)
    }

    /// `true` if `image` is cached.
    pub fn contains(&self, image: &str) -> bool {
        self.textures.contains_key(image)
    }

    /// Drops every cached texture.
    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

/// Clips `dst` against `clip` and shrinks `src` by the same proportions.
pub fn clip_blit(src: Rect, dst: Rect, clip: Rect) -> Option<(Rect, Rect)> {
    let visible = dst.intersect(clip)?;
    if visible.w <= 0.0 || visible.h <= 0.0 || dst.w <= 0.0 || dst.h <= 0.0 {
        return None;
    }
    let sx = src.w / dst.w;
    let sy = src.h / dst.h;
    let clipped_src = Rect::new(
        src.x + (visible.x - dst.x) * sx,
        src.y + (visible.y - dst.y) * sy,
        visible.w * sx,
        visible.h * sy,
    );
    Some((clipped_src, visible))
}

/// [`Canvas`] drawing to the macroquad window.
pub struct MacroquadCanvas<'t> {
    textures: &'t TextureCache,
    offset: Vec2,
    clip: Option<Rect>,
}

impl<'t> MacroquadCanvas<'t> {
    /// Canvas blitting from `textures`.
    pub fn new(textures: &'t TextureCache) -> Self {
        MacroquadCanvas {
            textures,
            offset: Vec2::ZERO,
            clip: None,
        }
    }
}

impl Canvas for MacroquadCanvas<'_> {
    fn translate(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    fn translation(&self) -> Vec2 {
        self.offset
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    fn blit(&mut self, image: &str, src: Rect, dst: Rect) {
        let Some(tex) = self.textures.get(image) else {
            warn!(image, "blit of an image that was never loaded");
            return;
        };
        let dst = dst.offset(self.offset);
        let (src, dst) = match self.clip {
            Some(clip) => match clip_blit(src, dst, clip) {
                Some(pair) => pair,
                None => return,
            },
            None => (src, dst),
        };
        draw_texture_ex(
            tex,
            dst.x,
            dst.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(dst.w, dst.h)),
                source: Some(src),
                ..Default::default()
            },
        );
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = rect.offset(self.offset);
        let rect = match self.clip {
            Some(clip) => match rect.intersect(clip) {
                Some(r) => r,
                None => return,
            },
            None => rect,
        };
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_blit_trims_source_proportionally() {
        let src = Rect::new(0.0, 0.0, 16.0, 16.0);
        let dst = Rect::new(-16.0, 0.0, 32.0, 32.0);
        let clip = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (s, d) = clip_blit(src, dst, clip).expect("partly visible");
        assert_eq!(d, Rect::new(0.0, 0.0, 16.0, 32.0));
        assert_eq!(s, Rect::new(8.0, 0.0, 8.0, 16.0));
    }

    #[test]
    fn clip_blit_drops_hidden_draws() {
        let src = Rect::new(0.0, 0.0, 16.0, 16.0);
        let dst = Rect::new(200.0, 0.0, 32.0, 32.0);
        assert!(clip_blit(src, dst, Rect::new(0.0, 0.0, 100.0, 100.0)).is_none());
    }
}

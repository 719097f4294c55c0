use std::ops::{Deref, DerefMut};

use macroquad::prelude::*;

use crate::actor::{ActorId, ActorList};
use crate::render::Canvas;

/// Keeps a tracked actor centred in the viewport, optionally stopping at the
/// world's edges.
#[derive(Debug, Clone, Default)]
pub struct FollowCamera {
    target: Option<ActorId>,
    world_size: Option<Vec2>,
    viewport: Vec2,
    offset: Vec2,
}

impl FollowCamera {
    /// Camera tracking nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Actor to follow.
    pub fn track(&mut self, target: Option<ActorId>) {
        self.target = target;
    }

    /// Tracked actor.
    pub fn target(&self) -> Option<ActorId> {
        self.target
    }

    /// World size to clamp against; `None` lets the view leave the world.
    pub fn set_world_size(&mut self, size: Option<Vec2>) {
        self.world_size = size;
    }

    /// Top-left of the view in world space.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Visible world rect as of the last update.
    pub fn view_rect(&self) -> Rect {
        Rect::new(self.offset.x, self.offset.y, self.viewport.x, self.viewport.y)
    }

    /// Recomputes the offset for a viewport of `viewport` pixels.
    pub fn update(&mut self, _ms: f32, actors: &ActorList, viewport: Vec2) {
        self.viewport = viewport;
        let Some(actor) = self.target.and_then(|id| actors.get(id)) else {
            self.offset = Vec2::ZERO;
            return;
        };

        let mut offset = actor.footprint().center() - viewport / 2.0;
        if let Some(world) = self.world_size {
            offset.x = clamp_axis(offset.x, world.x - viewport.x);
            offset.y = clamp_axis(offset.y, world.y - viewport.y);
        }
        self.offset = offset;
    }

    /// Translates `canvas` into camera space until the returned scope drops.
    pub fn begin<'c>(&self, canvas: &'c mut dyn Canvas) -> CameraScope<'c> {
        canvas.translate(-self.offset);
        CameraScope {
            canvas,
            offset: self.offset,
        }
    }

    /// Runs `draw` in camera space.
    pub fn render<R>(&self, canvas: &mut dyn Canvas, draw: impl FnOnce(&mut dyn Canvas) -> R) -> R {
        let mut scope = self.begin(canvas);
        draw(&mut *scope)
    }
}

/// Clamps into `[0, max]`; a negative `max` (world smaller than the view)
/// collapses to 0.
fn clamp_axis(v: f32, max: f32) -> f32 {
    if max <= 0.0 {
        0.0
    } else {
        v.clamp(0.0, max)
    }
}

/// Camera translation applied to a canvas, undone on drop.
pub struct CameraScope<'c> {
    canvas: &'c mut dyn Canvas,
    offset: Vec2,
}

impl<'c> Deref for CameraScope<'c> {
    type Target = dyn Canvas + 'c;

    fn deref(&self) -> &Self::Target {
        &*self.canvas
    }
}

impl<'c> DerefMut for CameraScope<'c> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.canvas
    }
}

impl Drop for CameraScope<'_> {
    fn drop(&mut self) {
        self.canvas.translate(self.offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    struct Dot(Vec2);

    impl Actor for Dot {
        fn position(&self) -> Vec2 {
            self.0
        }
        fn set_position(&mut self, pos: Vec2) {
            self.0 = pos;
        }
        fn draw(&self, _canvas: &mut dyn Canvas) {}
    }

    #[derive(Default)]
    struct Offsets(Vec2);

    impl Canvas for Offsets {
        fn translate(&mut self, delta: Vec2) {
            self.0 += delta;
        }
        fn translation(&self) -> Vec2 {
            self.0
        }
        fn set_clip(&mut self, _clip: Option<Rect>) {}
        fn blit(&mut self, _image: &str, _src: Rect, _dst: Rect) {}
        fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    }

    #[test]
    fn no_target_means_no_offset() {
        let mut cam = FollowCamera::new();
        cam.update(16.0, &ActorList::new(), vec2(200.0, 200.0));
        assert_eq!(cam.offset(), Vec2::ZERO);
    }

    #[test]
    fn centres_the_actor_without_world_bounds() {
        let mut actors = ActorList::new();
        let id = actors.add(Dot(vec2(300.0, 40.0)));
        let mut cam = FollowCamera::new();
        cam.track(Some(id));
        cam.update(16.0, &actors, vec2(200.0, 100.0));
        assert_eq!(cam.offset(), vec2(200.0, -10.0));
    }

    #[test]
    fn clamps_near_the_origin() {
        let mut actors = ActorList::new();
        let id = actors.add(Dot(vec2(10.0, 10.0)));
        let mut cam = FollowCamera::new();
        cam.track(Some(id));
        cam.set_world_size(Some(vec2(500.0, 500.0)));
        cam.update(16.0, &actors, vec2(200.0, 200.0));
        assert_eq!(cam.offset(), vec2(0.0, 0.0));
    }

    #[test]
    fn clamps_at_the_far_edge_and_collapses_small_worlds() {
        let mut actors = ActorList::new();
        let id = actors.add(Dot(vec2(490.0, 490.0)));
        let mut cam = FollowCamera::new();
        cam.track(Some(id));
        cam.set_world_size(Some(vec2(500.0, 100.0)));
        cam.update(16.0, &actors, vec2(200.0, 200.0));
        assert_eq!(cam.offset(), vec2(300.0, 0.0));
    }

    #[test]
    fn scope_restores_translation_even_on_panic() {
        let mut cam = FollowCamera::new();
        cam.offset = vec2(40.0, 25.0);
        let mut canvas = Offsets::default();

        let inside = cam.render(&mut canvas, |c| c.translation());
        assert_eq!(inside, vec2(-40.0, -25.0));
        assert_eq!(canvas.translation(), Vec2::ZERO);

        let result = catch_unwind(AssertUnwindSafe(|| {
            cam.render(&mut canvas, |_| panic!("draw failed"));
        }));
        assert!(result.is_err());
        assert_eq!(canvas.translation(), Vec2::ZERO);
    }
}

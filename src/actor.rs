use macroquad::prelude::*;

use crate::direction::Direction;
use crate::render::Canvas;

/// Something with a shape that can collide.
pub trait Areaable {
    /// Shape in world space.
    fn area(&self) -> Rect;
}

/// Something that faces one of the four directions.
pub trait Pivotable {
    /// Turns to `dir`.
    fn set_direction(&mut self, dir: Direction);
    /// Current facing.
    fn direction(&self) -> Direction;
}

/// Something with an animation that can run or rest.
pub trait Playable {
    /// Starts (or keeps) the current animation running.
    fn play(&mut self);
    /// Stops the animation and shows the resting frame.
    fn stop(&mut self);
    /// Whether the animation is running.
    fn is_playing(&self) -> bool;
}

/// A dynamic object of the world: player, NPC, projectile...
///
/// Optional capabilities are discovered through the `as_*` queries instead of
/// downcasting.
pub trait Actor {
    /// World position, top-left of the sprite.
    fn position(&self) -> Vec2;

    /// Moves the actor.
    fn set_position(&mut self, pos: Vec2);

    /// Advances internal state such as animations.
    fn update(&mut self, _ms: f32) {}

    /// Draws the actor.
    fn draw(&self, canvas: &mut dyn Canvas);

    /// Collision shape, if the actor has one.
    fn as_areaable(&self) -> Option<&dyn Areaable> {
        None
    }

    /// Facing control, if the actor has one.
    fn as_pivotable_mut(&mut self) -> Option<&mut dyn Pivotable> {
        None
    }

    /// Animation control, if the actor has one.
    fn as_playable_mut(&mut self) -> Option<&mut dyn Playable> {
        None
    }

    /// Shape used for collision and depth sorting.
    ///
    /// Actors without an area occupy a zero-sized rect at their position.
    fn footprint(&self) -> Rect {
        match self.as_areaable() {
            Some(a) => a.area(),
            None => {
                let p = self.position();
                Rect::new(p.x, p.y, 0.0, 0.0)
            }
        }
    }
}

/// Stable handle of an actor in an [`ActorList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u32);

/// The actors of a scene, owned by game code.
///
/// Removing an actor leaves its slot empty so other ids stay valid.
#[derive(Default)]
pub struct ActorList {
    slots: Vec<Option<Box<dyn Actor>>>,
}

impl ActorList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor and returns its id.
    pub fn add(&mut self, actor: impl Actor + 'static) -> ActorId {
        self.add_boxed(Box::new(actor))
    }

    /// Adds an already boxed actor.
    pub fn add_boxed(&mut self, actor: Box<dyn Actor>) -> ActorId {
        let id = ActorId(self.slots.len() as u32);
        self.slots.push(Some(actor));
        id
    }

    /// Takes an actor out of the list.
    pub fn remove(&mut self, id: ActorId) -> Option<Box<dyn Actor>> {
        self.slots.get_mut(id.0 as usize).and_then(Option::take)
    }

    /// Actor by id.
    pub fn get(&self, id: ActorId) -> Option<&(dyn Actor + 'static)> {
        self.slots.get(id.0 as usize).and_then(|s| s.as_deref())
    }

    /// Mutable actor by id.
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut (dyn Actor + 'static)> {
        self.slots.get_mut(id.0 as usize).and_then(|s| s.as_deref_mut())
    }

    /// Live actors with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &(dyn Actor + 'static))> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_deref().map(|a| (ActorId(i as u32), a)))
    }

    /// Calls [`Actor::update`] on every actor.
    pub fn update(&mut self, ms: f32) {
        for actor in self.slots.iter_mut().flatten() {
            actor.update(ms);
        }
    }

    /// Number of live actors.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// `true` without live actors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

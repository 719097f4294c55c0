use std::sync::Arc;

use macroquad::prelude::*;

use crate::actor::Actor;
use crate::direction::Direction;
use crate::map::WorldMap;

/// Decides whether an actor may occupy a shape.
///
/// Called once per actor before a step starts, with the shape the actor would
/// have at the end of the step. Implementations only read.
pub trait CollisionDecisionMaker {
    /// `true` if `actor` moved to `translated` would collide.
    fn collides(&self, actor: &dyn Actor, translated: Rect) -> bool;
}

impl<F> CollisionDecisionMaker for F
where
    F: Fn(&dyn Actor, Rect) -> bool,
{
    fn collides(&self, actor: &dyn Actor, translated: Rect) -> bool {
        self(actor, translated)
    }
}

/// Collision against the block flags of a [`WorldMap`].
///
/// The step direction is taken from the offset between the actor's current
/// footprint and the translated one. A step collides when a wall on the cell
/// being left faces the way out, or a wall on the cell being entered faces
/// the mover.
#[derive(Debug, Clone)]
pub struct MapCollision {
    map: Arc<WorldMap>,
    confine: bool,
}

impl MapCollision {
    /// Collision against `map`.
    pub fn new(map: Arc<WorldMap>) -> Self {
        MapCollision {
            map,
            confine: false,
        }
    }

    /// Also refuse steps that leave the map's bounding rect.
    pub fn confined(mut self) -> Self {
        self.confine = true;
        self
    }

    /// Map collisions are checked against.
    pub fn map(&self) -> &Arc<WorldMap> {
        &self.map
    }
}

impl CollisionDecisionMaker for MapCollision {
    fn collides(&self, actor: &dyn Actor, translated: Rect) -> bool {
        let current = actor.footprint();
        let Some(dir) = Direction::from_delta(translated.point() - current.point()) else {
            return false;
        };
        let from = self.map.cell_at(current.point());
        let to = self.map.cell_at(translated.point());

        if self.confine {
            let b = self.map.bounding_rect();
            let inside = to.x >= b.x && to.x < b.x + b.width && to.y >= b.y && to.y < b.y + b.height;
            if !inside {
                return true;
            }
        }

        self.map.is_exit_blocked(from.x, from.y, dir) || self.map.is_blocked(to.x, to.y, dir)
    }
}

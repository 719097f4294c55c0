use std::collections::VecDeque;

use macroquad::prelude::*;
use serde::Deserialize;
use tracing::debug;

use crate::actor::{Actor, ActorId, ActorList};
use crate::collision::CollisionDecisionMaker;
use crate::direction::Direction;
use crate::input::{DirectionKeys, Keyboard};

/// Step size and speed of grid movement.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Pixels covered by one step, normally the grid size.
    pub step_distance: f32,
    /// Walking speed.
    pub pixels_per_second: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            step_distance: 32.0,
            pixels_per_second: 96.0,
        }
    }
}

impl MotionConfig {
    /// Milliseconds one step takes.
    pub fn step_duration_ms(&self) -> f32 {
        self.step_distance / self.pixels_per_second * 1000.0
    }
}

/// Where the controller is in the step cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// No step in progress.
    Idle,
    /// Checking whether the next step is free.
    Preparing,
    /// Interpolating a step.
    Moving,
}

/// Start and end position of one actor's current step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    /// Position when the step began.
    pub start: Vec2,
    /// Position when the step ends.
    pub end: Vec2,
}

impl Movement {
    /// Position after `fraction` of the step.
    ///
    /// `0` yields `start` and `1` yields `end` exactly.
    pub fn at(&self, fraction: f32) -> Vec2 {
        if fraction >= 1.0 {
            self.end
        } else if fraction <= 0.0 {
            self.start
        } else {
            self.start + (self.end - self.start) * fraction
        }
    }
}

/// Told whenever a controlled actor completes a step.
pub trait StepListener {
    /// `actor` just arrived at the end of its step.
    fn step_finished(&mut self, id: ActorId, actor: &dyn Actor);
}

impl<F> StepListener for F
where
    F: FnMut(ActorId, &dyn Actor),
{
    fn step_finished(&mut self, id: ActorId, actor: &dyn Actor) {
        self(id, actor)
    }
}

/// Moves a group of actors cell by cell from directional input.
///
/// The most recently pressed direction key wins; releasing it falls back to
/// the one pressed before. Steps are vetoed as a whole if any actor would
/// collide at the end of the step.
pub struct GridMotionController {
    config: MotionConfig,
    keys: DirectionKeys,
    queue: VecDeque<KeyCode>,
    state: MotionState,
    direction: Option<Direction>,
    elapsed: f32,
    controlled: Vec<ActorId>,
    movements: Vec<(ActorId, Movement)>,
    collisions: Vec<Box<dyn CollisionDecisionMaker>>,
    listeners: Vec<Box<dyn StepListener>>,
}

impl GridMotionController {
    /// Idle controller without actors.
    pub fn new(config: MotionConfig, keys: DirectionKeys) -> Self {
        GridMotionController {
            config,
            keys,
            queue: VecDeque::new(),
            state: MotionState::Idle,
            direction: None,
            elapsed: 0.0,
            controlled: Vec::new(),
            movements: Vec::new(),
            collisions: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Puts an actor under control.
    pub fn control(&mut self, id: ActorId) {
        if !self.controlled.contains(&id) {
            self.controlled.push(id);
        }
    }

    /// Takes an actor out of control; its in-flight step is dropped.
    pub fn release(&mut self, id: ActorId) {
        self.controlled.retain(|c| *c != id);
        self.movements.retain(|(c, _)| *c != id);
    }

    /// Actors under control.
    pub fn controlled(&self) -> &[ActorId] {
        &self.controlled
    }

    /// Adds a collision rule.
    pub fn add_collision(&mut self, rule: impl CollisionDecisionMaker + 'static) {
        self.collisions.push(Box::new(rule));
    }

    /// Drops every collision rule, e.g. before swapping maps.
    pub fn clear_collisions(&mut self) {
        self.collisions.clear();
    }

    /// Adds a listener for completed steps.
    pub fn add_listener(&mut self, listener: impl StepListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Current state.
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// `true` while a step is interpolating.
    pub fn is_moving(&self) -> bool {
        self.state == MotionState::Moving
    }

    /// Direction of the last prepared step.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Direction key currently in charge.
    pub fn active_key(&self) -> Option<KeyCode> {
        self.queue.front().copied()
    }

    /// In-flight step of `id`.
    pub fn movement(&self, id: ActorId) -> Option<Movement> {
        self.movements
            .iter()
            .find(|(c, _)| *c == id)
            .map(|(_, m)| *m)
    }

    /// Active configuration.
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Feeds this frame's key edges.
    pub fn input(&mut self, keyboard: &dyn Keyboard, actors: &mut ActorList) {
        for key in self.keys.keys() {
            if keyboard.released(key) {
                self.queue.retain(|k| *k != key);
            }
        }
        for key in self.keys.keys() {
            if keyboard.pressed(key) {
                self.queue.retain(|k| *k != key);
                self.queue.push_front(key);
            }
        }
        // A tap can press and release within one frame.
        self.queue.retain(|k| keyboard.hold(*k));

        if !self.queue.is_empty() && self.state == MotionState::Idle {
            self.prepare(actors);
        }
    }

    /// Advances the current step by `ms` milliseconds.
    pub fn update(&mut self, ms: f32, actors: &mut ActorList) {
        if self.state != MotionState::Moving {
            return;
        }

        self.elapsed += ms;
        let duration = self.config.step_duration_ms();
        let fraction = if duration.is_finite() && duration > 0.0 {
            (self.elapsed / duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        for (id, movement) in &self.movements {
            if let Some(actor) = actors.get_mut(*id) {
                actor.set_position(movement.at(fraction));
            }
        }

        if fraction < 1.0 {
            return;
        }

        for listener in &mut self.listeners {
            for (id, _) in &self.movements {
                if let Some(actor) = actors.get(*id) {
                    listener.step_finished(*id, actor);
                }
            }
        }

        if !self.queue.is_empty() && self.prepare(actors) {
            return;
        }

        for id in &self.controlled {
            if let Some(playable) = actors.get_mut(*id).and_then(|a| a.as_playable_mut()) {
                playable.stop();
            }
        }
        self.movements.clear();
        self.state = MotionState::Idle;
        debug!("grid motion idle");
    }

    /// Forgets held keys and stops in place, e.g. when the controlled actor
    /// is swapped.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.movements.clear();
        self.elapsed = 0.0;
        self.state = MotionState::Idle;
    }

    /// Tries to start a step towards the front key. Returns whether it started.
    fn prepare(&mut self, actors: &mut ActorList) -> bool {
        self.state = MotionState::Preparing;
        let Some(dir) = self.active_key().and_then(|k| self.keys.direction_of(k)) else {
            self.state = MotionState::Idle;
            return false;
        };
        self.direction = Some(dir);
        let delta = dir.vector() * self.config.step_distance;

        for id in &self.controlled {
            if let Some(pivot) = actors.get_mut(*id).and_then(|a| a.as_pivotable_mut()) {
                pivot.set_direction(dir);
            }
        }

        for id in &self.controlled {
            let Some(actor) = actors.get(*id) else {
                continue;
            };
            let translated = actor.footprint().offset(delta);
            if self.collisions.iter().any(|c| c.collides(actor, translated)) {
                debug!(?dir, ?id, "step vetoed");
                self.state = MotionState::Idle;
                return false;
            }
        }

        self.movements.clear();
        for id in &self.controlled {
            if let Some(actor) = actors.get_mut(*id) {
                let start = actor.position();
                self.movements.push((
                    *id,
                    Movement {
                        start,
                        end: start + delta,
                    },
                ));
                if let Some(playable) = actor.as_playable_mut() {
                    playable.play();
                }
            }
        }
        self.elapsed = 0.0;
        self.state = MotionState::Moving;
        debug!(?dir, actors = self.movements.len(), "step started");
        true
    }
}

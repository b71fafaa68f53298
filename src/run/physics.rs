// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::run::{Arena, Handle, ShotId};

/// A broad-phase partition; decides what a body can hit and be hit by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionList {
    /// The player's own body.
    Player,
    /// Enemy and boss bodies.
    Enemy,
    /// Shots fired by the player.
    PlayerShot,
    /// Shots fired by enemies and bosses.
    EnemyShot,
    /// Any other partition.
    Custom(u16),
}

/// An identifier for a body owned by a `Physics` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(u64);

impl BodyId {
    /// Create a body identifier from a raw value.
    pub fn from_raw(raw: u64) -> Self {
        BodyId(raw)
    }

    /// The raw value of the identifier.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// The description of a rendered, collidable body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    /// The shot the body belongs to.
    pub shot: ShotId,
    /// Where to place the body.
    pub position: Vec2,
    /// The animation to play.
    pub animation: i32,
    /// The collision radius.
    pub radius: f32,
    /// The collision partition.
    pub list: CollisionList,
}

/// The motion, rendering and collision backend for shot bodies.
///
/// Queries against removed bodies answer `None`; updates to them are ignored.
pub trait Physics {
    /// Create a body.
    fn add_body(&mut self, desc: BodyDesc) -> BodyId;
    /// Destroy a body.
    fn remove_body(&mut self, body: BodyId);

    /// The position of a body.
    fn position(&self, body: BodyId) -> Option<Vec2>;
    /// Move a body.
    fn set_position(&mut self, body: BodyId, position: Vec2);
    /// The velocity of a body, in units per tick.
    fn velocity(&self, body: BodyId) -> Option<Vec2>;
    /// Set the velocity of a body.
    fn set_velocity(&mut self, body: BodyId, velocity: Vec2);
    /// Turn the body's sprite; radians, clockwise on screen.
    fn set_rotation(&mut self, body: BodyId, radians: f32);

    /// Add to the velocity of a body.
    fn add_velocity(&mut self, body: BodyId, delta: Vec2) {
        if let Some(velocity) = self.velocity(body) {
            self.set_velocity(body, velocity + delta);
        }
    }
}

/// A body tracked by `SimplePhysics`.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// The description the body was created from.
    pub desc: BodyDesc,
    /// The current position.
    pub position: Vec2,
    /// The current velocity.
    pub velocity: Vec2,
    /// The sprite rotation.
    pub rotation: f32,
}

/// A minimal `Physics` backend: Euler integration and circle contacts.
#[derive(Debug, Clone, Default)]
pub struct SimplePhysics {
    bodies: Arena<Body>,
}

impl SimplePhysics {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every body by its velocity.
    pub fn integrate(&mut self) {
        self.bodies
            .iter_mut()
            .for_each(|(_, body)| body.position += body.velocity);
    }

    /// The number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether there are no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Look up a body.
    pub fn body(&self, body: BodyId) -> Option<&Body> {
        self.bodies.get(Handle::from_bits(body.raw()))
    }

    /// Iterate over all bodies.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies
            .iter()
            .map(|(handle, body)| (BodyId::from_raw(handle.to_bits()), body))
    }

    /// The shots whose bodies in `list` overlap a circle.
    pub fn contacts(
        &self,
        list: CollisionList,
        center: Vec2,
        radius: f32,
    ) -> impl Iterator<Item = ShotId> + '_ {
        self.bodies
            .iter()
            .filter(move |(_, body)| {
                let reach = body.desc.radius + radius;
                body.desc.list == list && body.position.distance_squared(center) <= reach * reach
            })
            .map(|(_, body)| body.desc.shot)
    }

    fn get_mut(&mut self, body: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(Handle::from_bits(body.raw()))
    }
}

impl Physics for SimplePhysics {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let handle = self.bodies.insert(Body {
            desc,
            position: desc.position,
            velocity: Vec2::ZERO,
            rotation: 0.,
        });
        BodyId::from_raw(handle.to_bits())
    }

    fn remove_body(&mut self, body: BodyId) {
        self.bodies.remove(Handle::from_bits(body.raw()));
    }

    fn position(&self, body: BodyId) -> Option<Vec2> {
        self.body(body).map(|body| body.position)
    }

    fn set_position(&mut self, body: BodyId, position: Vec2) {
        if let Some(body) = self.get_mut(body) {
            body.position = position;
        }
    }

    fn velocity(&self, body: BodyId) -> Option<Vec2> {
        self.body(body).map(|body| body.velocity)
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
        if let Some(body) = self.get_mut(body) {
            body.velocity = velocity;
        }
    }

    fn set_rotation(&mut self, body: BodyId, radians: f32) {
        if let Some(body) = self.get_mut(body) {
            body.rotation = radians;
        }
    }
}

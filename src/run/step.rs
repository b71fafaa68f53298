// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

use crate::run::patterns::*;
use crate::run::util;
use crate::run::world::resolve_owner;
use crate::run::{
    BodyId, CollisionList, EngineConfig, Gateway, OwnerRef, Physics, ShotId, Signal, SpawnError,
    World,
};

/// The behavior bound to a shot.
///
/// Each kind carries its parameters and whatever state it keeps between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Add a fixed velocity once.
    Launch(Launch),
    /// Fly along a heading, speeding up every tick.
    Accelerate(Accelerate),
    /// Fly along a fixed heading.
    Angled(Angled),
    /// Fly towards the player.
    Aimed(Aimed),
    /// Fly along a random heading within a cone.
    Scatter(Scatter),
    /// Chase the closest enemy or boss.
    Homing(Homing),
    /// Swing from side to side.
    Sway(Sway),
    /// Re-pick a heading near a base heading periodically.
    Wobble(Wobble),
    /// Turn steadily.
    Curve(Curve),
    /// Alternate between two headings.
    Zigzag(Zigzag),
    /// Circle the owner.
    Orbit(Orbit),
    /// Fire a single ring.
    Burst(Burst),
    /// Fire a spread from the player.
    Fan(Fan),
    /// Fire an aimed spread.
    Volley(Volley),
    /// Fire rings of wobbling shots periodically.
    Flower(Flower),
    /// Fire a rotating ring periodically.
    Spiral(Spiral),
    /// Fire a mirrored stream.
    Stream(Stream),
    /// Drop shots from the top of the playfield.
    Rain(Rain),
    /// Lay a laser one segment at a time.
    Laser(Laser),
    /// A single laser segment.
    Segment(Segment),
    /// Fire a radial set of lasers.
    LaserBurst(LaserBurst),
    /// Split into branches repeatedly.
    Fractal(Fractal),
    /// Fire rings of splitting shots periodically.
    Cascade(Cascade),
}

impl Step {
    /// Run the step for a tick.
    pub fn run(&mut self, ctx: &mut StepContext) -> Result<Signal, SpawnError> {
        match self {
            Step::Launch(step) => Ok(step.run(ctx)),
            Step::Accelerate(step) => Ok(step.run(ctx)),
            Step::Angled(step) => Ok(step.run(ctx)),
            Step::Aimed(step) => Ok(step.run(ctx)),
            Step::Scatter(step) => Ok(step.run(ctx)),
            Step::Homing(step) => Ok(step.run(ctx)),
            Step::Sway(step) => Ok(step.run(ctx)),
            Step::Wobble(step) => Ok(step.run(ctx)),
            Step::Curve(step) => Ok(step.run(ctx)),
            Step::Zigzag(step) => Ok(step.run(ctx)),
            Step::Orbit(step) => Ok(step.run(ctx)),
            Step::Burst(step) => step.run(ctx),
            Step::Fan(step) => step.run(ctx),
            Step::Volley(step) => step.run(ctx),
            Step::Flower(step) => step.run(ctx),
            Step::Spiral(step) => step.run(ctx),
            Step::Stream(step) => step.run(ctx),
            Step::Rain(step) => step.run(ctx),
            Step::Laser(step) => step.run(ctx),
            Step::Segment(step) => Ok(step.run(ctx)),
            Step::LaserBurst(step) => step.run(ctx),
            Step::Fractal(step) => step.run(ctx),
            Step::Cascade(step) => step.run(ctx),
        }
    }

    /// Whether the step keeps working after the first tick.
    ///
    /// Shots whose step is not persistent are disposable bullets and are cleared by bombs.
    pub fn is_persistent(&self) -> bool {
        match self {
            Step::Launch(_) | Step::Angled(_) | Step::Aimed(_) | Step::Scatter(_) => false,
            Step::Fractal(step) => step.depth() > 0,
            _ => true,
        }
    }

    /// The templates this step spawns from.
    pub fn referenced_templates(&self) -> Vec<&str> {
        match self {
            Step::Burst(step) => vec![step.template()],
            Step::Fan(step) => step.templates(),
            Step::Volley(step) => vec![step.template()],
            Step::Flower(step) => vec![step.template()],
            Step::Spiral(step) => vec![step.template()],
            Step::Stream(step) => step.templates(),
            Step::Rain(step) => step.templates(),
            Step::Laser(step) => vec![step.segment()],
            Step::LaserBurst(step) => vec![step.segment()],
            Step::Fractal(step) => vec![step.template()],
            Step::Cascade(step) => vec![step.template()],
            _ => Vec::new(),
        }
    }

    /// A short name for the kind of step.
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Launch(_) => "launch",
            Step::Accelerate(_) => "accelerate",
            Step::Angled(_) => "angled",
            Step::Aimed(_) => "aimed",
            Step::Scatter(_) => "scatter",
            Step::Homing(_) => "homing",
            Step::Sway(_) => "sway",
            Step::Wobble(_) => "wobble",
            Step::Curve(_) => "curve",
            Step::Zigzag(_) => "zigzag",
            Step::Orbit(_) => "orbit",
            Step::Burst(_) => "burst",
            Step::Fan(_) => "fan",
            Step::Volley(_) => "volley",
            Step::Flower(_) => "flower",
            Step::Spiral(_) => "spiral",
            Step::Stream(_) => "stream",
            Step::Rain(_) => "rain",
            Step::Laser(_) => "laser",
            Step::Segment(_) => "segment",
            Step::LaserBurst(_) => "laser-burst",
            Step::Fractal(_) => "fractal",
            Step::Cascade(_) => "cascade",
        }
    }
}

/// Everything a step may look at or touch while it runs.
pub struct StepContext<'a> {
    pub(crate) id: ShotId,
    pub(crate) frame: u32,
    pub(crate) owner: OwnerRef,
    pub(crate) origin: Vec2,
    pub(crate) list: CollisionList,
    pub(crate) body: Option<BodyId>,
    pub(crate) gateway: Gateway<'a>,
    pub(crate) world: &'a dyn World,
    pub(crate) rng: &'a mut StdRng,
    pub(crate) config: &'a EngineConfig,
}

impl<'a> StepContext<'a> {
    /// The shot being stepped.
    pub fn id(&self) -> ShotId {
        self.id
    }

    /// The frame of the shot; `0` on its first tick.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// What fired the shot.
    pub fn owner(&self) -> OwnerRef {
        self.owner
    }

    /// The collision partition of the shot; children are created in the same partition.
    pub fn list(&self) -> CollisionList {
        self.list
    }

    /// Whether the shot has a body.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// The engine settings.
    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    /// The surrounding game.
    pub fn world(&self) -> &dyn World {
        self.world
    }

    /// The spawn gateway.
    pub fn gateway(&mut self) -> &mut Gateway<'a> {
        &mut self.gateway
    }

    /// The position of the shot; its spawn position if it has no body.
    pub fn position(&self) -> Vec2 {
        self.body
            .and_then(|body| self.gateway.physics().position(body))
            .unwrap_or(self.origin)
    }

    /// The velocity of the shot.
    pub fn velocity(&self) -> Vec2 {
        self.body
            .and_then(|body| self.gateway.physics().velocity(body))
            .unwrap_or(Vec2::ZERO)
    }

    /// Move the shot.
    pub fn set_position(&mut self, position: Vec2) {
        if let Some(body) = self.body {
            self.gateway.physics_mut().set_position(body, position);
        }
    }

    /// Set the velocity of the shot.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        if let Some(body) = self.body {
            self.gateway.physics_mut().set_velocity(body, velocity);
        }
    }

    /// Add to the velocity of the shot.
    pub fn add_velocity(&mut self, delta: Vec2) {
        if let Some(body) = self.body {
            self.gateway.physics_mut().add_velocity(body, delta);
        }
    }

    /// Send the shot along a heading and turn its sprite to match.
    pub fn launch(&mut self, heading: f32, speed: f32) {
        if let Some(body) = self.body {
            let physics = self.gateway.physics_mut();
            physics.set_velocity(body, util::velocity(heading, speed));
            physics.set_rotation(body, heading.to_radians());
        }
    }

    /// The position of the player, if there is one.
    pub fn player_position(&self) -> Option<Vec2> {
        self.world.player_position()
    }

    /// The position of the owner, if it is still alive.
    pub fn owner_position(&self) -> Option<Vec2> {
        resolve_owner(self.world, self.owner)
    }

    /// Whether the player's bomb is going off.
    pub fn bomb_active(&self) -> bool {
        self.world.bomb_active()
    }

    /// The heading from `from` towards the player, turned by `offset` degrees.
    ///
    /// Without a player, or when already on top of it, the heading is straight down.
    pub fn aim_from(&self, from: Vec2, offset: f32) -> f32 {
        self.player_position()
            .map(|target| target - from)
            .filter(|delta| delta.length() >= util::ARRIVAL_DISTANCE)
            .map_or(util::DOWN, |delta| util::heading_of(delta) + offset)
    }

    /// A uniformly random value in `[low, high]`.
    pub fn random(&mut self, low: f32, high: f32) -> f32 {
        if low < high {
            self.rng.gen_range(low..=high)
        } else {
            low
        }
    }

    /// Whether a point is inside the playfield.
    pub fn in_playfield(&self, position: Vec2) -> bool {
        self.config.contains(position)
    }

    /// Create a shot from a template, owned and partitioned like this one.
    pub fn spawn(&mut self, position: Vec2, name: &str) -> Result<ShotId, SpawnError> {
        let (owner, list) = (self.owner, self.list);
        self.gateway.spawn_from_template(owner, position, name, list)
    }

    /// Create a dynamic shot, owned and partitioned like this one.
    pub fn spawn_dynamic(
        &mut self,
        position: Vec2,
        name: &str,
        step: Step,
    ) -> Result<ShotId, SpawnError> {
        let (owner, list) = (self.owner, self.list);
        self.gateway.spawn_dynamic(owner, position, name, list, step)
    }

    /// Create a logic carrier, owned and partitioned like this one.
    pub fn spawn_carrier(&mut self, position: Vec2, step: Step) -> ShotId {
        let (owner, list) = (self.owner, self.list);
        self.gateway.spawn_carrier(owner, position, list, step)
    }
}

// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use glam::Vec2;

use crate::run::patterns::Ramp;
use crate::run::world::resolve_owner;
use crate::run::{util, OwnerRef, Signal, StepContext};

/// Add a fixed velocity on the first tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Launch {
    velocity: Vec2,
}

impl Launch {
    /// Launch with a velocity.
    pub fn new(velocity: Vec2) -> Self {
        Launch {
            velocity,
        }
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        if ctx.frame() == 0 {
            ctx.add_velocity(self.velocity);
        }

        Signal::Detach
    }
}

/// Fly along a fixed heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Angled {
    heading: f32,
    speed: f32,
}

impl Angled {
    /// Fly along `heading` at `speed`.
    pub fn new(heading: f32, speed: f32) -> Self {
        Angled {
            heading,
            speed,
        }
    }

    /// The heading of the shot.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        if ctx.frame() == 0 {
            ctx.launch(self.heading, self.speed);
        }

        Signal::Detach
    }
}

/// Fly towards where the player was on the first tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Aimed {
    offset: f32,
    spread: f32,
    speed: f32,
}

impl Aimed {
    /// Aim at the player, turned by `offset`.
    pub fn new(offset: f32, speed: f32) -> Self {
        Aimed {
            offset,
            spread: 0.,
            speed,
        }
    }

    /// Turn by up to `spread` more degrees either way at random.
    pub fn with_spread(mut self, spread: f32) -> Self {
        self.spread = spread;
        self
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        if ctx.frame() == 0 {
            let jitter = ctx.random(-self.spread, self.spread);
            let heading = ctx.aim_from(ctx.position(), self.offset + jitter);
            ctx.launch(heading, self.speed);
        }

        Signal::Detach
    }
}

/// Fly along a random heading within a cone.
#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    center: f32,
    spread: f32,
    speed: f32,
}

impl Scatter {
    /// Pick a heading within `spread` degrees of `center`.
    pub fn new(center: f32, spread: f32, speed: f32) -> Self {
        Scatter {
            center,
            spread,
            speed,
        }
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        if ctx.frame() == 0 {
            let heading = self.center + ctx.random(-self.spread, self.spread);
            ctx.launch(heading, self.speed);
        }

        Signal::Detach
    }
}

/// Fly along a heading, speeding up every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Accelerate {
    heading: f32,
    initial: f32,
    rate: f32,
    max: Option<f32>,

    speed: f32,
}

impl Accelerate {
    /// Start at `initial` and gain `rate` every tick.
    pub fn new(heading: f32, initial: f32, rate: f32) -> Self {
        Accelerate {
            heading,
            initial,
            rate,
            max: None,
            speed: initial,
        }
    }

    /// Stop speeding up at `max`.
    pub fn capped(mut self, max: f32) -> Self {
        self.max = Some(max);
        self
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        if ctx.frame() == 0 {
            self.speed = self.initial;
        }
        self.speed += self.rate;
        if let Some(max) = self.max {
            self.speed = self.speed.min(max);
        }

        ctx.launch(self.heading, self.speed);
        Signal::Continue
    }
}

/// Chase the closest enemy or the boss, whichever is nearer.
///
/// Without a target the shot flies straight up. When the target dies the shot keeps its
/// current velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct Homing {
    speed: f32,

    target: Option<OwnerRef>,
}

impl Homing {
    /// Chase at `speed`.
    pub fn new(speed: f32) -> Self {
        Homing {
            speed,
            target: None,
        }
    }

    fn acquire(ctx: &StepContext) -> Option<OwnerRef> {
        let position = ctx.position();
        let world = ctx.world();
        let distance = |owner: OwnerRef| {
            resolve_owner(world, owner)
                .map(|target| (owner, target.distance(position)))
        };

        let enemy = world.closest_enemy(position).and_then(distance);
        let boss = world.boss().and_then(distance);

        match (enemy, boss) {
            (Some(enemy), Some(boss)) if boss.1 < enemy.1 => Some(boss.0),
            (Some(enemy), _) => Some(enemy.0),
            (None, boss) => boss.map(|boss| boss.0),
        }
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        if ctx.frame() == 0 {
            self.target = Self::acquire(ctx);
            if self.target.is_none() {
                ctx.launch(0., self.speed);
            }
        }

        let target = match self.target {
            Some(target) => target,
            None => return Signal::Continue,
        };
        let target_position = match resolve_owner(ctx.world(), target) {
            Some(position) => position,
            None => {
                self.target = None;
                return Signal::Continue;
            },
        };

        let delta = target_position - ctx.position();
        if delta.length() >= util::ARRIVAL_DISTANCE {
            ctx.set_velocity(delta.normalize() * self.speed);
        }

        Signal::Continue
    }
}

/// Swing the heading back and forth around a base heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Sway {
    base: f32,
    rate: f32,
    half_period: u32,
    speed: f32,
    aimed: bool,
    lifetime: Option<u32>,

    angle: f32,
}

impl Sway {
    /// Turn by `rate` degrees a tick, reversing every `half_period` ticks.
    pub fn new(base: f32, rate: f32, half_period: u32, speed: f32) -> Self {
        Sway {
            base,
            rate,
            half_period,
            speed,
            aimed: false,
            lifetime: None,
            angle: 0.,
        }
    }

    /// Sway around the heading towards the player instead of the base heading.
    pub fn aimed(mut self) -> Self {
        self.aimed = true;
        self
    }

    /// Retire the shot after a number of ticks.
    pub fn lasting(mut self, lifetime: u32) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        let frame = ctx.frame();
        if frame == 0 {
            self.angle = 0.;
        }

        let half_period = self.half_period.max(1);
        if frame % half_period.saturating_mul(2) < half_period {
            self.angle += self.rate;
        } else {
            self.angle -= self.rate;
        }

        let heading = if self.aimed {
            ctx.aim_from(ctx.position(), self.base + self.angle)
        } else {
            self.base + self.angle
        };
        ctx.launch(heading, self.speed);

        match self.lifetime {
            Some(lifetime) if frame > lifetime => Signal::Done,
            _ => Signal::Continue,
        }
    }
}

/// Every period, re-pick a heading near a base heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Wobble {
    base: f32,
    jitter: f32,
    period: u32,
    speed: f32,
}

impl Wobble {
    /// Fly along `base`, drifting by up to `jitter` degrees every `period` ticks.
    pub fn new(base: f32, jitter: f32, period: u32, speed: f32) -> Self {
        Wobble {
            base,
            jitter,
            period,
            speed,
        }
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        let frame = ctx.frame();

        if frame == 0 {
            ctx.launch(self.base, self.speed);
        } else if frame % self.period.max(1) == 0 {
            let heading = self.base + ctx.random(-self.jitter, self.jitter);
            ctx.launch(heading, self.speed);
        }

        Signal::Continue
    }
}

/// Turn from one heading to another over a number of ticks, then fly straight.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    heading: Ramp,
    speed: f32,
}

impl Curve {
    /// Turn by `turn` degrees over `duration` ticks.
    pub fn new(initial: f32, turn: f32, duration: u32, speed: f32) -> Self {
        Curve {
            heading: Ramp::new(0, duration, initial, initial + turn),
            speed,
        }
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        let heading = self.heading.at(ctx.frame());
        ctx.launch(heading, self.speed);

        Signal::Continue
    }
}

/// Fly along a base heading for half a period and a kinked heading for the other half.
#[derive(Debug, Clone, PartialEq)]
pub struct Zigzag {
    base: f32,
    kink: f32,
    period: u32,
    speed: f32,
}

impl Zigzag {
    /// Alternate between `base` and `base + kink` every half `period`.
    pub fn new(base: f32, kink: f32, period: u32, speed: f32) -> Self {
        Zigzag {
            base,
            kink,
            period,
            speed,
        }
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        let period = self.period.max(2);
        let phase = ctx.frame() % period;

        if phase == 0 {
            ctx.launch(self.base, self.speed);
        } else if phase == period / 2 {
            ctx.launch(self.base + self.kink, self.speed);
        }

        Signal::Continue
    }
}

/// Circle the owner, flying off tangentially once it dies or the orbit ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    radius: f32,
    rate: f32,
    lifetime: u32,
    release_speed: f32,

    angle: f32,
}

impl Orbit {
    /// Circle at `radius`, turning `rate` degrees a tick, starting at `angle`.
    pub fn new(radius: f32, rate: f32, angle: f32, lifetime: u32, release_speed: f32) -> Self {
        Orbit {
            radius,
            rate,
            lifetime,
            release_speed,
            angle,
        }
    }

    fn release(&self, ctx: &mut StepContext) -> Signal {
        if !ctx.has_body() {
            return Signal::Done;
        }

        let tangent = if self.rate < 0. {
            self.angle - 90.
        } else {
            self.angle + 90.
        };
        ctx.launch(tangent, self.release_speed);

        Signal::Detach
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        let center = match ctx.owner_position() {
            Some(center) if ctx.frame() < self.lifetime => center,
            _ => return self.release(ctx),
        };

        ctx.set_velocity(Vec2::ZERO);
        ctx.set_position(center + util::heading(self.angle) * self.radius);
        self.angle = util::wrap(self.angle + self.rate);

        Signal::Continue
    }
}

// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use std::rc::Rc;

use glam::Vec2;

use crate::run::patterns::{ring, source};
use crate::run::{util, Signal, SpawnError, Step, StepContext};

/// Where a laser starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// At the laser's own position.
    Here,
    /// At the owner; at the laser's own position if the owner is gone.
    Owner,
    /// At the player; at the laser's own position if there is no player.
    Player,
}

/// Which way a laser travels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaserHeading {
    /// Along a fixed heading.
    Fixed(f32),
    /// Towards the player when the laser starts; straight down without a player.
    Player,
}

/// An invisible carrier laying one segment per tick along its path.
///
/// The laser ends once its cursor leaves the playfield or, unless told otherwise, when a bomb
/// goes off.
#[derive(Debug, Clone, PartialEq)]
pub struct Laser {
    segment: Rc<str>,
    anchor: Anchor,
    offset: Vec2,
    heading: LaserHeading,
    advance: f32,
    segment_lifetime: u32,
    bend: f32,
    bend_period: u32,
    track_player_x: bool,
    stop_on_bomb: bool,

    cursor: Vec2,
    direction: Vec2,
    bend_angle: f32,
}

impl Laser {
    /// A laser built from `segment` shots.
    pub fn new<T>(segment: T, heading: LaserHeading) -> Self
    where
        T: Into<Rc<str>>,
    {
        Laser {
            segment: segment.into(),
            anchor: Anchor::Here,
            offset: Vec2::ZERO,
            heading,
            advance: 3.,
            segment_lifetime: 40,
            bend: 0.,
            bend_period: 60,
            track_player_x: false,
            stop_on_bomb: true,

            cursor: Vec2::ZERO,
            direction: util::UP,
            bend_angle: 0.,
        }
    }

    /// Start at an anchor, displaced by `offset`.
    pub fn anchored(mut self, anchor: Anchor, offset: Vec2) -> Self {
        self.anchor = anchor;
        self.offset = offset;
        self
    }

    /// Move the cursor `advance` units per tick.
    pub fn advancing(mut self, advance: f32) -> Self {
        self.advance = advance;
        self
    }

    /// Keep each segment for `lifetime` ticks.
    pub fn segment_lifetime(mut self, lifetime: u32) -> Self {
        self.segment_lifetime = lifetime;
        self
    }

    /// Bend by `bend` degrees per tick, switching direction every half `period`.
    pub fn bending(mut self, bend: f32, period: u32) -> Self {
        self.bend = bend;
        self.bend_period = period;
        self
    }

    /// Make the segments follow the player horizontally.
    pub fn tracking_player_x(mut self) -> Self {
        self.track_player_x = true;
        self
    }

    /// Keep going while a bomb is active.
    pub fn ignoring_bomb(mut self) -> Self {
        self.stop_on_bomb = false;
        self
    }

    pub(crate) fn segment(&self) -> &str {
        &self.segment
    }

    fn start(&mut self, ctx: &StepContext) {
        let here = ctx.position();
        let anchor = match self.anchor {
            Anchor::Here => here,
            Anchor::Owner => ctx.owner_position().unwrap_or(here),
            Anchor::Player => ctx.player_position().unwrap_or(here),
        };

        self.cursor = anchor + self.offset;
        self.direction = match self.heading {
            LaserHeading::Fixed(heading) => util::heading(heading),
            LaserHeading::Player => util::heading(ctx.aim_from(self.cursor, 0.)),
        };
        self.bend_angle = 0.;
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Result<Signal, SpawnError> {
        let frame = ctx.frame();
        if frame == 0 {
            self.start(ctx);
        }

        let mut segment = Segment::new(self.segment_lifetime);
        if self.track_player_x {
            segment = segment.tracking_player_x();
        }
        ctx.spawn_dynamic(self.cursor, &self.segment, Step::Segment(segment))?;

        if self.bend != 0. {
            let period = self.bend_period.max(2);
            if frame % period < period / 2 {
                self.bend_angle += self.bend;
            } else {
                self.bend_angle -= self.bend;
            }
        }
        self.cursor += util::rotate(self.direction, self.bend_angle) * self.advance;

        let stopped = self.stop_on_bomb && ctx.bomb_active();
        if stopped || !ctx.in_playfield(self.cursor) {
            Ok(Signal::Done)
        } else {
            Ok(Signal::Continue)
        }
    }
}

/// One visible piece of a laser.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    lifetime: u32,
    track_player_x: bool,
}

impl Segment {
    /// A segment lasting `lifetime` ticks.
    pub fn new(lifetime: u32) -> Self {
        Segment {
            lifetime,
            track_player_x: false,
        }
    }

    /// Follow the player horizontally.
    pub fn tracking_player_x(mut self) -> Self {
        self.track_player_x = true;
        self
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Signal {
        if self.track_player_x {
            if let Some(player) = ctx.player_position() {
                let position = ctx.position();
                ctx.set_position(Vec2::new(player.x, position.y));
            }
        }

        if ctx.frame() >= self.lifetime {
            Signal::Done
        } else {
            Signal::Continue
        }
    }
}

/// Fire lasers evenly around a circle.
#[derive(Debug, Clone, PartialEq)]
pub struct LaserBurst {
    segment: Rc<str>,
    count: u32,
    first: f32,
    advance: f32,
    segment_lifetime: u32,
}

impl LaserBurst {
    /// Fire `count` lasers of `segment` shots, the first along `first`.
    pub fn new<T>(segment: T, count: u32, first: f32) -> Self
    where
        T: Into<Rc<str>>,
    {
        LaserBurst {
            segment: segment.into(),
            count,
            first,
            advance: 3.,
            segment_lifetime: 40,
        }
    }

    pub(crate) fn segment(&self) -> &str {
        &self.segment
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Result<Signal, SpawnError> {
        let position = source(ctx).unwrap_or_else(|| ctx.position());

        for heading in ring(self.count, self.first) {
            let laser = Laser::new(self.segment.clone(), LaserHeading::Fixed(heading))
                .advancing(self.advance)
                .segment_lifetime(self.segment_lifetime);
            ctx.spawn_carrier(position, Step::Laser(laser));
        }

        Ok(Signal::Done)
    }
}

// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

//! Step kinds
//!
//! Headings are in degrees; `0` points up the screen and positive headings turn clockwise.

use glam::Vec2;

use crate::run::{OwnerRef, StepContext};

mod emitters;
mod fractal;
mod laser;
mod motion;

pub use self::emitters::{Burst, Fan, Flower, Rain, Spiral, Stream, Volley};
pub use self::fractal::{Cascade, Fractal};
pub use self::laser::{Anchor, Laser, LaserBurst, LaserHeading, Segment};
pub use self::motion::{
    Accelerate, Aimed, Angled, Curve, Homing, Launch, Orbit, Scatter, Sway, Wobble, Zigzag,
};

/// A value moving linearly between two frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    min: u32,
    max: u32,

    start: f32,
    end: f32,
    step: f32,
}

impl Ramp {
    /// A ramp from `start` at frame `min` to `end` at frame `max`.
    pub fn new(min: u32, max: u32, start: f32, end: f32) -> Self {
        let span = max.saturating_sub(min).max(1);

        Ramp {
            min,
            max,
            start,
            end,
            step: (end - start) / (span as f32),
        }
    }

    /// The value at a frame.
    pub fn at(&self, frame: u32) -> f32 {
        if frame < self.min {
            self.start
        } else if self.is_in_domain(frame) {
            self.start + self.step * ((frame - self.min) as f32)
        } else {
            self.end
        }
    }

    fn is_in_domain(&self, frame: u32) -> bool {
        self.min <= frame && frame < self.max
    }
}

/// Where an emitter fires from: its owner, or itself when it has no owner.
///
/// `None` once the owner is gone; emitters stop then.
fn source(ctx: &StepContext) -> Option<Vec2> {
    match ctx.owner() {
        OwnerRef::None => Some(ctx.position()),
        _ => ctx.owner_position(),
    }
}

/// Evenly spaced headings around a circle.
fn ring(count: u32, first: f32) -> impl Iterator<Item = f32> {
    let spacing = 360. / (count.max(1) as f32);
    (0..count).map(move |i| first + spacing * (i as f32))
}

/// Whether a periodic emitter fires on a frame.
fn fires(frame: u32, every: u32) -> bool {
    frame % every.max(1) == 0
}

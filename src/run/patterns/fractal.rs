// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use std::rc::Rc;

use crate::run::patterns::{fires, ring, source};
use crate::run::{Signal, SpawnError, Step, StepContext};

/// A shot which flies for a while and then splits into branches running the same step with one
/// less level of depth.
///
/// Shots at depth `0` never split; they become plain bullets after their first tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Fractal {
    template: Rc<str>,
    depth: u32,
    branches: u32,
    heading: f32,
    spin: f32,
    speed: f32,
    split_after: u32,
}

impl Fractal {
    /// A shot from `template` flying along `heading` which splits `depth` more times.
    pub fn new<T>(template: T, depth: u32, heading: f32, speed: f32) -> Self
    where
        T: Into<Rc<str>>,
    {
        Fractal {
            template: template.into(),
            depth,
            branches: 3,
            heading,
            spin: 0.,
            speed,
            split_after: 40,
        }
    }

    /// Split into `branches` shots after `split_after` ticks, the first branch along `spin`.
    pub fn splitting(mut self, branches: u32, split_after: u32, spin: f32) -> Self {
        self.branches = branches;
        self.split_after = split_after;
        self.spin = spin;
        self
    }

    /// How many more times the shot splits.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub(crate) fn template(&self) -> &str {
        &self.template
    }

    fn branch(&self, heading: f32) -> Self {
        Fractal {
            template: self.template.clone(),
            depth: self.depth - 1,
            heading,
            ..*self
        }
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Result<Signal, SpawnError> {
        let frame = ctx.frame();
        if frame == 0 {
            ctx.launch(self.heading, self.speed);
        }

        if self.depth == 0 {
            return Ok(Signal::Detach);
        }
        if frame < self.split_after {
            return Ok(Signal::Continue);
        }

        let position = ctx.position();
        for heading in ring(self.branches, self.spin) {
            ctx.spawn_dynamic(position, &self.template, Step::Fractal(self.branch(heading)))?;
        }

        Ok(Signal::Done)
    }
}

/// Fire rings of splitting shots from the owner, each ring turned further than the last.
#[derive(Debug, Clone, PartialEq)]
pub struct Cascade {
    template: Rc<str>,
    every: u32,
    turn: f32,
    depth: u32,
    branches: u32,
    split_after: u32,
    speed: f32,
}

impl Cascade {
    /// Every `every` ticks fire `branches` shots which split `depth` times; each ring is turned
    /// by `turn` degrees more than the previous one.
    pub fn new<T>(template: T, every: u32, turn: f32, depth: u32, speed: f32) -> Self
    where
        T: Into<Rc<str>>,
    {
        Cascade {
            template: template.into(),
            every,
            turn,
            depth,
            branches: 3,
            split_after: 40,
            speed,
        }
    }

    pub(crate) fn template(&self) -> &str {
        &self.template
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Result<Signal, SpawnError> {
        let position = match source(ctx) {
            Some(position) => position,
            None => return Ok(Signal::Done),
        };

        let frame = ctx.frame();
        if fires(frame, self.every) {
            let spin = self.turn * ((frame / self.every.max(1)) as f32);
            for heading in ring(self.branches, spin) {
                let shot = Fractal::new(self.template.clone(), self.depth, heading, self.speed)
                    .splitting(self.branches, self.split_after, spin);
                ctx.spawn_dynamic(position, &self.template, Step::Fractal(shot))?;
            }
        }

        Ok(Signal::Continue)
    }
}

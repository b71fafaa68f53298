// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use std::rc::Rc;

use glam::Vec2;

use crate::run::patterns::{fires, ring, source, Aimed, Angled, Wobble, Zigzag};
use crate::run::{util, Signal, SpawnError, Step, StepContext};

/// Fire a single ring of shots from the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Burst {
    template: Rc<str>,
    count: u32,
    first: f32,
    speed: f32,
}

impl Burst {
    /// Fire `count` shots evenly around a circle, the first along `first`.
    pub fn new<T>(template: T, count: u32, first: f32, speed: f32) -> Self
    where
        T: Into<Rc<str>>,
    {
        Burst {
            template: template.into(),
            count,
            first,
            speed,
        }
    }

    pub(crate) fn template(&self) -> &str {
        &self.template
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Result<Signal, SpawnError> {
        let position = source(ctx).unwrap_or_else(|| ctx.position());

        for heading in ring(self.count, self.first) {
            ctx.spawn_dynamic(
                position,
                &self.template,
                Step::Angled(Angled::new(heading, self.speed)),
            )?;
        }

        Ok(Signal::Done)
    }
}

/// Fire a spread of shots forward from the player.
#[derive(Debug, Clone, PartialEq)]
pub struct Fan {
    template: Rc<str>,
    count: u32,
    span: f32,
    reach: f32,
    speed: f32,
    base: Option<Rc<str>>,
}

impl Fan {
    /// Fire `count + 1` shots across `span` degrees around straight up.
    pub fn new<T>(template: T, count: u32, span: f32, speed: f32) -> Self
    where
        T: Into<Rc<str>>,
    {
        Fan {
            template: template.into(),
            count,
            span,
            reach: 1.,
            speed,
            base: None,
        }
    }

    /// Also place a shot from a template at the center of the fan.
    pub fn with_base<T>(mut self, base: T) -> Self
    where
        T: Into<Rc<str>>,
    {
        self.base = Some(base.into());
        self
    }

    pub(crate) fn templates(&self) -> Vec<&str> {
        let mut templates = vec![&*self.template];
        templates.extend(self.base.as_deref());
        templates
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Result<Signal, SpawnError> {
        let center = ctx.player_position().unwrap_or_else(|| ctx.position());
        let spacing = if self.count == 0 {
            0.
        } else {
            self.span / (self.count as f32)
        };
        let first = -self.span / 2.;

        for i in 0..=self.count {
            let heading = first + spacing * (i as f32);
            ctx.spawn_dynamic(
                center + util::heading(heading) * self.reach,
                &self.template,
                Step::Angled(Angled::new(heading, self.speed)),
            )?;
        }
        if let Some(base) = self.base.as_ref() {
            ctx.spawn(center, base)?;
        }

        Ok(Signal::Done)
    }
}

/// Fire a spread of aimed shots once.
#[derive(Debug, Clone, PartialEq)]
pub struct Volley {
    template: Rc<str>,
    count: u32,
    first: f32,
    step: f32,
    speed: f32,
    speed_step: f32,
}

impl Volley {
    /// Fire `count` shots aimed at the player, turned by `first`, `first + step`, ...
    pub fn new<T>(template: T, count: u32, first: f32, step: f32, speed: f32) -> Self
    where
        T: Into<Rc<str>>,
    {
        Volley {
            template: template.into(),
            count,
            first,
            step,
            speed,
            speed_step: 0.,
        }
    }

    /// Make every shot after the first faster by `speed_step`.
    pub fn accelerating(mut self, speed_step: f32) -> Self {
        self.speed_step = speed_step;
        self
    }

    pub(crate) fn template(&self) -> &str {
        &self.template
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Result<Signal, SpawnError> {
        let position = source(ctx).unwrap_or_else(|| ctx.position());
        fire_volley(
            ctx,
            position,
            &self.template,
            (self.count, self.first, self.step),
            (self.speed, self.speed_step),
        )?;

        Ok(Signal::Done)
    }
}

fn fire_volley(
    ctx: &mut StepContext,
    position: Vec2,
    template: &str,
    (count, first, step): (u32, f32, f32),
    (speed, speed_step): (f32, f32),
) -> Result<(), SpawnError> {
    for i in 0..count {
        let i = i as f32;
        ctx.spawn_dynamic(
            position,
            template,
            Step::Aimed(Aimed::new(first + step * i, speed + speed_step * i)),
        )?;
    }

    Ok(())
}

/// Fire rings of wobbling shots from the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Flower {
    template: Rc<str>,
    every: u32,
    count: u32,
    speed: f32,
    jitter: f32,
    period: u32,
}

impl Flower {
    /// Fire a ring of `count` shots every `every` ticks.
    pub fn new<T>(template: T, every: u32, count: u32, speed: f32) -> Self
    where
        T: Into<Rc<str>>,
    {
        Flower {
            template: template.into(),
            every,
            count,
            speed,
            jitter: 0.,
            period: 60,
        }
    }

    /// Let each shot drift by up to `jitter` degrees every `period` ticks.
    pub fn wobbling(mut self, jitter: f32, period: u32) -> Self {
        self.jitter = jitter;
        self.period = period;
        self
    }

    pub(crate) fn template(&self) -> &str {
        &self.template
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Result<Signal, SpawnError> {
        let position = match source(ctx) {
            Some(position) => position,
            None => return Ok(Signal::Done),
        };

        if fires(ctx.frame(), self.every) {
            for heading in ring(self.count, 0.) {
                ctx.spawn_dynamic(
                    position,
                    &self.template,
                    Step::Wobble(Wobble::new(heading, self.jitter, self.period, self.speed)),
                )?;
            }
        }

        Ok(Signal::Continue)
    }
}

/// Fire a ring which rotates from one firing to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Spiral {
    template: Rc<str>,
    every: u32,
    count: u32,
    turn: f32,
    radius: f32,
    speed: f32,
    kink: f32,
    period: u32,
}

impl Spiral {
    /// Fire `count` shots every `every` ticks, the ring turned by `turn` degrees per tick.
    pub fn new<T>(template: T, every: u32, count: u32, turn: f32, speed: f32) -> Self
    where
        T: Into<Rc<str>>,
    {
        Spiral {
            template: template.into(),
            every,
            count,
            turn,
            radius: 0.,
            speed,
            kink: 0.,
            period: 60,
        }
    }

    /// Start the shots `radius` away from the owner.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Let each shot zigzag by `kink` degrees every half `period`.
    pub fn zigzagging(mut self, kink: f32, period: u32) -> Self {
        self.kink = kink;
        self.period = period;
        self
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
            let first = util::wrap(self.turn * (frame as f32));
            for heading in ring(self.count, first) {
                ctx.spawn_dynamic(
                    position + util::heading(heading) * self.radius,
                    &self.template,
                    Step::Zigzag(Zigzag::new(heading, self.kink, self.period, self.speed)),
                )?;
            }
        }

        Ok(Signal::Continue)
    }
}

/// Fire a stream of shots mirrored about the vertical axis, sweeping with time.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    template: Rc<str>,
    every: u32,
    turn: f32,
    speed: f32,
    extra: Option<(Rc<str>, u32)>,
}

impl Stream {
    /// Fire a mirrored pair every `every` ticks, sweeping `turn` degrees per tick.
    pub fn new<T>(template: T, every: u32, turn: f32, speed: f32) -> Self
    where
        T: Into<Rc<str>>,
    {
        Stream {
            template: template.into(),
            every,
            turn,
            speed,
            extra: None,
        }
    }

    /// Also spawn a template every `every` ticks.
    pub fn with_extra<T>(mut self, template: T, every: u32) -> Self
    where
        T: Into<Rc<str>>,
    {
        self.extra = Some((template.into(), every));
        self
    }

    pub(crate) fn templates(&self) -> Vec<&str> {
        let mut templates = vec![&*self.template];
        templates.extend(self.extra.as_ref().map(|(template, _)| &**template));
        templates
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Result<Signal, SpawnError> {
        let position = match source(ctx) {
            Some(position) => position,
            None => return Ok(Signal::Done),
        };

        let frame = ctx.frame();
        if fires(frame, self.every) {
            let heading = util::wrap(self.turn * (frame as f32));
            let mirrored = util::wrap(360. - heading);

            ctx.spawn_dynamic(
                position,
                &self.template,
                Step::Angled(Angled::new(heading, self.speed)),
            )?;
            if (mirrored - heading).abs() > f32::EPSILON {
                ctx.spawn_dynamic(
                    position,
                    &self.template,
                    Step::Angled(Angled::new(mirrored, self.speed)),
                )?;
            }
        }

        if let Some((template, every)) = self.extra.as_ref() {
            if fires(frame, *every) {
                ctx.spawn(position, template)?;
            }
        }

        Ok(Signal::Continue)
    }
}

/// Drop shots from random points along the top of the playfield, with periodic aimed volleys
/// from the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Rain {
    template: Rc<str>,
    every: u32,
    speed: f32,
    volley: Option<RainVolley>,
}

#[derive(Debug, Clone, PartialEq)]
struct RainVolley {
    template: Rc<str>,
    every: u32,
    count: u32,
    first: f32,
    step: f32,
    speed: f32,
}

impl Rain {
    /// Drop a shot every `every` ticks.
    pub fn new<T>(template: T, every: u32, speed: f32) -> Self
    where
        T: Into<Rc<str>>,
    {
        Rain {
            template: template.into(),
            every,
            speed,
            volley: None,
        }
    }

    /// Every `every` ticks, also fire `count` aimed shots turned by `first`, `first + step`, ...
    pub fn with_volley<T>(
        mut self,
        template: T,
        every: u32,
        (count, first, step): (u32, f32, f32),
        speed: f32,
    ) -> Self
    where
        T: Into<Rc<str>>,
    {
        self.volley = Some(RainVolley {
            template: template.into(),
            every,
            count,
            first,
            step,
            speed,
        });
        self
    }

    pub(crate) fn templates(&self) -> Vec<&str> {
        let mut templates = vec![&*self.template];
        templates.extend(self.volley.as_ref().map(|volley| &*volley.template));
        templates
    }

    pub(crate) fn run(&mut self, ctx: &mut StepContext) -> Result<Signal, SpawnError> {
        let position = match source(ctx) {
            Some(position) => position,
            None => return Ok(Signal::Done),
        };

        let frame = ctx.frame();
        if fires(frame, self.every) {
            let x = ctx.random(0., 1.);
            // Drops start above the top edge but inside the culling margin.
            let config = ctx.config();
            let lead = (config.height * 0.05).min(config.cull_margin * 0.5);
            let drop = Vec2::new(config.point(x, 0.).x, config.top - lead);
            ctx.spawn_dynamic(
                drop,
                &self.template,
                Step::Angled(Angled::new(util::DOWN, self.speed)),
            )?;
        }

        if let Some(volley) = self.volley.as_ref() {
            if fires(frame, volley.every) {
                fire_volley(
                    ctx,
                    position,
                    &volley.template,
                    (volley.count, volley.first, volley.step),
                    (volley.speed, 0.),
                )?;
            }
        }

        Ok(Signal::Continue)
    }
}

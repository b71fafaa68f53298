// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use std::collections::hash_map::HashMap;

use glam::Vec2;
use tracing::info;

use crate::run::patterns::*;
use crate::run::{util, Step};

/// Named steps which templates refer to through their `gimmick` entry.
///
/// Resolving a name hands out the registered step; every shot gets its own copy.
#[derive(Debug, Clone, Default)]
pub struct StepLibrary {
    steps: HashMap<String, Step>,
}

impl StepLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a step under a name, replacing any previous one.
    pub fn register<N>(&mut self, name: N, step: Step) -> &mut Self
    where
        N: Into<String>,
    {
        self.steps.insert(name.into(), step);
        self
    }

    /// Look up a step by name.
    pub fn resolve(&self, name: &str) -> Option<&Step> {
        self.steps.get(name)
    }

    /// The number of registered steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    /// The steps used by the stock shot set.
    pub fn standard() -> Self {
        let mut library = Self::new();

        library
            .register("enemyStraight", Step::Launch(Launch::new(Vec2::new(0., 2.))))
            .register("enemySlightDownLeft", Step::Angled(Angled::new(260., 1.)))
            .register("enemySlightDownRight", Step::Angled(Angled::new(100., 1.)))
            .register("enemyAimed", Step::Aimed(Aimed::new(0., 2.)))
            .register(
                "enemyAimedWide",
                Step::Aimed(Aimed::new(0., 0.7).with_spread(45.)),
            )
            .register("enemyLowerHalf", Step::Scatter(Scatter::new(util::DOWN, 45., 1.)))
            .register(
                "enemyLowerHalfSlow",
                Step::Scatter(Scatter::new(util::DOWN, 45., 0.4)),
            )
            .register("enemyRandom", Step::Scatter(Scatter::new(util::DOWN, 180., 0.5)))
            .register("enemyCircleMid", Step::Burst(Burst::new("enemy_mid", 20, 0., 1.)))
            .register("enemyCircleSlim", Step::Burst(Burst::new("enemy_slim", 20, 0., 1.)))
            .register(
                "enemyFiveAimedSlow",
                Step::Volley(Volley::new("enemy_mid", 5, -20., 10., 0.5)),
            )
            .register(
                "enemyFiveAimedDifferent",
                Step::Volley(Volley::new("enemy_slim", 10, 0., 0., 0.25).accelerating(0.25)),
            )
            .register(
                "enemyLaserAimed",
                Step::Laser(
                    Laser::new("enemy_laser", LaserHeading::Player)
                        .anchored(Anchor::Owner, Vec2::ZERO),
                ),
            )
            .register(
                "enemyLaserAimedSlow",
                Step::Laser(
                    Laser::new("enemy_laser", LaserHeading::Player)
                        .anchored(Anchor::Owner, Vec2::ZERO)
                        .advancing(2.)
                        .segment_lifetime(60),
                ),
            )
            .register(
                "enemyLaserStraight",
                Step::Laser(
                    Laser::new("enemy_laser", LaserHeading::Fixed(util::DOWN))
                        .anchored(Anchor::Owner, Vec2::ZERO),
                ),
            )
            .register(
                "enemyLaserBending",
                Step::Laser(
                    Laser::new("enemy_laser", LaserHeading::Player)
                        .anchored(Anchor::Owner, Vec2::ZERO)
                        .advancing(2.)
                        .segment_lifetime(60)
                        .bending(3., 60),
                ),
            )
            .register(
                "enemyLaserCircle",
                Step::LaserBurst(LaserBurst::new("enemy_laser", 5, util::DOWN)),
            )
            .register(
                "enemyLilyWhite",
                Step::Stream(
                    Stream::new("enemy_mid", 5, 2., 2.).with_extra("enemy_five_aimed", 20),
                ),
            )
            .register(
                "barney1",
                Step::Rain(Rain::new("enemy_slim", 6, 0.5).with_volley(
                    "enemy_mid",
                    20,
                    (5, -20., 10.),
                    1.,
                )),
            )
            .register(
                "ack1",
                Step::Flower(Flower::new("enemy_slim", 20, 20, 1.).wobbling(10., 60)),
            )
            .register(
                "accMid",
                Step::Spiral(
                    Spiral::new("enemy_slim", 10, 20, 1., 1.)
                        .with_radius(10.)
                        .zigzagging(30., 60),
                ),
            )
            .register(
                "accS1",
                Step::Spiral(Spiral::new("enemy_slim", 2, 1, 1., 3.).with_radius(20.)),
            )
            .register("enemyPCB", Step::Sway(Sway::new(util::DOWN, 1., 30, 1.)))
            .register(
                "enemyPCB2",
                Step::Sway(Sway::new(0., 1., 30, 1.).aimed().lasting(400)),
            )
            .register("enemyCurve", Step::Curve(Curve::new(util::DOWN, 90., 60, 1.5)))
            .register("enemyOrbit", Step::Orbit(Orbit::new(30., 3., 0., 240, 1.5)))
            .register(
                "mootNS3",
                Step::Cascade(Cascade::new("enemy_mid", 30, 11., 4, 1.)),
            )
            .register(
                "yournamehereStraight",
                Step::Launch(Launch::new(Vec2::new(0., -4.))),
            )
            .register(
                "yournamehereStrong",
                Step::Accelerate(Accelerate::new(0., 4., 0.05)),
            )
            .register("yournamehereHoming", Step::Homing(Homing::new(4.)));

        for offset in (10..360).step_by(10) {
            library.register(
                format!("enemyAimedPlus{}", offset),
                Step::Aimed(Aimed::new(offset as f32, 2.)),
            );
        }

        // (count, unfocused span, focused span)
        let kinomod = [(4, 60., 16.), (6, 60., 18.), (8, 80., 24.), (10, 90., 30.)];
        for (level, &(count, unfocused, focused)) in (1..).zip(kinomod.iter()) {
            let unfocused =
                Fan::new("kinomod_small", count, unfocused, 4.).with_base("kinomod_base");
            let focused = Fan::new("kinomod_large", count, focused, 4.).with_base("kinomod_base");

            library
                .register(format!("kinomodUnfocused{}", level), Step::Fan(unfocused))
                .register(format!("kinomodFocused{}", level), Step::Fan(focused));
        }

        let aerolite = [
            Vec2::new(0., -10.),
            Vec2::new(0., -10.),
            Vec2::new(2., -10.),
            Vec2::new(2., -10.),
        ];
        for (level, offset) in (1..).zip(aerolite.iter()) {
            let laser = Laser::new(format!("aerolite_laser{}", level), LaserHeading::Fixed(0.))
                .anchored(Anchor::Player, *offset)
                .segment_lifetime(10)
                .tracking_player_x()
                .ignoring_bomb();
            library.register(format!("aeroliteUnfocused{}", level), Step::Laser(laser));
        }

        info!(steps = library.len(), "loaded the standard step library");

        library
    }
}

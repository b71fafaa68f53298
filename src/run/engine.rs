// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, warn};

use crate::data::Catalog;
use crate::run::registry::Verdict;
use crate::run::{
    CollisionList, EngineConfig, Gateway, OwnerRef, Physics, Registry, Shot, ShotId, Signal,
    SimplePhysics, SpawnError, Step, StepContext, World,
};

/// What happened during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Shots created since the previous tick which joined the live set.
    pub merged: usize,
    /// Steps which were run.
    pub stepped: usize,
    /// Shots culled for leaving the playfield.
    pub culled: usize,
    /// Shots removed at the end of the tick.
    pub retired: usize,
    /// Shots alive after the tick, including newly spawned ones.
    pub live: usize,
}

/// The shot engine.
///
/// Owns every shot. Attack code spawns shots through it and the game ticks it once per frame.
pub struct ShotEngine<P = SimplePhysics> {
    catalog: Catalog,
    registry: Registry,
    physics: P,
    rng: StdRng,
    config: EngineConfig,
    ticks: u64,
}

fn release<P>(physics: &mut P, shot: &Shot)
where
    P: Physics,
{
    if let Some(body) = shot.body {
        physics.remove_body(body);
    }
}

impl<P> ShotEngine<P>
where
    P: Physics,
{
    /// Create an engine over a catalog and a physics backend.
    pub fn new(catalog: Catalog, physics: P, config: EngineConfig) -> Self {
        Self {
            catalog,
            registry: Registry::new(),
            physics,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            ticks: 0,
        }
    }

    /// Advance every shot by one tick.
    ///
    /// Shots spawned before the tick join at frame `0`; shots already live age by one frame.
    /// Every step runs once, then shots which finished, left the playfield or lost both their
    /// step and body are removed. Shots spawned during the tick first run on the next one.
    pub fn tick(&mut self, world: &dyn World) -> TickSummary {
        let ShotEngine {
            catalog,
            registry,
            physics,
            rng,
            config,
            ticks,
        } = self;

        *ticks += 1;
        let mut summary = TickSummary {
            merged: registry.advance(),
            ..TickSummary::default()
        };

        registry.step_all(|shot, queue| {
            let mut verdict = Verdict::Keep;
            let mut detached = false;

            if let Some(mut step) = shot.step.take() {
                summary.stepped += 1;

                let result = {
                    let mut ctx = StepContext {
                        id: shot.id,
                        frame: shot.frame,
                        owner: shot.owner,
                        origin: shot.origin,
                        list: shot.list,
                        body: shot.body,
                        gateway: Gateway::new(&*catalog, queue, &mut *physics),
                        world,
                        rng: &mut *rng,
                        config: &*config,
                    };
                    step.run(&mut ctx)
                };

                let signal = result.unwrap_or_else(|err| {
                    error!(
                        shot = %shot.id,
                        kind = step.kind(),
                        error = %err,
                        "step failed; retiring the shot"
                    );
                    Signal::Done
                });

                match signal {
                    Signal::Continue => shot.step = Some(step),
                    Signal::Done => {
                        shot.step = Some(step);
                        verdict = Verdict::Retire;
                    },
                    Signal::Detach => detached = true,
                }
            }

            if let Some(body) = shot.body {
                let culled = physics
                    .position(body)
                    .map_or(false, |position| config.is_culled(position));
                if culled && verdict == Verdict::Keep {
                    summary.culled += 1;
                    verdict = Verdict::Retire;
                }
            } else if shot.step.is_none() && verdict == Verdict::Keep {
                if !detached {
                    warn!(shot = %shot.id, "dropping a shot with neither a step nor a body");
                }
                verdict = Verdict::Retire;
            }

            verdict
        });

        summary.retired = registry.retire_marked(|shot| release(physics, shot));
        summary.live = registry.len();

        debug!(
            tick = *ticks,
            merged = summary.merged,
            stepped = summary.stepped,
            culled = summary.culled,
            retired = summary.retired,
            live = summary.live,
            "tick"
        );

        summary
    }

    /// The number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The spawn gateway.
    pub fn gateway(&mut self) -> Gateway<'_> {
        Gateway::new(&self.catalog, self.registry.split_queue(), &mut self.physics)
    }

    /// Create a shot from a template along with its sub-shots.
    pub fn add_shot(
        &mut self,
        owner: OwnerRef,
        position: Vec2,
        name: &str,
        list: CollisionList,
    ) -> Result<ShotId, SpawnError> {
        self.gateway().spawn_from_template(owner, position, name, list)
    }

    /// Create a shot travelling along a fixed heading.
    pub fn add_angled_shot(
        &mut self,
        owner: OwnerRef,
        position: Vec2,
        name: &str,
        list: CollisionList,
        angle: f32,
        speed: f32,
    ) -> Result<ShotId, SpawnError> {
        self.gateway()
            .add_angled_shot(owner, position, name, list, angle, speed)
    }

    /// Create a shot aimed at the player.
    pub fn add_aimed_shot(
        &mut self,
        owner: OwnerRef,
        position: Vec2,
        name: &str,
        list: CollisionList,
        offset: f32,
        speed: f32,
    ) -> Result<ShotId, SpawnError> {
        self.gateway()
            .add_aimed_shot(owner, position, name, list, offset, speed)
    }

    /// Create a shot which looks like a template but runs another step.
    pub fn spawn_dynamic(
        &mut self,
        owner: OwnerRef,
        position: Vec2,
        name: &str,
        list: CollisionList,
        step: Step,
    ) -> Result<ShotId, SpawnError> {
        self.gateway()
            .spawn_dynamic(owner, position, name, list, step)
    }

    /// Create a shot with no body which only runs a step.
    pub fn spawn_carrier(
        &mut self,
        owner: OwnerRef,
        position: Vec2,
        list: CollisionList,
        step: Step,
    ) -> ShotId {
        self.gateway().spawn_carrier(owner, position, list, step)
    }

    /// Remove every shot matching a predicate, releasing their bodies.
    pub fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: FnMut(&Shot) -> bool,
    {
        let physics = &mut self.physics;
        self.registry
            .remove_where(predicate, |shot| release(physics, shot))
    }

    /// Remove every shot in a collision list.
    pub fn remove_all_owned_by(&mut self, list: CollisionList) -> usize {
        let removed = self.remove_where(|shot| shot.list == list);
        debug!(?list, removed, "cleared all shots");
        removed
    }

    /// Remove the disposable shots in a collision list, sparing multi-tick hazards.
    pub fn remove_all_simple_owned_by(&mut self, list: CollisionList) -> usize {
        let removed = self.remove_where(|shot| shot.list == list && shot.is_simple());
        debug!(?list, removed, "cleared simple shots");
        removed
    }

    /// Remove a single shot.
    pub fn remove(&mut self, id: ShotId) -> bool {
        match self.registry.remove(id) {
            Some(shot) => {
                release(&mut self.physics, &shot);
                true
            },
            None => false,
        }
    }

    /// The shot's body was hit; the shot is removed.
    ///
    /// Returns whether the shot existed.
    pub fn on_struck(&mut self, id: ShotId) -> bool {
        let removed = self.remove(id);
        if removed {
            debug!(shot = %id, "struck");
        }
        removed
    }

    /// The damage the shot deals on contact.
    ///
    /// `None` for unknown shots and shots without a body.
    pub fn contact_damage(&self, id: ShotId) -> Option<i32> {
        self.registry.get(id).and_then(Shot::damage)
    }

    /// Whether the owner of shots is still around.
    pub fn is_alive(&self, world: &dyn World, owner: OwnerRef) -> bool {
        world.is_alive(owner)
    }

    /// Look up a shot.
    pub fn get(&self, id: ShotId) -> Option<&Shot> {
        self.registry.get(id)
    }

    /// The number of shots, including those which have not run yet.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether there are no shots.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Visit every shot.
    pub fn for_each<F>(&self, visitor: F)
    where
        F: FnMut(&Shot),
    {
        self.registry.for_each(visitor)
    }

    /// The physics backend.
    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// The physics backend, mutably.
    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    /// The template catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl ShotEngine<SimplePhysics> {
    /// Create an engine with the bundled physics backend.
    pub fn simple(catalog: Catalog, config: EngineConfig) -> Self {
        Self::new(catalog, SimplePhysics::new(), config)
    }

    /// Move every body by its velocity, then tick.
    pub fn advance(&mut self, world: &dyn World) -> TickSummary {
        self.physics.integrate();
        self.tick(world)
    }
}

#[cfg(test)]
mod test {
    use glam::Vec2;

    use crate::run::testing::{self, TestWorld, SHOTS};
    use crate::run::{
        util, Accelerate, Burst, CollisionList, EmptyWorld, Fractal, Orbit, OwnerRef, Physics,
        Rain, Shot, ShotId, Spiral, Step, Sway, TickSummary,
    };

    fn assert_near(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() < 1e-4,
            "{:?} != {:?}",
            actual,
            expected,
        );
    }

    #[test]
    fn test_frame_counts_from_zero() {
        let mut engine = testing::engine(SHOTS);
        let id = engine
            .add_shot(
                OwnerRef::None,
                Vec2::new(100., 100.),
                "enemy_mid",
                CollisionList::EnemyShot,
            )
            .unwrap();

        assert_eq!(engine.get(id).unwrap().frame(), 0);
        for expected in 0..5 {
            engine.tick(&EmptyWorld);
            assert_eq!(engine.get(id).unwrap().frame(), expected);
        }
        assert_eq!(engine.ticks(), 5);
    }

    #[test]
    fn test_spawned_shots_run_next_tick() {
        let mut engine = testing::engine(SHOTS);
        engine
            .add_shot(OwnerRef::None, Vec2::new(160., 120.), "ring", CollisionList::EnemyShot)
            .unwrap();

        let summary = engine.tick(&EmptyWorld);
        assert_eq!(
            summary,
            TickSummary {
                merged: 1,
                stepped: 1,
                culled: 0,
                retired: 1,
                live: 20,
            },
        );
        engine.for_each(|shot| {
            assert_eq!(shot.frame(), 0);
            let body = shot.body().unwrap();
            assert_eq!(engine.physics().velocity(body), Some(Vec2::ZERO));
        });

        let summary = engine.tick(&EmptyWorld);
        assert_eq!(summary.merged, 20);
        assert_eq!(summary.stepped, 20);
        assert_eq!(summary.live, 20);
        engine.for_each(|shot| {
            assert_eq!(shot.frame(), 0);
            assert!(shot.step().is_none());
            let velocity = engine.physics().velocity(shot.body().unwrap()).unwrap();
            assert!((velocity.length() - 1.).abs() < 1e-4);
        });
    }

    #[test]
    fn test_bulk_removal_is_exact() {
        let mut engine = testing::engine(SHOTS);
        let mut players = Vec::new();
        for i in 0..3 {
            let x = 50. + 20. * (i as f32);
            engine
                .add_shot(OwnerRef::None, Vec2::new(x, 100.), "enemy_mid", CollisionList::EnemyShot)
                .unwrap();
            players.push(
                engine
                    .add_angled_shot(
                        OwnerRef::Player,
                        Vec2::new(x, 200.),
                        "enemy_slim",
                        CollisionList::PlayerShot,
                        0.,
                        0.,
                    )
                    .unwrap(),
            );
        }
        engine.tick(&EmptyWorld);
        engine.tick(&EmptyWorld);

        // Queued shots are removed too.
        engine
            .add_shot(OwnerRef::None, Vec2::new(10., 10.), "enemy_mid", CollisionList::EnemyShot)
            .unwrap();

        assert_eq!(engine.remove_all_owned_by(CollisionList::EnemyShot), 4);
        assert_eq!(engine.len(), 3);
        assert_eq!(engine.physics().len(), 3);
        for id in &players {
            let shot = engine.get(*id).unwrap();
            assert_eq!(shot.frame(), 1);
            assert_eq!(shot.collision_list(), CollisionList::PlayerShot);
        }

        assert_eq!(engine.remove_all_owned_by(CollisionList::EnemyShot), 0);
        assert_eq!(engine.len(), 3);
    }

    #[test]
    fn test_bulk_removal_keeps_step_state() {
        let mut engine = testing::engine(SHOTS);
        let player = engine
            .spawn_dynamic(
                OwnerRef::Player,
                Vec2::new(160., 200.),
                "enemy_slim",
                CollisionList::PlayerShot,
                Step::Accelerate(Accelerate::new(0., 0., 0.25)),
            )
            .unwrap();
        engine
            .spawn_dynamic(
                OwnerRef::None,
                Vec2::new(160., 100.),
                "enemy_slim",
                CollisionList::EnemyShot,
                Step::Accelerate(Accelerate::new(util::DOWN, 0., 0.25)),
            )
            .unwrap();
        for _ in 0..4 {
            engine.advance(&EmptyWorld);
        }

        let before = engine.get(player).unwrap().clone();
        assert_eq!(engine.remove_all_owned_by(CollisionList::EnemyShot), 1);

        let after = engine.get(player).unwrap();
        assert_eq!(after.frame(), before.frame());
        assert!(after.step().is_some());
        assert_eq!(after.step(), before.step());
    }

    #[test]
    fn test_simple_removal_spares_hazards() {
        let mut engine = testing::engine(SHOTS);
        let laser = engine
            .add_shot(OwnerRef::None, Vec2::new(160., 20.), "laser", CollisionList::EnemyShot)
            .unwrap();
        let bullet = engine
            .add_angled_shot(
                OwnerRef::None,
                Vec2::new(100., 100.),
                "enemy_mid",
                CollisionList::EnemyShot,
                util::DOWN,
                1.,
            )
            .unwrap();
        for _ in 0..3 {
            engine.advance(&EmptyWorld);
        }

        // The bullet, the laser, two stepped segments and a queued one.
        assert_eq!(engine.len(), 5);
        assert_eq!(engine.remove_all_simple_owned_by(CollisionList::EnemyShot), 1);
        assert!(engine.get(bullet).is_none());
        assert!(engine.get(laser).is_some());
        engine.for_each(|shot| assert!(!shot.is_simple()));

        assert_eq!(engine.remove_all_owned_by(CollisionList::EnemyShot), 4);
        assert!(engine.is_empty());
        assert!(engine.physics().is_empty());
    }

    #[test]
    fn test_sub_shots_spawn_together() {
        let mut engine = testing::engine(SHOTS);
        let root = engine
            .add_shot(
                OwnerRef::None,
                Vec2::new(100., 100.),
                "formation",
                CollisionList::EnemyShot,
            )
            .unwrap();

        assert_eq!(engine.len(), 5);

        let mut positions = Vec::new();
        engine.for_each(|shot| {
            let position = engine.physics().position(shot.body().unwrap()).unwrap();
            positions.push((shot.id(), position));
        });
        positions.sort_by_key(|(id, _)| *id);

        assert_eq!(positions[0], (root, Vec2::new(100., 100.)));
        let expected = [
            Vec2::new(90., 100.),
            Vec2::new(110., 100.),
            Vec2::new(100., 106.),
            Vec2::new(100., 109.),
        ];
        for ((_, actual), expected) in positions[1..].iter().zip(expected.iter()) {
            assert_near(*actual, *expected);
        }

        let damage = engine
            .get(positions[1].0)
            .and_then(Shot::damage);
        assert_eq!(damage, Some(10));
    }

    #[test]
    fn test_angle_convention() {
        let mut engine = testing::engine(SHOTS);
        let spawn = |engine: &mut crate::run::ShotEngine, angle| {
            engine
                .add_angled_shot(
                    OwnerRef::None,
                    Vec2::new(160., 120.),
                    "enemy_slim",
                    CollisionList::EnemyShot,
                    angle,
                    3.,
                )
                .unwrap()
        };
        let up = spawn(&mut engine, 0.);
        let right = spawn(&mut engine, 90.);
        engine.tick(&EmptyWorld);

        let velocity = |id: ShotId| {
            let body = engine.get(id).unwrap().body().unwrap();
            engine.physics().velocity(body).unwrap()
        };
        assert_near(velocity(up), Vec2::new(0., -3.));
        assert_near(velocity(right), Vec2::new(3., 0.));

        let body = engine.get(right).unwrap().body().unwrap();
        let rotation = engine.physics().body(body).unwrap().rotation;
        assert!((rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_culled_after_leaving_playfield() {
        let mut engine = testing::engine(SHOTS);
        let id = engine
            .add_shot(
                OwnerRef::None,
                Vec2::new(100., 100.),
                "enemy_mid",
                CollisionList::EnemyShot,
            )
            .unwrap();
        let body = engine.get(id).unwrap().body().unwrap();
        engine.physics_mut().set_velocity(body, Vec2::new(0., -2.));

        let mut removed_at = None;
        for tick in 1..=1000 {
            assert_eq!(engine.contact_damage(id), Some(10));
            let summary = engine.advance(&EmptyWorld);
            if engine.get(id).is_none() {
                assert_eq!(summary.culled, 1);
                removed_at = Some(tick);
                break;
            }
        }

        // The body is culled once it is more than 15 units above the playfield.
        assert_eq!(removed_at, Some(58));
        assert_eq!(engine.contact_damage(id), None);
        assert!(engine.physics().is_empty());
    }

    #[test]
    fn test_persistent_step_is_culled() {
        let mut engine = testing::engine(SHOTS);
        let id = engine
            .spawn_dynamic(
                OwnerRef::None,
                Vec2::new(100., 100.),
                "enemy_slim",
                CollisionList::EnemyShot,
                Step::Accelerate(Accelerate::new(0., 2., 0.)),
            )
            .unwrap();

        let mut culled = 0;
        for _ in 0..1000 {
            if engine.get(id).is_none() {
                break;
            }
            assert!(engine.get(id).and_then(Shot::step).is_some());
            culled += engine.advance(&EmptyWorld).culled;
        }

        assert!(engine.get(id).is_none());
        assert_eq!(culled, 1);
        assert!(engine.physics().is_empty());
    }

    #[test]
    fn test_rain_falls_on_tall_playfield() {
        let mut engine = testing::engine(&SHOTS.replace("height = 240", "height = 480"));
        assert_eq!(engine.config().height, 480.);
        let rain = engine.spawn_carrier(
            OwnerRef::None,
            Vec2::new(160., 100.),
            CollisionList::EnemyShot,
            Step::Rain(Rain::new("enemy_slim", 1, 0.5)),
        );

        let mut culled = 0;
        for _ in 0..20 {
            culled += engine.advance(&EmptyWorld).culled;
        }

        assert_eq!(culled, 0);
        assert!(engine.get(rain).is_some());
        let mut drops = 0;
        engine.for_each(|shot| {
            if let Some(body) = shot.body() {
                let position = engine.physics().position(body).unwrap();
                assert!(position.y > -15.);
                drops += 1;
            }
        });
        assert!(drops >= 19);
    }

    #[test]
    fn test_sway_with_long_period() {
        let mut engine = testing::engine(SHOTS);
        let id = engine
            .spawn_dynamic(
                OwnerRef::None,
                Vec2::new(160., 120.),
                "enemy_slim",
                CollisionList::EnemyShot,
                Step::Sway(Sway::new(0., 1., u32::MAX, 1.)),
            )
            .unwrap();
        for _ in 0..3 {
            engine.tick(&EmptyWorld);
        }

        let body = engine.get(id).unwrap().body().unwrap();
        assert_near(engine.physics().velocity(body).unwrap(), util::velocity(3., 1.));
    }

    #[test]
    fn test_struck_shot_is_removed() {
        let mut engine = testing::engine(SHOTS);
        let id = engine
            .add_shot(
                OwnerRef::None,
                Vec2::new(100., 100.),
                "enemy_mid",
                CollisionList::EnemyShot,
            )
            .unwrap();
        engine.tick(&EmptyWorld);

        let contacts = engine
            .physics()
            .contacts(CollisionList::EnemyShot, Vec2::new(103., 100.), 1.)
            .collect::<Vec<_>>();
        assert_eq!(contacts, [id]);

        assert!(engine.on_struck(id));
        assert_eq!(engine.contact_damage(id), None);
        assert!(!engine.on_struck(id));
        assert!(engine.physics().is_empty());
    }

    #[test]
    fn test_aimed_shots() {
        let mut engine = testing::engine(SHOTS);
        let world = TestWorld::with_player(Vec2::new(200., 100.));
        let at_player = engine
            .add_aimed_shot(
                OwnerRef::None,
                Vec2::new(100., 100.),
                "enemy_slim",
                CollisionList::EnemyShot,
                0.,
                2.,
            )
            .unwrap();
        let turned = engine
            .add_aimed_shot(
                OwnerRef::None,
                Vec2::new(100., 100.),
                "enemy_slim",
                CollisionList::EnemyShot,
                90.,
                2.,
            )
            .unwrap();
        engine.tick(&world);

        let velocity = |engine: &crate::run::ShotEngine, id: ShotId| {
            let body = engine.get(id).unwrap().body().unwrap();
            engine.physics().velocity(body).unwrap()
        };
        assert_near(velocity(&engine, at_player), Vec2::new(2., 0.));
        assert_near(velocity(&engine, turned), Vec2::new(0., 2.));

        // Without a player, aimed shots fly straight down.
        let lost = engine
            .add_aimed_shot(
                OwnerRef::None,
                Vec2::new(100., 100.),
                "enemy_slim",
                CollisionList::EnemyShot,
                0.,
                2.,
            )
            .unwrap();
        engine.tick(&EmptyWorld);
        assert_near(velocity(&engine, lost), Vec2::new(0., 2.));
    }

    #[test]
    fn test_laser_chain() {
        let mut engine = testing::engine(SHOTS);
        let laser = engine
            .add_shot(OwnerRef::None, Vec2::new(160., 20.), "laser", CollisionList::EnemyShot)
            .unwrap();
        assert!(engine.get(laser).unwrap().body().is_none());

        for _ in 0..10 {
            engine.advance(&EmptyWorld);
        }
        // One segment per tick, the last still queued.
        assert_eq!(engine.len(), 11);

        let mut heights = Vec::new();
        engine.for_each(|shot| {
            if let Some(body) = shot.body() {
                let position = engine.physics().position(body).unwrap();
                assert!((position.x - 160.).abs() < 1e-3);
                heights.push((shot.id(), position.y));
            }
        });
        heights.sort_by_key(|(id, _)| *id);
        let heights = heights.into_iter().map(|(_, y)| y).collect::<Vec<_>>();
        for (i, y) in heights.iter().enumerate() {
            assert!((y - (20. + 3. * (i as f32))).abs() < 1e-3, "{:?}", heights);
        }

        // The cursor leaves the playfield on the 74th tick.
        for _ in 10..74 {
            assert!(engine.get(laser).is_some());
            engine.advance(&EmptyWorld);
        }
        assert!(engine.get(laser).is_none());

        // Segments expire after their lifetime.
        for _ in 0..45 {
            engine.advance(&EmptyWorld);
        }
        assert!(engine.is_empty());
        assert!(engine.physics().is_empty());
    }

    #[test]
    fn test_laser_stops_on_bomb() {
        let mut engine = testing::engine(SHOTS);
        let mut world = TestWorld::default();
        world.bomb = true;
        let laser = engine
            .add_shot(OwnerRef::None, Vec2::new(160., 20.), "laser", CollisionList::EnemyShot)
            .unwrap();

        engine.tick(&world);

        assert!(engine.get(laser).is_none());
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_fractal_generations() {
        let mut engine = testing::engine(SHOTS);
        let fractal = Fractal::new("enemy_slim", 2, 0., 0.).splitting(3, 5, 0.);
        engine
            .spawn_dynamic(
                OwnerRef::None,
                Vec2::new(160., 120.),
                "enemy_slim",
                CollisionList::EnemyShot,
                Step::Fractal(fractal),
            )
            .unwrap();

        let mut sizes = Vec::new();
        for _ in 0..13 {
            engine.tick(&EmptyWorld);
            sizes.push(engine.len());
        }

        assert_eq!(sizes, [1, 1, 1, 1, 1, 3, 3, 3, 3, 3, 3, 9, 9]);
        engine.for_each(|shot| {
            assert!(shot.is_simple());
            assert!(shot.step().is_none());
        });
    }

    #[test]
    fn test_emitter_stops_when_owner_dies() {
        let mut engine = testing::engine(SHOTS);
        let mut world = TestWorld::default();
        let enemy = world.add_enemy(Vec2::new(100., 50.));
        assert!(engine.is_alive(&world, enemy));

        let spiral = engine.spawn_carrier(
            enemy,
            Vec2::new(100., 50.),
            CollisionList::EnemyShot,
            Step::Spiral(Spiral::new("enemy_slim", 10, 4, 0., 1.)),
        );
        engine.tick(&world);
        assert_eq!(engine.len(), 5);

        world.kill(enemy);
        assert!(!engine.is_alive(&world, enemy));
        engine.tick(&world);

        assert!(engine.get(spiral).is_none());
        assert_eq!(engine.len(), 4);
        engine.for_each(|shot| assert_eq!(shot.owner(), enemy));
    }

    #[test]
    fn test_orbit_released_when_owner_dies() {
        let mut engine = testing::engine(SHOTS);
        let mut world = TestWorld::default();
        let enemy = world.add_enemy(Vec2::new(100., 100.));

        let id = engine
            .spawn_dynamic(
                enemy,
                Vec2::new(100., 100.),
                "enemy_slim",
                CollisionList::EnemyShot,
                Step::Orbit(Orbit::new(20., 10., 0., 1000, 2.)),
            )
            .unwrap();
        engine.tick(&world);

        let body = engine.get(id).unwrap().body().unwrap();
        assert_near(engine.physics().position(body).unwrap(), Vec2::new(100., 80.));

        world.kill(enemy);
        engine.tick(&world);

        let shot = engine.get(id).unwrap();
        assert!(shot.step().is_none());
        assert_near(
            engine.physics().velocity(body).unwrap(),
            util::velocity(100., 2.),
        );
    }

    #[test]
    fn test_homing_picks_closer_target() {
        let mut engine = testing::engine(SHOTS);
        let mut world = TestWorld::default();
        world.add_enemy(Vec2::new(100., 40.));
        world.add_boss(Vec2::new(130., 100.));

        let step = crate::run::StepLibrary::standard()
            .resolve("yournamehereHoming")
            .cloned()
            .unwrap();
        let homing = engine
            .spawn_dynamic(
                OwnerRef::Player,
                Vec2::new(100., 100.),
                "enemy_slim",
                CollisionList::PlayerShot,
                step,
            )
            .unwrap();
        engine.tick(&world);

        let body = engine.get(homing).unwrap().body().unwrap();
        assert_near(engine.physics().velocity(body).unwrap(), Vec2::new(4., 0.));
    }

    #[test]
    fn test_malformed_shot_is_dropped() {
        let mut engine = testing::engine(SHOTS);
        let id = engine.registry.issue();
        engine.registry.insert(Shot {
            id,
            frame: 0,
            owner: OwnerRef::None,
            origin: Vec2::ZERO,
            step: None,
            list: CollisionList::EnemyShot,
            body: None,
            damage: 0,
        });

        let summary = engine.tick(&EmptyWorld);

        assert_eq!(summary.retired, 1);
        assert!(engine.get(id).is_none());
    }

    #[test]
    fn test_failed_step_retires_shot() {
        let mut engine = testing::engine(SHOTS);
        let id = engine.spawn_carrier(
            OwnerRef::None,
            Vec2::new(160., 120.),
            CollisionList::EnemyShot,
            Step::Burst(Burst::new("missing", 4, 0., 1.)),
        );

        let summary = engine.tick(&EmptyWorld);

        assert_eq!(summary.retired, 1);
        assert!(engine.get(id).is_none());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_unknown_template() {
        let mut engine = testing::engine(SHOTS);

        let err = engine
            .add_shot(OwnerRef::None, Vec2::ZERO, "missing", CollisionList::EnemyShot)
            .unwrap_err();

        assert_eq!(err.to_string(), "unknown shot template `missing`");
        assert!(engine.is_empty());
    }

    #[test]
    fn test_seeded_randomness() {
        let velocities = || {
            let mut engine = testing::engine(SHOTS);
            let step = crate::run::StepLibrary::standard()
                .resolve("enemyRandom")
                .cloned()
                .unwrap();
            let ids = (0..4)
                .map(|_| {
                    engine
                        .spawn_dynamic(
                            OwnerRef::None,
                            Vec2::new(160., 120.),
                            "enemy_slim",
                            CollisionList::EnemyShot,
                            step.clone(),
                        )
                        .unwrap()
                })
                .collect::<Vec<_>>();
            engine.tick(&EmptyWorld);

            ids.into_iter()
                .map(|id| {
                    let body = engine.get(id).unwrap().body().unwrap();
                    engine.physics().velocity(body).unwrap()
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(velocities(), velocities());
    }
}

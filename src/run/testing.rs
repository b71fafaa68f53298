// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use std::cmp::Ordering;

use glam::Vec2;

use crate::data::{Catalog, Definition};
use crate::run::{Arena, EngineConfig, Handle, OwnerRef, ShotEngine, StepLibrary, World};

/// Shots used by the engine tests.
pub const SHOTS: &str = "\
[Engine]
width = 320
height = 240
cull_margin = 15
seed = 1

[Shot enemy_mid]
animation = 1
damage = 10
radius = 5

[Shot enemy_slim]
animation = 2
radius = 2

[Shot enemy_laser]
animation = 3
radius = 1.5

[Shot enemy_five_aimed]
gimmick = enemyFiveAimedSlow

[Shot ring]
gimmick = enemyCircleMid

[Shot aimed]
animation = 1
gimmick = enemyAimed

[Shot laser]
gimmick = enemyLaserStraight

[Shot formation]
animation = 1
subshot0.name = enemy_mid
subshot0.offset = -10, 0
subshot1.name = enemy_slim
subshot1.offset = 10, 0
subshot2.name = wing
subshot2.offset = 0, 5

[Shot wing]
animation = 2
offset = 0, 1
subshot0.name = enemy_slim
subshot0.offset = 0, 3
";

/// Build an engine over a definition using the standard steps.
pub fn engine(text: &str) -> ShotEngine {
    let def = Definition::parse(text).unwrap();
    let config = EngineConfig::from_definition(&def).unwrap();
    let catalog = Catalog::load(&def, &StepLibrary::standard()).unwrap();

    ShotEngine::simple(catalog, config)
}

/// A world with a player, enemies and bosses at fixed positions.
#[derive(Debug, Default)]
pub struct TestWorld {
    pub player: Option<Vec2>,
    pub enemies: Arena<Vec2>,
    pub bosses: Arena<Vec2>,
    pub boss: Option<Handle>,
    pub bomb: bool,
}

impl TestWorld {
    pub fn with_player(player: Vec2) -> Self {
        Self {
            player: Some(player),
            ..Self::default()
        }
    }

    pub fn add_enemy(&mut self, position: Vec2) -> OwnerRef {
        OwnerRef::Enemy(self.enemies.insert(position))
    }

    pub fn add_boss(&mut self, position: Vec2) -> OwnerRef {
        let handle = self.bosses.insert(position);
        self.boss = Some(handle);
        OwnerRef::Boss(handle)
    }

    pub fn kill(&mut self, owner: OwnerRef) {
        match owner {
            OwnerRef::Enemy(handle) => {
                self.enemies.remove(handle);
            },
            OwnerRef::Boss(handle) => {
                self.bosses.remove(handle);
            },
            OwnerRef::Player => self.player = None,
            OwnerRef::None => (),
        }
    }
}

impl World for TestWorld {
    fn player_position(&self) -> Option<Vec2> {
        self.player
    }

    fn owner_position(&self, owner: OwnerRef) -> Option<Vec2> {
        match owner {
            OwnerRef::Enemy(handle) => self.enemies.get(handle).copied(),
            OwnerRef::Boss(handle) => self.bosses.get(handle).copied(),
            OwnerRef::Player | OwnerRef::None => None,
        }
    }

    fn closest_enemy(&self, position: Vec2) -> Option<OwnerRef> {
        self.enemies
            .iter()
            .min_by(|(_, a), (_, b)| {
                a.distance_squared(position)
                    .partial_cmp(&b.distance_squared(position))
                    .unwrap_or(Ordering::Equal)
            })
            .map(|(handle, _)| OwnerRef::Enemy(handle))
    }

    fn boss(&self) -> Option<OwnerRef> {
        self.boss
            .filter(|&handle| self.bosses.contains(handle))
            .map(OwnerRef::Boss)
    }

    fn bomb_active(&self) -> bool {
        self.bomb
    }
}

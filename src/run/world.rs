// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use glam::Vec2;

use crate::run::Handle;

/// A non-owning reference to whatever fired a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerRef {
    /// Nobody in particular.
    None,
    /// The player.
    Player,
    /// An enemy.
    Enemy(Handle),
    /// A boss.
    Boss(Handle),
}

impl Default for OwnerRef {
    fn default() -> Self {
        OwnerRef::None
    }
}

/// Read-only queries against the game surrounding the shots.
///
/// Owners live and die independently of the shots they fire, so every query re-validates its
/// owner and answers `None` (or `false`) once it is gone.
pub trait World {
    /// The position of the player, if there is one.
    fn player_position(&self) -> Option<Vec2>;
    /// The position of an enemy or boss.
    ///
    /// `OwnerRef::Player` and `OwnerRef::None` are resolved before this is called.
    fn owner_position(&self, owner: OwnerRef) -> Option<Vec2>;

    /// Whether an owner is still alive.
    fn is_alive(&self, owner: OwnerRef) -> bool {
        match owner {
            OwnerRef::None => false,
            OwnerRef::Player => self.player_position().is_some(),
            owner => self.owner_position(owner).is_some(),
        }
    }

    /// The enemy closest to a position.
    fn closest_enemy(&self, position: Vec2) -> Option<OwnerRef> {
        let _ = position;
        None
    }

    /// The active boss.
    fn boss(&self) -> Option<OwnerRef> {
        None
    }

    /// Whether the player's bomb is going off.
    fn bomb_active(&self) -> bool {
        false
    }
}

/// A world with no player, enemies or bosses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyWorld;

impl World for EmptyWorld {
    fn player_position(&self) -> Option<Vec2> {
        None
    }

    fn owner_position(&self, _: OwnerRef) -> Option<Vec2> {
        None
    }
}

/// Resolve the position of any owner, including the player.
pub fn resolve_owner(world: &dyn World, owner: OwnerRef) -> Option<Vec2> {
    match owner {
        OwnerRef::None => None,
        OwnerRef::Player => world.player_position(),
        owner => world.owner_position(owner),
    }
}

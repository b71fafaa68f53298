// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use std::fmt;

use glam::Vec2;

use crate::run::{BodyId, CollisionList, OwnerRef, Step};

/// The identifier of a shot instance.
///
/// Identifiers are issued in increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShotId(u64);

impl ShotId {
    /// Create an identifier from a raw value.
    pub fn from_raw(raw: u64) -> Self {
        ShotId(raw)
    }

    /// The raw value of the identifier.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShotId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a step asks of the scheduler after running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Keep the shot and run the step again next tick.
    Continue,
    /// Retire the shot at the end of this tick.
    Done,
    /// Unbind the step; the shot lives on as a plain body.
    Detach,
}

/// A live shot.
#[derive(Debug, Clone)]
pub struct Shot {
    pub(crate) id: ShotId,
    pub(crate) frame: u32,
    pub(crate) owner: OwnerRef,
    pub(crate) origin: Vec2,
    pub(crate) step: Option<Step>,
    pub(crate) list: CollisionList,
    pub(crate) body: Option<BodyId>,
    pub(crate) damage: i32,
}

impl Shot {
    /// The identifier of the shot.
    pub fn id(&self) -> ShotId {
        self.id
    }

    /// The number of ticks the shot has been stepped for, counting from `0`.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// What fired the shot.
    pub fn owner(&self) -> OwnerRef {
        self.owner
    }

    /// Where the shot was spawned.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// The step bound to the shot.
    pub fn step(&self) -> Option<&Step> {
        self.step.as_ref()
    }

    /// The collision partition of the shot.
    pub fn collision_list(&self) -> CollisionList {
        self.list
    }

    /// The body of the shot.
    pub fn body(&self) -> Option<BodyId> {
        self.body
    }

    /// The contact damage of the shot; only bodies deal damage.
    pub fn damage(&self) -> Option<i32> {
        self.body.map(|_| self.damage)
    }

    /// Whether the shot is a disposable bullet rather than a multi-tick hazard.
    pub fn is_simple(&self) -> bool {
        self.step.as_ref().map_or(true, |step| !step.is_persistent())
    }
}

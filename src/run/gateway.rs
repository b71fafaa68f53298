// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use glam::Vec2;
use thiserror::Error;

use crate::data::{Catalog, ShotTemplate};
use crate::run::registry::SpawnQueue;
use crate::run::{Aimed, Angled, BodyDesc, CollisionList, OwnerRef, Physics, Shot, ShotId, Step};

/// An error when creating shots at runtime.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The requested template is not in the catalog.
    #[error("unknown shot template `{}`", name)]
    UnknownTemplate {
        /// The requested name.
        name: String,
    },
}

impl SpawnError {
    fn unknown_template<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        SpawnError::UnknownTemplate {
            name: name.into(),
        }
    }
}

/// The way new shots are created, both by attack code and by running steps.
///
/// Every shot created here is queued; its first step runs on the next tick at frame `0`.
pub struct Gateway<'a> {
    catalog: &'a Catalog,
    queue: &'a mut SpawnQueue,
    physics: &'a mut dyn Physics,
}

impl<'a> Gateway<'a> {
    pub(crate) fn new(
        catalog: &'a Catalog,
        queue: &'a mut SpawnQueue,
        physics: &'a mut dyn Physics,
    ) -> Self {
        Self {
            catalog,
            queue,
            physics,
        }
    }

    /// The catalog shots are created from.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub(crate) fn physics(&self) -> &dyn Physics {
        &*self.physics
    }

    pub(crate) fn physics_mut(&mut self) -> &mut dyn Physics {
        &mut *self.physics
    }

    fn template(&self, name: &str) -> Result<&'a ShotTemplate, SpawnError> {
        self.catalog
            .lookup(name)
            .map_err(|_| SpawnError::unknown_template(name))
    }

    fn instantiate(
        &mut self,
        owner: OwnerRef,
        position: Vec2,
        template: Option<&ShotTemplate>,
        list: CollisionList,
        step: Option<Step>,
    ) -> ShotId {
        let id = self.queue.issue();
        let visual = template.and_then(ShotTemplate::visual);
        let body = visual.map(|visual| {
            self.physics.add_body(BodyDesc {
                shot: id,
                position,
                animation: visual.animation,
                radius: visual.radius,
                list,
            })
        });

        self.queue.push(Shot {
            id,
            frame: 0,
            owner,
            origin: position,
            step,
            list,
            body,
            damage: visual.map_or(0, |visual| visual.damage),
        })
    }

    fn instantiate_tree(
        &mut self,
        owner: OwnerRef,
        base: Vec2,
        template: &ShotTemplate,
        list: CollisionList,
    ) -> ShotId {
        let position = base + template.offset();
        let id = self.instantiate(owner, position, Some(template), list, template.step().cloned());

        let catalog = self.catalog;
        for sub in template.sub_shots() {
            self.instantiate_tree(owner, position + sub.offset, catalog.get(sub.template), list);
        }

        id
    }

    /// Create a shot from a template, along with all of its sub-shots.
    ///
    /// Offsets add up: a sub-shot lands at its parent's final position plus the entry's
    /// `subshotN.offset` plus the sub-template's own `offset`.
    ///
    /// Returns the identifier of the root shot.
    pub fn spawn_from_template(
        &mut self,
        owner: OwnerRef,
        position: Vec2,
        name: &str,
        list: CollisionList,
    ) -> Result<ShotId, SpawnError> {
        let template = self.template(name)?;
        Ok(self.instantiate_tree(owner, position, template, list))
    }

    /// Create a shot which looks like a template but runs the given step.
    ///
    /// Only the template's visual, damage and radius are used.
    pub fn spawn_dynamic(
        &mut self,
        owner: OwnerRef,
        position: Vec2,
        name: &str,
        list: CollisionList,
        step: Step,
    ) -> Result<ShotId, SpawnError> {
        let template = self.template(name)?;
        Ok(self.instantiate(owner, position, Some(template), list, Some(step)))
    }

    /// Create a shot with no body which only runs a step.
    pub fn spawn_carrier(
        &mut self,
        owner: OwnerRef,
        position: Vec2,
        list: CollisionList,
        step: Step,
    ) -> ShotId {
        self.instantiate(owner, position, None, list, Some(step))
    }

    /// Create a shot travelling at a fixed heading.
    pub fn add_angled_shot(
        &mut self,
        owner: OwnerRef,
        position: Vec2,
        name: &str,
        list: CollisionList,
        angle: f32,
        speed: f32,
    ) -> Result<ShotId, SpawnError> {
        self.spawn_dynamic(
            owner,
            position,
            name,
            list,
            Step::Angled(Angled::new(angle, speed)),
        )
    }

    /// Create a shot aimed at the player, turned by `offset` degrees.
    pub fn add_aimed_shot(
        &mut self,
        owner: OwnerRef,
        position: Vec2,
        name: &str,
        list: CollisionList,
        offset: f32,
        speed: f32,
    ) -> Result<ShotId, SpawnError> {
        self.spawn_dynamic(
            owner,
            position,
            name,
            list,
            Step::Aimed(Aimed::new(offset, speed)),
        )
    }
}

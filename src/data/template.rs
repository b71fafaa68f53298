// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use std::borrow::Cow;
use std::collections::btree_map::BTreeMap;
use std::fmt;

use glam::Vec2;
use serde::de::{Deserializer, Error, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

use crate::run::Step;

/// The highest number of sub-shot entries a template may have.
pub const MAX_SUB_SHOTS: u32 = 100;

/// The rendered, collidable part of a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    /// The animation to play.
    pub animation: i32,
    /// The damage dealt on contact.
    pub damage: i32,
    /// The collision radius.
    pub radius: f32,
}

/// A `subshotN.*` entry as written in a definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SubShotEntry {
    /// The name of the template to create.
    pub name: String,
    /// Where to create it, relative to the parent.
    pub offset: Vec2,
}

/// The entries of a `[Shot <name>]` group.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotDefinition {
    /// The animation; shots without one have no body.
    pub animation: Option<i32>,
    /// Contact damage.
    pub damage: i32,
    /// Collision radius.
    pub radius: f32,
    /// The name of the step driving the shot.
    pub gimmick: Option<String>,
    /// Offset from the spawn position.
    pub offset: Vec2,
    /// Nested templates, in index order.
    pub sub_shots: Vec<SubShotEntry>,
}

impl ShotDefinition {
    /// The visual part of the definition, if it has one.
    pub fn visual(&self) -> Option<Visual> {
        self.animation.map(|animation| {
            Visual {
                animation,
                damage: self.damage,
                radius: self.radius,
            }
        })
    }

    /// Whether shots from this definition could never do anything.
    pub fn is_inert(&self) -> bool {
        self.animation.is_none() && self.gimmick.is_none()
    }
}

fn to_vec2<E>(components: Vec<f32>) -> Result<Vec2, E>
where
    E: Error,
{
    match *components.as_slice() {
        [x, y] | [x, y, _] => Ok(Vec2::new(x, y)),
        _ => Err(E::invalid_length(components.len(), &"a vector of 2 or 3 components")),
    }
}

fn sub_shot_key(key: &str) -> Option<(&str, &str)> {
    let rest = key.strip_prefix("subshot")?;
    let dot = rest.find('.')?;
    Some((&rest[..dot], &rest[dot + 1..]))
}

fn sub_shot_index<E>(index: &str) -> Result<u32, E>
where
    E: Error,
{
    index
        .parse()
        .ok()
        .filter(|&index| index < MAX_SUB_SHOTS)
        .ok_or_else(|| {
            E::custom(format_args!(
                "sub-shot index `{}` is not in 0..{}",
                index, MAX_SUB_SHOTS,
            ))
        })
}

#[derive(Default)]
struct SubShotSlot {
    name: Option<String>,
    offset: Option<Vec2>,
}

struct ShotDefinitionVisitor;

impl ShotDefinitionVisitor {
    const FIELDS: &'static [&'static str] = &[
        "animation",
        "damage",
        "radius",
        "gimmick",
        "offset",
        "subshotN.name",
        "subshotN.offset",
    ];
}

impl<'de> Visitor<'de> for ShotDefinitionVisitor {
    type Value = ShotDefinition;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "one of `{}`", Self::FIELDS.join("`, `"))
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut local_animation = None;
        let mut local_damage = None;
        let mut local_radius = None;
        let mut local_gimmick = None;
        let mut local_offset = None;
        let mut slots: BTreeMap<u32, SubShotSlot> = BTreeMap::new();

        while let Some(key) = access.next_key::<Cow<str>>()? {
            match key.as_ref() {
                "animation" => {
                    if local_animation.is_some() {
                        return Err(M::Error::duplicate_field("animation"));
                    }
                    local_animation = Some(access.next_value()?);
                },
                "damage" => {
                    if local_damage.is_some() {
                        return Err(M::Error::duplicate_field("damage"));
                    }
                    local_damage = Some(access.next_value()?);
                },
                "radius" => {
                    if local_radius.is_some() {
                        return Err(M::Error::duplicate_field("radius"));
                    }
                    local_radius = Some(access.next_value()?);
                },
                "gimmick" => {
                    if local_gimmick.is_some() {
                        return Err(M::Error::duplicate_field("gimmick"));
                    }
                    local_gimmick = Some(access.next_value::<String>()?);
                },
                "offset" => {
                    if local_offset.is_some() {
                        return Err(M::Error::duplicate_field("offset"));
                    }
                    local_offset = Some(to_vec2(access.next_value()?)?);
                },
                other => {
                    let (index, field) = match sub_shot_key(other) {
                        Some(parts) => parts,
                        None => {
                            access.next_value::<IgnoredAny>()?;
                            continue;
                        },
                    };
                    if field != "name" && field != "offset" {
                        access.next_value::<IgnoredAny>()?;
                        continue;
                    }
                    let index = sub_shot_index(index)?;
                    let slot = slots.entry(index).or_default();

                    if field == "name" {
                        if slot.name.is_some() {
                            return Err(M::Error::custom(format_args!(
                                "duplicate field `subshot{}.name`",
                                index,
                            )));
                        }
                        slot.name = Some(access.next_value()?);
                    } else {
                        if slot.offset.is_some() {
                            return Err(M::Error::custom(format_args!(
                                "duplicate field `subshot{}.offset`",
                                index,
                            )));
                        }
                        slot.offset = Some(to_vec2(access.next_value()?)?);
                    }
                },
            }
        }

        let sub_shots = slots
            .into_iter()
            .map(|(index, slot)| {
                let name = slot.name.ok_or_else(|| {
                    M::Error::custom(format_args!(
                        "`subshot{}.offset` given without `subshot{}.name`",
                        index, index,
                    ))
                })?;

                Ok(SubShotEntry {
                    name,
                    offset: slot.offset.unwrap_or(Vec2::ZERO),
                })
            })
            .collect::<Result<Vec<_>, M::Error>>()?;

        Ok(ShotDefinition {
            animation: local_animation,
            damage: local_damage.unwrap_or(1),
            radius: local_radius.unwrap_or(1.),
            gimmick: local_gimmick,
            offset: local_offset.unwrap_or(Vec2::ZERO),
            sub_shots,
        })
    }
}

impl<'de> Deserialize<'de> for ShotDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ShotDefinitionVisitor)
    }
}

/// The index of a template within its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(usize);

impl TemplateId {
    pub(crate) fn new(index: usize) -> Self {
        TemplateId(index)
    }

    /// The position of the template in its catalog.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A sub-shot, resolved against the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubShot {
    /// The template to create.
    pub template: TemplateId,
    /// Where to create it, relative to the parent.
    pub offset: Vec2,
}

/// A loaded shot template.
#[derive(Debug, Clone)]
pub struct ShotTemplate {
    name: String,
    visual: Option<Visual>,
    gimmick: Option<String>,
    step: Option<Step>,
    offset: Vec2,
    sub_shots: Vec<SubShot>,
}

impl ShotTemplate {
    pub(crate) fn new(
        name: String,
        definition: &ShotDefinition,
        step: Option<Step>,
        sub_shots: Vec<SubShot>,
    ) -> Self {
        ShotTemplate {
            name,
            visual: definition.visual(),
            gimmick: definition.gimmick.clone(),
            step,
            offset: definition.offset,
            sub_shots,
        }
    }

    /// The name of the template.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The body shots from this template get, if any.
    pub fn visual(&self) -> Option<&Visual> {
        self.visual.as_ref()
    }

    /// The name of the step, as written.
    pub fn gimmick(&self) -> Option<&str> {
        self.gimmick.as_deref()
    }

    /// The step shots from this template start with.
    pub fn step(&self) -> Option<&Step> {
        self.step.as_ref()
    }

    /// The offset from the spawn position.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Templates created alongside this one.
    pub fn sub_shots(&self) -> &[SubShot] {
        &self.sub_shots
    }
}

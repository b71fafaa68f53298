// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::data::{Definition, DefinitionError};

/// Engine settings.
///
/// The playfield is the rectangle shots play in; bodies drifting more than `cull_margin`
/// outside of it are retired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The left edge of the playfield.
    pub left: f32,
    /// The top edge of the playfield.
    pub top: f32,
    /// The width of the playfield.
    pub width: f32,
    /// The height of the playfield.
    pub height: f32,
    /// How far outside the playfield a body may travel before it is culled.
    pub cull_margin: f32,
    /// The seed for pattern randomness.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            left: 0.,
            top: 0.,
            width: 320.,
            height: 240.,
            cull_margin: 15.,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// The name of the definition group holding engine settings.
    pub const GROUP: &'static str = "Engine";

    /// Read the settings from the `[Engine]` group of a definition.
    ///
    /// Missing groups and missing keys keep their defaults.
    pub fn from_definition(def: &Definition) -> Result<Self, DefinitionError> {
        def.group(Self::GROUP)
            .map(|group| group.deserialize::<Self>())
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// Whether a position is strictly inside the playfield.
    pub fn contains(&self, position: Vec2) -> bool {
        position.x > self.left
            && position.x < self.left + self.width
            && position.y > self.top
            && position.y < self.top + self.height
    }

    /// Whether a position is far enough outside the playfield to be culled.
    pub fn is_culled(&self, position: Vec2) -> bool {
        position.x < self.left - self.cull_margin
            || position.x > self.left + self.width + self.cull_margin
            || position.y < self.top - self.cull_margin
            || position.y > self.top + self.height + self.cull_margin
    }

    /// A point of the playfield from fractional coordinates.
    pub fn point(&self, fx: f32, fy: f32) -> Vec2 {
        Vec2::new(self.left + self.width * fx, self.top + self.height * fy)
    }
}

// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

//! Data entities
//!
//! Definition files and the shot templates loaded from them.

mod catalog;
mod definition;
mod template;

pub use self::catalog::{Catalog, CatalogError};
pub use self::definition::{Definition, DefinitionError, Group, Value};
pub use self::template::{
    ShotDefinition, ShotTemplate, SubShot, SubShotEntry, TemplateId, Visual, MAX_SUB_SHOTS,
};

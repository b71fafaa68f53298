// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use std::collections::hash_map::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::data::{Definition, DefinitionError, ShotDefinition, ShotTemplate, SubShot, TemplateId};
use crate::run::StepLibrary;

/// An error in the content of a shot set.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The definition could not be read.
    #[error("invalid definition")]
    Definition {
        /// The source of the error.
        #[from]
        source: DefinitionError,
    },
    /// Two templates share a name.
    #[error("shot template `{}` is defined more than once", name)]
    Duplicate {
        /// The name of the template.
        name: String,
    },
    /// A template was requested which does not exist.
    #[error("unknown shot template `{}`", name)]
    UnknownTemplate {
        /// The requested name.
        name: String,
    },
    /// A template refers to a template which does not exist.
    #[error("shot template `{}` refers to unknown template `{}`", referenced_by, name)]
    MissingTemplate {
        /// The missing template.
        name: String,
        /// The template referring to it.
        referenced_by: String,
    },
    /// A template uses a step which is not in the step library.
    #[error("shot template `{}` uses unknown gimmick `{}`", template, name)]
    UnknownStep {
        /// The name of the step.
        name: String,
        /// The template using it.
        template: String,
    },
    /// A template has neither an animation nor a gimmick.
    #[error("shot template `{}` has neither an animation nor a gimmick", name)]
    Inert {
        /// The name of the template.
        name: String,
    },
    /// A template contains itself through its sub-shots.
    #[error("shot template `{}` contains itself through its sub-shots", name)]
    Cycle {
        /// A template on the cycle.
        name: String,
    },
}

impl CatalogError {
    fn duplicate<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        CatalogError::Duplicate {
            name: name.into(),
        }
    }

    fn unknown_template<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        CatalogError::UnknownTemplate {
            name: name.into(),
        }
    }

    fn missing_template<N, R>(name: N, referenced_by: R) -> Self
    where
        N: Into<String>,
        R: Into<String>,
    {
        CatalogError::MissingTemplate {
            name: name.into(),
            referenced_by: referenced_by.into(),
        }
    }

    fn unknown_step<N, T>(name: N, template: T) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        CatalogError::UnknownStep {
            name: name.into(),
            template: template.into(),
        }
    }

    fn inert<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        CatalogError::Inert {
            name: name.into(),
        }
    }

    fn cycle<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        CatalogError::Cycle {
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

/// The set of loaded shot templates.
///
/// Template names are case-insensitive. Everything a template refers to is checked when the
/// catalog is loaded, so spawning from a loaded template cannot fail.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: Vec<ShotTemplate>,
    names: HashMap<String, TemplateId>,
}

impl Catalog {
    /// The name of the group kind holding shot templates.
    pub const GROUP_KIND: &'static str = "shot";

    /// Load the `[Shot <name>]` groups of a definition.
    pub fn load(def: &Definition, steps: &StepLibrary) -> Result<Self, CatalogError> {
        Self::from_definitions(Some(def), steps)
    }

    /// Read and load a definition file.
    pub fn from_path<P>(path: P, steps: &StepLibrary) -> Result<Self, CatalogError>
    where
        P: AsRef<Path>,
    {
        let def = Definition::from_path(path)?;
        Self::load(&def, steps)
    }

    /// Load the templates of several definitions into one catalog.
    ///
    /// Templates may refer to templates from any of the definitions.
    pub fn from_definitions<'a, I>(defs: I, steps: &StepLibrary) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = &'a Definition>,
    {
        let mut names = HashMap::new();
        let mut entries = Vec::new();

        for def in defs {
            for group in def.groups() {
                let name = match group.label_of(Self::GROUP_KIND) {
                    Some(label) => label.to_lowercase(),
                    None => continue,
                };

                let definition: ShotDefinition = group.deserialize()?;
                if definition.is_inert() {
                    return Err(CatalogError::inert(name));
                }
                if names.contains_key(&name) {
                    return Err(CatalogError::duplicate(name));
                }

                names.insert(name.clone(), TemplateId::new(entries.len()));
                entries.push((name, definition));
            }
        }

        // Sub-shots may refer forward, so they are resolved once every name is known.
        let templates = entries
            .iter()
            .map(|(name, definition)| {
                let step = definition
                    .gimmick
                    .as_ref()
                    .map(|gimmick| {
                        steps.resolve(gimmick).cloned().ok_or_else(|| {
                            CatalogError::unknown_step(gimmick.as_str(), name.as_str())
                        })
                    })
                    .transpose()?;

                let sub_shots = definition
                    .sub_shots
                    .iter()
                    .map(|sub| {
                        names
                            .get(&sub.name.to_lowercase())
                            .map(|&template| {
                                SubShot {
                                    template,
                                    offset: sub.offset,
                                }
                            })
                            .ok_or_else(|| {
                                CatalogError::missing_template(sub.name.as_str(), name.as_str())
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(ShotTemplate::new(name.clone(), definition, step, sub_shots))
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let catalog = Catalog {
            templates,
            names,
        };
        catalog.check_cycles()?;
        catalog.check_step_templates()?;

        info!(templates = catalog.len(), "loaded the shot catalog");

        Ok(catalog)
    }

    fn check_cycles(&self) -> Result<(), CatalogError> {
        let mut marks = vec![Mark::Unvisited; self.templates.len()];

        for index in 0..self.templates.len() {
            self.visit(TemplateId::new(index), &mut marks)?;
        }

        Ok(())
    }

    fn visit(&self, id: TemplateId, marks: &mut [Mark]) -> Result<(), CatalogError> {
        match marks[id.index()] {
            Mark::Done => return Ok(()),
            Mark::Active => return Err(CatalogError::cycle(self.get(id).name())),
            Mark::Unvisited => (),
        }

        marks[id.index()] = Mark::Active;
        for sub in self.get(id).sub_shots() {
            self.visit(sub.template, marks)?;
        }
        marks[id.index()] = Mark::Done;

        Ok(())
    }

    fn check_step_templates(&self) -> Result<(), CatalogError> {
        for template in &self.templates {
            let step = match template.step() {
                Some(step) => step,
                None => continue,
            };

            for name in step.referenced_templates() {
                if self.lookup(name).is_err() {
                    return Err(CatalogError::missing_template(name, template.name()));
                }
            }
            debug!(template = template.name(), kind = step.kind(), "bound step");
        }

        Ok(())
    }

    /// Find a template by name.
    pub fn lookup(&self, name: &str) -> Result<&ShotTemplate, CatalogError> {
        self.id(name)
            .map(|id| self.get(id))
            .ok_or_else(|| CatalogError::unknown_template(name))
    }

    /// The identifier of a template.
    pub fn id(&self, name: &str) -> Option<TemplateId> {
        self.names
            .get(name)
            .or_else(|| self.names.get(&name.to_lowercase()))
            .copied()
    }

    /// The template for an identifier.
    ///
    /// Identifiers are only valid for the catalog which issued them.
    pub fn get(&self, id: TemplateId) -> &ShotTemplate {
        &self.templates[id.index()]
    }

    /// The number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterate over the templates in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &ShotTemplate> {
        self.templates.iter()
    }
}

// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

//! Definition files
//!
//! Definition files are made of `[Group name]` headers followed by `key = value` entries. Lines
//! starting with `;` are comments.

use std::fmt::Display;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

mod de;
mod grammar;

use self::de::GroupDeserializer;

/// An error when reading a definition file.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Failed to parse the file.
    #[error("failed to parse definition file")]
    ParseFailure {
        /// The parser error.
        #[from]
        source: peg::error::ParseError<peg::str::LineCol>,
    },
    /// Failed to read the file.
    #[error("failed to read definition file `{}`", path)]
    Read {
        /// The path to the file.
        path: String,
        /// The source of the error.
        #[source]
        source: std::io::Error,
    },
    /// A value could not be converted into the requested type.
    #[error("invalid value in group `{}`: {}", group, message)]
    InvalidValue {
        /// The group containing the value.
        group: String,
        /// What went wrong.
        message: String,
    },
    /// A conversion error raised while deserializing.
    #[error("{}", message)]
    Custom {
        /// What went wrong.
        message: String,
    },
}

impl DefinitionError {
    fn read<P>(path: P, source: std::io::Error) -> Self
    where
        P: AsRef<Path>,
    {
        Self::Read {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    fn invalid_value<G>(group: G, err: Self) -> Self
    where
        G: Into<String>,
    {
        let message = match err {
            Self::Custom {
                message,
            } => message,
            err => err.to_string(),
        };

        Self::InvalidValue {
            group: group.into(),
            message,
        }
    }
}

impl serde::de::Error for DefinitionError {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Self::Custom {
            message: msg.to_string(),
        }
    }
}

/// The value of an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A comma-separated list of numbers.
    Vector(Vec<f64>),
    /// A string, either quoted or bare.
    String(String),
}

/// A named group of entries.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    entries: Vec<(String, Value)>,
}

impl Group {
    fn new(name: String, entries: Vec<(String, Value)>) -> Self {
        Self {
            name,
            entries,
        }
    }

    /// The name of the group as written in its header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entries of the group, in file order.
    ///
    /// Keys are lowercase.
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Look up the value of an entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// If the group header is `<kind> <label>` (case-insensitive on `kind`), the label.
    pub fn label_of(&self, kind: &str) -> Option<&str> {
        let mut parts = self.name.splitn(2, char::is_whitespace);
        let prefix = parts.next()?;
        let label = parts.next()?.trim();

        if prefix.eq_ignore_ascii_case(kind) && !label.is_empty() {
            Some(label)
        } else {
            None
        }
    }

    /// Deserialize the entries of the group into a structure.
    pub fn deserialize<'de, T>(&'de self) -> Result<T, DefinitionError>
    where
        T: Deserialize<'de>,
    {
        T::deserialize(GroupDeserializer::new(self))
            .map_err(|err| DefinitionError::invalid_value(&self.name, err))
    }
}

/// A parsed definition file.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    groups: Vec<Group>,
}

impl Definition {
    /// Parse a definition from its text.
    pub fn parse<S>(text: S) -> Result<Self, DefinitionError>
    where
        S: AsRef<str>,
    {
        Ok(Self {
            groups: grammar::definition::file(text.as_ref())?,
        })
    }

    /// Read and parse a definition file.
    pub fn from_path<P>(path: P) -> Result<Self, DefinitionError>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path.as_ref())
            .map_err(|err| DefinitionError::read(path.as_ref(), err))?;
        Self::parse(text)
    }

    /// The groups of the file, in file order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Find the first group with the given name (case-insensitive).
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups
            .iter()
            .find(|group| group.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    use crate::data::definition::{Definition, DefinitionError};

    #[derive(Debug, Deserialize)]
    struct Sample {
        count: u32,
        scale: f32,
        ratio: f32,
        label: String,
        offset: Vec<f32>,
        #[serde(default)]
        missing: Option<i32>,
    }

    const SAMPLE: &str = "[Sample one]\n\
                          count = 3\n\
                          scale = 0.5\n\
                          ratio = 2\n\
                          label = name\n\
                          offset = 1, -2\n";

    #[test]
    fn test_group_lookup() {
        let def = Definition::parse(SAMPLE).unwrap();

        let group = def.group("sample ONE").unwrap();
        assert_eq!(group.label_of("sample"), Some("one"));
        assert_eq!(group.label_of("shot"), None);
        assert!(group.get("count").is_some());
        assert!(group.get("Count").is_none());
        assert!(def.group("sample").is_none());
    }

    #[test]
    fn test_group_deserialize() {
        let def = Definition::parse(SAMPLE).unwrap();

        let sample: Sample = def.groups()[0].deserialize().unwrap();
        assert_eq!(sample.count, 3);
        assert_eq!(sample.scale, 0.5);
        assert_eq!(sample.ratio, 2.);
        assert_eq!(sample.label, "name");
        assert_eq!(sample.offset, [1., -2.]);
        assert_eq!(sample.missing, None);
    }

    #[test]
    fn test_group_deserialize_wrong_type() {
        let def = Definition::parse("[Sample one]\ncount = many\nscale = 1\n").unwrap();

        let err = def.groups()[0].deserialize::<Sample>().unwrap_err();
        if let DefinitionError::InvalidValue {
            group, ..
        } = err
        {
            assert_eq!(group, "Sample one");
        } else {
            panic!("unexpected error: {:?}", err);
        }
    }

    #[test]
    fn test_from_path_missing() {
        let err = Definition::from_path("/nonexistent/shots.def").unwrap_err();

        if let DefinitionError::Read {
            path, ..
        } = err
        {
            assert_eq!(path, "/nonexistent/shots.def");
        } else {
            panic!("unexpected error: {:?}", err);
        }
    }
}

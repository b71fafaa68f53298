// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use std::slice;

use serde::de::value::{BorrowedStrDeserializer, SeqDeserializer};
use serde::de::{DeserializeSeed, Deserializer, Error, MapAccess, Visitor};
use serde::forward_to_deserialize_any;

use crate::data::definition::{DefinitionError, Group, Value};

/// Presents the entries of a group as a map.
pub struct GroupDeserializer<'de> {
    group: &'de Group,
}

impl<'de> GroupDeserializer<'de> {
    pub fn new(group: &'de Group) -> Self {
        Self {
            group,
        }
    }
}

impl<'de> Deserializer<'de> for GroupDeserializer<'de> {
    type Error = DefinitionError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(EntryAccess {
            entries: self.group.entries.iter(),
            value: None,
        })
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

struct EntryAccess<'de> {
    entries: slice::Iter<'de, (String, Value)>,
    value: Option<&'de Value>,
}

impl<'de> MapAccess<'de> for EntryAccess<'de> {
    type Error = DefinitionError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        if let Some((key, value)) = self.entries.next() {
            self.value = Some(value);
            seed.deserialize(BorrowedStrDeserializer::new(key))
                .map(Some)
        } else {
            Ok(None)
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let value = self
            .value
            .take()
            .ok_or_else(|| DefinitionError::custom("value requested before its key"))?;
        seed.deserialize(ValueDeserializer {
            value,
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Deserializes a single entry value.
struct ValueDeserializer<'de> {
    value: &'de Value,
}

impl<'de> Deserializer<'de> for ValueDeserializer<'de> {
    type Error = DefinitionError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match *self.value {
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(ref s) => visitor.visit_borrowed_str(s),
            Value::Vector(ref v) => {
                SeqDeserializer::<_, DefinitionError>::new(v.iter().copied())
                    .deserialize_any(visitor)
            },
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match *self.value {
            Value::Integer(0) => visitor.visit_bool(false),
            Value::Integer(1) => visitor.visit_bool(true),
            Value::String(ref s) if s.eq_ignore_ascii_case("false") => visitor.visit_bool(false),
            Value::String(ref s) if s.eq_ignore_ascii_case("true") => visitor.visit_bool(true),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_enum<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if let Value::String(ref s) = *self.value {
            visitor.visit_enum(BorrowedStrDeserializer::new(s))
        } else {
            self.deserialize_any(visitor)
        }
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

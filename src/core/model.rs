//! Purpose: The constructor contracts model types implement, and builders over them.
//! Exports: `FromMapping`, `FromSequence`, `RawRepresentable`, `MappingKey`, `build_model`,
//! `JsonSequenceExt`.
//! Role: Compile-time dispatch from "a mapping" to "a model instance".
//! Invariants: Builders never cache or retain constructed models.
//! Invariants: Constructor errors propagate unchanged; only shape mismatches are skipped.
use std::borrow::Cow;

use crate::core::error::Error;
use crate::core::value::{FromJson, JsonMapping, JsonSequence};
use serde_json::Value;

/// A domain type that can be built from one decoded JSON object.
pub trait FromMapping: Sized {
    fn from_mapping(mapping: &JsonMapping) -> Result<Self, Error>;
}

/// A collection type built from a whole list of decoded JSON objects at once.
pub trait FromSequence: Sized {
    fn from_sequence(sequence: &[JsonMapping]) -> Result<Self, Error>;
}

/// An enumeration backed by a primitive raw value.
pub trait RawRepresentable: Sized {
    type Raw: FromJson;

    fn from_raw(raw: Self::Raw) -> Option<Self>;
}

/// A key type that may or may not be usable as a JSON object key.
pub trait MappingKey {
    fn as_mapping_key(&self) -> Option<&str>;
}

impl MappingKey for String {
    fn as_mapping_key(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl MappingKey for &str {
    fn as_mapping_key(&self) -> Option<&str> {
        Some(*self)
    }
}

impl MappingKey for Cow<'_, str> {
    fn as_mapping_key(&self) -> Option<&str> {
        Some(&**self)
    }
}

impl MappingKey for Value {
    fn as_mapping_key(&self) -> Option<&str> {
        self.as_str()
    }
}

impl MappingKey for Option<String> {
    fn as_mapping_key(&self) -> Option<&str> {
        self.as_deref()
    }
}

/// Re-keys `entries` into a string-keyed mapping and constructs `T` from it.
///
/// Entries whose key is not string-like are dropped. Later duplicates win.
pub fn build_model<T, I, K>(entries: I) -> Result<T, Error>
where
    T: FromMapping,
    I: IntoIterator<Item = (K, Value)>,
    K: MappingKey,
{
    let mut mapping = JsonMapping::new();
    for (key, value) in entries {
        match key.as_mapping_key() {
            Some(name) => {
                mapping.insert(name.to_owned(), value);
            }
            None => tracing::trace!("dropping entry with non-string key"),
        }
    }
    T::from_mapping(&mapping)
}

/// Builds models element-wise from a sequence.
pub trait JsonSequenceExt {
    fn model_list<T: FromMapping>(&self) -> Result<Vec<T>, Error>;

    fn model_collection<T: FromSequence>(&self) -> Result<T, Error>;
}

impl JsonSequenceExt for [Value] {
    fn model_list<T: FromMapping>(&self) -> Result<Vec<T>, Error> {
        let mut models = Vec::with_capacity(self.len());
        for (index, element) in self.iter().enumerate() {
            match element.as_object() {
                Some(mapping) => models.push(T::from_mapping(mapping)?),
                None => tracing::trace!(index, "skipping non-object list element"),
            }
        }
        Ok(models)
    }

    fn model_collection<T: FromSequence>(&self) -> Result<T, Error> {
        let sequence: JsonSequence = self
            .iter()
            .filter_map(|element| element.as_object().cloned())
            .collect();
        T::from_sequence(&sequence)
    }
}

impl JsonSequenceExt for [JsonMapping] {
    fn model_list<T: FromMapping>(&self) -> Result<Vec<T>, Error> {
        self.iter().map(T::from_mapping).collect()
    }

    fn model_collection<T: FromSequence>(&self) -> Result<T, Error> {
        T::from_sequence(self)
    }
}

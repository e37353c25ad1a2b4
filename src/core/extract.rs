//! Purpose: Typed field extraction over decoded JSON objects.
//! Exports: `JsonMappingExt`.
//! Role: Lenient `*_for_key` accessors with default fallback, plus strict `require*` lookups.
//! Invariants: Every accessor is a pure read; the mapping is never mutated.
//! Invariants: Lenient accessors fold "missing" and "wrong shape" into the default.
//! Invariants: Model constructor errors always propagate, on both paths.
use crate::core::date::parse_iso8601;
use crate::core::error::{Error, ErrorKind};
use crate::core::model::{FromMapping, FromSequence, JsonSequenceExt, RawRepresentable};
use crate::core::value::{FromJson, JsonMapping, json_type_name};
use serde_json::Value;
use time::OffsetDateTime;

/// Typed accessors for anything that can be viewed as a JSON object.
///
/// Implementors only provide [`as_mapping`](JsonMappingExt::as_mapping). A source that is
/// not an object behaves like an empty mapping.
pub trait JsonMappingExt {
    fn as_mapping(&self) -> Option<&JsonMapping>;

    fn field(&self, key: &str) -> Option<&Value> {
        self.as_mapping()?.get(key)
    }

    fn value_for_key<T: FromJson>(&self, key: &str, default: Option<T>) -> Option<T> {
        let Some(raw) = self.field(key) else {
            return default;
        };
        match T::from_json(raw) {
            Some(value) => Some(value),
            None => {
                tracing::trace!(key, found = json_type_name(raw), "type mismatch, using default");
                default
            }
        }
    }

    fn string_for_key(&self, key: &str, default: Option<String>) -> Option<String> {
        self.value_for_key(key, default)
    }

    fn bool_for_key(&self, key: &str, default: Option<bool>) -> Option<bool> {
        self.value_for_key(key, default)
    }

    fn int_for_key(&self, key: &str, default: Option<i64>) -> Option<i64> {
        self.value_for_key(key, default)
    }

    fn float_for_key(&self, key: &str, default: Option<f32>) -> Option<f32> {
        self.value_for_key(key, default)
    }

    fn double_for_key(&self, key: &str, default: Option<f64>) -> Option<f64> {
        self.value_for_key(key, default)
    }

    /// List at `key`, only when every element converts to `T`.
    fn array_for_key<T: FromJson>(&self, key: &str) -> Option<Vec<T>> {
        self.value_for_key(key, None)
    }

    fn enum_for_key<T: RawRepresentable>(&self, key: &str, default: Option<T>) -> Option<T> {
        self.value_for_key::<T::Raw>(key, None)
            .and_then(T::from_raw)
            .or(default)
    }

    fn date_for_key(&self, key: &str, default: Option<OffsetDateTime>) -> Option<OffsetDateTime> {
        let Some(text) = self.field(key).and_then(Value::as_str) else {
            return default;
        };
        match parse_iso8601(text) {
            Ok(date) => Some(date),
            Err(err) => {
                tracing::trace!(key, error = %err, "unparsable date, using default");
                default
            }
        }
    }

    fn model_for_key<T: FromMapping>(&self, key: &str) -> Result<Option<T>, Error> {
        match self.field(key).and_then(Value::as_object) {
            Some(mapping) => T::from_mapping(mapping).map(Some),
            None => Ok(None),
        }
    }

    /// Models for each object in the list at `key`; other elements are skipped.
    fn model_list_for_key<T: FromMapping>(&self, key: &str) -> Result<Option<Vec<T>>, Error> {
        match self.field(key).and_then(Value::as_array) {
            Some(items) => items.model_list().map(Some),
            None => Ok(None),
        }
    }

    /// Collection built from the objects in the list at `key`; other elements are skipped.
    fn collection_for_key<T: FromSequence>(&self, key: &str) -> Result<Option<T>, Error> {
        match self.field(key).and_then(Value::as_array) {
            Some(items) => items.model_collection().map(Some),
            None => Ok(None),
        }
    }

    /// Builds `T` from the whole mapping.
    fn model_value<T: FromMapping>(&self) -> Result<T, Error> {
        match self.as_mapping() {
            Some(mapping) => T::from_mapping(mapping),
            None => T::from_mapping(&JsonMapping::new()),
        }
    }

    fn require<T: FromJson>(&self, key: &str) -> Result<T, Error> {
        let raw = self.require_field(key)?;
        T::from_json(raw).ok_or_else(|| mismatch(key, std::any::type_name::<T>(), raw))
    }

    fn require_enum<T: RawRepresentable>(&self, key: &str) -> Result<T, Error> {
        let raw = self.require::<T::Raw>(key)?;
        T::from_raw(raw).ok_or_else(|| {
            Error::new(ErrorKind::TypeMismatch)
                .with_message(format!(
                    "value is not a valid {}",
                    std::any::type_name::<T>()
                ))
                .with_key(key)
        })
    }

    fn require_date(&self, key: &str) -> Result<OffsetDateTime, Error> {
        let raw = self.require_field(key)?;
        let text = raw.as_str().ok_or_else(|| mismatch(key, "date string", raw))?;
        parse_iso8601(text).map_err(|err| {
            Error::new(ErrorKind::DateParse)
                .with_message(format!("invalid ISO-8601 date {text:?}"))
                .with_key(key)
                .with_hint("Use RFC 3339, e.g. 2024-01-01T00:00:00Z.")
                .with_source(err)
        })
    }

    fn require_model<T: FromMapping>(&self, key: &str) -> Result<T, Error> {
        let raw = self.require_field(key)?;
        let mapping = raw.as_object().ok_or_else(|| mismatch(key, "object", raw))?;
        T::from_mapping(mapping)
    }

    fn require_field(&self, key: &str) -> Result<&Value, Error> {
        self.field(key).ok_or_else(|| {
            Error::new(ErrorKind::MissingKey)
                .with_message("key not present")
                .with_key(key)
        })
    }
}

impl JsonMappingExt for JsonMapping {
    fn as_mapping(&self) -> Option<&JsonMapping> {
        Some(self)
    }
}

impl JsonMappingExt for Value {
    fn as_mapping(&self) -> Option<&JsonMapping> {
        self.as_object()
    }
}

fn mismatch(key: &str, expected: &str, found: &Value) -> Error {
    Error::new(ErrorKind::TypeMismatch)
        .with_message(format!(
            "expected {expected}, found {}",
            json_type_name(found)
        ))
        .with_key(key)
}

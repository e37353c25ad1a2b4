//! Purpose: Checked conversion from a decoded JSON value to a static Rust type.
//! Exports: `FromJson`, `JsonMapping`, `JsonSequence`, `json_type_name`.
//! Role: The one place that decides which JSON shapes are compatible with which types.
//! Invariants: Conversion is a pure inspection of the value tag; nothing is coerced
//! across tags (no string-to-number, no number-to-bool).
//! Invariants: Integer targets accept integral JSON numbers (including `2.0`) that fit the range.
use serde_json::{Map, Value};

/// Decoded JSON object keyed by strings.
pub type JsonMapping = Map<String, Value>;

/// Ordered list of decoded JSON objects.
pub type JsonSequence = Vec<JsonMapping>;

/// A type that can be read out of a [`Value`] when the value has a compatible shape.
///
/// Returns `None` on any shape mismatch; callers decide whether that means "use the
/// default" or "report an error".
pub trait FromJson: Sized {
    fn from_json(value: &Value) -> Option<Self>;
}

impl FromJson for Value {
    fn from_json(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromJson for String {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromJson for bool {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

/// Integral value of a JSON number; `2.0` counts, `2.5` does not.
fn integral(value: &Value) -> Option<i128> {
    if let Some(n) = value.as_i64() {
        return Some(i128::from(n));
    }
    if let Some(n) = value.as_u64() {
        return Some(i128::from(n));
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .filter(|f| *f >= i128::MIN as f64 && *f < i128::MAX as f64)
        .map(|f| f as i128)
}

macro_rules! integer {
    ($($target:ty),*) => {
        $(
            impl FromJson for $target {
                fn from_json(value: &Value) -> Option<Self> {
                    integral(value).and_then(|n| <$target>::try_from(n).ok())
                }
            }
        )*
    };
}

integer!(i64, u64, i32, u32, usize);

impl FromJson for f64 {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromJson for f32 {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_f64().map(|n| n as f32)
    }
}

impl FromJson for JsonMapping {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_array()?.iter().map(T::from_json).collect()
    }
}

/// Lowercase JSON type name used in mismatch diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Purpose: Define the stable public Rust API boundary for modeljson.
//! Exports: Extraction traits, model contracts, value aliases, and the error model.
//! Role: Public, additive-only surface; callers import from here rather than `core`.
//! Invariants: Lenient accessors and strict `require*` lookups stay side by side.
//! Invariants: Everything re-exported here is usable without naming `core` paths.

pub use crate::core::date::{format_rfc3339_utc, parse_iso8601};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::extract::JsonMappingExt;
pub use crate::core::model::{
    FromMapping, FromSequence, JsonSequenceExt, MappingKey, RawRepresentable, build_model,
};
pub use crate::core::value::{FromJson, JsonMapping, JsonSequence, json_type_name};

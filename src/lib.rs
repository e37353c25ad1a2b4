//! Purpose: Typed extraction from decoded JSON objects into strongly-typed model values.
//! Exports: `api` (stable surface), `core` (conversion, extraction, model contracts, errors).
//! Role: Library backing the `modeljson` CLI and any caller holding `serde_json` values.
//! Invariants: No operation mutates its input; every call allocates a fresh result.
//! Invariants: Raw JSON text decoding stays outside the library (see the CLI's `json` module).
pub mod api;
pub mod core;

//! Purpose: JSON text decoding boundary used by the CLI.
//! Exports: `parse` module with decode helpers and failure categorization.
//! Role: Single seam where raw text becomes `serde_json::Value`; the library never decodes.
//! Invariants: Decoding for CLI input goes through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;

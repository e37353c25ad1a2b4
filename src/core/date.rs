//! Purpose: ISO-8601 date parsing and RFC 3339 rendering for date fields.
//! Exports: `parse_iso8601`, `format_rfc3339_utc`.
//! Role: Keeps `time` format details out of the extractor and the CLI.
//! Invariants: Only dates carrying an explicit offset (or `Z`) parse successfully.
//! Invariants: Rendering always normalizes to UTC with a `Z` suffix.
use crate::core::error::{Error, ErrorKind};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, UtcOffset};

/// Parses an ISO-8601 timestamp; RFC 3339 first, then the wider ISO-8601 grammar.
pub fn parse_iso8601(input: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(input, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(input, &Iso8601::DEFAULT))
}

pub fn format_rfc3339_utc(value: OffsetDateTime) -> Result<String, Error> {
    value.to_offset(UtcOffset::UTC).format(&Rfc3339).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to format date")
            .with_source(err)
    })
}

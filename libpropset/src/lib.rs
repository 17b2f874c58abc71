//! Parser for device property-set descriptions.
//!
//! A property-set file names a set of typed device properties together
//! with the vendor, bus, device id and revision they apply to:
//!
//! ```text
//! property-set: uart-basic
//! vendor: acme
//! bus: platform
//! device-id: ACME0001
//! revision: 1
//!
//! property: clock-frequency
//! type: integer
//! description: Input clock in Hz.
//! requires: reg-shift
//! ```
//!
//! # Parsing Pipeline
//!
//! The parser operates in three phases:
//!
//! 1. **Scanner**: Yields word and punctuation tokens with a one-token
//!    pushback slot, plus raw characters for free text.
//!
//! 2. **State Machine**: Dispatches on keywords, pulls free text through
//!    the extractors, and records diagnostics, resynchronizing at the next
//!    line after an error.
//!
//! 3. **Validation**: Checks every `requires` target against the complete
//!    property table.
//!
//! Parsing never fails on malformed input. Problems are collected on the
//! returned [`ParsedSet`] and logged through `tracing` as they are found.

mod diagnostics;
mod dump;
mod encode;
mod error;
mod extract;
mod keyword;
mod parsed;
mod parser;
mod scanner;
mod validate;
mod value;

use std::path::Path;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use dump::Dump;
pub use encode::{encode_property, encode_set, write_property, write_set};
pub use error::{Error, ParseContext, Result};
pub use keyword::{is_keyword, Keyword};
pub use parsed::{ParsedSet, Summary};
pub use validate::dangling_requires;
pub use value::{is_introducer, Literal, Property, PropertySet, PropertyType, SetType, Value};

/// Parse a property set from a string.
///
/// `filename` only affects diagnostic leaders: `<file>:<line>: ` when
/// given, `line <n>: ` otherwise.
///
/// # Example
///
/// ```
/// use libpropset::parse_str;
///
/// let parsed = parse_str("property-set: demo\n", None);
/// assert!(parsed.okay());
/// assert_eq!(parsed.name(), "demo");
/// ```
pub fn parse_str(source: &str, filename: Option<&str>) -> ParsedSet {
    let ctx = ParseContext::new(filename);
    let output = parser::parse_source(source, ctx);
    ParsedSet::new(source, filename, output)
}

/// Read and parse a property-set file. Diagnostics are labelled with the
/// path as given.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedSet> {
    let path = path.as_ref();
    let source = scanner::read_source(path)?;
    let name = path.to_string_lossy();
    Ok(parse_str(&source, Some(&*name)))
}

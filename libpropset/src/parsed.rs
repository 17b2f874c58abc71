//! The result of parsing one property-set file, and queries over it.

use std::fmt;

use indexmap::IndexMap;

use crate::diagnostics::Diagnostics;
use crate::encode;
use crate::error::{Error, Result};
use crate::parser::ParseOutput;
use crate::value::{Property, PropertySet};

/// Line and error counts for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Physical lines in the source.
    pub lines_read: usize,
    /// Lines the scanner advanced past before stopping.
    pub lines_parsed: usize,
    pub errors: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} lines read", self.lines_read)?;
        write!(
            f,
            "{} lines parsed, {} errors found",
            self.lines_parsed, self.errors
        )
    }
}

/// A parsed property set: header attributes, properties in declaration
/// order, and every diagnostic raised along the way.
///
/// Parsing never fails outright; check [`ParsedSet::okay`] before trusting
/// the records.
#[derive(Debug, Clone)]
pub struct ParsedSet {
    filename: Option<String>,
    source: String,
    set: PropertySet,
    properties: IndexMap<String, Property>,
    diagnostics: Diagnostics,
    summary: Summary,
}

impl ParsedSet {
    pub(crate) fn new(source: &str, filename: Option<&str>, output: ParseOutput) -> Self {
        let summary = Summary {
            lines_read: source.lines().count(),
            lines_parsed: output.lines_scanned,
            errors: output.diagnostics.len(),
        };
        match filename {
            Some(name) => tracing::info!(file = name, "{}", summary),
            None => tracing::info!("{}", summary),
        }
        Self {
            filename: filename.map(String::from),
            source: source.to_string(),
            set: output.set,
            properties: output.properties,
            diagnostics: output.diagnostics,
            summary,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub fn okay(&self) -> bool {
        !self.has_errors()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// The `property-set` name. Empty if the file never declared one.
    pub fn name(&self) -> &str {
        &self.set.name
    }

    pub fn property_set(&self) -> &PropertySet {
        &self.set
    }

    pub fn properties(&self) -> &IndexMap<String, Property> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// `acked-by` entries, in file order.
    pub fn acks(&self) -> &[String] {
        &self.set.acked_by
    }

    /// `derived-from` entries, in file order.
    pub fn base_sets(&self) -> &[String] {
        &self.set.derived_from
    }

    /// The text that was parsed.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// `/vendor/bus/device-id/revision`, the directory this set belongs in.
    pub fn set_location(&self) -> Result<String> {
        let part = |value: &Option<String>, attribute: &'static str| {
            value.clone().ok_or(Error::MissingAttribute(attribute))
        };
        Ok(format!(
            "/{}/{}/{}/{}",
            part(&self.set.vendor, "vendor")?,
            part(&self.set.bus, "bus")?,
            part(&self.set.device_id, "device-id")?,
            part(&self.set.revision, "revision")?,
        ))
    }

    /// The set location joined with each property name, in declaration
    /// order.
    pub fn property_locations(&self) -> Result<Vec<String>> {
        let base = self.set_location()?;
        Ok(self
            .properties
            .keys()
            .map(|name| format!("{}/{}", base, name))
            .collect())
    }

    /// Serialize the named property in property-set syntax.
    pub fn write_property<W: fmt::Write>(&self, name: &str, out: &mut W) -> Result<()> {
        let property = self
            .properties
            .get(name)
            .ok_or_else(|| Error::NoSuchProperty(name.to_string()))?;
        encode::write_property(out, property)?;
        Ok(())
    }

    /// Serialize the whole set in canonical property-set syntax.
    pub fn encode(&self) -> String {
        encode::encode_set(&self.set, &self.properties)
    }
}

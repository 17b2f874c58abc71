//! Human-readable report of a parsed set: the source, the header
//! attributes, each property, then the diagnostics and summary.

use std::fmt;

use crate::parsed::ParsedSet;
use crate::value::{Property, PropertySet};

const RULE: &str = "+------------------------------------------------------+";

/// Display adapter returned by [`ParsedSet::dump`].
pub struct Dump<'a> {
    parsed: &'a ParsedSet,
}

impl ParsedSet {
    /// Render a full report of this set.
    pub fn dump(&self) -> Dump<'_> {
        Dump { parsed: self }
    }
}

fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", RULE)?;
    writeln!(f, "| {}", title)?;
    writeln!(f, "{}", RULE)
}

fn attributes(f: &mut fmt::Formatter<'_>, set: &PropertySet) -> fmt::Result {
    writeln!(f, "property-set: {}", set.name)?;
    if let Some(set_type) = set.set_type {
        writeln!(f, "set-type: {}", set_type)?;
    }
    for (name, value) in [
        ("vendor", &set.vendor),
        ("bus", &set.bus),
        ("device-id", &set.device_id),
        ("revision", &set.revision),
    ] {
        writeln!(f, "{}: {}", name, value.as_deref().unwrap_or("-"))?;
    }
    for (name, values) in [
        ("derived-from", &set.derived_from),
        ("submitted-by", &set.submitted_by),
        ("reviewed-by", &set.reviewed_by),
        ("acked-by", &set.acked_by),
    ] {
        writeln!(f, "{}: [{}]", name, values.join("; "))?;
    }
    Ok(())
}

fn property(f: &mut fmt::Formatter<'_>, p: &Property) -> fmt::Result {
    writeln!(f, "==== {} ====", p.name)?;
    match p.property_type {
        Some(ty) => writeln!(f, "  type: {}", ty)?,
        None => writeln!(f, "  type: -")?,
    }
    if let Some(description) = &p.description {
        writeln!(f, "  description: {}", description)?;
    }
    if let Some(example) = &p.example {
        writeln!(f, "  example: {}", example)?;
    }
    if !p.requires.is_empty() {
        writeln!(f, "  requires: {}", p.requires.join(", "))?;
    }
    for value in &p.values {
        match value.literal.as_fields() {
            Some(fields) => write!(f, "  - {{ {} }}", fields.join(", "))?,
            None => write!(f, "  - {}", value.literal.as_str().unwrap_or_default())?,
        }
        writeln!(f, ": {}", value.description)?;
    }
    Ok(())
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parsed = self.parsed;

        banner(f, &format!("File: {}", parsed.filename().unwrap_or("<input>")))?;
        f.write_str(parsed.source())?;
        if !parsed.source().ends_with('\n') {
            writeln!(f)?;
        }
        writeln!(f)?;

        banner(f, "Attributes")?;
        attributes(f, parsed.property_set())?;
        writeln!(f)?;

        banner(f, "Properties")?;
        for p in parsed.properties().values() {
            property(f, p)?;
        }

        if !parsed.diagnostics().is_empty() {
            writeln!(f)?;
            banner(f, "Diagnostics")?;
            for d in parsed.diagnostics() {
                writeln!(f, "{} [{}] {}", d.severity, d.kind, d)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", parsed.summary())
    }
}

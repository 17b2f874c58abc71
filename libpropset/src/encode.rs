//! Encode property records back to property-set text.
//!
//! The output is canonical: one statement per line, header attributes
//! first, value entries indented under `values:`. Parsing the output
//! yields records equal to the ones encoded.

use std::fmt::{self, Write};

use indexmap::IndexMap;

use crate::value::{Literal, Property, PropertySet, Value};

const VALUE_INDENT: &str = "    ";

// =============================================================================
// Property
// =============================================================================

/// Write one property block.
pub fn write_property<W: Write>(out: &mut W, property: &Property) -> fmt::Result {
    writeln!(out, "property: {}", property.name)?;
    if let Some(ty) = property.property_type {
        writeln!(out, "type: {}", ty)?;
    }
    if let Some(description) = &property.description {
        write_text(out, "description", description)?;
    }
    if let Some(example) = &property.example {
        write_text(out, "example", example)?;
    }
    if !property.requires.is_empty() {
        writeln!(out, "requires: {}", property.requires.join(", "))?;
    }
    if let Some(ty) = property.property_type {
        if !property.values.is_empty() {
            writeln!(out, "values:")?;
            for value in &property.values {
                write_value(out, ty.introducer(), value)?;
            }
        }
    }
    Ok(())
}

/// Encode one property block to a string.
pub fn encode_property(property: &Property) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_property(&mut out, property);
    out
}

fn write_value<W: Write>(out: &mut W, introducer: &str, value: &Value) -> fmt::Result {
    match &value.literal {
        Literal::Fields(fields) => writeln!(
            out,
            "{}{}: {{ {} }}",
            VALUE_INDENT,
            introducer,
            fields.join(", ")
        )?,
        Literal::Integer(text) | Literal::Token(text) | Literal::Reference(text) => {
            writeln!(out, "{}{}: {}", VALUE_INDENT, introducer, text)?
        }
    }
    write_text(out, &format!("{}description", VALUE_INDENT), &value.description)
}

fn write_text<W: Write>(out: &mut W, keyword: &str, text: &str) -> fmt::Result {
    if text.is_empty() {
        writeln!(out, "{}:", keyword)
    } else {
        writeln!(out, "{}: {}", keyword, text)
    }
}

// =============================================================================
// Property set
// =============================================================================

/// Write the header attributes followed by every property, separated by
/// blank lines.
pub fn write_set<W: Write>(
    out: &mut W,
    set: &PropertySet,
    properties: &IndexMap<String, Property>,
) -> fmt::Result {
    writeln!(out, "property-set: {}", set.name)?;
    if let Some(set_type) = set.set_type {
        writeln!(out, "set-type: {}", set_type)?;
    }

    let scalars = [
        ("vendor", &set.vendor),
        ("bus", &set.bus),
        ("device-id", &set.device_id),
        ("revision", &set.revision),
    ];
    for (keyword, value) in scalars {
        if let Some(value) = value {
            writeln!(out, "{}: {}", keyword, value)?;
        }
    }

    let lists = [
        ("derived-from", &set.derived_from),
        ("submitted-by", &set.submitted_by),
        ("reviewed-by", &set.reviewed_by),
        ("acked-by", &set.acked_by),
    ];
    for (keyword, entries) in lists {
        for entry in entries {
            writeln!(out, "{}: {}", keyword, entry)?;
        }
    }

    for property in properties.values() {
        writeln!(out)?;
        write_property(out, property)?;
    }
    Ok(())
}

/// Encode a whole property set to a string.
pub fn encode_set(set: &PropertySet, properties: &IndexMap<String, Property>) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_set(&mut out, set, properties);
    out
}

//! TOML rendering of a parsed property set.
//!
//! Header attributes become top-level keys. Each property becomes a
//! `[properties.<name>]` table, with its value entries as an array of
//! inline tables keyed by introducer plus `description`.
//!
//! Lossy edges:
//!   - TOML integers are i64; wider integer values, and integer text that
//!     does not read as a number, are kept as strings.
//!   - Absent attributes and empty lists are omitted rather than written
//!     as empty values.

use libpropset::{Literal, ParsedSet, Property, Value};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use toml_edit::{value, Array, DocumentMut, InlineTable, Item, Table};

/// Encode a parsed set as a TOML string.
pub fn encode(parsed: &ParsedSet) -> String {
    let set = parsed.property_set();
    let mut doc = DocumentMut::new();

    doc["property-set"] = value(set.name.as_str());
    if let Some(set_type) = set.set_type {
        doc["set-type"] = value(set_type.as_str());
    }
    for (key, attr) in [
        ("vendor", &set.vendor),
        ("bus", &set.bus),
        ("device-id", &set.device_id),
        ("revision", &set.revision),
    ] {
        if let Some(attr) = attr {
            doc[key] = value(attr.as_str());
        }
    }
    for (key, items) in [
        ("derived-from", &set.derived_from),
        ("submitted-by", &set.submitted_by),
        ("reviewed-by", &set.reviewed_by),
        ("acked-by", &set.acked_by),
    ] {
        if !items.is_empty() {
            doc[key] = value(string_array(items));
        }
    }

    let mut properties = Table::new();
    properties.set_implicit(true);
    for (name, property) in parsed.properties() {
        properties.insert(name, Item::Table(property_table(property)));
    }
    doc["properties"] = Item::Table(properties);

    doc.to_string()
}

fn string_array(items: &[String]) -> Array {
    items.iter().map(String::as_str).collect()
}

fn property_table(property: &Property) -> Table {
    let mut table = Table::new();
    if let Some(ty) = property.property_type {
        table.insert("type", value(ty.as_str()));
    }
    if let Some(description) = &property.description {
        table.insert("description", value(description.as_str()));
    }
    if let Some(example) = &property.example {
        table.insert("example", value(example.as_str()));
    }
    if !property.requires.is_empty() {
        table.insert("requires", value(string_array(&property.requires)));
    }
    if !property.values.is_empty() {
        let mut values = Array::new();
        for v in &property.values {
            values.push(value_table(v));
        }
        table.insert("values", value(values));
    }
    table
}

fn value_table(v: &Value) -> InlineTable {
    let mut table = InlineTable::new();
    let introducer = v.literal.property_type().introducer();
    let literal: toml_edit::Value = match &v.literal {
        Literal::Integer(text) => integer_value(text, v.literal.as_integer()),
        Literal::Token(text) | Literal::Reference(text) => text.as_str().into(),
        Literal::Fields(fields) => string_array(fields).into(),
    };
    table.insert(introducer, literal);
    table.insert("description", v.description.as_str().into());
    table
}

fn integer_value(text: &str, n: Option<BigInt>) -> toml_edit::Value {
    match n.and_then(|n| n.to_i64()) {
        Some(i) => i.into(),
        None => text.into(),
    }
}

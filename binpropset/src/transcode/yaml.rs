//! YAML rendering of a parsed property set.
//!
//! Layout:
//!   - `property-set`, `set-type`, `vendor`, `bus`, `device-id`, `revision`
//!     as scalars (absent attributes are omitted)
//!   - `derived-from`, `submitted-by`, `reviewed-by`, `acked-by` as
//!     sequences (empty lists are omitted)
//!   - `properties` as a mapping from name to property, in file order
//!
//! Each value entry is a mapping keyed by its introducer (`integer`,
//! `token`, `reference`, `subpackage`) plus `description`. Integers that
//! fit in i64 become YAML integers; anything else keeps its source text.

use libpropset::{Literal, ParsedSet, Property, Value};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde_yaml::{Mapping, Value as Yaml};

/// Encode a parsed set as a YAML string.
pub fn encode(parsed: &ParsedSet) -> Result<String, String> {
    serde_yaml::to_string(&set_to_yaml(parsed)).map_err(|e| format!("YAML encode error: {}", e))
}

fn insert(map: &mut Mapping, key: &str, value: Yaml) {
    map.insert(Yaml::String(key.to_string()), value);
}

fn string(s: &str) -> Yaml {
    Yaml::String(s.to_string())
}

fn strings(items: &[String]) -> Yaml {
    Yaml::Sequence(items.iter().map(|s| string(s)).collect())
}

fn set_to_yaml(parsed: &ParsedSet) -> Yaml {
    let set = parsed.property_set();
    let mut map = Mapping::new();

    insert(&mut map, "property-set", string(&set.name));
    if let Some(set_type) = set.set_type {
        insert(&mut map, "set-type", string(set_type.as_str()));
    }
    for (key, value) in [
        ("vendor", &set.vendor),
        ("bus", &set.bus),
        ("device-id", &set.device_id),
        ("revision", &set.revision),
    ] {
        if let Some(value) = value {
            insert(&mut map, key, string(value));
        }
    }
    for (key, items) in [
        ("derived-from", &set.derived_from),
        ("submitted-by", &set.submitted_by),
        ("reviewed-by", &set.reviewed_by),
        ("acked-by", &set.acked_by),
    ] {
        if !items.is_empty() {
            insert(&mut map, key, strings(items));
        }
    }

    let mut properties = Mapping::new();
    for (name, property) in parsed.properties() {
        properties.insert(string(name), property_to_yaml(property));
    }
    insert(&mut map, "properties", Yaml::Mapping(properties));

    Yaml::Mapping(map)
}

fn property_to_yaml(property: &Property) -> Yaml {
    let mut map = Mapping::new();
    if let Some(ty) = property.property_type {
        insert(&mut map, "type", string(ty.as_str()));
    }
    if let Some(description) = &property.description {
        insert(&mut map, "description", string(description));
    }
    if let Some(example) = &property.example {
        insert(&mut map, "example", string(example));
    }
    if !property.requires.is_empty() {
        insert(&mut map, "requires", strings(&property.requires));
    }
    if !property.values.is_empty() {
        let values = property.values.iter().map(value_to_yaml).collect();
        insert(&mut map, "values", Yaml::Sequence(values));
    }
    Yaml::Mapping(map)
}

fn value_to_yaml(value: &Value) -> Yaml {
    let mut map = Mapping::new();
    let introducer = value.literal.property_type().introducer();
    let literal = match &value.literal {
        Literal::Integer(text) => integer_to_yaml(text, value.literal.as_integer()),
        Literal::Token(text) | Literal::Reference(text) => string(text),
        Literal::Fields(fields) => strings(fields),
    };
    insert(&mut map, introducer, literal);
    insert(&mut map, "description", string(&value.description));
    Yaml::Mapping(map)
}

fn integer_to_yaml(text: &str, n: Option<BigInt>) -> Yaml {
    match n.and_then(|n| n.to_i64()) {
        Some(i) => Yaml::Number(serde_yaml::Number::from(i)),
        None => string(text),
    }
}

//! Property-set records.
//!
//! A parsed file yields one [`PropertySet`] (the header attributes) and an
//! ordered map of [`Property`] records keyed by name.

use num_bigint::BigInt;
use num_traits::Num;
use std::fmt;

/// Kind of property set declared by `set-type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetType {
    Abstract,
    Definition,
    Subset,
}

impl SetType {
    pub fn from_word(word: &str) -> Option<SetType> {
        match word {
            "abstract" => Some(SetType::Abstract),
            "definition" => Some(SetType::Definition),
            "subset" => Some(SetType::Subset),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SetType::Abstract => "abstract",
            SetType::Definition => "definition",
            SetType::Subset => "subset",
        }
    }
}

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Integer,
    String,
    Reference,
    Package,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Integer,
        PropertyType::String,
        PropertyType::Reference,
        PropertyType::Package,
    ];

    pub fn from_word(word: &str) -> Option<PropertyType> {
        match word {
            "integer" => Some(PropertyType::Integer),
            "string" => Some(PropertyType::String),
            "reference" => Some(PropertyType::Reference),
            "package" => Some(PropertyType::Package),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Integer => "integer",
            PropertyType::String => "string",
            PropertyType::Reference => "reference",
            PropertyType::Package => "package",
        }
    }

    /// The word that introduces one entry of a `values:` block.
    pub fn introducer(self) -> &'static str {
        match self {
            PropertyType::Integer => "integer",
            PropertyType::String => "token",
            PropertyType::Reference => "reference",
            PropertyType::Package => "subpackage",
        }
    }
}

/// Whether `word` introduces a value entry for any property type.
pub fn is_introducer(word: &str) -> bool {
    PropertyType::ALL.iter().any(|ty| ty.introducer() == word)
}

impl fmt::Display for SetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The literal of one value entry; its variant matches the owning
/// property's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Integer text, kept as written.
    Integer(String),
    /// String token.
    Token(String),
    /// Name of another property.
    Reference(String),
    /// Field names of a package.
    Fields(Vec<String>),
}

impl Literal {
    /// Build the scalar literal a property of type `ty` expects.
    /// Package properties carry fields, not a scalar, and yield `None`.
    pub fn scalar(ty: PropertyType, text: &str) -> Option<Literal> {
        match ty {
            PropertyType::Integer => Some(Literal::Integer(text.to_string())),
            PropertyType::String => Some(Literal::Token(text.to_string())),
            PropertyType::Reference => Some(Literal::Reference(text.to_string())),
            PropertyType::Package => None,
        }
    }

    /// Returns the literal text if this is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Integer(s) | Literal::Token(s) | Literal::Reference(s) => Some(s),
            Literal::Fields(_) => None,
        }
    }

    /// Returns the field names if this is a package literal.
    pub fn as_fields(&self) -> Option<&[String]> {
        match self {
            Literal::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    /// Read an integer literal (`42`, `-1`, `0x1f`, `0o17`, `0b101`).
    pub fn as_integer(&self) -> Option<BigInt> {
        match self {
            Literal::Integer(text) => parse_integer(text),
            _ => None,
        }
    }

    /// The property type this literal belongs to.
    pub fn property_type(&self) -> PropertyType {
        match self {
            Literal::Integer(_) => PropertyType::Integer,
            Literal::Token(_) => PropertyType::String,
            Literal::Reference(_) => PropertyType::Reference,
            Literal::Fields(_) => PropertyType::Package,
        }
    }
}

fn parse_integer(text: &str) -> Option<BigInt> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (radix, digits) = match body.get(..2) {
        Some("0x") | Some("0X") => (16, &body[2..]),
        Some("0o") | Some("0O") => (8, &body[2..]),
        Some("0b") | Some("0B") => (2, &body[2..]),
        _ => (10, body),
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let n = BigInt::from_str_radix(digits, radix).ok()?;
    Some(if negative { -n } else { n })
}

/// One entry of a `values:` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub literal: Literal,
    pub description: String,
}

/// A named, typed property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub property_type: Option<PropertyType>,
    pub description: Option<String>,
    pub example: Option<String>,
    pub requires: Vec<String>,
    pub values: Vec<Value>,
}

impl Property {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Field names of a package property's subpackage.
    pub fn fields(&self) -> Option<&[String]> {
        self.values.iter().find_map(|v| v.literal.as_fields())
    }
}

/// Header attributes of a property set.
///
/// Scalars keep the last value written; lists keep every entry in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    pub name: String,
    pub set_type: Option<SetType>,
    pub vendor: Option<String>,
    pub bus: Option<String>,
    pub device_id: Option<String>,
    pub revision: Option<String>,
    pub derived_from: Vec<String>,
    pub acked_by: Vec<String>,
    pub submitted_by: Vec<String>,
    pub reviewed_by: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_integer() {
        let lit = |s: &str| Literal::Integer(s.to_string());
        assert_eq!(lit("42").as_integer(), Some(BigInt::from(42)));
        assert_eq!(lit("-7").as_integer(), Some(BigInt::from(-7)));
        assert_eq!(lit("0x1f").as_integer(), Some(BigInt::from(31)));
        assert_eq!(lit("0o17").as_integer(), Some(BigInt::from(15)));
        assert_eq!(lit("0b101").as_integer(), Some(BigInt::from(5)));
        assert_eq!(lit("ten").as_integer(), None);
        assert_eq!(lit("0x").as_integer(), None);
        assert_eq!(lit("--1").as_integer(), None);
        assert_eq!(Literal::Token("1".into()).as_integer(), None);
    }

    #[test]
    fn test_introducers() {
        assert_eq!(PropertyType::Integer.introducer(), "integer");
        assert_eq!(PropertyType::String.introducer(), "token");
        assert_eq!(PropertyType::Reference.introducer(), "reference");
        assert_eq!(PropertyType::Package.introducer(), "subpackage");
        assert!(is_introducer("integer"));
        assert!(is_introducer("token"));
        assert!(!is_introducer("string"));
    }

    #[test]
    fn test_package_fields() {
        let mut prop = Property::new("regs");
        prop.property_type = Some(PropertyType::Package);
        prop.values.push(Value {
            literal: Literal::Fields(vec!["length".into(), "offset".into()]),
            description: "window".into(),
        });
        assert_eq!(prop.fields(), Some(&["length".to_string(), "offset".to_string()][..]));
        assert_eq!(prop.values[0].literal.property_type(), PropertyType::Package);
    }
}

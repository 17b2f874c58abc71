//! Reserved words of the property-set grammar.
//!
//! Keywords are case-sensitive. `integer` and `reference` are deliberately
//! absent: they name property types and value introducers, and only mean
//! something where the parser expects them.

/// A reserved word that can start a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    AckedBy,
    Bus,
    Description,
    DerivedFrom,
    DeviceId,
    Example,
    Property,
    PropertySet,
    Requires,
    ReviewedBy,
    Revision,
    SetType,
    SubmittedBy,
    Subpackage,
    Token,
    Type,
    Values,
    Vendor,
}

impl Keyword {
    pub const ALL: [Keyword; 18] = [
        Keyword::AckedBy,
        Keyword::Bus,
        Keyword::Description,
        Keyword::DerivedFrom,
        Keyword::DeviceId,
        Keyword::Example,
        Keyword::Property,
        Keyword::PropertySet,
        Keyword::Requires,
        Keyword::ReviewedBy,
        Keyword::Revision,
        Keyword::SetType,
        Keyword::SubmittedBy,
        Keyword::Subpackage,
        Keyword::Token,
        Keyword::Type,
        Keyword::Values,
        Keyword::Vendor,
    ];

    /// Look up the keyword spelled by `word`.
    pub fn from_word(word: &str) -> Option<Keyword> {
        let kw = match word {
            "acked-by" => Keyword::AckedBy,
            "bus" => Keyword::Bus,
            "description" => Keyword::Description,
            "derived-from" => Keyword::DerivedFrom,
            "device-id" => Keyword::DeviceId,
            "example" => Keyword::Example,
            "property" => Keyword::Property,
            "property-set" => Keyword::PropertySet,
            "requires" => Keyword::Requires,
            "reviewed-by" => Keyword::ReviewedBy,
            "revision" => Keyword::Revision,
            "set-type" => Keyword::SetType,
            "submitted-by" => Keyword::SubmittedBy,
            "subpackage" => Keyword::Subpackage,
            "token" => Keyword::Token,
            "type" => Keyword::Type,
            "values" => Keyword::Values,
            "vendor" => Keyword::Vendor,
            _ => return None,
        };
        Some(kw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::AckedBy => "acked-by",
            Keyword::Bus => "bus",
            Keyword::Description => "description",
            Keyword::DerivedFrom => "derived-from",
            Keyword::DeviceId => "device-id",
            Keyword::Example => "example",
            Keyword::Property => "property",
            Keyword::PropertySet => "property-set",
            Keyword::Requires => "requires",
            Keyword::ReviewedBy => "reviewed-by",
            Keyword::Revision => "revision",
            Keyword::SetType => "set-type",
            Keyword::SubmittedBy => "submitted-by",
            Keyword::Subpackage => "subpackage",
            Keyword::Token => "token",
            Keyword::Type => "type",
            Keyword::Values => "values",
            Keyword::Vendor => "vendor",
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `word` is a reserved word.
pub fn is_keyword(word: &str) -> bool {
    Keyword::from_word(word).is_some()
}

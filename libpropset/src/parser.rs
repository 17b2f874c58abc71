//! Phase 2: State-machine parser
//!
//! The parser pulls tokens from the scanner one at a time and feeds them
//! to a tagged [`State`]. States that collect free text hand the cursor to
//! the extractors, which may read ahead and push a keyword back.
//!
//! Errors are recorded as diagnostics. After a recoverable error the rest
//! of the line is skipped and parsing resumes at the statement level, or
//! in the values loop when inside a `values:` block. Only a missing
//! leading `property-set` and internal inconsistencies stop the parse.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::ParseContext;
use crate::extract::{comma_list, multi_line, one_line, starts_statement};
use crate::keyword::Keyword;
use crate::scanner::{Cursor, Token, TokenType};
use crate::validate;
use crate::value::{is_introducer, Literal, Property, PropertySet, PropertyType, SetType, Value};

/// Everything produced by one pass over a source.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub set: PropertySet,
    pub properties: IndexMap<String, Property>,
    pub diagnostics: Diagnostics,
    /// Cursor line minus one when scanning stopped.
    pub lines_scanned: usize,
}

/// Parse a complete in-memory source.
pub fn parse_source(source: &str, ctx: ParseContext) -> ParseOutput {
    let mut parser = Parser::new(source, ctx);
    let last = parser.run();
    parser.finish(last)
}

#[derive(Debug)]
enum State {
    /// Before the leading `property-set`.
    Start,
    SetNameColon,
    SetName,
    /// Between statements: skip blanks, wait for a keyword.
    Statement,
    AttrColon(Keyword),
    AttrValue(Keyword),
    /// Inside a `values:` block, between entries.
    Values,
    ValueColon(PropertyType),
    ValueLiteral(PropertyType),
    ValueDescription(Literal),
    ValueDescriptionColon(Literal),
    ValueDescriptionText(Literal),
    PackageColon,
    PackageOpen,
    PackageFields(Vec<String>),
}

enum Flow {
    Next(State),
    /// Skip to the end of the current line, then continue in the state.
    Resync(State),
    Halt,
}

struct OpenProperty {
    line: usize,
    property: Property,
    /// Reported when opened; parsed as usual and dropped at commit.
    duplicate: bool,
}

struct Parser<'src> {
    cursor: Cursor<'src>,
    diagnostics: Diagnostics,
    set: PropertySet,
    properties: IndexMap<String, Property>,
    declared_at: HashMap<String, usize>,
    open: Option<OpenProperty>,
}

fn shown(token: &Token<'_>) -> String {
    if token.is_newline() {
        "EOL".to_string()
    } else {
        token.text.to_string()
    }
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, ctx: ParseContext) -> Self {
        Self {
            cursor: Cursor::new(source),
            diagnostics: Diagnostics::new(ctx),
            set: PropertySet::default(),
            properties: IndexMap::new(),
            declared_at: HashMap::new(),
            open: None,
        }
    }

    /// Drive the state machine to end of input. Returns the state at end of
    /// input, or `None` if the parse was halted.
    fn run(&mut self) -> Option<State> {
        let mut state = State::Start;
        while let Some(token) = self.cursor.next_token() {
            tracing::trace!(?state, token = %shown(&token), line = token.line_num, "step");
            state = match self.step(state, token) {
                Flow::Next(next) => next,
                Flow::Resync(next) => {
                    self.skip_line(token);
                    next
                }
                Flow::Halt => return None,
            };
        }
        Some(state)
    }

    fn step(&mut self, state: State, token: Token<'src>) -> Flow {
        match state {
            State::Start => self.start(token),
            State::SetNameColon => self.expect_colon(
                token,
                Keyword::PropertySet.as_str(),
                State::SetName,
                State::Statement,
            ),
            State::SetName => {
                let name = one_line(&mut self.cursor, token);
                if name.is_empty() {
                    self.missing_text(Keyword::PropertySet, token.line_num);
                } else {
                    self.set.name = name;
                }
                Flow::Next(State::Statement)
            }
            State::Statement => self.statement(token),
            State::AttrColon(kw) => {
                self.expect_colon(token, kw.as_str(), State::AttrValue(kw), State::Statement)
            }
            State::AttrValue(kw) => self.attribute(kw, token),
            State::Values => self.values_entry(token),
            State::ValueColon(ty) => self.expect_colon(
                token,
                ty.introducer(),
                State::ValueLiteral(ty),
                State::Values,
            ),
            State::ValueLiteral(ty) => self.value_literal(ty, token),
            State::ValueDescription(literal) => {
                if token.is_newline() {
                    Flow::Next(State::ValueDescription(literal))
                } else if token.is_word(Keyword::Description.as_str()) {
                    Flow::Next(State::ValueDescriptionColon(literal))
                } else {
                    self.error(
                        DiagnosticKind::Structural,
                        token.line_num,
                        "description is required for value",
                    );
                    self.recover(token, State::Values)
                }
            }
            State::ValueDescriptionColon(literal) => self.expect_colon(
                token,
                Keyword::Description.as_str(),
                State::ValueDescriptionText(literal),
                State::Values,
            ),
            State::ValueDescriptionText(literal) => {
                let description = one_line(&mut self.cursor, token);
                match self.open.as_mut() {
                    Some(open)
                        if literal.as_fields().is_some() && open.property.fields().is_some() =>
                    {
                        tracing::trace!(line = token.line_num, "dropping rejected subpackage");
                        Flow::Next(State::Values)
                    }
                    Some(open) => {
                        open.property.values.push(Value {
                            literal,
                            description,
                        });
                        Flow::Next(State::Values)
                    }
                    None => self.internal(token.line_num, "value completed with no open property"),
                }
            }
            State::PackageColon => self.expect_colon(
                token,
                PropertyType::Package.introducer(),
                State::PackageOpen,
                State::Values,
            ),
            State::PackageOpen => {
                if token.typ == TokenType::LBrace {
                    Flow::Next(State::PackageFields(Vec::new()))
                } else {
                    self.error(
                        DiagnosticKind::Structural,
                        token.line_num,
                        "expected '{' to start package description",
                    );
                    self.recover(token, State::Values)
                }
            }
            State::PackageFields(mut fields) => match token.typ {
                TokenType::RBrace => Flow::Next(State::ValueDescription(Literal::Fields(fields))),
                TokenType::Comma | TokenType::Newline => Flow::Next(State::PackageFields(fields)),
                TokenType::Word => {
                    fields.push(token.text.to_string());
                    Flow::Next(State::PackageFields(fields))
                }
                _ => {
                    self.error(
                        DiagnosticKind::Structural,
                        token.line_num,
                        format!("unexpected '{}' in package description", token.text),
                    );
                    Flow::Next(State::PackageFields(fields))
                }
            },
        }
    }

    fn start(&mut self, token: Token<'src>) -> Flow {
        if token.is_newline() {
            return Flow::Next(State::Start);
        }
        if token.is_word(Keyword::PropertySet.as_str()) {
            return Flow::Next(State::SetNameColon);
        }
        self.diagnostics
            .report(
                DiagnosticKind::Structural,
                token.line_num,
                "property-set is required as first line",
            )
            .fatal()
            .emit();
        Flow::Halt
    }

    fn statement(&mut self, token: Token<'src>) -> Flow {
        if token.typ == TokenType::Word {
            if let Some(kw) = Keyword::from_word(token.text) {
                return Flow::Next(State::AttrColon(kw));
            }
        }
        if !token.is_newline() {
            tracing::trace!(token = token.text, line = token.line_num, "skipping stray token");
        }
        Flow::Next(State::Statement)
    }

    fn attribute(&mut self, kw: Keyword, token: Token<'src>) -> Flow {
        match kw {
            Keyword::PropertySet => {
                self.error(
                    DiagnosticKind::Context,
                    token.line_num,
                    "property-set may only be declared once",
                );
                Flow::Resync(State::Statement)
            }
            Keyword::SetType => match SetType::from_word(token.text) {
                Some(set_type) if token.typ == TokenType::Word => {
                    self.set.set_type = Some(set_type);
                    Flow::Next(State::Statement)
                }
                _ => {
                    self.error(
                        DiagnosticKind::Vocabulary,
                        token.line_num,
                        format!("undefined property-set type: {}", shown(&token)),
                    );
                    Flow::Resync(State::Statement)
                }
            },
            Keyword::DerivedFrom
            | Keyword::AckedBy
            | Keyword::SubmittedBy
            | Keyword::ReviewedBy => {
                let text = one_line(&mut self.cursor, token);
                if text.is_empty() {
                    self.missing_text(kw, token.line_num);
                } else {
                    let list = match kw {
                        Keyword::DerivedFrom => &mut self.set.derived_from,
                        Keyword::AckedBy => &mut self.set.acked_by,
                        Keyword::SubmittedBy => &mut self.set.submitted_by,
                        _ => &mut self.set.reviewed_by,
                    };
                    list.push(text);
                }
                Flow::Next(State::Statement)
            }
            Keyword::Vendor | Keyword::Bus | Keyword::DeviceId | Keyword::Revision => {
                let text = one_line(&mut self.cursor, token);
                if text.is_empty() {
                    self.missing_text(kw, token.line_num);
                } else {
                    let slot = match kw {
                        Keyword::Vendor => &mut self.set.vendor,
                        Keyword::Bus => &mut self.set.bus,
                        Keyword::DeviceId => &mut self.set.device_id,
                        _ => &mut self.set.revision,
                    };
                    *slot = Some(text);
                }
                Flow::Next(State::Statement)
            }
            Keyword::Property => {
                if token.typ != TokenType::Word {
                    self.missing_text(kw, token.line_num);
                    return Flow::Resync(State::Statement);
                }
                self.commit_open();
                let duplicate = match self.declared_at.get(token.text) {
                    Some(&first) => {
                        let message = format!(
                            "property {} is already defined at line {}",
                            token.text, first
                        );
                        self.error(DiagnosticKind::Duplicate, token.line_num, message);
                        true
                    }
                    None => false,
                };
                self.open = Some(OpenProperty {
                    line: token.line_num,
                    property: Property::new(token.text),
                    duplicate,
                });
                Flow::Next(State::Statement)
            }
            Keyword::Type => {
                if self.open.is_none() {
                    return self.no_open_property(kw, token);
                }
                match PropertyType::from_word(token.text) {
                    Some(ty) if token.typ == TokenType::Word => {
                        if let Some(open) = self.open.as_mut() {
                            open.property.property_type = Some(ty);
                        }
                        Flow::Next(State::Statement)
                    }
                    _ => {
                        self.error(
                            DiagnosticKind::Vocabulary,
                            token.line_num,
                            format!("undefined property type: {}", shown(&token)),
                        );
                        Flow::Resync(State::Statement)
                    }
                }
            }
            Keyword::Description | Keyword::Example => {
                if self.open.is_none() {
                    return self.no_open_property(kw, token);
                }
                let text = multi_line(&mut self.cursor, token);
                if let Some(open) = self.open.as_mut() {
                    if kw == Keyword::Description {
                        open.property.description = Some(text);
                    } else {
                        open.property.example = Some(text);
                    }
                }
                Flow::Next(State::Statement)
            }
            Keyword::Requires => {
                if self.open.is_none() {
                    return self.no_open_property(kw, token);
                }
                let requires = comma_list(&mut self.cursor, token);
                if let Some(open) = self.open.as_mut() {
                    open.property.requires = requires;
                }
                Flow::Next(State::Statement)
            }
            Keyword::Values => self.open_values(token),
            Keyword::Token | Keyword::Subpackage => {
                self.error(
                    DiagnosticKind::Context,
                    token.line_num,
                    format!("{} is only valid inside a values block", kw),
                );
                Flow::Resync(State::Statement)
            }
        }
    }

    fn open_values(&mut self, token: Token<'src>) -> Flow {
        let Some(open) = self.open.as_ref() else {
            return self.no_open_property(Keyword::Values, token);
        };
        if open.property.property_type.is_none() {
            let message = format!("property {} needs a type before values", open.property.name);
            self.error(DiagnosticKind::Context, token.line_num, message);
            return Flow::Resync(State::Statement);
        }
        if !token.is_newline() {
            self.error(
                DiagnosticKind::Structural,
                token.line_num,
                "expected EOL after values keyword",
            );
            return Flow::Resync(State::Statement);
        }
        if let Some(open) = self.open.as_mut() {
            open.property.values.clear();
        }
        Flow::Next(State::Values)
    }

    fn values_entry(&mut self, token: Token<'src>) -> Flow {
        let Some(open) = self.open.as_ref() else {
            return self.internal(token.line_num, "values block with no open property");
        };
        let Some(ty) = open.property.property_type else {
            let message = format!("values block for untyped property {}", open.property.name);
            return self.internal(token.line_num, message);
        };

        if token.is_newline() {
            return Flow::Next(State::Values);
        }

        if token.is_word(ty.introducer()) {
            if ty != PropertyType::Package {
                return Flow::Next(State::ValueColon(ty));
            }
            if open.property.fields().is_some() {
                let message = format!(
                    "only one subpackage is allowed for package property {}",
                    open.property.name
                );
                self.error(DiagnosticKind::Structural, token.line_num, message);
            }
            return Flow::Next(State::PackageColon);
        }

        if starts_statement(&token) && !is_introducer(token.text) {
            self.cursor.push_back(token);
            return Flow::Next(State::Statement);
        }

        self.error(
            DiagnosticKind::Vocabulary,
            token.line_num,
            format!("expected '{}' for {} properties", ty.introducer(), ty),
        );
        Flow::Resync(State::Values)
    }

    fn value_literal(&mut self, ty: PropertyType, token: Token<'src>) -> Flow {
        if token.is_newline() {
            self.error(
                DiagnosticKind::Structural,
                token.line_num,
                format!("expected a '{}' value, not EOL", ty.introducer()),
            );
            return Flow::Next(State::Values);
        }
        match Literal::scalar(ty, token.text) {
            Some(literal) => Flow::Next(State::ValueDescription(literal)),
            None => self.internal(token.line_num, format!("no scalar literal for {} properties", ty)),
        }
    }

    fn expect_colon(
        &mut self,
        token: Token<'src>,
        after: &str,
        ok: State,
        fallback: State,
    ) -> Flow {
        if token.typ == TokenType::Colon {
            return Flow::Next(ok);
        }
        self.error(
            DiagnosticKind::Structural,
            token.line_num,
            format!("colon required after {}", after),
        );
        self.recover(token, fallback)
    }

    /// Resume at `fallback`, keeping the offending token if it starts a
    /// statement or a value entry of its own.
    fn recover(&mut self, token: Token<'src>, fallback: State) -> Flow {
        if token.typ == TokenType::Word && (starts_statement(&token) || is_introducer(token.text)) {
            self.cursor.push_back(token);
            Flow::Next(fallback)
        } else {
            Flow::Resync(fallback)
        }
    }

    fn skip_line(&mut self, token: Token<'src>) {
        if token.is_newline() {
            return;
        }
        while let Some(next) = self.cursor.next_token() {
            if next.is_newline() {
                break;
            }
        }
    }

    fn no_open_property(&mut self, kw: Keyword, token: Token<'src>) -> Flow {
        self.error(
            DiagnosticKind::Context,
            token.line_num,
            format!("{} used before any property was defined", kw),
        );
        Flow::Resync(State::Statement)
    }

    fn missing_text(&mut self, kw: Keyword, line: usize) {
        self.error(
            DiagnosticKind::Structural,
            line,
            format!("missing text after {}", kw),
        );
    }

    fn internal(&mut self, line: usize, message: impl Into<String>) -> Flow {
        let message = format!("internal error: {}", message.into());
        self.error(DiagnosticKind::Internal, line, message);
        Flow::Halt
    }

    fn error(&mut self, kind: DiagnosticKind, line: usize, message: impl Into<String>) {
        self.diagnostics.report(kind, line, message).emit();
    }

    /// Move the open property into the map. A duplicate was reported when
    /// it opened and is dropped here, keeping the earlier definition.
    fn commit_open(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        let name = open.property.name.clone();
        if open.duplicate {
            tracing::debug!(property = %name, line = open.line, "dropped duplicate property");
            return;
        }
        tracing::debug!(property = %name, line = open.line, "committed property");
        self.declared_at.insert(name.clone(), open.line);
        self.properties.insert(name, open.property);
    }

    fn end_of_input(&mut self, state: State) {
        let line = self.cursor.line();
        match state {
            State::Statement | State::Values => {}
            State::Start => {
                self.diagnostics
                    .report(
                        DiagnosticKind::Structural,
                        line,
                        "property-set is required as first line",
                    )
                    .fatal()
                    .emit();
            }
            State::PackageFields(_) => {
                self.diagnostics
                    .report(
                        DiagnosticKind::Structural,
                        line,
                        "expected '}' to end package description, found end of file",
                    )
                    .fatal()
                    .emit();
            }
            State::ValueDescription(_)
            | State::ValueDescriptionColon(_)
            | State::ValueDescriptionText(_) => {
                self.error(
                    DiagnosticKind::Structural,
                    line,
                    "description is required for value",
                );
            }
            other => {
                tracing::trace!(state = ?other, "input ended mid-statement");
                self.error(DiagnosticKind::Structural, line, "unexpected end of file");
            }
        }
    }

    fn finish(mut self, last: Option<State>) -> ParseOutput {
        if let Some(state) = last {
            self.end_of_input(state);
        }
        self.commit_open();
        validate::check_requires(&self.properties, &self.declared_at, &mut self.diagnostics);

        ParseOutput {
            set: self.set,
            properties: self.properties,
            diagnostics: self.diagnostics,
            lines_scanned: self.cursor.line().saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    fn parse(source: &str) -> ParseOutput {
        parse_source(source, ParseContext::new(Some("test.pset")))
    }

    fn messages(out: &ParseOutput) -> Vec<String> {
        out.diagnostics.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_minimal_set() {
        let out = parse("property-set: Foo\n");
        assert!(out.diagnostics.is_empty(), "{:?}", messages(&out));
        assert_eq!(out.set.name, "Foo");
        assert!(out.properties.is_empty());
        assert_eq!(out.lines_scanned, 1);
    }

    #[test]
    fn test_wrong_first_keyword_is_fatal() {
        let out = parse("vendor: Acme\nproperty-set: Foo\n");
        assert_eq!(out.diagnostics.len(), 1);
        let d = &out.diagnostics.as_slice()[0];
        assert_eq!(d.kind, DiagnosticKind::Structural);
        assert_eq!(d.severity, Severity::Fatal);
        assert_eq!(d.to_string(), "test.pset:1: property-set is required as first line");
        assert_eq!(out.set.name, "");
    }

    #[test]
    fn test_leading_blank_lines_and_comments() {
        let out = parse("# a comment\n\nproperty-set: Foo Bar\n");
        assert!(out.diagnostics.is_empty(), "{:?}", messages(&out));
        assert_eq!(out.set.name, "Foo Bar");
    }

    #[test]
    fn test_empty_input() {
        let out = parse("");
        assert_eq!(out.diagnostics.len(), 1);
        assert!(out.diagnostics.has_fatal());
    }

    #[test]
    fn test_header_attributes() {
        let source = "\
property-set: uart-basic
set-type: definition
vendor: Acme
vendor: Acme Corp
bus: platform
device-id: ACME0001
revision: 2
derived-from: serial-base
derived-from: clock-consumer
submitted-by: Jane Doe <jane@example.com>
acked-by: Sam Roe <sam@example.org>
reviewed-by: Kim <kim@example.net>
";
        let out = parse(source);
        assert!(out.diagnostics.is_empty(), "{:?}", messages(&out));
        let set = &out.set;
        assert_eq!(set.name, "uart-basic");
        assert_eq!(set.set_type, Some(SetType::Definition));
        assert_eq!(set.vendor.as_deref(), Some("Acme Corp"));
        assert_eq!(set.bus.as_deref(), Some("platform"));
        assert_eq!(set.device_id.as_deref(), Some("ACME0001"));
        assert_eq!(set.revision.as_deref(), Some("2"));
        assert_eq!(set.derived_from, vec!["serial-base", "clock-consumer"]);
        assert_eq!(set.submitted_by, vec!["Jane Doe <jane@example.com>"]);
        assert_eq!(set.acked_by, vec!["Sam Roe <sam@example.org>"]);
        assert_eq!(set.reviewed_by, vec!["Kim <kim@example.net>"]);
    }

    #[test]
    fn test_acked_by_keeps_address_unsplit() {
        let out = parse("property-set: Foo\nacked-by: Jane Doe <jane@example.com>\n");
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.set.acked_by, vec!["Jane Doe <jane@example.com>"]);
    }

    #[test]
    fn test_integer_values() {
        let source = "\
property-set: Foo
property: power
type: integer
description: Power state
values:
    integer: 0 description: off
    integer: 1
    description: on
";
        let out = parse(source);
        assert!(out.diagnostics.is_empty(), "{:?}", messages(&out));
        let prop = &out.properties["power"];
        assert_eq!(prop.property_type, Some(PropertyType::Integer));
        assert_eq!(prop.description.as_deref(), Some("Power state"));
        assert_eq!(
            prop.values,
            vec![
                Value {
                    literal: Literal::Integer("0".into()),
                    description: "off".into(),
                },
                Value {
                    literal: Literal::Integer("1".into()),
                    description: "on".into(),
                },
            ]
        );
    }

    #[test]
    fn test_string_and_reference_values() {
        let source = "\
property-set: Foo
property: mode
type: string
values:
    token: fast
    description: full speed
property: parent
type: reference
values:
    reference: clock
    description: the clock provider
property: clock
type: string
";
        let out = parse(source);
        assert!(out.diagnostics.is_empty(), "{:?}", messages(&out));
        assert_eq!(
            out.properties["mode"].values[0].literal,
            Literal::Token("fast".into())
        );
        assert_eq!(
            out.properties["parent"].values[0].literal,
            Literal::Reference("clock".into())
        );
        let names: Vec<&str> = out.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["mode", "parent", "clock"]);
    }

    #[test]
    fn test_package_fields() {
        let source = "\
property-set: Foo
property: window
type: package
values:
    subpackage: { length, offset, flags }
    description: foo
";
        let out = parse(source);
        assert!(out.diagnostics.is_empty(), "{:?}", messages(&out));
        let prop = &out.properties["window"];
        assert_eq!(prop.values.len(), 1);
        assert_eq!(
            prop.fields(),
            Some(&["length".to_string(), "offset".to_string(), "flags".to_string()][..])
        );
        assert_eq!(prop.values[0].description, "foo");
    }

    #[test]
    fn test_package_fields_span_lines() {
        let source = "\
property-set: Foo
property: window
type: package
values:
    subpackage: {
        length,
        offset
    }
    description: two fields
";
        let out = parse(source);
        assert!(out.diagnostics.is_empty(), "{:?}", messages(&out));
        assert_eq!(out.properties["window"].fields().map(|f| f.len()), Some(2));
    }

    #[test]
    fn test_second_subpackage_rejected() {
        let source = "\
property-set: Foo
property: window
type: package
values:
    subpackage: { a }
    description: first
    subpackage: { b }
    description: second
";
        let out = parse(source);
        assert_eq!(out.diagnostics.count(DiagnosticKind::Structural), 1);
        assert_eq!(out.properties["window"].values.len(), 1);
        assert_eq!(out.properties["window"].fields(), Some(&["a".to_string()][..]));
    }

    #[test]
    fn test_second_subpackage_leaves_property_untouched() {
        let source = "\
property-set: Foo
property: window
type: package
description: real
values:
    subpackage: { a }
    description: first
    subpackage: {
        b,
        c
    }
    description: second
property: next
type: string
";
        let out = parse(source);
        assert_eq!(
            messages(&out),
            vec!["test.pset:8: only one subpackage is allowed for package property window"]
        );
        let window = &out.properties["window"];
        assert_eq!(window.description.as_deref(), Some("real"));
        assert_eq!(window.values.len(), 1);
        assert_eq!(window.values[0].description, "first");
        assert!(out.properties.contains_key("next"));
    }

    #[test]
    fn test_unterminated_package_is_fatal() {
        let source = "\
property-set: Foo
property: window
type: package
values:
    subpackage: { length, offset
";
        let out = parse(source);
        assert_eq!(out.diagnostics.len(), 1);
        assert!(out.diagnostics.has_fatal());
        assert!(out.properties.contains_key("window"));
    }

    #[test]
    fn test_dangling_requires() {
        let source = "\
property-set: Foo
property: a
type: integer
requires: b
property: c
type: integer
requires: a, b
";
        let out = parse(source);
        assert_eq!(out.diagnostics.count(DiagnosticKind::Reference), 2);
        assert_eq!(
            messages(&out),
            vec![
                "test.pset:2: a depends on b, which does not exist",
                "test.pset:5: c depends on b, which does not exist",
            ]
        );
        assert_eq!(out.properties["c"].requires, vec!["a", "b"]);
        assert_eq!(out.properties["a"].property_type, Some(PropertyType::Integer));
    }

    #[test]
    fn test_missing_colon_recovers() {
        let source = "\
property-set: Foo
vendor Acme
bus: pci
";
        let out = parse(source);
        assert_eq!(messages(&out), vec!["test.pset:2: colon required after vendor"]);
        assert_eq!(out.set.vendor, None);
        assert_eq!(out.set.bus.as_deref(), Some("pci"));
    }

    #[test]
    fn test_vocabulary_errors() {
        let source = "\
property-set: Foo
set-type: concrete
property: p
type: float
";
        let out = parse(source);
        assert_eq!(
            messages(&out),
            vec![
                "test.pset:2: undefined property-set type: concrete",
                "test.pset:4: undefined property type: float",
            ]
        );
        assert_eq!(out.diagnostics.count(DiagnosticKind::Vocabulary), 2);
        assert!(out.properties.contains_key("p"));
    }

    #[test]
    fn test_context_errors() {
        let source = "\
property-set: Foo
type: integer
description: orphan text
property: p
values:
";
        let out = parse(source);
        assert_eq!(
            messages(&out),
            vec![
                "test.pset:2: type used before any property was defined",
                "test.pset:3: description used before any property was defined",
                "test.pset:5: property p needs a type before values",
            ]
        );
        assert_eq!(out.diagnostics.count(DiagnosticKind::Context), 3);
    }

    #[test]
    fn test_wrong_value_introducer() {
        let source = "\
property-set: Foo
property: p
type: integer
values:
    token: x
    integer: 3
    description: right kind
";
        let out = parse(source);
        assert_eq!(
            messages(&out),
            vec!["test.pset:5: expected 'integer' for integer properties"]
        );
        let prop = &out.properties["p"];
        assert_eq!(prop.values.len(), 1);
        assert_eq!(prop.values[0].literal, Literal::Integer("3".into()));
    }

    #[test]
    fn test_value_needs_description() {
        let source = "\
property-set: Foo
property: p
type: integer
values:
    integer: 1
    integer: 2
    description: two
property: q
type: string
";
        let out = parse(source);
        assert_eq!(
            messages(&out),
            vec!["test.pset:6: description is required for value"]
        );
        let values = &out.properties["p"].values;
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].literal, Literal::Integer("2".into()));
        assert!(out.properties.contains_key("q"));
    }

    #[test]
    fn test_value_literal_on_next_line_is_error() {
        let source = "\
property-set: Foo
property: p
type: integer
values:
    integer:
    integer: 2
    description: two
";
        let out = parse(source);
        assert_eq!(
            messages(&out),
            vec!["test.pset:5: expected a 'integer' value, not EOL"]
        );
        assert_eq!(out.properties["p"].values.len(), 1);
    }

    #[test]
    fn test_values_block_ends_at_keyword() {
        let source = "\
property-set: Foo
property: p
type: integer
values:
    integer: 1
    description: one
example: p = 1
acked-by: Reviewer <r@example.com>
";
        let out = parse(source);
        assert!(out.diagnostics.is_empty(), "{:?}", messages(&out));
        let prop = &out.properties["p"];
        assert_eq!(prop.example.as_deref(), Some("p = 1"));
        assert_eq!(out.set.acked_by, vec!["Reviewer <r@example.com>"]);
    }

    #[test]
    fn test_multi_line_description() {
        let source = "\
property-set: Foo
property: p
type: string
description: The first line
    and the second line.
example: p = \"x\"
";
        let out = parse(source);
        assert!(out.diagnostics.is_empty(), "{:?}", messages(&out));
        let prop = &out.properties["p"];
        assert_eq!(
            prop.description.as_deref(),
            Some("The first line and the second line.")
        );
        assert_eq!(prop.example.as_deref(), Some("p = \"x\""));
    }

    #[test]
    fn test_duplicate_property_keeps_first() {
        let source = "\
property-set: Foo
property: p
type: integer
property: p
type: string
";
        let out = parse(source);
        assert_eq!(
            messages(&out),
            vec!["test.pset:4: property p is already defined at line 2"]
        );
        assert_eq!(out.diagnostics.count(DiagnosticKind::Duplicate), 1);
        assert_eq!(out.properties.len(), 1);
        assert_eq!(out.properties["p"].property_type, Some(PropertyType::Integer));
    }

    #[test]
    fn test_duplicate_reported_before_its_body() {
        let source = "\
property-set: Foo
property: p
property: p
vendor acme
";
        let out = parse(source);
        assert_eq!(
            messages(&out),
            vec![
                "test.pset:3: property p is already defined at line 2",
                "test.pset:4: colon required after vendor",
            ]
        );
        assert_eq!(out.properties.len(), 1);
    }

    #[test]
    fn test_second_property_set_rejected() {
        let out = parse("property-set: Foo\nproperty-set: Bar\n");
        assert_eq!(
            messages(&out),
            vec!["test.pset:2: property-set may only be declared once"]
        );
        assert_eq!(out.set.name, "Foo");
    }

    #[test]
    fn test_stray_introducer_outside_values() {
        let out = parse("property-set: Foo\ntoken: x\n");
        assert_eq!(
            messages(&out),
            vec!["test.pset:2: token is only valid inside a values block"]
        );
    }

    #[test]
    fn test_missing_text() {
        let out = parse("property-set: Foo\nvendor:\nproperty:\n");
        assert_eq!(
            messages(&out),
            vec![
                "test.pset:2: missing text after vendor",
                "test.pset:3: missing text after property",
            ]
        );
    }

    #[test]
    fn test_property_without_fields_is_committed() {
        let out = parse("property-set: Foo\nproperty: a\nproperty: b\n");
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.properties.len(), 2);
        assert_eq!(out.properties["a"], Property::new("a"));
    }

    #[test]
    fn test_end_of_input_mid_value() {
        let out = parse("property-set: Foo\nproperty: p\ntype: integer\nvalues:\n    integer: 1\n");
        assert_eq!(messages(&out), vec!["test.pset:6: description is required for value"]);
        assert!(out.properties["p"].values.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let source = "\
property-set: Foo
property: a
type: integer
requires: missing
values:
    integer: 0
    description: zero
vendor Acme
";
        let first = parse(source);
        let second = parse(source);
        assert_eq!(first.set, second.set);
        assert_eq!(first.properties, second.properties);
        assert_eq!(first.diagnostics.as_slice(), second.diagnostics.as_slice());
        assert_eq!(first.lines_scanned, second.lines_scanned);
    }
}

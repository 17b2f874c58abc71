//! Raw-text extractors.
//!
//! Free text in a property set is not tokenized meaningfully, so these
//! helpers rebuild it from the token stream (and, for multi-line text,
//! from raw characters at the same cursor position). Each takes the first
//! token of the text, which the caller has already read.

use crate::keyword::is_keyword;
use crate::scanner::{Cursor, Token, TokenType};

/// Whether a token is a reserved word, i.e. the start of a new statement.
pub(crate) fn starts_statement(token: &Token<'_>) -> bool {
    token.typ == TokenType::Word && is_keyword(token.text)
}

/// Single-line text: tokens joined by single spaces up to the newline.
///
/// Between `<` and `>` tokens are joined without spaces, so `Name
/// <user@host>` survives intact. A keyword outside brackets ends the text
/// early and is pushed back for the caller.
pub fn one_line<'src>(cursor: &mut Cursor<'src>, first: Token<'src>) -> String {
    let mut text = String::new();
    let mut verbatim = false;
    let mut current = Some(first);

    while let Some(token) = current {
        if token.is_newline() {
            break;
        }

        if verbatim {
            text.push_str(token.text);
            if token.text == ">" {
                verbatim = false;
            }
        } else {
            text.push(' ');
            text.push_str(token.text);
            if token.text == "<" {
                verbatim = true;
            }
        }

        current = cursor.next_token();
        if let Some(next) = current {
            if !verbatim && starts_statement(&next) {
                cursor.push_back(next);
                break;
            }
        }
    }

    text.trim().to_string()
}

/// Multi-line text: the rest of each physical line verbatim, continuing
/// onto following lines until one starts with a keyword.
///
/// Lines are joined with a single space; leading indentation and trailing
/// whitespace of each line are dropped. Blank lines are skipped.
pub fn multi_line<'src>(cursor: &mut Cursor<'src>, first: Token<'src>) -> String {
    let mut text = String::new();
    let mut next = Some(first);

    while let Some(token) = next.take() {
        if token.is_newline() {
            match cursor.next_token() {
                Some(lookahead) if starts_statement(&lookahead) => {
                    cursor.push_back(lookahead);
                    break;
                }
                other => {
                    next = other;
                    continue;
                }
            }
        }

        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(token.text);

        // The rest of the line, bypassing the tokenizer.
        while let Some(c) = cursor.next_char() {
            if c == '\n' {
                next = Some(Token {
                    typ: TokenType::Newline,
                    text: "\n",
                    line_num: cursor.line() - 1,
                });
                break;
            }
            text.push(c);
        }
        text.truncate(text.trim_end().len());
    }

    text
}

/// Comma-separated list up to the newline, in order, without the commas.
pub fn comma_list<'src>(cursor: &mut Cursor<'src>, first: Token<'src>) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = Some(first);

    while let Some(token) = current {
        match token.typ {
            TokenType::Newline => break,
            TokenType::Comma => {}
            _ => items.push(token.text.to_string()),
        }
        current = cursor.next_token();
    }

    items
}

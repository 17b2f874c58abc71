//! Phase 1: Scanner
//!
//! The scanner owns the single read position over an in-memory source and
//! offers two views of it:
//! - Tokens: maximal runs of word characters (letters, digits, `_`, `-`,
//!   `.`, `/`), single structural characters, and a newline sentinel.
//! - Raw characters: the next character exactly as written, used by the
//!   multi-line extractor to keep free text verbatim.
//!
//! Spaces and tabs separate tokens and are discarded. There is no quoting.
//! `#` at a token position starts a comment that runs to the end of line;
//! the newline itself is still returned.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Token type produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Run of word characters.
    Word,
    /// `:` field separator.
    Colon,
    /// `,` list separator.
    Comma,
    /// `{` opening a package field list.
    LBrace,
    /// `}` closing a package field list.
    RBrace,
    /// Any other single non-word character, such as `<`, `>` or `@`.
    Symbol,
    /// End of a physical line.
    Newline,
}

/// A single token, borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub typ: TokenType,
    pub text: &'src str,
    /// One-based line the token appears on.
    pub line_num: usize,
}

impl<'src> Token<'src> {
    pub fn is_newline(&self) -> bool {
        self.typ == TokenType::Newline
    }

    pub fn is_word(&self, word: &str) -> bool {
        self.typ == TokenType::Word && self.text == word
    }
}

/// Read a complete source file into memory.
pub fn read_source(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound(path.to_path_buf())),
        Err(source) => Err(Error::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Characters that extend a word token.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')
}

/// Cursor over the source with one token of pushback.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    pos: usize,
    line: usize,
    pushed: Option<Token<'src>>,
}

impl<'src> Cursor<'src> {
    /// Create a cursor at the start of `source`.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            pushed: None,
        }
    }

    /// Current line number; advances once per consumed newline.
    pub fn line(&self) -> usize {
        self.line
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
    }

    /// Return a token so the next call to [`next_token`](Self::next_token)
    /// yields it again. Only one token may be pending at a time.
    pub fn push_back(&mut self, token: Token<'src>) {
        debug_assert!(self.pushed.is_none(), "pushback slot already in use");
        self.pushed = Some(token);
    }

    /// Read the next raw character from the same position the token view
    /// uses. Must not be called while a token is pushed back.
    pub fn next_char(&mut self) -> Option<char> {
        debug_assert!(self.pushed.is_none(), "raw read with a pushed-back token");
        let c = self.peek_char()?;
        self.bump(c);
        Some(c)
    }

    /// Read the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token<'src>> {
        if let Some(token) = self.pushed.take() {
            return Some(token);
        }

        loop {
            let c = self.peek_char()?;
            match c {
                ' ' | '\t' | '\r' => self.bump(c),
                '#' => self.skip_comment(),
                '\n' => {
                    let token = self.single(TokenType::Newline, c);
                    return Some(token);
                }
                ':' => return Some(self.single(TokenType::Colon, c)),
                ',' => return Some(self.single(TokenType::Comma, c)),
                '{' => return Some(self.single(TokenType::LBrace, c)),
                '}' => return Some(self.single(TokenType::RBrace, c)),
                c if is_word_char(c) => return Some(self.word()),
                _ => return Some(self.single(TokenType::Symbol, c)),
            }
        }
    }

    fn single(&mut self, typ: TokenType, c: char) -> Token<'src> {
        let start = self.pos;
        let line_num = self.line;
        self.bump(c);
        Token {
            typ,
            text: &self.source[start..self.pos],
            line_num,
        }
    }

    fn word(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !is_word_char(c) {
                break;
            }
            self.bump(c);
        }
        Token {
            typ: TokenType::Word,
            text: &self.source[start..self.pos],
            line_num: self.line,
        }
    }

    /// Skip a comment up to, but not including, the newline.
    fn skip_comment(&mut self) {
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.bump(c);
        }
    }
}

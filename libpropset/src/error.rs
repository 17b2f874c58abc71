//! Error types for property-set loading and queries.
//!
//! Grammar problems are not errors in this sense: they are collected as
//! [`Diagnostic`](crate::Diagnostic)s while parsing continues. The variants
//! here cover the cases where there is nothing to parse or a query cannot
//! be answered.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for property-set operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Parse context carrying the file name for error leaders.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format the `<file>:<line>: ` leader that prefixes a diagnostic.
    pub fn error_leader(&self, line: usize) -> String {
        match &self.filename {
            Some(name) => format!("{}:{}: ", name, line),
            None => format!("line {}: ", line),
        }
    }
}

/// Error type for property-set operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The source file does not exist.
    #[error("cannot find file: {}", .0.display())]
    NotFound(PathBuf),

    /// The source file exists but could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A location was requested but the set lacks one of its path attributes.
    #[error("property-set has no {0} attribute")]
    MissingAttribute(&'static str),

    /// A property was requested by name but the set does not define it.
    #[error("no such property: {0}")]
    NoSuchProperty(String),

    /// Writing serialized output failed.
    #[error("cannot write output")]
    Fmt(#[from] std::fmt::Error),
}
